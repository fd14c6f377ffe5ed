use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::StoreError;

/// One confirmed meal in the durable per-user, per-day log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrates: f64,
    /// What the user actually said; deletion-by-name matches against this
    /// as well as the API name.
    pub utterance: String,
    pub logged_at: DateTime<Utc>,
}

/// Durable food log keyed by user id and calendar date. `replace` exists
/// for deletion-by-filter: list, drop, write back.
#[async_trait]
pub trait FoodLog: Send + Sync {
    async fn append(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry: FoodEntry,
    ) -> Result<(), StoreError>;
    async fn list(&self, user_id: &str, date: NaiveDate) -> Result<Vec<FoodEntry>, StoreError>;
    async fn replace(
        &self,
        user_id: &str,
        date: NaiveDate,
        entries: Vec<FoodEntry>,
    ) -> Result<(), StoreError>;
}

type DayKey = (String, NaiveDate);

#[derive(Default)]
pub struct InMemoryFoodLog {
    inner: Mutex<HashMap<DayKey, Vec<FoodEntry>>>,
}

impl InMemoryFoodLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FoodLog for InMemoryFoodLog {
    async fn append(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry: FoodEntry,
    ) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        map.entry((user_id.to_string(), date)).or_default().push(entry);
        Ok(())
    }

    async fn list(&self, user_id: &str, date: NaiveDate) -> Result<Vec<FoodEntry>, StoreError> {
        let map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .get(&(user_id.to_string(), date))
            .cloned()
            .unwrap_or_default())
    }

    async fn replace(
        &self,
        user_id: &str,
        date: NaiveDate,
        entries: Vec<FoodEntry>,
    ) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        if entries.is_empty() {
            map.remove(&(user_id.to_string(), date));
        } else {
            map.insert((user_id.to_string(), date), entries);
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct LogRow {
    user_id: String,
    date: NaiveDate,
    entries: Vec<FoodEntry>,
}

/// JSON-snapshot log for local mode. The whole map is rewritten on every
/// mutation; fine for one user at a keyboard.
pub struct FileFoodLog {
    path: PathBuf,
    inner: Mutex<HashMap<DayKey, Vec<FoodEntry>>>,
}

impl FileFoodLog {
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let mut map = HashMap::new();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let rows: Vec<LogRow> = serde_json::from_str(&content)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            for row in rows {
                map.insert((row.user_id, row.date), row.entries);
            }
        }
        Ok(Self {
            path,
            inner: Mutex::new(map),
        })
    }

    fn save(&self, map: &HashMap<DayKey, Vec<FoodEntry>>) -> Result<(), StoreError> {
        let rows: Vec<LogRow> = map
            .iter()
            .map(|((user_id, date), entries)| LogRow {
                user_id: user_id.clone(),
                date: *date,
                entries: entries.clone(),
            })
            .collect();
        let json = serde_json::to_string_pretty(&rows)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[async_trait]
impl FoodLog for FileFoodLog {
    async fn append(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry: FoodEntry,
    ) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        map.entry((user_id.to_string(), date)).or_default().push(entry);
        self.save(&map)
    }

    async fn list(&self, user_id: &str, date: NaiveDate) -> Result<Vec<FoodEntry>, StoreError> {
        let map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .get(&(user_id.to_string(), date))
            .cloned()
            .unwrap_or_default())
    }

    async fn replace(
        &self,
        user_id: &str,
        date: NaiveDate,
        entries: Vec<FoodEntry>,
    ) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        if entries.is_empty() {
            map.remove(&(user_id.to_string(), date));
        } else {
            map.insert((user_id.to_string(), date), entries);
        }
        self.save(&map)
    }
}
