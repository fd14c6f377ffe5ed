//! Pure presentation of nutrition results and daily totals. No state, no
//! I/O; both the visible text and the spoken variant come from here.

use chrono::NaiveDate;

use crate::services::foodlog::FoodEntry;
use crate::services::nutrition::NutritionResult;

fn kcal(value: f64) -> i64 {
    value.round() as i64
}

/// One line per recognized food plus a total when there are several.
pub fn describe_foods(result: &NutritionResult) -> String {
    let mut lines: Vec<String> = result
        .foods
        .iter()
        .map(|f| {
            let grams = f
                .weight_grams
                .map(|w| format!(" ({} г)", w.round() as i64))
                .unwrap_or_default();
            format!(
                "{}{}: {} ккал, белки {:.1}, жиры {:.1}, углеводы {:.1}",
                f.name, grams, kcal(f.calories), f.protein, f.fat, f.carbohydrates
            )
        })
        .collect();
    if result.foods.len() > 1 {
        lines.push(format!("Итого: {} ккал", kcal(result.total_calories())));
    }
    lines.join("\n")
}

/// Shorter spoken variant: names and calories only.
pub fn speak_foods(result: &NutritionResult) -> String {
    let parts: Vec<String> = result
        .foods
        .iter()
        .map(|f| format!("{} — {} килокалорий", f.name, kcal(f.calories)))
        .collect();
    if result.foods.len() > 1 {
        format!(
            "{}. Итого {} килокалорий",
            parts.join(", "),
            kcal(result.total_calories())
        )
    } else {
        parts.join(", ")
    }
}

/// Numbered day report with macro totals. The numbers are what
/// deletion-by-number refers to.
pub fn describe_day(entries: &[FoodEntry], date: NaiveDate, is_today: bool) -> String {
    let mut lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {} — {} ккал", i + 1, e.name, kcal(e.calories)))
        .collect();
    let total: f64 = entries.iter().map(|e| e.calories).sum();
    let protein: f64 = entries.iter().map(|e| e.protein).sum();
    let fat: f64 = entries.iter().map(|e| e.fat).sum();
    let carbs: f64 = entries.iter().map(|e| e.carbohydrates).sum();
    let day = if is_today {
        "за сегодня".to_string()
    } else {
        format!("за {}", date.format("%d.%m.%Y"))
    };
    lines.push(format!(
        "Итого {day}: {} ккал (белки {:.0}, жиры {:.0}, углеводы {:.0}).",
        kcal(total),
        protein,
        fat,
        carbs
    ));
    lines.join("\n")
}
