use crate::context::DialogContext;

/// On-screen suggestion chip. Dropped from the outbound envelope when the
/// client has no screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub title: String,
    pub url: Option<String>,
    pub hide: bool,
}

impl Button {
    pub fn suggest(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            hide: true,
        }
    }
}

/// What an intent hands back to the orchestrator: the user-facing text, the
/// spoken variant, optional suggestion chips, the session flag, and -- when
/// the reply asks a follow-up question -- the context to persist for the
/// next turn.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub tts: String,
    pub buttons: Vec<Button>,
    pub end_session: bool,
    pub context: Option<DialogContext>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tts: text.clone(),
            text,
            buttons: Vec::new(),
            end_session: false,
            context: None,
        }
    }

    pub fn with_tts(mut self, tts: impl Into<String>) -> Self {
        self.tts = tts.into();
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn ending_session(mut self) -> Self {
        self.end_session = true;
        self
    }

    /// Ask a follow-up question: the context survives into the next turn.
    pub fn with_context(mut self, context: DialogContext) -> Self {
        self.context = Some(context);
        self
    }
}
