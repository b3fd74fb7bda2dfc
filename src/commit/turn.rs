//! Conversation turns accumulated while refining a commit message.

/// One entry of the refinement conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationTurn {
    /// A candidate commit message produced by the model.
    GeneratedMessage(String),
    /// User feedback, already wrapped and escaped for the prompt.
    UserFeedback(String),
}

impl ConversationTurn {
    /// Wrap raw feedback text in a `<feedback>` element.
    pub fn feedback(raw: &str) -> Self {
        ConversationTurn::UserFeedback(format!("<feedback>{}</feedback>", escape_feedback(raw)))
    }

    pub fn text(&self) -> &str {
        match self {
            ConversationTurn::GeneratedMessage(text) => text,
            ConversationTurn::UserFeedback(text) => text,
        }
    }
}

/// Escape markup so feedback cannot close or open prompt elements.
pub fn escape_feedback(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Append-only turn history for a single invocation.
#[derive(Debug, Default, Clone)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_generated(&mut self, message: impl Into<String>) {
        self.turns.push(ConversationTurn::GeneratedMessage(message.into()));
    }

    /// Record feedback; `raw` is escaped and wrapped before it is stored.
    pub fn push_feedback(&mut self, raw: &str) {
        self.turns.push(ConversationTurn::feedback(raw));
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent generated message, if any.
    pub fn latest_message(&self) -> Option<&str> {
        self.turns.iter().rev().find_map(|turn| match turn {
            ConversationTurn::GeneratedMessage(text) => Some(text.as_str()),
            ConversationTurn::UserFeedback(_) => None,
        })
    }
}
