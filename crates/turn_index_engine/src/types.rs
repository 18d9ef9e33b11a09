use std::fmt;

use serde::Serialize;

use crate::page::ElementHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of the conversation as found in the current pass.
///
/// Turn lists are rebuilt from scratch on every pass; a previous list is
/// invalid as soon as a new one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub sequence_index: usize,
    pub role: Role,
    pub preview_text: String,
    pub source: ElementHandle,
}
