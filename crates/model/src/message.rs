use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// The author of a message.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The system instructions.
    System,
    /// A user input text.
    User,
    /// An assistant text.
    Assistant,
}

impl Role {
    /// Returns the lowercase wire name of the role.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete message.
///
/// The content is kept exactly as it was typed or generated, empty strings
/// included.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelMessage {
    /// Who wrote the message.
    pub role: Role,
    /// The text of the message.
    pub content: String,
}

impl ModelMessage {
    /// Creates a message with the given role.
    #[inline]
    pub fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(Role::Assistant, content)
    }
}
