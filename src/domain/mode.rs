use std::fmt;

use serde::{Deserialize, Serialize};

/// Which surface the UI shows: the direct input form or the chat agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Direct,
    Chat,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Direct => "direct",
            Mode::Chat => "chat",
        }
    }

    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "direct" => Some(Mode::Direct),
            "chat" => Some(Mode::Chat),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Direct => Mode::Chat,
            Mode::Chat => Mode::Direct,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
