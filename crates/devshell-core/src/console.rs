//! Console messages forwarded from content pages

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Debug,
    Log,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleMessage {
    #[serde(default = "default_level")]
    pub level: ConsoleLevel,
    pub message: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub source: String,
}

fn default_level() -> ConsoleLevel {
    ConsoleLevel::Log
}

impl ConsoleMessage {
    pub fn describe(&self) -> String {
        format!("{} -- From line {} of {}", self.message, self.line, self.source)
    }

    /// Write the message to the shell log
    pub fn log(&self) {
        let text = self.describe();
        match self.level {
            ConsoleLevel::Error => tracing::warn!(target: "devshell::console", "{}", text),
            _ => tracing::debug!(target: "devshell::console", level = ?self.level, "{}", text),
        }
    }
}
