use crate::constants::MAX_LOG_ENTRIES;
use chrono::Local;
use std::collections::VecDeque;

/// Rolling activity feed shown next to the chat.
#[derive(Debug, Default)]
pub struct LogView {
    pub entries: VecDeque<String>,
}

impl LogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        log::debug!("activity: {}", entry);
        self.entries
            .push_back(format!("{} {}", Local::now().format("%H:%M:%S"), entry));
        while self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }
}
