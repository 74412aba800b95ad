//! Edit history

use std::collections::VecDeque;

use se_core::UndoHistory;

/// Most recent entries kept for display
const MAX_ENTRIES: usize = 64;

/// One committed edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Running number of the commit, starting at 1
    pub index: u64,
    pub label: String,
}

/// Commit log shown in the history panel.
///
/// Undo itself is owned by an external history service; the editor only
/// records what was committed.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    commits: u64,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total commits since startup
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Latest entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl UndoHistory for HistoryLog {
    fn commit(&mut self, label: &str) {
        self.commits += 1;
        if self.entries.len() == MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            index: self.commits,
            label: label.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = HistoryLog::new();
        for _ in 0..MAX_ENTRIES + 5 {
            log.commit("Translate");
        }
        assert_eq!(log.entries().count(), MAX_ENTRIES);
        assert_eq!(log.commits(), (MAX_ENTRIES + 5) as u64);
        assert_eq!(log.entries().next().map(|e| e.index), Some(6));
        assert_eq!(log.last().map(|e| e.index), Some((MAX_ENTRIES + 5) as u64));
    }
}
