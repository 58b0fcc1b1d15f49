//! In-memory analytics counters for the daily statistic feed.
//!
//! Command handlers count each invocation; notable events append to a
//! bounded log. The analytics loop drains both once per day (hour 11)
//! into the `day_statistic` webhook, and the owner-only `cs` text
//! command renders the histogram on demand.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

const EVENT_LOG_CAP: usize = 10_000;

/// Counters shared between command dispatch and the analytics loop.
pub struct CommandStats {
    usage: Mutex<HashMap<String, u64>>,
    events: Mutex<Vec<String>>,
}

impl CommandStats {
    pub fn new() -> Self {
        Self {
            usage: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Counts one invocation of `command`.
    pub fn count_command(&self, command: &str) {
        let mut usage = self.usage.lock().expect("stats lock poisoned");
        *usage.entry(command.to_string()).or_insert(0) += 1;
    }

    /// Appends a line to the event log. Oldest lines are dropped past the
    /// cap so a chatty day cannot grow memory without bound.
    pub fn log_event(&self, line: impl Into<String>) {
        let mut events = self.events.lock().expect("stats lock poisoned");
        if events.len() >= EVENT_LOG_CAP {
            events.remove(0);
        }
        events.push(format!("[{}] {}", Utc::now().format("%H:%M:%S"), line.into()));
    }

    /// Renders the per-command usage histogram, most used first.
    pub fn histogram(&self) -> String {
        let usage = self.usage.lock().expect("stats lock poisoned");
        let mut rows: Vec<_> = usage.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        rows.iter()
            .map(|(name, count)| format!("{name}: {count}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drains both the histogram and the event log for the daily post.
    pub fn drain(&self) -> (String, String) {
        let histogram = self.histogram();
        self.usage.lock().expect("stats lock poisoned").clear();
        let events = std::mem::take(&mut *self.events.lock().expect("stats lock poisoned"));
        (events.join("\n"), histogram)
    }
}

impl Default for CommandStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_sorts_by_usage() {
        let stats = CommandStats::new();
        stats.count_command("pay");
        stats.count_command("pay");
        stats.count_command("ban");

        assert_eq!(stats.histogram(), "pay: 2\nban: 1");
    }

    #[test]
    fn drain_resets_counters() {
        let stats = CommandStats::new();
        stats.count_command("pay");
        stats.log_event("something happened");

        let (events, histogram) = stats.drain();
        assert!(events.contains("something happened"));
        assert_eq!(histogram, "pay: 1");

        let (events, histogram) = stats.drain();
        assert!(events.is_empty());
        assert!(histogram.is_empty());
    }
}
