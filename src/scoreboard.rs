//! Local scoreboard for cleared rounds
//!
//! Persisted to LocalStorage, tracks the top 10 clears ranked by fewest
//! throws, ties broken by the faster clear.

use serde::{Deserialize, Serialize};

use crate::config::Difficulty;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single cleared round
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Throws it took to clear every cup
    pub throws: u32,
    /// Round length in simulation ticks
    pub clear_ticks: u64,
    /// Tier the round was played on
    pub difficulty: Difficulty,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl ScoreEntry {
    /// Ranking order: fewest throws first, faster clear breaks ties
    fn beats(&self, other: &ScoreEntry) -> bool {
        self.throws < other.throws
            || (self.throws == other.throws && self.clear_ticks < other.clear_ticks)
    }
}

/// Scoreboard of best clears
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Scoreboard {
    pub entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pyramid_cups_scoreboard";

    /// Create empty scoreboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a clear qualifies for the board
    pub fn qualifies(&self, entry: &ScoreEntry) -> bool {
        if entry.throws == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| entry.beats(e)).unwrap_or(true)
    }

    /// Rank a clear would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, entry: &ScoreEntry) -> Option<usize> {
        if !self.qualifies(entry) {
            return None;
        }
        let rank = self.entries.iter().position(|e| entry.beats(e));
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a clear to the board (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_entry(&mut self, entry: ScoreEntry) -> Option<usize> {
        if !self.qualifies(&entry) {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.beats(e));
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    /// Check if the board is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best clear so far (if any)
    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// Load the scoreboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<Scoreboard>(&json) {
                    log::info!("Loaded {} scoreboard entries", board.entries.len());
                    return board;
                }
            }
        }

        log::info!("No scoreboard found, starting fresh");
        Self::new()
    }

    /// Save the scoreboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Scoreboard saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Format a timestamp as a relative date string
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    let now = js_sys::Date::now();
    let diff_ms = now - timestamp;
    let diff_secs = diff_ms / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i32;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
            format!(
                "{}/{}/{}",
                date.get_month() + 1,
                date.get_date(),
                date.get_full_year() % 100
            )
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i32;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i32;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(_timestamp: f64) -> String {
    "N/A".to_string()
}
