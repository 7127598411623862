//! Best score record
//!
//! A single integer (plus when it was set), persisted to LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// The best score seen on this device
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u64,
    /// Unix timestamp (ms) when achieved, 0 if never set
    pub timestamp: f64,
}

impl BestScore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "space_shooter_best_score";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would beat the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Record a final score. Returns true if it is a new best.
    pub fn record(&mut self, score: u64, timestamp: f64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.score = score;
        self.timestamp = timestamp;
        true
    }

    /// Best score for the HUD, if any game has scored yet
    pub fn top_score(&self) -> Option<u64> {
        (self.score > 0).then_some(self.score)
    }

    pub fn load() -> Self {
        if let Some(json) = storage::get_item(Self::STORAGE_KEY) {
            match serde_json::from_str::<BestScore>(&json) {
                Ok(best) => {
                    log::info!("Loaded best score {}", best.score);
                    return best;
                }
                Err(e) => {
                    log::warn!("Dropping corrupt best score: {}", e);
                    storage::remove_item(Self::STORAGE_KEY);
                }
            }
        }

        log::info!("No best score found, starting fresh");
        Self::new()
    }

    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage::set_item(Self::STORAGE_KEY, &json);
                log::info!("Best score saved ({})", self.score);
            }
            Err(e) => log::warn!("Failed to serialize best score: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_higher_scores_count() {
        let mut best = BestScore::new();
        assert_eq!(best.top_score(), None);
        assert!(!best.record(0, 1.0));
        assert!(best.record(50, 2.0));
        assert!(!best.record(50, 3.0));
        assert!(!best.record(20, 4.0));
        assert!(best.record(70, 5.0));
        assert_eq!(best.top_score(), Some(70));
        assert_eq!(best.timestamp, 5.0);
    }

    #[test]
    fn test_save_then_load() {
        let mut best = BestScore::new();
        best.record(130, 1234.0);
        best.save();
        assert_eq!(BestScore::load(), best);

        storage::remove_item(BestScore::STORAGE_KEY);
        assert_eq!(BestScore::load(), BestScore::new());
    }

    #[test]
    fn test_corrupt_storage_falls_back() {
        storage::set_item(BestScore::STORAGE_KEY, "{not json");
        assert_eq!(BestScore::load(), BestScore::new());
        assert_eq!(storage::get_item(BestScore::STORAGE_KEY), None);
    }
}
