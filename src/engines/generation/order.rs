use super::candidate::Candidate;
use serde::{Deserialize, Serialize};

/// Trade-timing schedule: sorted tick indices of alternating buys and sells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub count: usize,
    pub trades: Vec<usize>,
    /// Result of the last replay
    pub sum: f64,
    pub open_position: bool,
    pub score: f64,
}

impl Order {
    /// Sorts and dedups `trades`; `count` follows the resulting length.
    pub fn new(mut trades: Vec<usize>) -> Self {
        trades.sort_unstable();
        trades.dedup();
        Self {
            count: trades.len(),
            trades,
            ..Default::default()
        }
    }

    pub fn sync_count(&mut self) {
        self.count = self.trades.len();
    }

    /// Strictly ascending, below `max_ticks`, and `count` matches.
    pub fn is_valid(&self, max_ticks: usize) -> bool {
        self.count == self.trades.len()
            && self.trades.windows(2).all(|w| w[0] < w[1])
            && self.trades.last().map_or(true, |last| *last < max_ticks)
    }

    pub fn contains(&self, tick: usize) -> bool {
        self.trades.binary_search(&tick).is_ok()
    }
}

impl Candidate for Order {
    fn score(&self) -> f64 {
        self.score
    }

    fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    fn offspring(&self) -> Self {
        Self {
            open_position: false,
            ..self.clone()
        }
    }
}
