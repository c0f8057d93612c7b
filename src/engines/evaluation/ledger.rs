use serde::{Deserialize, Serialize};

/// Running account of the single-position trades a network signals.
///
/// One unit is bought or sold at a time; there is no sizing and no fees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeLedger {
    pub budget: f64,
    /// Completed round trips
    pub trades: usize,
    /// Sum of `exit - entry` over completed round trips
    pub cumulative_diff: f64,
    pub position_open: bool,
    /// Entry price of the open position
    pub last_price: f64,
}

impl TradeLedger {
    pub fn new(budget: f64) -> Self {
        Self {
            budget,
            ..Default::default()
        }
    }

    pub fn reset(&mut self, budget: f64) {
        *self = Self::new(budget);
    }

    /// Applies a `[hold, buy, sell]` response at `price`.
    ///
    /// Hold wins over everything else. A buy only opens when flat and a sell
    /// only closes an open position; responses shorter than three are ignored.
    pub fn operate(&mut self, response: &[f64], price: f64) {
        if response.len() < 3 || response[0] == 1.0 {
            return;
        }
        if response[1] == 1.0 && !self.position_open {
            self.budget -= price;
            self.position_open = true;
            self.last_price = price;
        }
        if response[2] == 1.0 && self.position_open {
            self.cumulative_diff += price - self.last_price;
            self.budget += price;
            self.trades += 1;
            self.position_open = false;
        }
    }

    /// Realised difference normalised by expected plus actual trade count.
    pub fn trading_score(&self, expected_trades: f64) -> f64 {
        let denominator = expected_trades + self.trades as f64;
        if denominator == 0.0 {
            return self.cumulative_diff;
        }
        self.cumulative_diff / denominator
    }
}
