use log::debug;
use serde::{Deserialize, Serialize};

/// Result of replaying a trade schedule over a price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub sum: f64,
    /// A trailing buy was never matched by a sell
    pub open_position: bool,
    /// Indices that fell outside the price series
    pub skipped: usize,
}

/// Replays alternating buy/sell schedules against a fixed budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSimulator {
    budget: f64,
}

impl OrderSimulator {
    pub fn new(budget: f64) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Buys when flat and sells when holding, in schedule order.
    ///
    /// Unmatched trailing buys stay subtracted from the sum.
    pub fn run(&self, trades: &[usize], prices: &[f64]) -> SimulationOutcome {
        let mut sum = self.budget;
        let mut open_position = false;
        let mut skipped = 0;

        for &tick in trades {
            let Some(price) = prices.get(tick) else {
                skipped += 1;
                continue;
            };
            if open_position {
                sum += price;
            } else {
                sum -= price;
            }
            open_position = !open_position;
        }

        if skipped > 0 {
            debug!("Skipped {} out-of-range trade indices", skipped);
        }
        SimulationOutcome {
            sum,
            open_position,
            skipped,
        }
    }

    /// Cumulative cost of every scheduled tick, starting from zero.
    pub fn run_down(&self, trades: &[usize], prices: &[f64]) -> SimulationOutcome {
        let mut sum = 0.0;
        let mut skipped = 0;
        for &tick in trades {
            match prices.get(tick) {
                Some(price) => sum -= price,
                None => skipped += 1,
            }
        }
        SimulationOutcome {
            sum,
            open_position: false,
            skipped,
        }
    }
}
