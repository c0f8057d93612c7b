use super::candidate::{EvaluationContext, Mutator};
use super::order::Order;
use crate::engines::evaluation::{OrderSimulator, SimulationOutcome};
use crate::engines::network::Network;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Replaces every trade with `count` distinct uniform ticks in `[0, max_ticks)`.
///
/// `count` is clamped to `max_ticks`.
pub fn full_resample<R: Rng + ?Sized>(order: &mut Order, max_ticks: usize, rng: &mut R) {
    let amount = order.count.min(max_ticks);
    let mut trades = index::sample(rng, max_ticks, amount).into_vec();
    trades.sort_unstable();
    order.trades = trades;
    order.sync_count();
}

/// Redraws one random slot strictly between its neighbours.
///
/// The first slot draws from `[0, trades[1])` and the last from
/// `(trades[len - 2], max_ticks)`. When the open interval is empty the
/// order is left unchanged and `false` is returned.
pub fn neighbor_replace<R: Rng + ?Sized>(order: &mut Order, max_ticks: usize, rng: &mut R) -> bool {
    let len = order.trades.len();
    if len == 0 {
        return false;
    }
    let slot = rng.gen_range(0..len);
    let low = if slot == 0 { 0 } else { order.trades[slot - 1] + 1 };
    let high = if slot + 1 == len {
        max_ticks
    } else {
        order.trades[slot + 1]
    };
    if low >= high {
        return false;
    }
    order.trades[slot] = rng.gen_range(low..high);
    true
}

/// Neighbour-bounded replace on a copy, kept only if the replay improves.
pub fn greedy_replace<R: Rng + ?Sized>(
    order: &mut Order,
    simulator: &OrderSimulator,
    prices: &[f64],
    max_ticks: usize,
    rng: &mut R,
) -> bool {
    let current = simulator.run(&order.trades, prices);
    let mut trial = order.clone();
    if !neighbor_replace(&mut trial, max_ticks, rng) {
        return false;
    }
    let outcome = simulator.run(&trial.trades, prices);
    if outcome.sum > current.sum {
        order.trades = trial.trades;
        apply_outcome(order, &outcome);
        true
    } else {
        false
    }
}

/// Moves one random slot to a tick not already scheduled, then re-sorts.
///
/// Gives up after `max_attempts` draws that all hit existing ticks.
pub fn unique_replace<R: Rng + ?Sized>(
    order: &mut Order,
    max_ticks: usize,
    max_attempts: usize,
    rng: &mut R,
) -> bool {
    if order.trades.is_empty() || order.trades.len() >= max_ticks {
        return false;
    }
    let slot = rng.gen_range(0..order.trades.len());
    for _ in 0..max_attempts.max(1) {
        let tick = rng.gen_range(0..max_ticks);
        if !order.contains(tick) {
            order.trades[slot] = tick;
            order.trades.sort_unstable();
            return true;
        }
    }
    false
}

/// Hill-climbs by nudging random slots one tick left or right.
///
/// A nudge is only tried when the neighbouring tick is free and in range,
/// which keeps the schedule sorted. Returns the number of accepted nudges.
pub fn tune<R: Rng + ?Sized>(
    order: &mut Order,
    simulator: &OrderSimulator,
    prices: &[f64],
    max_ticks: usize,
    attempts: usize,
    rng: &mut R,
) -> usize {
    if order.trades.is_empty() {
        return 0;
    }
    let initial = simulator.run(&order.trades, prices);
    apply_outcome(order, &initial);

    let mut improvements = 0;
    for _ in 0..attempts {
        let slot = rng.gen_range(0..order.trades.len());
        let tick = order.trades[slot];
        let neighbours = [tick.checked_sub(1), Some(tick + 1).filter(|t| *t < max_ticks)];

        let mut best: Option<(usize, SimulationOutcome)> = None;
        for neighbour in neighbours.into_iter().flatten() {
            if order.contains(neighbour) {
                continue;
            }
            order.trades[slot] = neighbour;
            let outcome = simulator.run(&order.trades, prices);
            order.trades[slot] = tick;

            let to_beat = best.map_or(order.sum, |(_, o)| o.sum);
            if outcome.sum > to_beat {
                best = Some((neighbour, outcome));
            }
        }

        if let Some((neighbour, outcome)) = best {
            order.trades[slot] = neighbour;
            apply_outcome(order, &outcome);
            improvements += 1;
        }
    }
    improvements
}

fn apply_outcome(order: &mut Order, outcome: &SimulationOutcome) {
    order.sum = outcome.sum;
    order.open_position = outcome.open_position;
}

/// Index-perturbation policy applied to order clones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderMutation {
    FullResample,
    NeighborReplace,
    GreedyReplace,
    UniqueReplace,
}

impl Mutator<Order> for OrderMutation {
    fn mutate<R: Rng + ?Sized>(&self, order: &mut Order, context: &EvaluationContext<'_>, rng: &mut R) {
        let max_ticks = context.max_ticks();
        match self {
            OrderMutation::FullResample => full_resample(order, max_ticks, rng),
            OrderMutation::NeighborReplace => {
                neighbor_replace(order, max_ticks, rng);
            }
            OrderMutation::GreedyReplace => {
                let simulator = OrderSimulator::new(context.config.budget);
                greedy_replace(order, &simulator, context.prices, max_ticks, rng);
            }
            OrderMutation::UniqueReplace => {
                unique_replace(order, max_ticks, context.config.max_mutate_attempts, rng);
            }
        }
    }
}

/// Single random weight replacement within the configured bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightMutation;

impl Mutator<Network> for WeightMutation {
    fn mutate<R: Rng + ?Sized>(&self, network: &mut Network, context: &EvaluationContext<'_>, rng: &mut R) {
        network.mutate_weight(rng, context.config.min_weight, context.config.max_weight);
    }
}
