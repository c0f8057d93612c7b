use super::candidate::{EvaluationContext, Seeder};
use super::operators::full_resample;
use super::order::Order;
use crate::config::EvolutionConfig;
use crate::engines::network::{Network, NetworkBuilder};
use crate::error::{EvotradeError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// `count` distinct uniform ticks, sorted.
pub fn random_distinct<R: Rng + ?Sized>(count: usize, max_ticks: usize, rng: &mut R) -> Order {
    let mut order = Order {
        count,
        ..Default::default()
    };
    full_resample(&mut order, max_ticks, rng);
    order
}

/// Ticks at a fixed stride of `max_ticks / count`, starting at 0.
pub fn evenly_spaced(count: usize, max_ticks: usize) -> Order {
    if count == 0 || max_ticks == 0 {
        return Order::default();
    }
    let stride = (max_ticks / count).max(1);
    Order::new((0..max_ticks).step_by(stride).take(count).collect())
}

/// Even counts within `ticks * perc_by_ticks% ± ticks * diff_shift%`.
///
/// The percentages apply to the exact tick count, not whole hundreds of ticks.
pub fn density_band(config: &EvolutionConfig, max_ticks: usize) -> Vec<usize> {
    let center = max_ticks * config.perc_by_ticks / 100;
    let spread = max_ticks * config.diff_shift / 100;
    (center.saturating_sub(spread)..=center + spread)
        .filter(|count| *count != 0 && count % 2 == 0 && *count <= max_ticks)
        .collect()
}

/// Counts in `[min, max)`, skipping 0 and anything above `max_ticks`.
pub fn count_range(min: usize, max: usize, max_ticks: usize) -> Vec<usize> {
    (min.max(1)..max).filter(|count| *count <= max_ticks).collect()
}

/// How the initial order population is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSeeder {
    /// Random schedules cycling through the density band counts
    DensityBand,
    /// Random schedules cycling through `[min, max)`
    CountRange { min: usize, max: usize },
    /// Evenly spaced schedules cycling through the density band counts
    EvenlySpaced,
}

impl OrderSeeder {
    /// `CountRange` spanning 2% to 10% of the tick count.
    pub fn default_count_range(max_ticks: usize) -> Self {
        OrderSeeder::CountRange {
            min: max_ticks / 50,
            max: max_ticks / 10,
        }
    }

    pub fn counts(&self, context: &EvaluationContext<'_>) -> Vec<usize> {
        let max_ticks = context.max_ticks();
        match self {
            OrderSeeder::DensityBand | OrderSeeder::EvenlySpaced => {
                density_band(context.config, max_ticks)
            }
            OrderSeeder::CountRange { min, max } => count_range(*min, *max, max_ticks),
        }
    }
}

impl Seeder<Order> for OrderSeeder {
    fn seed<R: Rng + ?Sized>(&self, context: &EvaluationContext<'_>, rng: &mut R) -> Result<Vec<Order>> {
        let counts = self.counts(context);
        if counts.is_empty() {
            return Err(EvotradeError::Configuration(format!(
                "No order counts fit {} ticks with {:?}",
                context.max_ticks(),
                self
            )));
        }

        let max_ticks = context.max_ticks();
        Ok((0..context.config.population_size)
            .map(|i| {
                let count = counts[i % counts.len()];
                match self {
                    OrderSeeder::EvenlySpaced => evenly_spaced(count, max_ticks),
                    _ => random_distinct(count, max_ticks, rng),
                }
            })
            .collect())
    }

    /// Random schedule with an even count drawn from the density band.
    fn fresh<R: Rng + ?Sized>(&self, context: &EvaluationContext<'_>, rng: &mut R) -> Order {
        let max_ticks = context.max_ticks();
        let band = density_band(context.config, max_ticks);
        let count = if band.is_empty() {
            2.min(max_ticks)
        } else {
            band[rng.gen_range(0..band.len())]
        };
        random_distinct(count, max_ticks, rng)
    }
}

/// Builds every network from one topology with fresh random weights.
#[derive(Debug, Clone)]
pub struct NetworkSeeder {
    builder: NetworkBuilder,
}

impl NetworkSeeder {
    pub fn new(builder: NetworkBuilder) -> Self {
        Self { builder }
    }
}

impl Seeder<Network> for NetworkSeeder {
    fn seed<R: Rng + ?Sized>(&self, context: &EvaluationContext<'_>, rng: &mut R) -> Result<Vec<Network>> {
        Ok((0..context.config.population_size)
            .map(|_| self.fresh(context, rng))
            .collect())
    }

    fn fresh<R: Rng + ?Sized>(&self, context: &EvaluationContext<'_>, rng: &mut R) -> Network {
        let mut network = self.builder.build(rng);
        network.ledger.reset(context.config.budget);
        network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn context<'a>(config: &'a EvolutionConfig, prices: &'a [f64]) -> EvaluationContext<'a> {
        EvaluationContext {
            samples: &[],
            prices,
            config,
        }
    }

    #[test]
    fn test_density_band_is_even_around_center() {
        let config = EvolutionConfig::default();
        // 10% of 200 = 20, spread 2% = 4
        assert_eq!(density_band(&config, 200), vec![16, 18, 20, 22, 24]);
    }

    #[test]
    fn test_density_band_scales_exactly_with_ticks() {
        let config = EvolutionConfig::default();
        // 10% of 150 = 15, spread 2% = 3
        assert_eq!(density_band(&config, 150), vec![12, 14, 16, 18]);
        // Short series still get a band
        assert_eq!(density_band(&config, 50), vec![4, 6]);
    }

    #[test]
    fn test_evenly_spaced() {
        let order = evenly_spaced(4, 20);
        assert_eq!(order.trades, vec![0, 5, 10, 15]);
        assert_eq!(order.count, 4);
    }

    #[test]
    fn test_seed_fills_population_with_valid_orders() {
        let config = EvolutionConfig {
            population_size: 30,
            elite_count: 5,
            ..Default::default()
        };
        let prices = vec![1.0; 200];
        let ctx = context(&config, &prices);
        let mut rng = StdRng::seed_from_u64(1);

        for seeder in [
            OrderSeeder::DensityBand,
            OrderSeeder::EvenlySpaced,
            OrderSeeder::default_count_range(200),
        ] {
            let orders = seeder.seed(&ctx, &mut rng).unwrap();
            assert_eq!(orders.len(), 30);
            assert!(orders.iter().all(|o| o.is_valid(200) && o.count > 0));
        }
    }

    #[test]
    fn test_empty_band_is_a_configuration_error() {
        let config = EvolutionConfig {
            perc_by_ticks: 0,
            diff_shift: 0,
            ..Default::default()
        };
        let prices = vec![1.0; 10];
        let mut rng = StdRng::seed_from_u64(2);
        assert!(OrderSeeder::DensityBand
            .seed(&context(&config, &prices), &mut rng)
            .is_err());
    }

    #[test]
    fn test_fresh_order_has_even_count() {
        let config = EvolutionConfig::default();
        let prices = vec![1.0; 500];
        let mut rng = StdRng::seed_from_u64(3);
        let order = OrderSeeder::DensityBand.fresh(&context(&config, &prices), &mut rng);
        assert_eq!(order.count % 2, 0);
        assert!(order.is_valid(500));
    }
}
