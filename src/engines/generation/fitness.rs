use super::candidate::{EvaluationContext, Fitness};
use super::order::Order;
use super::selection::OptimizationDirection;
use crate::engines::evaluation::OrderSimulator;
use crate::engines::network::Network;
use crate::error::Result;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Scoring of trade schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderFitness {
    /// Budget left after replaying the schedule (maximize)
    FinalBudget,
    /// Cumulative cost of every scheduled tick (minimize)
    DownCost,
}

impl Fitness<Order> for OrderFitness {
    fn direction(&self) -> OptimizationDirection {
        match self {
            OrderFitness::FinalBudget => OptimizationDirection::Maximize,
            OrderFitness::DownCost => OptimizationDirection::Minimize,
        }
    }

    fn evaluate<R: Rng + ?Sized>(
        &self,
        order: &mut Order,
        context: &EvaluationContext<'_>,
        _rng: &mut R,
    ) -> f64 {
        let simulator = OrderSimulator::new(context.config.budget);
        let outcome = match self {
            OrderFitness::FinalBudget => simulator.run(&order.trades, context.prices),
            OrderFitness::DownCost => simulator.run_down(&order.trades, context.prices),
        };
        order.sum = outcome.sum;
        order.open_position = outcome.open_position;
        outcome.sum
    }
}

/// Scoring of networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkFitness {
    /// Negated loss on one random sample
    PredictionError,
    /// Realised difference per expected plus actual trade
    TradingScore,
    /// Ledger budget after replaying every sample
    LedgerBudget,
}

impl NetworkFitness {
    fn replay(network: &mut Network, context: &EvaluationContext<'_>) -> Result<()> {
        network.ledger.reset(context.config.budget);
        for sample in context.samples {
            let response = network.predict_one_hot(&sample.features)?;
            network.ledger.operate(&response, sample.price);
        }
        Ok(())
    }

    fn try_evaluate<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        context: &EvaluationContext<'_>,
        rng: &mut R,
    ) -> Result<f64> {
        match self {
            NetworkFitness::PredictionError => Ok(-network.train_step(context.samples, rng)?),
            NetworkFitness::TradingScore => {
                Self::replay(network, context)?;
                Ok(network.ledger.trading_score(context.config.expected_trades()))
            }
            NetworkFitness::LedgerBudget => {
                Self::replay(network, context)?;
                Ok(network.ledger.budget)
            }
        }
    }
}

impl Fitness<Network> for NetworkFitness {
    fn direction(&self) -> OptimizationDirection {
        OptimizationDirection::Maximize
    }

    fn evaluate<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        context: &EvaluationContext<'_>,
        rng: &mut R,
    ) -> f64 {
        match self.try_evaluate(network, context, rng) {
            Ok(score) => score,
            Err(e) => {
                debug!("Network evaluation failed, scoring as worst: {}", e);
                self.direction().worst()
            }
        }
    }

    /// Prediction error converges once the loss drops to the threshold.
    fn converged(&self, best_score: f64, threshold: f64) -> bool {
        match self {
            NetworkFitness::PredictionError => -best_score <= threshold,
            _ => self.direction().reaches(best_score, threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvolutionConfig;
    use crate::engines::network::NetworkBuilder;
    use crate::types::Sample;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_final_budget_scores_replay() {
        let config = EvolutionConfig::default();
        let prices = [90.0, 95.0, 100.0, 120.0, 110.0, 150.0];
        let ctx = EvaluationContext {
            samples: &[],
            prices: &prices,
            config: &config,
        };
        let mut order = Order::new(vec![2, 5]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(OrderFitness::FinalBudget.evaluate(&mut order, &ctx, &mut rng), 1050.0);
        assert_eq!(order.sum, 1050.0);
        assert_eq!(OrderFitness::DownCost.evaluate(&mut order, &ctx, &mut rng), -250.0);
        assert_eq!(OrderFitness::DownCost.direction(), OptimizationDirection::Minimize);
    }

    #[test]
    fn test_prediction_error_is_negated_loss() {
        let config = EvolutionConfig::default();
        let samples = vec![Sample::new(vec![0.5, 0.5], vec![1.0, 0.0, 0.0], 10.0)];
        let ctx = EvaluationContext {
            samples: &samples,
            prices: &[10.0],
            config: &config,
        };
        let mut rng = StdRng::seed_from_u64(2);
        let mut net = NetworkBuilder::new(2, 3).build(&mut rng);

        let score = NetworkFitness::PredictionError.evaluate(&mut net, &ctx, &mut rng);
        assert!(score <= 0.0);
        assert_eq!(score, -net.error);
        assert!(NetworkFitness::PredictionError.converged(-0.0005, 0.001));
        assert!(!NetworkFitness::PredictionError.converged(-0.5, 0.001));
    }

    #[test]
    fn test_width_mismatch_scores_worst() {
        let config = EvolutionConfig::default();
        let samples = vec![Sample::new(vec![0.5], vec![1.0, 0.0, 0.0], 10.0)];
        let ctx = EvaluationContext {
            samples: &samples,
            prices: &[10.0],
            config: &config,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut net = NetworkBuilder::new(2, 3).build(&mut rng);

        let score = NetworkFitness::TradingScore.evaluate(&mut net, &ctx, &mut rng);
        assert_eq!(score, f64::MIN);
    }

    #[test]
    fn test_ledger_budget_without_trades_is_budget() {
        let config = EvolutionConfig::default();
        let samples = vec![Sample::new(vec![0.0, 0.0], vec![], 10.0); 3];
        let ctx = EvaluationContext {
            samples: &samples,
            prices: &[10.0, 10.0, 10.0],
            config: &config,
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut net = NetworkBuilder::new(2, 3).build(&mut rng);
        // Zero weights tie every output, which decodes to a sell that never fills
        for layer in net.layers.iter_mut() {
            for neuron in layer.iter_mut() {
                neuron.weights.iter_mut().for_each(|w| *w = 0.0);
            }
        }

        let score = NetworkFitness::LedgerBudget.evaluate(&mut net, &ctx, &mut rng);
        assert_eq!(score, 1000.0);
        assert_eq!(net.ledger.trades, 0);
    }
}
