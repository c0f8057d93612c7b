use evotrade::config::{EvolutionConfig, NetworkConfig, StopStrategy};
use evotrade::engines::generation::{
    Candidate, EvolutionEngine, LogProgress, NetworkFitness, NetworkSeeder, WeightMutation,
};
use evotrade::engines::network::{decode_one_hot, sigmoid, NetworkBuilder};
use evotrade::types::Decision;
use evotrade::Sample;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn labelled(len: usize) -> Vec<Sample> {
    (0..len)
        .map(|i| {
            let x = (i as f64 / 5.0).sin();
            let decision = if x > 0.3 {
                Decision::Buy
            } else if x < -0.3 {
                Decision::Sell
            } else {
                Decision::Hold
            };
            Sample::new(vec![x, x * x], decision.to_response(), 100.0 + 10.0 * x)
        })
        .collect()
}

fn engine_config(max_iterations: usize) -> EvolutionConfig {
    EvolutionConfig {
        population_size: 12,
        elite_count: 3,
        sub_mutations: 2,
        new_items: 1,
        min_weight: -5.0,
        max_weight: 5.0,
        best_result: 0.0,
        stop_strategy: StopStrategy::ScoreThreshold,
        max_iterations,
        ..Default::default()
    }
}

#[test]
fn test_unit_weights_on_zero_input() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut net = NetworkBuilder::new(2, 1)
        .hidden_layers(1)
        .neurons(2)
        .weight_range(1.0, 1.0)
        .build(&mut rng);

    let out = net.predict_raw(&[0.0, 0.0]).unwrap();

    assert!(net.layers[1].iter().all(|n| n.value == 0.5));
    assert_eq!(out, vec![sigmoid(1.0)]);
    assert!(net.layers[0].iter().all(|n| n.weights == vec![1.0, 1.0]));
    assert!(net.outputs()[0].weights.is_empty());
}

#[test]
fn test_one_hot_decode_ties_go_right() {
    assert_eq!(decode_one_hot(&[0.2, 0.9, 0.9]), vec![0.0, 0.0, 1.0]);
    assert_eq!(
        Decision::from_response(&decode_one_hot(&[0.1, 0.8, 0.3])),
        Some(Decision::Buy)
    );
}

#[test]
fn test_builder_follows_the_config() -> anyhow::Result<()> {
    let samples = labelled(10);
    let config = NetworkConfig {
        hidden_layers: 2,
        neurons: 4,
        bias: true,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let net = NetworkBuilder::from_config(&config, &samples)?.build(&mut rng);

    assert_eq!(net.layers.len(), 4);
    assert_eq!(net.input_width(), 2);
    assert_eq!(net.output_width(), 3);
    // Bias neuron on every layer except the output
    assert_eq!(net.layers[1].len(), 5);
    assert!(net.layers[1].last().map_or(false, |n| n.is_bias));
    assert!(net.outputs().iter().all(|n| !n.is_bias));
    // Weights only target the next layer's non-bias neurons
    assert_eq!(net.layers[0][0].weights.len(), 4);
    assert_eq!(net.layers[2][0].weights.len(), 3);
    Ok(())
}

#[test]
fn test_prediction_error_evolution_runs_to_the_iteration_cap() -> anyhow::Result<()> {
    let samples = labelled(40);
    let builder = NetworkBuilder::from_config(&NetworkConfig::default(), &samples)?;
    let mut engine = EvolutionEngine::new(
        engine_config(6),
        samples,
        NetworkFitness::PredictionError,
        WeightMutation,
        NetworkSeeder::new(builder),
    )?;

    let report = engine.run(LogProgress::new(2));

    assert_eq!(engine.iteration(), 6);
    assert_eq!(report.population_size, 12);
    // Scores are negated losses
    assert!(engine.best_ever_score() <= 0.0);
    assert!(engine.candidates().iter().all(|n| n.score().is_finite()));
    Ok(())
}

#[test]
fn test_ledger_budget_replays_every_sample() -> anyhow::Result<()> {
    let samples = labelled(30);
    let builder = NetworkBuilder::from_config(&NetworkConfig::default(), &samples)?;
    let config = EvolutionConfig {
        stop_strategy: StopStrategy::MaxIterations,
        ..engine_config(3)
    };
    let mut engine = EvolutionEngine::new(
        config,
        samples,
        NetworkFitness::LedgerBudget,
        WeightMutation,
        NetworkSeeder::new(builder),
    )?;

    engine.evaluate();
    for net in engine.candidates() {
        assert_eq!(net.score, net.ledger.budget);
    }
    engine.select();
    assert_eq!(engine.candidates().len(), 3);
    Ok(())
}

#[test]
fn test_mismatched_samples_score_worst() -> anyhow::Result<()> {
    let samples = labelled(20);
    // Built for four inputs, fed two
    let builder = NetworkBuilder::new(4, 3);
    let config = EvolutionConfig {
        stop_strategy: StopStrategy::MaxIterations,
        ..engine_config(1)
    };
    let mut engine = EvolutionEngine::new(
        config,
        samples,
        NetworkFitness::TradingScore,
        WeightMutation,
        NetworkSeeder::new(builder),
    )?;

    engine.evaluate();
    assert!(engine.candidates().iter().all(|n| n.score() == f64::MIN));
    Ok(())
}
