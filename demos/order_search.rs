use evotrade::config::{EvolutionConfig, StopStrategy};
use evotrade::data::{SampleProvider, VecProvider};
use evotrade::engines::generation::{EvolutionEngine, OrderFitness, OrderMutation, OrderSeeder};
use std::env;

/// Searches buy/sell timings over a synthetic price wave.
///
/// Usage: `cargo run --example order_search [snapshot.json]`
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let prices: Vec<f64> = (0..500)
        .map(|t| {
            let t = t as f64;
            100.0 + 10.0 * (t / 15.0).sin() + 0.02 * t
        })
        .collect();
    let samples = VecProvider::from_prices(&prices).load_samples()?;

    let config = EvolutionConfig {
        population_size: 200,
        elite_count: 20,
        sub_mutations: 5,
        new_items: 5,
        stop_strategy: StopStrategy::NoImprovement,
        max_stagnant_generations: 50,
        log_every: 10,
        ..Default::default()
    };

    let mut engine = EvolutionEngine::new(
        config,
        samples,
        OrderFitness::FinalBudget,
        OrderMutation::NeighborReplace,
        OrderSeeder::DensityBand,
    )?;

    let report = engine.run_logged();
    let tuned = engine.tune_leader(1000);

    println!("Generations: {}", report.iteration + 1);
    println!("Accepted tuning nudges: {}", tuned);
    if let Some(best) = engine.best_ever() {
        println!(
            "Best budget {:.2} at iteration {} with {} trades",
            best.score, best.iteration, best.candidate.count
        );
        println!("Trades: {:?}", best.candidate.trades);
    }

    if let Some(path) = env::args().nth(1) {
        engine.save(&path)?;
        println!("Saved population to {}", path);
    }

    Ok(())
}
