use super::candidate::{Candidate, EvaluationContext, Fitness, Mutator, Seeder};
use super::hall_of_fame::BestEver;
use super::operators::tune;
use super::order::Order;
use super::population::PopulationState;
use super::progress::{GenerationReport, LogProgress, ProgressCallback};
use super::selection::select_elite;
use crate::config::{ConfigSection, EvolutionConfig, ParentSelection, StopStrategy};
use crate::data::provider::{prices, validate_samples};
use crate::engines::evaluation::OrderSimulator;
use crate::error::{EvotradeError, Result};
use crate::types::Sample;
use log::{debug, info, warn};
use rand::Rng;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Generational loop: evaluate, sort, keep the elite, refill by mutation.
///
/// Evaluation and refill fan out over the rayon pool and join before the
/// next phase starts. Each worker draws from its own thread-local RNG.
pub struct EvolutionEngine<C, F, M, S> {
    state: PopulationState<C>,
    samples: Vec<Sample>,
    prices: Vec<f64>,
    fitness: F,
    mutator: M,
    seeder: S,
}

impl<C, F, M, S> EvolutionEngine<C, F, M, S>
where
    C: Candidate,
    F: Fitness<C>,
    M: Mutator<C>,
    S: Seeder<C>,
{
    /// Validates the inputs and seeds the initial population.
    pub fn new(
        config: EvolutionConfig,
        samples: Vec<Sample>,
        fitness: F,
        mutator: M,
        seeder: S,
    ) -> Result<Self> {
        let config = prepare_config(config, &samples)?;
        let prices = prices(&samples);

        let context = EvaluationContext {
            samples: &samples,
            prices: &prices,
            config: &config,
        };
        let candidates = seeder.seed(&context, &mut rand::thread_rng())?;
        if candidates.is_empty() {
            return Err(EvotradeError::Configuration(
                "Seeder produced an empty population".to_string(),
            ));
        }
        info!(
            "Seeded {} candidates over {} samples",
            candidates.len(),
            samples.len()
        );

        let state = PopulationState::new(candidates, config, fitness.direction().worst());
        Ok(Self {
            state,
            samples,
            prices,
            fitness,
            mutator,
            seeder,
        })
    }

    /// Continues from a saved state.
    pub fn resume(
        mut state: PopulationState<C>,
        samples: Vec<Sample>,
        fitness: F,
        mutator: M,
        seeder: S,
    ) -> Result<Self> {
        state.config = prepare_config(state.config, &samples)?;
        if state.candidates.is_empty() {
            return Err(EvotradeError::Configuration(
                "Saved population is empty".to_string(),
            ));
        }
        let prices = prices(&samples);
        info!(
            "Resuming at iteration {} with {} candidates",
            state.iteration,
            state.candidates.len()
        );
        Ok(Self {
            state,
            samples,
            prices,
            fitness,
            mutator,
            seeder,
        })
    }

    pub fn state(&self) -> &PopulationState<C> {
        &self.state
    }

    pub fn into_state(self) -> PopulationState<C> {
        self.state
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.state.config
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iteration(&self) -> usize {
        self.state.iteration
    }

    pub fn candidates(&self) -> &[C] {
        &self.state.candidates
    }

    /// Best candidate of the latest selection.
    pub fn leader(&self) -> Option<&C> {
        self.state.candidates.first()
    }

    pub fn best_ever(&self) -> Option<&BestEver<C>> {
        self.state.best_ever.as_ref()
    }

    pub fn best_ever_score(&self) -> f64 {
        self.state
            .best_ever
            .as_ref()
            .map_or(self.state.best_score, |best| best.score)
    }

    /// Scores every candidate in parallel.
    ///
    /// Non-finite scores are replaced by the worst score for the direction.
    pub fn evaluate(&mut self) {
        let fitness = &self.fitness;
        let direction = fitness.direction();
        let context = EvaluationContext {
            samples: &self.samples,
            prices: &self.prices,
            config: &self.state.config,
        };

        self.state.candidates.par_iter_mut().for_each(|candidate| {
            let mut rng = rand::thread_rng();
            let score = fitness.evaluate(candidate, &context, &mut rng);
            candidate.set_score(direction.sanitize(score));
        });
    }

    /// Keeps the elite, best first, and updates the best-ever record.
    /// Returns whether the record improved.
    pub fn select(&mut self) -> bool {
        let direction = self.fitness.direction();
        let state = &mut self.state;
        select_elite(&mut state.candidates, state.config.elite_count, direction);

        let mut improved = false;
        if let Some(leader) = state.candidates.first() {
            state.best_score = leader.score();
            improved = BestEver::offer(&mut state.best_ever, leader, state.iteration, direction);
        }
        if improved {
            state.stagnant_generations = 0;
            debug!(
                "{} - iter; new best-ever score: {:.3}",
                state.iteration, state.best_score
            );
        } else {
            state.stagnant_generations += 1;
        }

        improved
    }

    /// Refills to the population size with mutated clones of the elite plus
    /// `new_items` freshly seeded candidates.
    pub fn refill(&mut self) {
        let config = &self.state.config;
        let elite = &self.state.candidates;
        let room = config.population_size.saturating_sub(elite.len());
        let fresh_count = if elite.is_empty() {
            room
        } else {
            config.new_items.min(room)
        };
        let offspring_count = room - fresh_count;
        let sub_mutations = config.sub_mutations.max(1);
        let single_parent = elite.len() == 1 || config.parent_selection == ParentSelection::Best;

        let context = EvaluationContext {
            samples: &self.samples,
            prices: &self.prices,
            config,
        };
        let mutator = &self.mutator;
        let seeder = &self.seeder;

        let fresh: Vec<C> = (0..fresh_count)
            .into_par_iter()
            .map(|_| seeder.fresh(&context, &mut rand::thread_rng()))
            .collect();

        let offspring: Vec<C> = (0..offspring_count)
            .into_par_iter()
            .map(|_| {
                let mut rng = rand::thread_rng();
                let parent = if single_parent {
                    &elite[0]
                } else {
                    &elite[rng.gen_range(0..elite.len())]
                };
                let mut child = parent.offspring();
                for _ in 0..sub_mutations {
                    mutator.mutate(&mut child, &context, &mut rng);
                }
                child
            })
            .collect();

        self.state.candidates.extend(fresh);
        self.state.candidates.extend(offspring);
    }

    /// One full generation.
    pub fn step(&mut self) -> GenerationReport {
        self.evaluate();
        let improved = self.select();
        let survivors = self.state.candidates.len();
        self.refill();

        let report = GenerationReport {
            iteration: self.state.iteration,
            best_score: self.state.best_score,
            best_ever_score: self.best_ever_score(),
            population_size: self.state.candidates.len(),
            survivors,
            improved,
        };
        self.state.iteration += 1;
        report
    }

    /// Whether the configured stop strategy is satisfied.
    ///
    /// A score-threshold run also stops at `max_iterations` when that is
    /// non-zero.
    pub fn should_stop(&self) -> bool {
        let config = &self.state.config;
        match config.stop_strategy {
            StopStrategy::ScoreThreshold => {
                self.fitness.converged(self.state.best_score, config.best_result)
                    || (config.max_iterations > 0 && self.state.iteration >= config.max_iterations)
            }
            StopStrategy::MaxIterations => self.state.iteration >= config.max_iterations,
            StopStrategy::NoImprovement => {
                self.state.stagnant_generations >= config.max_stagnant_generations
            }
        }
    }

    /// Runs generations until the stop strategy fires.
    pub fn run<P: ProgressCallback>(&mut self, progress: P) -> GenerationReport {
        self.run_until(progress, |_| false)
    }

    /// [`EvolutionEngine::run`] with progress logged every `config.log_every`
    /// generations.
    pub fn run_logged(&mut self) -> GenerationReport {
        let progress = LogProgress::new(self.state.config.log_every);
        self.run(progress)
    }

    /// Like [`EvolutionEngine::run`], with an extra caller-side stop check.
    pub fn run_until<P, G>(&mut self, mut progress: P, mut stop: G) -> GenerationReport
    where
        P: ProgressCallback,
        G: FnMut(&GenerationReport) -> bool,
    {
        loop {
            progress.on_generation_start(self.state.iteration);
            let report = self.step();
            progress.on_generation_complete(&report);

            if self.should_stop() || stop(&report) {
                let elapsed = self.state.elapsed();
                info!(
                    "Finished after {} iterations in {}s; best: {:.3}",
                    self.state.iteration,
                    elapsed.num_seconds(),
                    report.best_ever_score
                );
                return report;
            }
        }
    }
}

impl<C, F, M, S> EvolutionEngine<C, F, M, S>
where
    C: Candidate + Serialize + DeserializeOwned,
{
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.state.save(path)
    }
}

impl<F, M, S> EvolutionEngine<Order, F, M, S>
where
    F: Fitness<Order>,
    M: Mutator<Order>,
    S: Seeder<Order>,
{
    /// Hill-climbs the current leader and re-scores it.
    ///
    /// Returns the number of accepted nudges.
    pub fn tune_leader(&mut self, attempts: usize) -> usize {
        let simulator = OrderSimulator::new(self.state.config.budget);
        let direction = self.fitness.direction();
        let context = EvaluationContext {
            samples: &self.samples,
            prices: &self.prices,
            config: &self.state.config,
        };
        let max_ticks = context.max_ticks();
        let Some(leader) = self.state.candidates.first_mut() else {
            return 0;
        };

        let mut rng = rand::thread_rng();
        let improvements = tune(leader, &simulator, &self.prices, max_ticks, attempts, &mut rng);
        let score = self.fitness.evaluate(leader, &context, &mut rng);
        leader.set_score(direction.sanitize(score));

        if BestEver::offer(&mut self.state.best_ever, leader, self.state.iteration, direction) {
            info!("!!! BEST !!! tuned score: {:.3}", leader.score);
        }
        improvements
    }
}

fn prepare_config(mut config: EvolutionConfig, samples: &[Sample]) -> Result<EvolutionConfig> {
    config.validate()?;
    validate_samples(samples)?;
    if config.ticks == 0 {
        config.ticks = samples.len();
    } else if config.ticks > samples.len() {
        warn!(
            "Configured {} ticks but only {} samples; later indices are skipped",
            config.ticks,
            samples.len()
        );
    }
    Ok(config)
}
