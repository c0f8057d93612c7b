pub mod candidate;
pub mod evolution_engine;
pub mod fitness;
pub mod hall_of_fame;
pub mod operators;
pub mod order;
pub mod population;
pub mod progress;
pub mod seeding;
pub mod selection;

pub use candidate::{Candidate, EvaluationContext, Fitness, Mutator, Seeder};
pub use evolution_engine::EvolutionEngine;
pub use fitness::{NetworkFitness, OrderFitness};
pub use hall_of_fame::BestEver;
pub use operators::{OrderMutation, WeightMutation};
pub use order::Order;
pub use population::PopulationState;
pub use progress::{
    ChannelProgress, GenerationReport, LogProgress, NoProgress, ProgressCallback, ProgressMessage,
};
pub use seeding::{NetworkSeeder, OrderSeeder};
pub use selection::OptimizationDirection;
