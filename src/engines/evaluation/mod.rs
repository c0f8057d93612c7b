pub mod ledger;
pub mod simulator;

pub use ledger::TradeLedger;
pub use simulator::{OrderSimulator, SimulationOutcome};
