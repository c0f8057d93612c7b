use log::info;
use std::sync::mpsc::Sender;

/// Summary of one completed generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub iteration: usize,
    pub best_score: f64,
    pub best_ever_score: f64,
    pub population_size: usize,
    pub survivors: usize,
    /// The best-ever record changed this generation
    pub improved: bool,
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, iteration: usize);
    fn on_generation_complete(&mut self, report: &GenerationReport);
}

/// Logs every improvement and every `every`-th generation.
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self { every }
    }
}

impl ProgressCallback for LogProgress {
    fn on_generation_start(&mut self, _iteration: usize) {}

    fn on_generation_complete(&mut self, report: &GenerationReport) {
        let tag = if report.improved {
            "!!! BEST !!!"
        } else if self.every > 0 && report.iteration % self.every == 0 {
            "!!! TIME !!!"
        } else {
            return;
        };
        info!(
            "{} - iter; {}; score: {:.3}; best: {:.3}; len: {}",
            report.iteration, tag, report.best_score, report.best_ever_score, report.population_size
        );
    }
}

/// Progress events for a consumer on another thread
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationReport),
}

pub struct ChannelProgress {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgress {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgress {
    fn on_generation_start(&mut self, iteration: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(iteration));
    }

    fn on_generation_complete(&mut self, report: &GenerationReport) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(report.clone()));
    }
}

/// Discards all events.
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_generation_start(&mut self, _iteration: usize) {}
    fn on_generation_complete(&mut self, _report: &GenerationReport) {}
}
