use super::neuron::Neuron;
use crate::config::NetworkConfig;
use crate::engines::evaluation::TradeLedger;
use crate::error::{EvotradeError, Result};
use crate::persistence;
use crate::types::{AccuracyStats, Sample};
use crate::utils::numeric::{rand_float, round_half, to_fixed};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Layered feed-forward perceptron evolved and trained by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Vec<Neuron>>,
    pub learn_rate: f64,
    pub bias: bool,
    pub regression: bool,
    pub final_activation: bool,
    pub weight_range: (f64, f64),
    pub score: f64,
    pub ledger: TradeLedger,
    /// Loss of the last sample, or the mean loss of the last sweep
    pub error: f64,
    #[serde(default)]
    pub error_history: Vec<f64>,
    pub current_index: usize,
    pub accuracy: AccuracyStats,
}

impl Network {
    pub fn input_width(&self) -> usize {
        self.layers
            .first()
            .map(|layer| layer.iter().filter(|n| !n.is_bias).count())
            .unwrap_or(0)
    }

    pub fn output_width(&self) -> usize {
        self.layers.last().map(Vec::len).unwrap_or(0)
    }

    pub fn outputs(&self) -> &[Neuron] {
        self.layers.last().map(Vec::as_slice).unwrap_or(&[])
    }

    fn squashes_output(&self) -> bool {
        self.final_activation && !self.regression
    }

    /// Loads `features` into the non-bias input neurons.
    pub fn set_inputs(&mut self, features: &[f64]) -> Result<()> {
        let width = self.input_width();
        if features.len() != width {
            return Err(EvotradeError::Network(format!(
                "Expected {} inputs, got {}",
                width,
                features.len()
            )));
        }
        let inputs = self
            .layers
            .first_mut()
            .ok_or_else(|| EvotradeError::Network("Network has no layers".to_string()))?;
        for (neuron, value) in inputs.iter_mut().filter(|n| !n.is_bias).zip(features) {
            neuron.value = *value;
        }
        Ok(())
    }

    /// Activates every layer in order and feeds it into the next.
    pub fn forward(&mut self) {
        let last = self.layers.len().saturating_sub(1);
        let squash_output = self.squashes_output();

        for il in 0..self.layers.len() {
            let squash = il != last || squash_output;
            let (head, tail) = self.layers.split_at_mut(il + 1);
            let layer = &mut head[il];
            for neuron in layer.iter_mut() {
                neuron.activate(squash);
            }
            if let Some(next) = tail.first_mut() {
                for neuron in layer.iter() {
                    let targets = next.iter_mut().filter(|n| !n.is_bias);
                    for (target, weight) in targets.zip(&neuron.weights) {
                        target.push(neuron.value * weight);
                    }
                }
            }
        }
    }

    /// Sets `target - prediction` on each output neuron and returns the
    /// summed squared error.
    pub fn calc_error(&mut self, targets: &[f64]) -> Result<f64> {
        let width = self.output_width();
        if targets.len() != width {
            return Err(EvotradeError::Network(format!(
                "Expected {} targets, got {}",
                width,
                targets.len()
            )));
        }
        let mut loss = 0.0;
        if let Some(outputs) = self.layers.last_mut() {
            for (neuron, target) in outputs.iter_mut().zip(targets) {
                neuron.error = target - neuron.value;
                loss += neuron.error.powi(2);
            }
        }
        Ok(loss)
    }

    /// Pushes output errors back through the hidden layers.
    pub fn propagate_error(&mut self) {
        for il in (1..self.layers.len().saturating_sub(1)).rev() {
            let (head, tail) = self.layers.split_at_mut(il + 1);
            let next_errors = non_bias_errors(&tail[0]);
            for neuron in head[il].iter_mut() {
                let sum: f64 = neuron
                    .weights
                    .iter()
                    .zip(&next_errors)
                    .map(|(w, e)| w * e)
                    .sum();
                neuron.error = sum * neuron.derivative();
            }
        }
    }

    /// `weight += learn_rate * next_error * value` for every weight.
    pub fn backpropagate(&mut self) {
        let learn_rate = self.learn_rate;
        for il in 0..self.layers.len().saturating_sub(1) {
            let (head, tail) = self.layers.split_at_mut(il + 1);
            let next_errors = non_bias_errors(&tail[0]);
            for neuron in head[il].iter_mut() {
                let value = neuron.value;
                for (weight, error) in neuron.weights.iter_mut().zip(&next_errors) {
                    *weight += learn_rate * error * value;
                }
            }
        }
    }

    fn advance(&mut self, len: usize) {
        self.current_index = if self.current_index + 1 >= len {
            0
        } else {
            self.current_index + 1
        };
    }

    /// Mean of the recorded losses with NaN counted as 1.0; clears the history.
    fn mean_error(&mut self, len: usize) -> f64 {
        let sum: f64 = self
            .error_history
            .drain(..)
            .map(|e| if e.is_nan() { 1.0 } else { e })
            .sum();
        if len == 0 {
            0.0
        } else {
            sum / len as f64
        }
    }

    /// One forward, error and backprop pass per sample.
    pub fn train_sweep(&mut self, samples: &[Sample]) -> Result<f64> {
        self.current_index = 0;
        for _ in 0..samples.len() {
            let sample = &samples[self.current_index];
            self.set_inputs(&sample.features)?;
            self.forward();
            let loss = self.calc_error(&sample.targets)?;
            self.error = to_fixed(loss, 10);
            self.error_history.push(loss);
            self.propagate_error();
            self.backpropagate();
            self.advance(samples.len());
        }
        self.error = self.mean_error(samples.len());
        self.current_index = 0;
        Ok(self.error)
    }

    /// Repeats [`Network::train_sweep`] `iterations` times.
    pub fn train(&mut self, samples: &[Sample], iterations: usize, log_every: usize) -> Result<f64> {
        if samples.is_empty() {
            return Err(EvotradeError::InvalidData("No samples to train on".to_string()));
        }
        let start = Instant::now();
        for i in 0..iterations {
            self.train_sweep(samples)?;
            if log_every > 0 && i % log_every == 0 {
                info!("iteration: {}; error: {}", i, self.error);
            }
        }
        self.error_history.clear();
        info!("teach time: {:?}", start.elapsed());
        Ok(self.error)
    }

    /// [`Network::train`] with the sweep count and log throttle from `config`.
    pub fn train_with(&mut self, config: &NetworkConfig, samples: &[Sample]) -> Result<f64> {
        self.train(samples, config.iterations, config.log_every)
    }

    /// Forward pass and loss on one random sample, without backprop.
    ///
    /// A NaN loss is stored as 1.0.
    pub fn train_step<R: Rng + ?Sized>(&mut self, samples: &[Sample], rng: &mut R) -> Result<f64> {
        if samples.is_empty() {
            return Err(EvotradeError::InvalidData("No samples to train on".to_string()));
        }
        self.current_index = rng.gen_range(0..samples.len());
        let sample = &samples[self.current_index];
        self.set_inputs(&sample.features)?;
        self.forward();
        let loss = self.calc_error(&sample.targets)?;
        self.error = if loss.is_nan() { 1.0 } else { loss };
        Ok(self.error)
    }

    /// Raw output values for `features`.
    pub fn predict_raw(&mut self, features: &[f64]) -> Result<Vec<f64>> {
        self.set_inputs(features)?;
        self.forward();
        Ok(self.outputs().iter().map(|n| n.value).collect())
    }

    /// Regression outputs to 3 decimals, otherwise rounded to 0/1.
    pub fn predict(&mut self, features: &[f64]) -> Result<Vec<f64>> {
        let regression = self.regression;
        Ok(self
            .predict_raw(features)?
            .into_iter()
            .map(|v| if regression { to_fixed(v, 3) } else { round_half(v) })
            .collect())
    }

    /// Prediction decoded to a one-hot vector.
    pub fn predict_one_hot(&mut self, features: &[f64]) -> Result<Vec<f64>> {
        let regression = self.regression;
        let raw: Vec<f64> = self
            .predict_raw(features)?
            .into_iter()
            .map(|v| if regression { to_fixed(v, 3) } else { v })
            .collect();
        Ok(decode_one_hot(&raw))
    }

    /// Accumulates one-hot hits over `count` random labelled samples.
    pub fn calc_stat<R: Rng + ?Sized>(
        &mut self,
        samples: &[Sample],
        count: usize,
        rng: &mut R,
    ) -> Result<&AccuracyStats> {
        if !samples.is_empty() {
            for _ in 0..count {
                let sample = &samples[rng.gen_range(0..samples.len())];
                let predicted = self.predict_one_hot(&sample.features)?;
                self.accuracy.record(predicted == sample.targets);
            }
        }
        self.accuracy.finish();
        Ok(&self.accuracy)
    }

    /// Rounded predictions over the whole set, starting from fresh tallies.
    pub fn calc_stat_all(&mut self, samples: &[Sample]) -> Result<&AccuracyStats> {
        self.accuracy = AccuracyStats::default();
        for sample in samples {
            let predicted = self.predict(&sample.features)?;
            self.accuracy.record(predicted == sample.targets);
        }
        self.accuracy.finish();
        Ok(&self.accuracy)
    }

    /// Regression hits compared at 3 decimals over `count` random samples.
    pub fn calc_stat_regress<R: Rng + ?Sized>(
        &mut self,
        samples: &[Sample],
        count: usize,
        rng: &mut R,
    ) -> Result<&AccuracyStats> {
        if !samples.is_empty() {
            for _ in 0..count {
                let sample = &samples[rng.gen_range(0..samples.len())];
                let predicted: Vec<f64> = self
                    .predict(&sample.features)?
                    .into_iter()
                    .map(|v| to_fixed(v, 3))
                    .collect();
                let expected: Vec<f64> = sample.targets.iter().map(|v| to_fixed(*v, 3)).collect();
                self.accuracy.record(predicted == expected);
            }
        }
        self.accuracy.finish();
        Ok(&self.accuracy)
    }

    /// Replaces one random outgoing weight with a uniform value in `[min, max]`.
    pub fn mutate_weight<R: Rng + ?Sized>(&mut self, rng: &mut R, min: f64, max: f64) {
        let senders = self.layers.len().saturating_sub(1);
        if senders == 0 {
            return;
        }
        let layer = &mut self.layers[rng.gen_range(0..senders)];
        if layer.is_empty() {
            return;
        }
        let neuron = rng.gen_range(0..layer.len());
        let weights = &mut layer[neuron].weights;
        if weights.is_empty() {
            return;
        }
        let index = rng.gen_range(0..weights.len());
        weights[index] = rand_float(rng, min, max);
    }

    /// Structural copy with transient training stats reset.
    pub fn offspring(&self) -> Self {
        let mut child = self.clone();
        child.error = 1.0;
        child.error_history.clear();
        child.accuracy = AccuracyStats::default();
        child
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save(path, self)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load(path)
    }
}

fn non_bias_errors(layer: &[Neuron]) -> Vec<f64> {
    layer.iter().filter(|n| !n.is_bias).map(|n| n.error).collect()
}

/// One-hot at the largest value, scanning right to left with strict `>`
/// from zero, so ties go to the highest index and all non-positive values
/// decode to index 0.
pub fn decode_one_hot(values: &[f64]) -> Vec<f64> {
    let mut max = 0.0;
    let mut max_index = 0;
    for (i, value) in values.iter().enumerate().rev() {
        if *value > max {
            max = *value;
            max_index = i;
        }
    }
    let mut decoded = vec![0.0; values.len()];
    if let Some(slot) = decoded.get_mut(max_index) {
        *slot = 1.0;
    }
    decoded
}
