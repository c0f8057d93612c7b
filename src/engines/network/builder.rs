use super::neuron::Neuron;
use super::perceptron::Network;
use crate::config::NetworkConfig;
use crate::engines::evaluation::TradeLedger;
use crate::error::{EvotradeError, Result};
use crate::types::{AccuracyStats, Sample};
use crate::utils::numeric::rand_floats;
use rand::Rng;

/// Topology and training parameters for freshly built networks.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkBuilder {
    inputs: usize,
    outputs: usize,
    hidden_layers: usize,
    neurons: usize,
    learn_rate: f64,
    bias: bool,
    regression: bool,
    final_activation: bool,
    weight_range: (f64, f64),
}

impl NetworkBuilder {
    pub fn new(inputs: usize, outputs: usize) -> Self {
        let defaults = NetworkConfig::default();
        Self {
            inputs,
            outputs,
            hidden_layers: defaults.hidden_layers,
            neurons: defaults.neurons,
            learn_rate: defaults.learn_rate,
            bias: defaults.bias,
            regression: defaults.regression,
            final_activation: defaults.final_activation,
            weight_range: (defaults.min_weight, defaults.max_weight),
        }
    }

    /// Sizes the input layer from the feature width and the output layer from
    /// `config.outputs`, or the target width when that is 0.
    pub fn from_config(config: &NetworkConfig, samples: &[Sample]) -> Result<Self> {
        let first = samples
            .first()
            .ok_or_else(|| EvotradeError::InvalidData("Sample sequence is empty".to_string()))?;
        let outputs = if config.outputs > 0 {
            config.outputs
        } else {
            first.targets.len()
        };
        if outputs == 0 {
            return Err(EvotradeError::Configuration(
                "Output width is 0 and samples carry no targets".to_string(),
            ));
        }

        Ok(Self::new(first.features.len(), outputs)
            .hidden_layers(config.hidden_layers)
            .neurons(config.neurons)
            .learn_rate(config.learn_rate)
            .bias(config.bias)
            .regression(config.regression)
            .final_activation(config.final_activation)
            .weight_range(config.min_weight, config.max_weight))
    }

    pub fn hidden_layers(mut self, hidden_layers: usize) -> Self {
        self.hidden_layers = hidden_layers;
        self
    }

    pub fn neurons(mut self, neurons: usize) -> Self {
        self.neurons = neurons;
        self
    }

    pub fn learn_rate(mut self, learn_rate: f64) -> Self {
        self.learn_rate = learn_rate;
        self
    }

    pub fn bias(mut self, bias: bool) -> Self {
        self.bias = bias;
        self
    }

    pub fn regression(mut self, regression: bool) -> Self {
        self.regression = regression;
        self
    }

    pub fn final_activation(mut self, final_activation: bool) -> Self {
        self.final_activation = final_activation;
        self
    }

    pub fn weight_range(mut self, min: f64, max: f64) -> Self {
        self.weight_range = (min, max);
        self
    }

    /// Lays out `[input] + [hidden] * depth + [output]` and draws every
    /// weight from the configured range.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Network {
        let mut layers = Vec::with_capacity(self.hidden_layers + 2);

        let mut input: Vec<Neuron> = (0..self.inputs).map(|_| Neuron::input()).collect();
        if self.bias {
            input.push(Neuron::bias());
        }
        layers.push(input);

        for _ in 0..self.hidden_layers {
            let mut hidden: Vec<Neuron> = (0..self.neurons).map(|_| Neuron::hidden()).collect();
            if self.bias {
                hidden.push(Neuron::bias());
            }
            layers.push(hidden);
        }

        layers.push((0..self.outputs).map(|_| Neuron::output()).collect());

        let (min, max) = self.weight_range;
        for il in 0..layers.len() - 1 {
            let fan_out = layers[il + 1].iter().filter(|n| !n.is_bias).count();
            for neuron in layers[il].iter_mut() {
                neuron.weights = rand_floats(rng, min, max, fan_out);
            }
        }

        Network {
            layers,
            learn_rate: self.learn_rate,
            bias: self.bias,
            regression: self.regression,
            final_activation: self.final_activation,
            weight_range: self.weight_range,
            score: 0.0,
            ledger: TradeLedger::default(),
            error: 1.0,
            error_history: Vec::new(),
            current_index: 0,
            accuracy: AccuracyStats::default(),
        }
    }
}
