use serde::{Deserialize, Serialize};

/// Logistic activation
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// A single unit of a layered perceptron.
///
/// `weights[i]` feeds the i-th non-bias neuron of the next layer, so output
/// neurons carry no weights at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub value: f64,
    /// Contributions pushed by the previous layer during the current pass
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<f64>,
    pub weights: Vec<f64>,
    pub error: f64,
    pub is_input: bool,
    pub is_output: bool,
    pub is_bias: bool,
}

impl Neuron {
    pub fn input() -> Self {
        Self {
            is_input: true,
            ..Default::default()
        }
    }

    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn output() -> Self {
        Self {
            is_output: true,
            ..Default::default()
        }
    }

    /// Constant unit appended to every non-output layer when bias is enabled.
    pub fn bias() -> Self {
        Self {
            value: 1.0,
            is_bias: true,
            ..Default::default()
        }
    }

    pub fn push(&mut self, contribution: f64) {
        self.pending.push(contribution);
    }

    /// Consumes the pending sum. Neurons nothing feeds into (inputs, biases)
    /// keep their value.
    pub fn activate(&mut self, squash: bool) {
        if self.pending.is_empty() {
            return;
        }
        let sum: f64 = self.pending.iter().sum();
        self.value = if squash { sigmoid(sum) } else { sum };
        self.pending.clear();
    }

    /// Sigmoid derivative expressed through the activated value.
    pub fn derivative(&self) -> f64 {
        self.value * (1.0 - self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_activate_consumes_pending() {
        let mut neuron = Neuron::hidden();
        neuron.push(0.25);
        neuron.push(-0.25);
        neuron.activate(true);
        assert_eq!(neuron.value, 0.5);
        assert!(neuron.pending.is_empty());

        neuron.push(2.0);
        neuron.activate(false);
        assert_eq!(neuron.value, 2.0);
    }

    #[test]
    fn test_activate_without_pending_keeps_value() {
        let mut bias = Neuron::bias();
        bias.activate(true);
        assert_eq!(bias.value, 1.0);
        assert_eq!(bias.derivative(), 0.0);
    }
}
