pub mod builder;
pub mod neuron;
pub mod perceptron;

pub use builder::NetworkBuilder;
pub use neuron::{sigmoid, Neuron};
pub use perceptron::{decode_one_hot, Network};
