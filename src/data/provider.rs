use crate::error::{EvotradeError, Result};
use crate::types::Sample;

/// Source of the ordered training samples an evolution run works on
pub trait SampleProvider {
    fn load_samples(&self) -> Result<Vec<Sample>>;
}

/// Samples already held in memory
#[derive(Debug, Clone, Default)]
pub struct VecProvider {
    samples: Vec<Sample>,
}

impl VecProvider {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Unlabelled samples with empty features, one per price.
    pub fn from_prices(prices: &[f64]) -> Self {
        Self::new(
            prices
                .iter()
                .map(|p| Sample::unlabeled(Vec::new(), *p))
                .collect(),
        )
    }
}

impl SampleProvider for VecProvider {
    fn load_samples(&self) -> Result<Vec<Sample>> {
        validate_samples(&self.samples)?;
        Ok(self.samples.clone())
    }
}

/// Rejects empty sequences and ragged feature or target widths.
pub fn validate_samples(samples: &[Sample]) -> Result<()> {
    let first = samples
        .first()
        .ok_or_else(|| EvotradeError::InvalidData("Sample sequence is empty".to_string()))?;

    for (i, sample) in samples.iter().enumerate() {
        if sample.features.len() != first.features.len() {
            return Err(EvotradeError::InvalidData(format!(
                "Sample {} has {} features, expected {}",
                i,
                sample.features.len(),
                first.features.len()
            )));
        }
        if sample.has_targets() && first.has_targets() && sample.targets.len() != first.targets.len() {
            return Err(EvotradeError::InvalidData(format!(
                "Sample {} has {} targets, expected {}",
                i,
                sample.targets.len(),
                first.targets.len()
            )));
        }
        if !sample.price.is_finite() {
            return Err(EvotradeError::InvalidData(format!(
                "Sample {} has a non-finite price",
                i
            )));
        }
    }
    Ok(())
}

/// Transaction prices in sample order.
pub fn prices(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|s| s.price).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_provider_is_rejected() {
        assert!(VecProvider::default().load_samples().is_err());
    }

    #[test]
    fn test_ragged_features_are_rejected() {
        let provider = VecProvider::new(vec![
            Sample::unlabeled(vec![1.0, 2.0], 10.0),
            Sample::unlabeled(vec![1.0], 11.0),
        ]);
        assert!(provider.load_samples().is_err());
    }

    #[test]
    fn test_from_prices() {
        let samples = VecProvider::from_prices(&[1.0, 2.0, 3.0]).load_samples().unwrap();
        assert_eq!(prices(&samples), vec![1.0, 2.0, 3.0]);
    }
}
