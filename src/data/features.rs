use super::connectors::PriceSeries;
use crate::config::DataConfig;
use crate::error::{EvotradeError, Result};
use crate::types::{Decision, Sample};
use crate::utils::numeric::{get_diff, to_fixed};

/// Tick-over-tick percent change; the first tick has no predecessor and stays 0.
pub fn percent_changes(values: &[f64]) -> Vec<f64> {
    let mut changes = vec![0.0; values.len()];
    for i in 1..values.len() {
        changes[i] = get_diff(values[i], values[i - 1]);
    }
    changes
}

/// Percent change scaled down by 100, used for volume and trade counts.
pub fn scaled_changes(values: &[f64]) -> Vec<f64> {
    percent_changes(values)
        .into_iter()
        .map(|v| to_fixed(v / 100.0, 3))
        .collect()
}

/// Label for the move following a tick.
pub fn label_move(next_percent: f64, threshold: f64) -> Decision {
    if next_percent > threshold {
        Decision::Buy
    } else if next_percent < -threshold {
        Decision::Sell
    } else {
        Decision::Hold
    }
}

/// Builds one sample per tick that has a full window of history behind it.
///
/// Each feature vector is the previous `window` close changes, followed by
/// the trade count and volume changes when those series are present and
/// enabled. The first `window + 1` ticks only seed history. With labelling
/// on, the last tick is dropped because its next move is unknown.
pub fn build_samples(series: &PriceSeries, config: &DataConfig) -> Result<Vec<Sample>> {
    let n = series.len();
    let window = config.window;
    if window == 0 {
        return Err(EvotradeError::Configuration(
            "Feature window must be at least 1".to_string(),
        ));
    }

    let closes = percent_changes(&series.close);
    let mut extra: Vec<Vec<f64>> = Vec::new();
    if config.include_trades {
        if let Some(trades) = &series.trades {
            extra.push(scaled_changes(trades));
        }
    }
    if config.include_volume {
        if let Some(volume) = &series.volume {
            extra.push(scaled_changes(volume));
        }
    }
    for column in &extra {
        if column.len() != n {
            return Err(EvotradeError::InvalidData(format!(
                "Series length mismatch: {} closes vs {} values",
                n,
                column.len()
            )));
        }
    }

    let end = if config.labels { n.saturating_sub(1) } else { n };
    let mut samples = Vec::with_capacity(end.saturating_sub(window + 1));
    for i in (window + 1)..end {
        let mut features = Vec::with_capacity(window * (1 + extra.len()));
        features.extend_from_slice(&closes[i - window..i]);
        for column in &extra {
            features.extend_from_slice(&column[i - window..i]);
        }

        let targets = if config.labels {
            label_move(closes[i + 1], config.label_threshold).to_response()
        } else {
            Vec::new()
        };

        samples.push(Sample::new(features, targets, series.close[i]));
    }

    if samples.is_empty() {
        return Err(EvotradeError::InvalidData(format!(
            "{} ticks are not enough for a window of {}",
            n, window
        )));
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(close: Vec<f64>) -> PriceSeries {
        let n = close.len();
        PriceSeries {
            close,
            volume: Some(vec![100.0; n]),
            trades: None,
        }
    }

    #[test]
    fn test_percent_changes() {
        let changes = percent_changes(&[100.0, 110.0, 110.0]);
        assert_eq!(changes[0], 0.0);
        assert_eq!(changes[1], get_diff(110.0, 100.0));
        assert_eq!(changes[2], 0.0);
    }

    #[test]
    fn test_windows_skip_seed_history() {
        let config = DataConfig {
            window: 2,
            ..Default::default()
        };
        let closes = vec![100.0, 101.0, 102.0, 103.0, 104.0, 105.0];
        let samples = build_samples(&series(closes.clone()), &config).unwrap();

        assert_eq!(samples.len(), closes.len() - 3);
        // Two close changes plus two volume changes
        assert_eq!(samples[0].features.len(), 4);
        assert_eq!(samples[0].price, 103.0);
        assert!(samples.iter().all(|s| !s.has_targets()));
    }

    #[test]
    fn test_labels_follow_next_move() {
        let config = DataConfig {
            window: 1,
            labels: true,
            label_threshold: 1.0,
            include_volume: false,
            ..Default::default()
        };
        let samples = build_samples(&series(vec![100.0, 100.0, 100.0, 120.0, 90.0]), &config).unwrap();

        // Ticks 2 and 3 are labelled by the moves into ticks 3 and 4
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].targets, Decision::Buy.to_response());
        assert_eq!(samples[1].targets, Decision::Sell.to_response());
    }

    #[test]
    fn test_too_short_series_is_rejected() {
        let config = DataConfig {
            window: 10,
            ..Default::default()
        };
        assert!(build_samples(&series(vec![1.0, 2.0, 3.0]), &config).is_err());
    }
}
