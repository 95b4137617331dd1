//! Run-level counters and timings.

use std::time::Duration;

use tremor_model::ModelTiming;

/// Cumulative metrics of a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunMetrics {
    /// Wall-clock time since the run started, as of the last close.
    pub compute_time: Duration,
    /// Completed close sequences, including the initial one.
    pub closes: u64,
    /// Completed normal steps (remesh re-closes are not counted).
    pub steps: u64,
    /// Remeshes performed.
    pub remeshes: u64,
    /// Per-model hook time in microseconds, in registration order.
    pub model_us: Vec<(String, u64)>,
}

impl RunMetrics {
    /// Refresh [`model_us`](Self::model_us) from the registry's timings.
    pub fn record_models<'a>(&mut self, timings: impl Iterator<Item = &'a ModelTiming>) {
        self.model_us = timings
            .map(|t| (t.name.clone(), u64::try_from(t.elapsed.as_micros()).unwrap_or(u64::MAX)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.compute_time, Duration::ZERO);
        assert_eq!((m.closes, m.steps, m.remeshes), (0, 0, 0));
        assert!(m.model_us.is_empty());
    }

    #[test]
    fn model_times_keep_registration_order() {
        let timings = [
            ModelTiming {
                name: "fluid".into(),
                calls: 3,
                elapsed: Duration::from_micros(40),
            },
            ModelTiming {
                name: "nodal pressure".into(),
                calls: 9,
                elapsed: Duration::from_millis(2),
            },
        ];
        let mut m = RunMetrics::default();
        m.record_models(timings.iter());
        assert_eq!(
            m.model_us,
            vec![("fluid".to_string(), 40), ("nodal pressure".to_string(), 2000)]
        );
    }
}
