use std::collections::HashMap;

use itertools::Itertools;

/// Arithmetic mean. `None` for an empty slice.
pub(crate) fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Half of the population variance: `(Σ(x - mean)² / n) * 0.5`.
/// Not the variance, not the standard deviation.
pub(crate) fn dispersion(samples: &[f64]) -> Option<f64> {
    let m = mean(samples)?;
    let sum_of_squares: f64 = samples.iter().map(|x| (x - m).powi(2)).sum();
    Some(sum_of_squares / samples.len() as f64 * 0.5)
}

/// Highest trackable lookup latency, 1000s. Slower lookups are clamped.
const LATENCY_MAX_NS: u64 = 1_000_000_000_000;

pub(crate) fn make_latency_histogram() -> hdrhistogram::Histogram<u64> {
    hdrhistogram::Histogram::new_with_bounds(1, LATENCY_MAX_NS, 3)
        .expect("static histogram bounds are valid")
}

const LATENCY_PERCENTILES: [f64; 4] = [50.0, 90.0, 99.0, 99.9];

fn latency_percentiles_serialize<S>(
    values: &[f64; LATENCY_PERCENTILES.len()],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serde::Serialize::serialize(
        &LATENCY_PERCENTILES
            .iter()
            .map(|p| format!("p{p}"))
            .zip(values.iter().cloned())
            .collect::<HashMap<_, _>>(),
        serializer,
    )
}

/// Per-lookup latency distribution of one benchmark run, in microseconds.
#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct LatencySummary {
    pub(crate) lookups: u64,
    pub(crate) min_us: f64,
    pub(crate) mean_us: f64,
    pub(crate) max_us: f64,
    #[serde(serialize_with = "latency_percentiles_serialize")]
    pub(crate) percentiles_us: [f64; LATENCY_PERCENTILES.len()],
}

impl LatencySummary {
    pub(crate) fn from_histogram(histo: &hdrhistogram::Histogram<u64>) -> Self {
        let mut percentiles_us = [0.0; LATENCY_PERCENTILES.len()];
        for (value_ref, p) in percentiles_us.iter_mut().zip(LATENCY_PERCENTILES) {
            *value_ref = histo.value_at_percentile(p) as f64 / 1000.0;
        }
        LatencySummary {
            lookups: histo.len(),
            min_us: histo.min() as f64 / 1000.0,
            mean_us: histo.mean() / 1000.0,
            max_us: histo.max() as f64 / 1000.0,
            percentiles_us,
        }
    }
}

impl std::fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LAT(us): n={} min={:.0} mean={:.0} max={:.0} {}",
            self.lookups,
            self.min_us,
            self.mean_us,
            self.max_us,
            self.percentiles_us
                .iter()
                .zip(LATENCY_PERCENTILES.iter())
                .map(|(v, p)| format!("p{p}={v:.0}"))
                .join(" "),
        )
    }
}
