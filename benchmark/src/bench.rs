use std::{num::NonZeroUsize, time::Duration};

use rand::Rng;
use scylla::client::session::Session;
use serde_with::serde_as;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::Error,
    materializers::{MaterializationKind, Materialized, Materializer},
    schema::Statements,
    stats::{self, LatencySummary},
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct BenchConfig {
    pub(crate) iterations: NonZeroUsize,
    pub(crate) sample_size: NonZeroUsize,
}

/// Picks `amount` distinct ids uniformly at random, in draw order.
pub(crate) fn sample_ids<R: Rng + ?Sized>(
    rng: &mut R,
    ids: &[Uuid],
    amount: usize,
) -> Result<Vec<Uuid>, Error> {
    if amount > ids.len() {
        return Err(Error::NotEnoughRows {
            wanted: amount,
            available: ids.len(),
        });
    }
    Ok(rand::seq::index::sample(rng, ids.len(), amount)
        .into_iter()
        .map(|i| ids[i])
        .collect())
}

/// Point lookup by primary key, decoded with `materializer`.
pub(crate) async fn lookup(
    session: &Session,
    statements: &Statements,
    id: Uuid,
    materializer: &dyn Materializer,
) -> Result<Materialized, Error> {
    let rows = session
        .execute_unpaged(&statements.select_by_id, (id,))
        .await?
        .into_rows_result()
        .map_err(Error::decode)?;
    materializer.materialize(rows)
}

#[serde_as]
#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct BenchmarkReport {
    pub(crate) materialization: MaterializationKind,
    pub(crate) sample_size: usize,
    pub(crate) rows_returned: u64,
    #[serde_as(as = "Vec<serde_with::DurationMicroSeconds<f64>>")]
    pub(crate) elapsed_us: Vec<Duration>,
    pub(crate) throughput_qps: Vec<f64>,
    pub(crate) elapsed_mean_secs: f64,
    pub(crate) elapsed_dispersion: f64,
    pub(crate) throughput_mean_qps: f64,
    pub(crate) throughput_dispersion: f64,
    pub(crate) latency: LatencySummary,
}

impl BenchmarkReport {
    pub(crate) fn new(
        materialization: MaterializationKind,
        sample_size: usize,
        rows_returned: u64,
        elapsed: Vec<Duration>,
        latency: LatencySummary,
    ) -> Self {
        let secs = elapsed.iter().map(Duration::as_secs_f64).collect::<Vec<_>>();
        let throughput_qps = secs
            .iter()
            .map(|s| sample_size as f64 / s)
            .collect::<Vec<_>>();
        BenchmarkReport {
            materialization,
            sample_size,
            rows_returned,
            elapsed_mean_secs: stats::mean(&secs).unwrap_or(f64::NAN),
            elapsed_dispersion: stats::dispersion(&secs).unwrap_or(f64::NAN),
            throughput_mean_qps: stats::mean(&throughput_qps).unwrap_or(f64::NAN),
            throughput_dispersion: stats::dispersion(&throughput_qps).unwrap_or(f64::NAN),
            elapsed_us: elapsed,
            throughput_qps,
            latency,
        }
    }
}

impl std::fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: runtime avg={:.6}s (dispersion {:.6}) QPS avg={:.1} (dispersion {:.1}) {}",
            self.materialization,
            self.elapsed_mean_secs,
            self.elapsed_dispersion,
            self.throughput_mean_qps,
            self.throughput_dispersion,
            self.latency,
        )
    }
}

/// Times `config.iterations` rounds of `config.sample_size` sequential
/// lookups each. Every round draws a fresh sample of `ids`.
pub(crate) async fn run_benchmark<R: Rng + ?Sized>(
    session: &Session,
    statements: &Statements,
    ids: &[Uuid],
    materializer: &dyn Materializer,
    config: BenchConfig,
    rng: &mut R,
) -> Result<BenchmarkReport, Error> {
    let kind = materializer.kind();
    let sample_size = config.sample_size.get();
    info!(materialization = %kind, "beginning benchmark");

    let mut latencies = stats::make_latency_histogram();
    let mut rows_returned = 0u64;
    let mut elapsed = Vec::with_capacity(config.iterations.get());
    for iteration in 0..config.iterations.get() {
        let test_ids = sample_ids(rng, ids, sample_size)?;

        let start = std::time::Instant::now();
        for id in test_ids {
            let lookup_start = std::time::Instant::now();
            let rows = lookup(session, statements, id, materializer).await?;
            latencies.saturating_record(
                u64::try_from(lookup_start.elapsed().as_nanos()).unwrap_or(u64::MAX),
            );
            rows_returned += rows.len() as u64;
        }
        let delta = start.elapsed();

        info!(materialization = %kind, iteration, "{:.6} seconds", delta.as_secs_f64());
        elapsed.push(delta);
    }

    let report = BenchmarkReport::new(
        kind,
        sample_size,
        rows_returned,
        elapsed,
        LatencySummary::from_histogram(&latencies),
    );
    info!(
        materialization = %kind,
        "runtime avg: {:.6} seconds (dispersion: {:.6})",
        report.elapsed_mean_secs,
        report.elapsed_dispersion
    );
    info!(
        materialization = %kind,
        "QPS avg: {:.3} (dispersion: {:.3})",
        report.throughput_mean_qps,
        report.throughput_dispersion
    );
    info!(materialization = %kind, "{}", report.latency);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn sample_is_distinct_and_exactly_sized() {
        let ids = ids(10_000);
        let known = ids.iter().collect::<HashSet<_>>();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            let sample = sample_ids(&mut rng, &ids, 1_000).unwrap();
            assert_eq!(sample.len(), 1_000);
            let distinct = sample.iter().collect::<HashSet<_>>();
            assert_eq!(distinct.len(), 1_000);
            assert!(distinct.is_subset(&known));
        }
    }

    #[test]
    fn sample_can_take_everything() {
        let ids = ids(50);
        let mut rng = StdRng::seed_from_u64(1);
        let mut sample = sample_ids(&mut rng, &ids, 50).unwrap();
        let mut expected = ids.clone();
        sample.sort();
        expected.sort();
        assert_eq!(sample, expected);
    }

    #[test]
    fn sample_larger_than_population_fails() {
        let ids = ids(10);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_ids(&mut rng, &ids, 11),
            Err(Error::NotEnoughRows {
                wanted: 11,
                available: 10
            })
        ));
    }

    #[test]
    fn seeded_samples_repeat() {
        let ids = ids(1_000);
        let a = sample_ids(&mut StdRng::seed_from_u64(42), &ids, 100).unwrap();
        let b = sample_ids(&mut StdRng::seed_from_u64(42), &ids, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn report_derives_throughput_per_iteration() {
        let elapsed = [0.5, 1.0, 2.0, 0.25, 1.25]
            .map(Duration::from_secs_f64)
            .to_vec();
        let report = BenchmarkReport::new(
            MaterializationKind::OrderedMap,
            1_000,
            5_000,
            elapsed.clone(),
            LatencySummary::from_histogram(&stats::make_latency_histogram()),
        );
        assert_eq!(report.elapsed_us.len(), 5);
        assert_eq!(report.throughput_qps.len(), 5);
        for (d, qps) in elapsed.iter().zip(&report.throughput_qps) {
            assert_eq!(*qps, 1_000.0 / d.as_secs_f64());
        }
        assert_eq!(report.elapsed_mean_secs, 1.0);
        // deviations -0.5, 0, 1, -0.75, 0.25 -> squares sum 1.875, /5 *0.5
        assert!((report.elapsed_dispersion - 0.1875).abs() < 1e-12);
        assert_eq!(
            report.throughput_mean_qps,
            stats::mean(&[2000.0, 1000.0, 500.0, 4000.0, 800.0]).unwrap()
        );
    }

    #[test]
    fn report_serializes_durations_as_micros() {
        let report = BenchmarkReport::new(
            MaterializationKind::Positional,
            10,
            10,
            vec![Duration::from_millis(20)],
            LatencySummary::from_histogram(&stats::make_latency_histogram()),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["materialization"], "positional");
        assert_eq!(json["elapsed_us"][0], 20_000.0);
        assert_eq!(json["throughput_qps"][0], 500.0);
        assert!(report.to_string().starts_with("positional: runtime avg=0.020000s"));
    }
}
