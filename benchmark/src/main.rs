use std::{
    num::{NonZeroU32, NonZeroUsize},
    process::ExitCode,
};

use bench::{BenchConfig, BenchmarkReport};
use clap::Parser;
use ident::CqlIdent;
use itertools::Itertools;
use materializers::{setup_materializer, MaterializationKind};
use rand::{rngs::StdRng, SeedableRng};
use schema::Schema;
use tracing::{error, info};

mod bench;
mod cluster;
mod error;
mod ident;
mod loader;
mod materializers;
mod row;
mod schema;
mod stats;
mod warmup;


use error::Error;

const DEFAULT_NODES: [&str; 3] = ["127.0.0.1:9042", "127.0.0.2:9042", "127.0.0.3:9042"];

/// Measure CQL point-lookup latency under each row materialization strategy.
#[derive(serde::Serialize, clap::Parser, Clone, Debug)]
struct Args {
    /// Contact point as host:port. Repeat for more than one.
    #[clap(long = "node", default_values = DEFAULT_NODES)]
    nodes: Vec<String>,
    #[clap(long, default_value = "row_factory_test")]
    keyspace: CqlIdent,
    #[clap(long, default_value = "sample_data")]
    table: CqlIdent,
    #[clap(long, default_value = "1")]
    replication_factor: NonZeroU32,
    /// Rows to load before benchmarking.
    #[clap(long, default_value = "10000")]
    rows: NonZeroUsize,
    /// Unmeasured passes over every loaded id.
    #[clap(long, default_value = "3")]
    warmup_passes: usize,
    /// Timed iterations per materialization strategy.
    #[clap(long, default_value = "5")]
    iterations: NonZeroUsize,
    /// Ids looked up per iteration. Must not exceed --rows.
    #[clap(long, default_value = "1000")]
    sample_size: NonZeroUsize,
    /// Strategies to benchmark, in order. Repeat for more than one.
    #[clap(
        long = "materialization",
        value_enum,
        default_values_t = MaterializationKind::ALL.to_vec()
    )]
    materializations: Vec<MaterializationKind>,
    /// Seed for the id sampler. Random if unset.
    #[clap(long)]
    seed: Option<u64>,
    /// Also print all reports as JSON on stdout.
    #[clap(long)]
    json: bool,
}

impl Args {
    fn validate(&self) -> Result<(), Error> {
        if self.sample_size > self.rows {
            return Err(Error::Config(format!(
                "--sample-size {} exceeds --rows {}",
                self.sample_size, self.rows
            )));
        }
        Ok(())
    }

    fn schema(&self) -> Schema {
        Schema {
            keyspace: self.keyspace.clone(),
            table: self.table.clone(),
            replication_factor: self.replication_factor,
        }
    }

    fn bench_config(&self) -> BenchConfig {
        BenchConfig {
            iterations: self.iterations,
            sample_size: self.sample_size,
        }
    }
}

#[derive(serde::Serialize)]
struct BenchmarkOutput<'a> {
    args: &'a Args,
    reports: &'a [BenchmarkReport],
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let chain = std::iter::successors(Some(&e as &dyn std::error::Error), |e| e.source())
                .join(": ");
            error!("benchmark failed: {chain}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    args.validate()?;

    // one query in flight at a time, so no worker threads
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    let reports = rt.block_on(run_pipeline(args))?;

    if args.json {
        let output = BenchmarkOutput {
            args,
            reports: &reports,
        };
        println!("{}", serde_json::to_string(&output)?);
    }
    Ok(())
}

async fn run_pipeline(args: &Args) -> Result<Vec<BenchmarkReport>, Error> {
    let session = cluster::connect(&args.nodes).await?;

    let schema = args.schema();
    schema.ensure(&session).await?;
    let statements = schema.prepare_statements(&session).await?;

    let ids = loader::load(&session, &schema, &statements, args.rows).await?;

    warmup::warm_up(&session, &statements, &ids, args.warmup_passes).await?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut reports = Vec::with_capacity(args.materializations.len());
    for kind in &args.materializations {
        let materializer = setup_materializer(*kind);
        let report = bench::run_benchmark(
            &session,
            &statements,
            &ids,
            materializer.as_ref(),
            args.bench_config(),
            &mut rng,
        )
        .await?;
        reports.push(report);
    }

    for report in &reports {
        info!("{report}");
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_run() {
        let args = Args::try_parse_from(["cql-row-bench"]).unwrap();
        assert_eq!(args.nodes, DEFAULT_NODES);
        assert_eq!(args.keyspace.as_str(), "row_factory_test");
        assert_eq!(args.table.as_str(), "sample_data");
        assert_eq!(args.replication_factor.get(), 1);
        assert_eq!(args.rows.get(), 10_000);
        assert_eq!(args.warmup_passes, 3);
        assert_eq!(args.iterations.get(), 5);
        assert_eq!(args.sample_size.get(), 1_000);
        assert_eq!(args.materializations, MaterializationKind::ALL);
        assert_eq!(args.seed, None);
        assert!(!args.json);
        args.validate().unwrap();
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "cql-row-bench",
            "--node",
            "10.0.0.1:9042",
            "--rows",
            "200",
            "--sample-size",
            "20",
            "--materialization",
            "unordered-map",
            "--materialization",
            "named-fields",
            "--seed",
            "9",
        ])
        .unwrap();
        assert_eq!(args.nodes, ["10.0.0.1:9042"]);
        assert_eq!(
            args.materializations,
            [
                MaterializationKind::UnorderedMap,
                MaterializationKind::NamedFields
            ]
        );
        assert_eq!(args.seed, Some(9));
        args.validate().unwrap();
    }

    #[test]
    fn rejects_bad_identifiers_and_zero_counts() {
        assert!(Args::try_parse_from(["cql-row-bench", "--keyspace", "ks; DROP"]).is_err());
        assert!(Args::try_parse_from(["cql-row-bench", "--table", "9lives"]).is_err());
        assert!(Args::try_parse_from(["cql-row-bench", "--iterations", "0"]).is_err());
        assert!(Args::try_parse_from(["cql-row-bench", "--sample-size", "0"]).is_err());
    }

    #[test]
    fn sample_larger_than_table_is_a_config_error() {
        let args =
            Args::try_parse_from(["cql-row-bench", "--rows", "10", "--sample-size", "11"]).unwrap();
        assert!(matches!(args.validate(), Err(Error::Config(_))));
    }
}
