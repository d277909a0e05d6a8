mod config;
mod telemetry;

use std::sync::Arc;

use clap::Parser;
use sluice_core::impls::{FileSinkFactory, UppercaseProcessor};
use sluice_core::{PipelineConfig, run_pipeline};

use crate::config::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    telemetry::init_logging()?;

    let config = PipelineConfig::try_from(&args)?;
    let processor = Arc::new(UppercaseProcessor::new(config.process_delay));
    let sink = Arc::new(FileSinkFactory::new(&config.sink_target));

    let summary = run_pipeline(config, processor, sink).await?;

    if summary.dropped > 0 {
        tracing::warn!(
            failed = summary.failed,
            write_failures = summary.write_failures,
            "{} of {} tasks produced no output line",
            summary.dropped,
            summary.submitted
        );
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
