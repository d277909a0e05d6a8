use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sluice_core::PipelineConfig;

/// Command-line and environment configuration for the `sluice` binary.
///
/// Defaults reproduce the reference run: 4 workers, 20 tasks, both channels
/// sized to the task count, 100 ms of simulated work per task.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sluice",
    version,
    about = "Run a batch of tasks through a worker pool into a single sink"
)]
pub struct CliArgs {
    /// Number of concurrent workers.
    #[arg(short, long, env = "SLUICE_WORKERS", default_value_t = PipelineConfig::DEFAULT_WORKERS)]
    pub workers: usize,

    /// Number of tasks to generate (`data_item_1` ..= `data_item_N`).
    #[arg(short, long, env = "SLUICE_TASKS", default_value_t = PipelineConfig::DEFAULT_TASKS)]
    pub tasks: usize,

    /// Work queue capacity. Defaults to the task count.
    #[arg(long, env = "SLUICE_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Result channel capacity. Defaults to the task count.
    #[arg(long, env = "SLUICE_RESULT_CAPACITY")]
    pub result_capacity: Option<usize>,

    /// File the results are written to.
    #[arg(short, long, env = "SLUICE_OUTPUT", default_value_t = String::from("output.txt"))]
    pub output: String,

    /// Simulated processing time per task, in milliseconds.
    #[arg(long, env = "SLUICE_DELAY_MS", default_value_t = 100)]
    pub delay_ms: u64,

    /// Print the run summary as JSON on stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl TryFrom<&CliArgs> for PipelineConfig {
    type Error = anyhow::Error;

    fn try_from(args: &CliArgs) -> Result<Self, Self::Error> {
        // Zero tasks still needs a usable channel.
        let derived = args.tasks.max(1);
        let config = PipelineConfig {
            worker_count: args.workers,
            task_count: args.tasks,
            queue_capacity: args.queue_capacity.unwrap_or(derived),
            result_capacity: args.result_capacity.unwrap_or(derived),
            sink_target: args.output.clone(),
            process_delay: Duration::from_millis(args.delay_ms),
        };
        config.validate().context("invalid arguments")?;
        Ok(config)
    }
}
