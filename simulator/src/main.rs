use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{Runner, WorkflowResult};

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic hand-gesture overlay driver")]
struct Args {
    /// Run a bounded headless session and append a summary to the offline log
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 640)]
    width: u32,
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// Frames to render before stopping (ignored with --serve)
    #[arg(long, default_value_t = 120)]
    frames: usize,
    /// Write the latest gesture data to this JSON file
    #[arg(long)]
    sync_file: Option<PathBuf>,
    /// Serve the overlay to the visualizer until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn summary(result: &WorkflowResult) -> String {
    let hands = result
        .last_report
        .as_ref()
        .map(|report| {
            report
                .hands
                .iter()
                .map(|hand| hand.label.as_str())
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .unwrap_or_default();
    format!(
        "ready={} ticks={} detections={} deduplicated={} detector_errors={} hands_drawn={} last=[{}]",
        result.detector_ready,
        result.ticks,
        result.metrics.detector_calls,
        result.metrics.deduplicated,
        result.metrics.detector_errors,
        result.metrics.hands_drawn,
        hands
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.width, args.height, args.frames)
    };
    if args.sync_file.is_some() {
        workflow_config.sync_file = args.sync_file;
    }

    let runner = Runner::new(workflow_config);
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating overlay runtime")?;

    if args.serve {
        let bridge = GuiBridge::new();
        bridge.serve(gui_bind_address());
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let result = runtime.block_on(runner.execute_until(Some(&bridge), None, async {
            if let Err(err) = signal::ctrl_c().await {
                warn!("failed to listen for Ctrl+C: {}", err);
                std::future::pending::<()>().await;
            }
        }))?;
        info!("{}", summary(&result));
        return Ok(());
    }

    let frames = runner.config().frames;
    let result = runtime.block_on(runner.execute(None, Some(frames)))?;
    let line = summary(&result);
    println!("Overlay run -> {}", line);

    if args.offline {
        let report_path = PathBuf::from("tools/data/offline_overlay.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening {}", report_path.display()))?;
        writeln!(file, "{}", line)?;
    }

    Ok(())
}
