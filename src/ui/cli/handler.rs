// Mon Jan 19 2026 - Alex

use super::args::{Args, Command, PlanArgs, ScanArgs, ScanOptions};
use crate::config::ScanConfig;
use crate::engine::Engine;
use crate::orchestration::finalizer::default_stem;
use crate::orchestration::OutputFinalizer;
use crate::seismic::{GatherSet, SuReader};
use crate::ui::progress::JobProgress;
use crate::ui::summary;
use crate::utils::{format_bytes, LoggingUtils, ScopedTimer};
use anyhow::Context;
use colored::Colorize;
use std::sync::Arc;
use std::time::Instant;

pub struct CommandHandler {
    quiet: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    pub fn execute(&mut self, args: Args) -> anyhow::Result<()> {
        self.quiet = args.quiet;
        if args.no_color {
            colored::control::set_override(false);
        }

        self.setup_logging(&args);

        match args.command {
            Command::Scan(scan_args) => self.handle_scan(scan_args),
            Command::Plan(plan_args) => self.handle_plan(plan_args),
        }
    }

    fn setup_logging(&self, args: &Args) {
        LoggingUtils::init_logger(LoggingUtils::level_from_str(&args.log_level));
    }

    fn load_gathers(&self, options: &ScanOptions) -> anyhow::Result<(ScanConfig, Arc<GatherSet>)> {
        let config = options.to_config().context("Invalid scan configuration")?;

        let _timer = ScopedTimer::new("load gathers");
        let reader = SuReader::open(&options.input)
            .with_context(|| format!("Failed to open {}", options.input.display()))?;
        log::info!("Reading {} ({})", options.input.display(), format_bytes(reader.len_bytes() as u64));

        let traces = reader
            .read_traces()
            .with_context(|| format!("Failed to read {}", options.input.display()))?;
        let gathers = GatherSet::from_traces(traces, &config).context("Failed to build gathers")?;

        Ok((config, Arc::new(gathers)))
    }

    fn handle_scan(&self, args: ScanArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;
        let started = Instant::now();

        let (config, gathers) = self.load_gathers(&args.options)?;
        let mut engine = Engine::new(config).context("Failed to set up the scan")?;
        let units = engine.plan(&gathers).len();

        if !self.quiet {
            println!(
                "{} Scanning {} gathers in {} units",
                "[*]".blue(),
                gathers.len(),
                units
            );
        }

        let mut progress = JobProgress::new(units as u64, !self.quiet && !args.no_progress);
        let cubes = match engine.run_with_observer(gathers.clone(), |r| progress.record(r)) {
            Ok(cubes) => {
                progress.finish();
                cubes
            }
            Err(e) => {
                progress.abandon();
                return Err(e).context("Scan failed");
            }
        };

        let stem = args.output.unwrap_or_else(|| default_stem(&args.options.input));
        let paths = {
            let _timer = ScopedTimer::new("write cubes");
            OutputFinalizer::new(stem)
                .finalize(&gathers, &cubes)
                .context("Failed to write output cubes")?
        };

        if !self.quiet {
            summary::print_statistics(engine.statistics(), started.elapsed());
            summary::print_outputs(&paths);
        }
        Ok(())
    }

    fn handle_plan(&self, args: PlanArgs) -> anyhow::Result<()> {
        let (config, gathers) = self.load_gathers(&args.options)?;
        let engine = Engine::new(config).context("Failed to set up the scan")?;
        let plan = engine.plan(&gathers);

        summary::print_plan(&plan, gathers.len(), args.summary);
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
