// Mon Jan 19 2026 - Alex

use crate::config::{ConfigError, ScanConfig};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cmp-semblance")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "CMP velocity analysis by semblance scan", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan every gather and write the stack, semblance and velocity cubes.
    Scan(ScanArgs),
    /// Print the work units a scan would run, without computing them.
    Plan(PlanArgs),
}

/// Input and scan parameters shared by every subcommand. Flags override
/// values from `--config`, which override the defaults.
#[derive(ClapArgs, Debug, Clone)]
pub struct ScanOptions {
    /// Seismic Unix input file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON scan configuration.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First candidate velocity.
    #[arg(long)]
    pub v_ini: Option<f64>,

    /// Upper bound of the velocity range (not scanned itself).
    #[arg(long)]
    pub v_fin: Option<f64>,

    /// Number of velocity steps.
    #[arg(long)]
    pub v_int: Option<usize>,

    /// Semblance window in seconds.
    #[arg(short, long)]
    pub window: Option<f64>,

    #[arg(long)]
    pub aperture: Option<f64>,

    /// Azimuth in radians.
    #[arg(long)]
    pub azimuth: Option<f64>,

    #[arg(long)]
    pub target_cdp: Option<i32>,

    /// Samples per work unit; whole gathers when omitted.
    #[arg(long)]
    pub chunk_size: Option<usize>,

    #[arg(long)]
    pub neighbor_radius: Option<f64>,

    #[arg(short, long)]
    pub threads: Option<usize>,

    #[arg(long)]
    pub max_retries: Option<u32>,
}

#[derive(ClapArgs, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub options: ScanOptions,

    /// Output path stem; defaults to the input path without its extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub no_progress: bool,
}

#[derive(ClapArgs, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub options: ScanOptions,

    /// Only print the unit count.
    #[arg(long)]
    pub summary: bool,
}

impl ScanOptions {
    pub fn to_config(&self) -> Result<ScanConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => ScanConfig::load(path)?,
            None => ScanConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, mut config: ScanConfig) -> ScanConfig {
        if let Some(v) = self.v_ini {
            config.v_ini = v;
        }
        if let Some(v) = self.v_fin {
            config.v_fin = v;
        }
        if let Some(v) = self.v_int {
            config.v_int = v;
        }
        if let Some(w) = self.window {
            config.window = w;
        }
        if let Some(a) = self.aperture {
            config.aperture = a;
        }
        if let Some(a) = self.azimuth {
            config.azimuth = a;
        }
        if self.target_cdp.is_some() {
            config.target_cdp = self.target_cdp;
        }
        if self.chunk_size.is_some() {
            config.chunk_size = self.chunk_size;
        }
        if self.neighbor_radius.is_some() {
            config.neighbor_radius = self.neighbor_radius;
        }
        if let Some(t) = self.threads {
            config.threads = t;
        }
        if let Some(r) = self.max_retries {
            config.max_retries = r;
        }
        config
    }
}

impl ScanArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.options.input.exists() {
            return Err(format!("Input file does not exist: {:?}", self.options.input));
        }
        Ok(())
    }
}
