// Sun Jan 18 2026 - Alex

use log::LevelFilter;
use std::time::Instant;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs `env_logger` at `level`, without timestamps. `RUST_LOG` still
    /// refines per-module filters on top of it.
    pub fn init_logger(level: LevelFilter) {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp(None)
            .try_init();
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }
}

/// Logs the time spent between construction and drop at debug level.
pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::debug!("[TIMER] {} started", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!("[TIMER] {} took {:.2}ms", self.name, self.elapsed_ms());
    }
}

pub fn scoped_timer(name: &str) -> ScopedTimer {
    ScopedTimer::new(name)
}
