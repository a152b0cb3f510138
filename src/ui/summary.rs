// Mon Jan 19 2026 - Alex

use crate::engine::{JobStatistics, UnitKey};
use crate::utils::{format_duration, pluralize};
use colored::Colorize;
use std::path::PathBuf;

pub fn print_statistics(stats: &JobStatistics, elapsed: std::time::Duration) {
    println!();
    println!("{}", "Scan summary".cyan().bold());
    println!("{}", "=".repeat(40).cyan());
    println!("  Units:      {}", stats.units);
    println!("  Succeeded:  {}", stats.success_count.to_string().green());
    if stats.error_count > 0 {
        println!("  Failed:     {}", stats.error_count.to_string().red());
    }
    if stats.retry_count > 0 {
        println!("  Retries:    {}", stats.retry_count.to_string().yellow());
    }
    if stats.discarded_count > 0 {
        println!("  Discarded:  {}", stats.discarded_count.to_string().yellow());
    }
    println!("  Samples:    {}", stats.samples);
    println!("  Avg unit:   {}", format_duration(stats.average_duration()));
    if let Some((key, duration)) = stats.slowest {
        println!("  Slowest:    {} ({})", key, format_duration(duration));
    }
    println!("  Wall time:  {}", format_duration(elapsed));
}

pub fn print_outputs(paths: &[PathBuf]) {
    for path in paths {
        println!("{} {}", "[+]".green(), path.display());
    }
}

pub fn print_plan(keys: &[UnitKey], gathers: usize, summary_only: bool) {
    if !summary_only {
        for key in keys {
            println!("{}", key);
        }
    }
    println!(
        "{} {} across {}",
        "[*]".blue(),
        pluralize(keys.len(), "unit", "units"),
        pluralize(gathers, "gather", "gathers")
    );
}
