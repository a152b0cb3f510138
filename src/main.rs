// Tue Jan 13 2026 - Alex

use colored::Colorize;

fn main() {
    if let Err(e) = cmp_semblance::ui::cli::run() {
        eprintln!("{} {}", "[!]".red(), e);
        for cause in e.chain().skip(1) {
            eprintln!("    {} {}", "caused by:".dimmed(), cause);
        }
        std::process::exit(1);
    }
}
