// Mon Jan 19 2026 - Alex

pub mod cli;
pub mod progress;
pub mod summary;

pub use cli::{Args, Command, CommandHandler};
pub use progress::JobProgress;
