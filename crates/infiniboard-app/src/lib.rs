//! Infiniboard Application
//!
//! Headless shell driving the interaction engine from recorded event
//! scripts, exporting SVG, and syncing drawings with the remote webhook.

mod commands;
mod config;
mod error;
mod shortcuts;

pub use commands::{export_svg, list_remote, pull, push, read_script, read_snapshot, replay, run, write_snapshot};
pub use config::{AppConfig, Cli, Command};
pub use error::{AppError, AppResult};
pub use shortcuts::{Shortcut, ShortcutRegistry};
