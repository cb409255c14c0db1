use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "picsum-gallery",
    version,
    about = "A terminal photo gallery for the Picsum image API",
    long_about = None
)]
pub struct CliArgs {
    /// Initial route, e.g. `/photos` or `/photos/237`.
    #[arg(default_value = "/")]
    pub route: String,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable mouse support.
    #[arg(long)]
    pub mouse: Option<bool>,

    /// Photos requested per page.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: Option<u32>,

    /// Render photo previews in the detail view.
    #[arg(long)]
    pub preview: Option<bool>,
}
