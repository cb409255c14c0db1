//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::services::image_url::{
    DEFAULT_IMAGE_BASE_URL, DEFAULT_THUMBNAIL_HEIGHT, DEFAULT_THUMBNAIL_WIDTH,
};
use crate::application::services::paginated_list::DEFAULT_PAGE_SIZE;

pub(crate) const APP_NAME: &str = "picsum-gallery";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "picsum-gallery";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded from TOML and overridden by CLI flags.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Enable mouse support.
    #[serde(default = "default_true")]
    pub mouse: bool,

    /// Remote endpoints.
    #[serde(default)]
    pub api: ApiConfig,

    /// Image loading.
    #[serde(default)]
    pub images: ImagesConfig,
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Paged photo listing endpoint.
    #[serde(default = "default_list_url")]
    pub list_url: String,

    /// Prefix of the per-photo info endpoint (`{info_url}/{id}/info`).
    #[serde(default = "default_info_url")]
    pub info_url: String,

    /// Prefix of the metadata endpoint (`{meta_url}/{n}`).
    #[serde(default = "default_meta_url")]
    pub meta_url: String,

    /// Image host used for thumbnails.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Photos per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Number of records in the metadata corpus; photo ids are mapped onto
    /// `1..=meta_corpus_size`.
    #[serde(default = "default_meta_corpus_size")]
    pub meta_corpus_size: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            list_url: default_list_url(),
            info_url: default_info_url(),
            meta_url: default_meta_url(),
            image_base_url: default_image_base_url(),
            page_size: DEFAULT_PAGE_SIZE,
            meta_corpus_size: default_meta_corpus_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Image loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Render the photo preview in the detail view.
    #[serde(default = "default_true")]
    pub preview: bool,

    /// Maximum decoded images kept in memory.
    #[serde(default = "default_memory_cache_size")]
    pub memory_cache_size: usize,

    /// Maximum concurrent image downloads.
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,

    /// Thumbnail width requested for grid cards.
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,

    /// Thumbnail height requested for grid cards.
    #[serde(default = "default_thumbnail_height")]
    pub thumbnail_height: u32,

    /// Width requested for the detail preview.
    #[serde(default = "default_preview_width")]
    pub preview_width: u32,

    /// Height requested for the detail preview.
    #[serde(default = "default_preview_height")]
    pub preview_height: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            preview: true,
            memory_cache_size: default_memory_cache_size(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            thumbnail_height: DEFAULT_THUMBNAIL_HEIGHT,
            preview_width: default_preview_width(),
            preview_height: default_preview_height(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_list_url() -> String {
    "https://picsum.photos/v2/list".to_string()
}

fn default_info_url() -> String {
    "https://picsum.photos/id".to_string()
}

fn default_meta_url() -> String {
    "https://dummyjson.com/posts".to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_meta_corpus_size() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_memory_cache_size() -> usize {
    64
}

fn default_max_concurrent_downloads() -> usize {
    4
}

fn default_thumbnail_width() -> u32 {
    DEFAULT_THUMBNAIL_WIDTH
}

fn default_thumbnail_height() -> u32 {
    DEFAULT_THUMBNAIL_HEIGHT
}

fn default_preview_width() -> u32 {
    1200
}

fn default_preview_height() -> u32 {
    800
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(mouse) = args.mouse {
            self.mouse = mouse;
        }
        if let Some(page_size) = args.page_size {
            self.api.page_size = page_size;
        }
        if let Some(preview) = args.preview {
            self.images.preview = preview;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("picsum-gallery.log"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            mouse: true,
            api: ApiConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [api]
            page_size = 12
            meta_corpus_size = 100

            [images]
            preview = false
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.api.page_size, 12);
        assert_eq!(config.api.meta_corpus_size, 100);
        assert_eq!(config.api.list_url, "https://picsum.photos/v2/list");
        assert!(!config.images.preview);
        assert_eq!(config.images.thumbnail_width, 600);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert!(config.mouse);
        assert_eq!(config.api.page_size, 9);
        assert_eq!(config.api.meta_corpus_size, 30);
        assert_eq!(config.images.thumbnail_height, 400);
    }

    #[test]
    fn test_merge_with_args() {
        let args = CliArgs::parse_from([
            "picsum-gallery",
            "--page-size",
            "20",
            "--log-level",
            "trace",
            "--preview",
            "false",
        ]);
        let mut config = AppConfig::default();
        config.merge_with_args(&args);

        assert_eq!(config.api.page_size, 20);
        assert_eq!(config.log_level, LogLevel::Trace);
        assert!(!config.images.preview);
        assert!(config.mouse);
    }
}
