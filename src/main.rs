use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use picsum_gallery::application::services::ImageUrlBuilder;
use picsum_gallery::infrastructure::{
    AppConfig, CliArgs, HttpImageLoader, ImageLoaderConfig, PicsumClient, StorageManager,
};
use picsum_gallery::presentation::ui::{PreviewSpec, ThumbnailSpec};
use picsum_gallery::presentation::widgets::ImageManager;
use picsum_gallery::presentation::{App, AppOptions};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    // The terminal belongs to the UI, so logs only ever go to a file.
    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn app_options(config: &AppConfig) -> AppOptions {
    let urls = ImageUrlBuilder::new(config.api.image_base_url.clone());
    AppOptions {
        page_size: config.api.page_size,
        thumbnails: ThumbnailSpec {
            urls: urls.clone(),
            width: config.images.thumbnail_width,
            height: config.images.thumbnail_height,
        },
        preview: PreviewSpec {
            urls,
            width: config.images.preview_width,
            height: config.images.preview_height,
            enabled: config.images.preview,
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = picsum_gallery::VERSION, route = %args.route, "Starting Picsum Gallery");

    let source = Arc::new(PicsumClient::new(config.api.clone())?);
    let (image_tx, image_rx) = mpsc::unbounded_channel();
    let loader = Arc::new(HttpImageLoader::new(ImageLoaderConfig::from(&config), &image_tx)?);

    let mut terminal = ratatui::init();
    if config.mouse {
        crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
    }

    // Queried after raw mode is on and before the event stream reads stdin.
    let images = if config.images.preview {
        ImageManager::new()
    } else {
        ImageManager::disabled()
    };

    let app = App::new(
        source,
        loader.clone(),
        image_rx,
        images,
        app_options(&config),
    );
    let result = app.run(&mut terminal, &args.route).await;

    if config.mouse {
        if let Err(e) = crossterm::execute!(std::io::stdout(), DisableMouseCapture) {
            warn!(error = %e, "Failed to disable mouse capture");
        }
    }
    ratatui::restore();

    info!(stats = %loader.memory_cache().stats(), "Image cache statistics");
    result
}
