//! Async image loading orchestrator.
//!
//! Serves decoded images from the memory cache when possible and otherwise
//! downloads and decodes them on a bounded worker pool.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, trace};

use crate::domain::entities::{ImageId, ImageSource, LoadedImage};
use crate::domain::ports::{CacheError, CacheResult, ImageLoadedEvent, ImageLoaderPort, LoadTicket};
use crate::infrastructure::config::AppConfig;

use super::memory_cache::MemoryImageCache;

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct ImageLoaderConfig {
    /// Maximum images in memory cache.
    pub memory_cache_size: usize,
    /// Maximum concurrent downloads.
    pub max_concurrent_downloads: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            memory_cache_size: 64,
            max_concurrent_downloads: 4,
            timeout_secs: 30,
        }
    }
}

impl From<&AppConfig> for ImageLoaderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            memory_cache_size: config.images.memory_cache_size,
            max_concurrent_downloads: config.images.max_concurrent_downloads.max(1),
            timeout_secs: config.api.timeout_secs,
        }
    }
}

#[derive(Debug)]
enum LoaderCommand {
    Load(LoadTicket),
    Cancel(LoadTicket),
}

/// Tickets whose completion should still be delivered.
type Attached = Arc<Mutex<HashSet<LoadTicket>>>;

/// Loads images over HTTP and reports completions on a channel.
pub struct HttpImageLoader {
    memory_cache: Arc<MemoryImageCache>,
    attached: Attached,
    request_tx: mpsc::UnboundedSender<LoaderCommand>,
    event_tx: mpsc::UnboundedSender<ImageLoadedEvent>,
    config: ImageLoaderConfig,
}

impl std::fmt::Debug for HttpImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// State for the background worker loop.
struct WorkerState {
    memory_cache: Arc<MemoryImageCache>,
    attached: Attached,
    event_tx: mpsc::UnboundedSender<ImageLoadedEvent>,
    http_client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    request_rx: mpsc::UnboundedReceiver<LoaderCommand>,
}

impl HttpImageLoader {
    /// Creates a new image loader and spawns its worker.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        config: ImageLoaderConfig,
        event_tx: &mpsc::UnboundedSender<ImageLoadedEvent>,
    ) -> CacheResult<Self> {
        let memory_cache = Arc::new(MemoryImageCache::new(config.memory_cache_size));

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CacheError::NetworkError(format!("Failed to create HTTP client: {e}")))?;

        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let attached: Attached = Arc::new(Mutex::new(HashSet::new()));

        let worker_state = WorkerState {
            memory_cache: memory_cache.clone(),
            attached: attached.clone(),
            event_tx: event_tx.clone(),
            http_client,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_downloads.max(1))),
            request_rx,
        };

        tokio::spawn(Self::run_worker_loop(worker_state));

        Ok(Self {
            memory_cache,
            attached,
            request_tx,
            event_tx: event_tx.clone(),
            config,
        })
    }

    /// Worker loop to handle download requests and throttling.
    async fn run_worker_loop(mut state: WorkerState) {
        let mut queue: VecDeque<LoadTicket> = VecDeque::new();

        loop {
            tokio::select! {
                cmd = state.request_rx.recv() => {
                    match cmd {
                        Some(LoaderCommand::Load(ticket)) => {
                            if !queue.contains(&ticket) {
                                // Newest requests first, they are what is on screen.
                                queue.push_front(ticket);
                            }
                        }
                        Some(LoaderCommand::Cancel(ticket)) => {
                            queue.retain(|queued| *queued != ticket);
                        }
                        None => break,
                    }
                }
                Ok(permit) = state.semaphore.clone().acquire_owned(), if !queue.is_empty() => {
                    let Some(ticket) = queue.pop_front() else {
                        continue;
                    };
                    if !state.attached.lock().contains(&ticket) {
                        trace!(url = %ticket.url, "Skipping detached load");
                        continue;
                    }

                    let memory_cache = state.memory_cache.clone();
                    let attached = state.attached.clone();
                    let event_tx = state.event_tx.clone();
                    let http_client = state.http_client.clone();

                    tokio::spawn(async move {
                        let result = fetch_image(&http_client, &memory_cache, &ticket.url).await;
                        deliver(&attached, &event_tx, ticket, result);
                        drop(permit);
                    });
                }
            }
        }

        debug!("Image loader worker stopped");
    }

    /// Shared memory cache.
    #[must_use]
    pub fn memory_cache(&self) -> &MemoryImageCache {
        &self.memory_cache
    }

    /// Number of loads whose completion is still expected.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.attached.lock().len()
    }
}

impl ImageLoaderPort for HttpImageLoader {
    fn load(&self, ticket: LoadTicket) {
        self.attached.lock().insert(ticket.clone());

        let id = ImageId::from_url(&ticket.url);
        if let Some(image) = self.memory_cache.get(&id) {
            let loaded = LoadedImage {
                id,
                image,
                source: ImageSource::MemoryCache,
            };
            deliver(&self.attached, &self.event_tx, ticket, Ok(loaded));
            return;
        }

        if let Err(e) = self.request_tx.send(LoaderCommand::Load(ticket)) {
            error!("Failed to send load request: {}", e);
        }
    }

    fn detach(&self, ticket: &LoadTicket) {
        if self.attached.lock().remove(ticket) {
            trace!(url = %ticket.url, "Detached image load");
        }
        if let Err(e) = self.request_tx.send(LoaderCommand::Cancel(ticket.clone())) {
            error!("Failed to send cancel request: {}", e);
        }
    }
}

/// Sends the completion unless the ticket was detached in the meantime.
fn deliver(
    attached: &Attached,
    event_tx: &mpsc::UnboundedSender<ImageLoadedEvent>,
    ticket: LoadTicket,
    result: CacheResult<LoadedImage>,
) {
    if !attached.lock().remove(&ticket) {
        trace!(url = %ticket.url, "Dropping completion of detached load");
        return;
    }
    let _ = event_tx.send(ImageLoadedEvent { ticket, result });
}

async fn fetch_image(
    http_client: &reqwest::Client,
    memory_cache: &MemoryImageCache,
    url: &str,
) -> CacheResult<LoadedImage> {
    let id = ImageId::from_url(url);
    if let Some(image) = memory_cache.get(&id) {
        return Ok(LoadedImage {
            id,
            image,
            source: ImageSource::MemoryCache,
        });
    }

    debug!(id = %id, url = %url, "Downloading image from network");
    let bytes = download(http_client, url).await?;

    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| CacheError::DecodeError(format!("Decode task panicked: {e}")))?
        .map_err(|e| CacheError::DecodeError(format!("Failed to decode image: {e}")))?;

    let image = Arc::new(decoded);
    memory_cache.put(id.clone(), image.clone());

    Ok(LoadedImage {
        id,
        image,
        source: ImageSource::Network,
    })
}

/// Downloads image bytes from a URL.
async fn download(http_client: &reqwest::Client, url: &str) -> CacheResult<Bytes> {
    let response = http_client
        .get(url)
        .send()
        .await
        .map_err(|e| CacheError::NetworkError(format!("Request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(CacheError::NetworkError(format!(
            "HTTP {}: {}",
            response.status(),
            response.status().canonical_reason().unwrap_or("Unknown")
        )));
    }

    response
        .bytes()
        .await
        .map_err(|e| CacheError::NetworkError(format!("Failed to read body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TrackerId;

    fn ticket(url: &str) -> LoadTicket {
        LoadTicket {
            tracker: TrackerId::next(),
            generation: 1,
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_cached_image_is_delivered_from_memory() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = HttpImageLoader::new(ImageLoaderConfig::default(), &tx).unwrap();
        let url = "http://127.0.0.1:9/id/1/600/400";
        loader.memory_cache().put(
            ImageId::from_url(url),
            Arc::new(image::DynamicImage::new_rgb8(6, 4)),
        );

        let ticket = ticket(url);
        loader.load(ticket.clone());

        let event = rx.try_recv().expect("completion delivered");
        assert_eq!(event.ticket, ticket);
        let loaded = event.result.expect("loaded");
        assert_eq!(loaded.source, ImageSource::MemoryCache);
        assert_eq!(loader.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_detached_ticket_is_never_delivered() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = HttpImageLoader::new(ImageLoaderConfig::default(), &tx).unwrap();

        let ticket = ticket("http://127.0.0.1:9/id/2/600/400");
        loader.attached.lock().insert(ticket.clone());
        loader.detach(&ticket);

        deliver(
            &loader.attached,
            &loader.event_tx,
            ticket,
            Err(CacheError::NetworkError("late".to_string())),
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_completion_is_delivered_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = HttpImageLoader::new(ImageLoaderConfig::default(), &tx).unwrap();

        let ticket = ticket("http://127.0.0.1:9/id/3/600/400");
        loader.attached.lock().insert(ticket.clone());

        for _ in 0..2 {
            deliver(
                &loader.attached,
                &loader.event_tx,
                ticket.clone(),
                Err(CacheError::NetworkError("HTTP 404".to_string())),
            );
        }

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
