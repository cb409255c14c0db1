use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::application::services::{DetailOutcome, DetailRequest, PageRequest};
use crate::domain::entities::{Photo, PhotoId};
use crate::domain::errors::PhotoApiError;
use crate::domain::ports::PhotoSourcePort;

/// Results delivered back to the UI loop.
#[derive(Debug)]
pub enum Action {
    PageLoaded {
        generation: u64,
        result: Result<Vec<Photo>, PhotoApiError>,
    },
    DetailLoaded {
        id: PhotoId,
        generation: u64,
        outcome: DetailOutcome,
    },
}

#[derive(Debug)]
pub enum BackendCommand {
    LoadPage(PageRequest),
    LoadDetail(DetailRequest),
}

/// Runs remote lookups off the UI loop.
///
/// Every command runs on its own task, so responses may come back in any
/// order; the receiving controllers discard the stale ones.
pub struct Backend {
    source: Arc<dyn PhotoSourcePort>,
    command_rx: mpsc::UnboundedReceiver<BackendCommand>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Backend {
    pub fn new(
        source: Arc<dyn PhotoSourcePort>,
        command_rx: mpsc::UnboundedReceiver<BackendCommand>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            source,
            command_rx,
            action_tx,
        }
    }

    pub async fn run(mut self) {
        info!("Backend worker started");
        while let Some(command) = self.command_rx.recv().await {
            self.spawn_command(command);
        }
        info!("Backend worker stopped");
    }

    fn spawn_command(&self, command: BackendCommand) {
        let source = self.source.clone();
        let action_tx = self.action_tx.clone();

        tokio::spawn(async move {
            let action = Self::execute(source.as_ref(), command).await;
            let _ = action_tx.send(action);
        });
    }

    async fn execute(source: &dyn PhotoSourcePort, command: BackendCommand) -> Action {
        match command {
            BackendCommand::LoadPage(request) => {
                debug!(page = request.page, limit = request.limit, "Loading photo page");
                let result = source.list_photos(request.page, request.limit).await;
                Action::PageLoaded {
                    generation: request.generation,
                    result,
                }
            }
            BackendCommand::LoadDetail(request) => {
                debug!(id = %request.id, "Loading photo detail");
                let outcome = DetailOutcome::fetch(source, &request.id).await;
                Action::DetailLoaded {
                    id: request.id,
                    generation: request.generation,
                    outcome,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PhotoMeta;
    use crate::domain::ports::mocks::MockPhotoSourcePort;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_page_command_carries_generation() {
        let mut source = MockPhotoSourcePort::new();
        source
            .expect_list_photos()
            .with(eq(2), eq(9))
            .returning(|_, _| Ok(Vec::new()));

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        tokio::spawn(Backend::new(Arc::new(source), command_rx, action_tx).run());

        command_tx
            .send(BackendCommand::LoadPage(PageRequest {
                page: 2,
                limit: 9,
                generation: 7,
            }))
            .unwrap();

        match action_rx.recv().await {
            Some(Action::PageLoaded { generation, result }) => {
                assert_eq!(generation, 7);
                assert!(result.unwrap().is_empty());
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_detail_command_settles_both_lookups() {
        let mut source = MockPhotoSourcePort::new();
        source
            .expect_fetch_photo_detail()
            .returning(|id| Err(PhotoApiError::not_found(id.as_str())));
        source
            .expect_fetch_photo_meta()
            .returning(|_| Ok(PhotoMeta::new(Some("t".to_string()), None)));

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        tokio::spawn(Backend::new(Arc::new(source), command_rx, action_tx).run());

        command_tx
            .send(BackendCommand::LoadDetail(DetailRequest {
                id: PhotoId::new("5"),
                generation: 3,
            }))
            .unwrap();

        match action_rx.recv().await {
            Some(Action::DetailLoaded {
                id,
                generation,
                outcome,
            }) => {
                assert_eq!(id, PhotoId::new("5"));
                assert_eq!(generation, 3);
                assert!(outcome.photo.is_err());
                assert!(outcome.meta.is_ok());
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
