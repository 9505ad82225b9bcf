use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashboard_core::{
    Artifact, ArtifactKind, CollectionModel, CollectionState, RefreshOutcome, RefreshTicket,
};
use dashboard_logging::{dashboard_debug, dashboard_info, dashboard_warn};

use crate::{ClientError, ExtractionService, Notification, NotificationSink, Operation};

/// Something the submission coordinator can ask to re-fetch.
#[async_trait::async_trait]
pub trait Refresh: Send + Sync {
    fn kind(&self) -> ArtifactKind;

    async fn refresh(&self) -> Result<RefreshOutcome, ClientError>;
}

/// Owns the snapshot of one remote collection and keeps it in sync.
pub struct CollectionController {
    kind: ArtifactKind,
    service: Arc<dyn ExtractionService>,
    sink: Arc<dyn NotificationSink>,
    model: Mutex<CollectionModel<Artifact>>,
}

impl CollectionController {
    pub fn new(
        kind: ArtifactKind,
        service: Arc<dyn ExtractionService>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            kind,
            service,
            sink,
            model: Mutex::new(CollectionModel::new()),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Fetches a full snapshot and replaces the items with it.
    ///
    /// On failure the previous items stay visible, the loading flag is
    /// cleared and the error goes to the notification sink as well as back
    /// to the caller. Overlapping calls are allowed; only the most recently
    /// started one may change the state. Dropping the returned future
    /// abandons its ticket.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ClientError> {
        let ticket = TicketGuard::begin(&self.model);
        dashboard_debug!("Refreshing {} (ticket {})", self.kind, ticket.sequence());

        match self.service.list_artifacts(self.kind).await {
            Ok(items) => {
                let count = items.len();
                let outcome = ticket.complete(items);
                match outcome {
                    RefreshOutcome::Applied => {
                        dashboard_info!("Loaded {} {} item(s)", count, self.kind)
                    }
                    RefreshOutcome::Superseded => dashboard_debug!(
                        "Dropped a stale {} snapshot; a newer refresh took precedence",
                        self.kind
                    ),
                }
                Ok(outcome)
            }
            Err(err) => {
                let outcome = ticket.fail();
                dashboard_warn!("Refreshing {} failed: {}", self.kind, err);
                if outcome == RefreshOutcome::Applied {
                    self.sink
                        .notify(Notification::new(Operation::list(self.kind), err.to_string()));
                }
                Err(err)
            }
        }
    }

    pub fn current_state(&self) -> CollectionState<Artifact> {
        lock(&self.model).snapshot()
    }
}

/// One outstanding refresh ticket; abandoned on drop unless settled.
struct TicketGuard<'a> {
    model: &'a Mutex<CollectionModel<Artifact>>,
    ticket: RefreshTicket,
    settled: bool,
}

impl<'a> TicketGuard<'a> {
    fn begin(model: &'a Mutex<CollectionModel<Artifact>>) -> Self {
        let ticket = lock(model).begin_refresh();
        Self {
            model,
            ticket,
            settled: false,
        }
    }

    fn sequence(&self) -> u64 {
        self.ticket.sequence()
    }

    fn complete(mut self, items: Vec<Artifact>) -> RefreshOutcome {
        self.settled = true;
        lock(self.model).complete(self.ticket, items)
    }

    fn fail(mut self) -> RefreshOutcome {
        self.settled = true;
        lock(self.model).fail(self.ticket)
    }
}

impl Drop for TicketGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            dashboard_debug!("Refresh ticket {} abandoned", self.ticket.sequence());
            lock(self.model).abandon(self.ticket);
        }
    }
}

fn lock(model: &Mutex<CollectionModel<Artifact>>) -> MutexGuard<'_, CollectionModel<Artifact>> {
    model.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait::async_trait]
impl Refresh for CollectionController {
    fn kind(&self) -> ArtifactKind {
        self.kind
    }

    async fn refresh(&self) -> Result<RefreshOutcome, ClientError> {
        CollectionController::refresh(self).await
    }
}
