//! Mutation pipeline
//!
//! validate → persist (async, may fail) → apply to the entity store.
//!
//! The store is only touched after the backend confirms, so a failed save
//! leaves it exactly as it was. Mutations on the same ticket go through a
//! FIFO queue: one issued later is always applied after one issued earlier,
//! which keeps a slow older save from overwriting a newer one.

mod queue;

use crate::backend::TicketBackend;
use crate::core::{
    AuthorRole, Comment, FilterCriteria, NewTicket, Status, Ticket, TicketId, TicketPatch,
    ValidationRules,
};
use crate::error::{DeskError, Result};
use crate::integration::EventBus;
use crate::storage::{TicketRepository, TicketStore};
use queue::TicketQueue;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Entity store shared between the pipeline and the views
pub type SharedStore = Arc<RwLock<TicketStore>>;

pub(crate) fn read_store(store: &SharedStore) -> Result<RwLockReadGuard<'_, TicketStore>> {
    store
        .read()
        .map_err(|_| DeskError::persistence("ticket store lock poisoned"))
}

pub(crate) fn write_store(store: &SharedStore) -> Result<RwLockWriteGuard<'_, TicketStore>> {
    store
        .write()
        .map_err(|_| DeskError::persistence("ticket store lock poisoned"))
}

/// Who is making changes in this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub role: AuthorRole,
}

/// Applies validated mutations through the backend into the store
pub struct MutationPipeline {
    backend: Arc<dyn TicketBackend>,
    store: SharedStore,
    rules: ValidationRules,
    events: EventBus,
    queue: TicketQueue,
}

impl std::fmt::Debug for MutationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationPipeline")
            .field("backend", &"Arc<dyn TicketBackend>")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl MutationPipeline {
    pub fn new(
        backend: Arc<dyn TicketBackend>,
        store: SharedStore,
        rules: ValidationRules,
        events: EventBus,
    ) -> Self {
        Self {
            backend,
            store,
            rules,
            events,
            queue: TicketQueue::default(),
        }
    }

    #[must_use]
    pub const fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Persists `patch` and applies it to the store
    pub async fn update_ticket(&self, id: &TicketId, patch: TicketPatch) -> Result<Ticket> {
        let result = self.try_update(id, &patch).await;
        self.report(id, result)
    }

    /// Appends a comment by `author`
    ///
    /// Blank text fails validation before the backend is contacted.
    pub async fn add_comment(&self, id: &TicketId, author: &Author, text: &str) -> Result<Ticket> {
        if let Err(err) = self.rules.check_comment(text) {
            return self.report(id, Err(err));
        }
        let comment = Comment::new(author.name.clone(), author.role, text.trim());
        let comment_id = comment.id.clone();
        let ticket = self.update_ticket(id, TicketPatch::comment(comment)).await?;
        self.events.comment_added(id, &comment_id);
        Ok(ticket)
    }

    /// Persists a status the board has already applied optimistically
    ///
    /// Goes through the same per-ticket lane as [`Self::update_ticket`]. On
    /// success the saved record replaces the local one, unless the ticket has
    /// been moved elsewhere since. On failure the caller owns the rollback.
    pub async fn persist_move(&self, id: &TicketId, status: Status) -> Result<()> {
        let slot = self.queue.enter(id).await;
        let result = self.backend.persist_patch(id, &TicketPatch::status(status)).await;

        match result {
            Ok(saved) => {
                let mut store = write_store(&self.store)?;
                if store.get(id).is_ok_and(|current| current.status == status) {
                    store.upsert(saved);
                }
                drop(store);
                drop(slot);
                tracing::debug!("Pipeline: move of {} to {} persisted", id, status);
                Ok(())
            },
            Err(err) => {
                tracing::warn!("Pipeline: move of {} to {} failed: {}", id, status, err);
                self.events.mutation_failed(Some(id), &err);
                Err(err)
            },
        }
    }

    /// Submits a new ticket and adds the created record to the store
    pub async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket> {
        if let Err(err) = self.rules.check_new_ticket(&ticket) {
            self.events.mutation_failed(None, &err);
            return Err(err);
        }

        let created = match self.backend.create_ticket(ticket).await {
            Ok(created) => created,
            Err(err) => {
                tracing::warn!("Pipeline: create failed: {}", err);
                self.events.mutation_failed(None, &err);
                return Err(err);
            },
        };

        write_store(&self.store)?.upsert(created.clone());
        tracing::info!("Pipeline: created ticket {}", created.id);
        self.events.ticket_created(&created);
        Ok(created)
    }

    /// Pulls every ticket from the backend into the store
    ///
    /// Known ids keep their store position; new ones are appended. Tickets
    /// with a mutation running or waiting keep their local record, which that
    /// mutation will settle. Returns the number of tickets fetched.
    pub async fn refresh(&self) -> Result<usize> {
        let tickets = self.backend.fetch_tickets(&FilterCriteria::default()).await?;
        let count = tickets.len();
        let mut store = write_store(&self.store)?;
        let mut added = 0;
        let mut skipped = 0;
        for ticket in tickets {
            if self.queue.is_busy(&ticket.id) {
                skipped += 1;
            } else if store.upsert(ticket) {
                added += 1;
            }
        }
        tracing::info!(
            "Pipeline: refreshed {} ticket(s), {} new, {} busy",
            count,
            added,
            skipped
        );
        Ok(count)
    }

    /// Reloads one ticket from the backend
    pub async fn refresh_ticket(&self, id: &TicketId) -> Result<Ticket> {
        let ticket = self.backend.fetch_ticket_by_id(id).await?;
        write_store(&self.store)?.upsert(ticket.clone());
        Ok(ticket)
    }

    async fn try_update(&self, id: &TicketId, patch: &TicketPatch) -> Result<Ticket> {
        self.rules.check_patch(patch)?;
        if !read_store(&self.store)?.exists(id) {
            return Err(DeskError::TicketNotFound { id: id.clone() });
        }

        let mut slot = self.queue.enter(id).await;
        *slot += 1;
        tracing::debug!("Pipeline: persisting mutation #{} for {}", *slot, id);

        self.backend.persist_patch(id, patch).await?;

        let (previous, updated) = {
            let mut store = write_store(&self.store)?;
            let previous = store.get(id)?.status;
            (previous, store.apply(id, patch)?)
        };
        drop(slot);

        tracing::info!("Pipeline: updated ticket {}", id);
        self.events.ticket_updated(&updated);
        if previous != updated.status {
            self.events.status_changed(id, previous, updated.status);
        }
        Ok(updated)
    }

    fn report(&self, id: &TicketId, result: Result<Ticket>) -> Result<Ticket> {
        if let Err(err) = &result {
            tracing::warn!("Pipeline: mutation of {} failed: {}", id, err);
            self.events.mutation_failed(Some(id), err);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockTicketBackend, SimulatedBackend, demo_tickets};
    use crate::core::{NewTicketBuilder, Priority, Status};
    use crate::error::ErrorKind;
    use crate::integration::DeskEvent;
    use std::time::Duration;

    fn agent() -> Author {
        Author {
            name: "Sarah Smith".to_string(),
            role: AuthorRole::Agent,
        }
    }

    fn pipeline_with(backend: Arc<dyn TicketBackend>) -> (MutationPipeline, SharedStore, EventBus) {
        let store: SharedStore = Arc::new(RwLock::new(TicketStore::from_tickets(demo_tickets())));
        let events = EventBus::new();
        let pipeline = MutationPipeline::new(
            backend,
            Arc::clone(&store),
            ValidationRules::default(),
            events.clone(),
        );
        (pipeline, store, events)
    }

    fn simulated() -> Arc<SimulatedBackend> {
        Arc::new(SimulatedBackend::with_tickets(Duration::ZERO, demo_tickets()))
    }

    #[tokio::test]
    async fn test_update_applies_after_persist() {
        let (pipeline, store, events) = pipeline_with(simulated());
        let mut receiver = events.subscribe();
        let id = TicketId::from("3");

        let updated = pipeline
            .update_ticket(&id, TicketPatch::status(Status::Open))
            .await
            .unwrap();

        assert_eq!(updated.status, Status::Open);
        assert_eq!(store.read().unwrap().get(&id).unwrap().status, Status::Open);
        assert!(matches!(receiver.try_recv(), Ok(DeskEvent::TicketUpdated { .. })));
        assert!(matches!(receiver.try_recv(), Ok(DeskEvent::StatusChanged { .. })));
    }

    #[tokio::test]
    async fn test_persistence_failure_leaves_store_untouched() {
        let backend = simulated();
        backend.fail_next(1);
        let (pipeline, store, _events) = pipeline_with(backend);
        let before = store.read().unwrap().list().to_vec();

        let err = pipeline
            .update_ticket(&TicketId::from("1"), TicketPatch::priority(Priority::Low))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(store.read().unwrap().list(), before.as_slice());
    }

    #[tokio::test]
    async fn test_blank_comment_never_reaches_backend() {
        let mut backend = MockTicketBackend::new();
        backend.expect_persist_patch().never();
        let (pipeline, store, _events) = pipeline_with(Arc::new(backend));
        let id = TicketId::from("1");
        let comments_before = store.read().unwrap().get(&id).unwrap().comments.len();

        let err = pipeline.add_comment(&id, &agent(), "").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.read().unwrap().get(&id).unwrap().comments.len(), comments_before);
    }

    #[tokio::test]
    async fn test_add_comment_appends_in_order() {
        let (pipeline, _store, _events) = pipeline_with(simulated());
        let id = TicketId::from("1");

        pipeline.add_comment(&id, &agent(), "  Looking into it  ").await.unwrap();
        let ticket = pipeline.add_comment(&id, &agent(), "Fixed").await.unwrap();

        let contents: Vec<_> = ticket.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents[contents.len() - 2..], ["Looking into it", "Fixed"]);
        assert_eq!(ticket.comments.last().unwrap().author_role, AuthorRole::Agent);
    }

    #[tokio::test]
    async fn test_unknown_ticket_is_not_found() {
        let mut backend = MockTicketBackend::new();
        backend.expect_persist_patch().never();
        let (pipeline, _store, _events) = pipeline_with(Arc::new(backend));

        let err = pipeline
            .update_ticket(&TicketId::from("99"), TicketPatch::status(Status::Closed))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_empty_patch_is_validation_error() {
        let (pipeline, _store, _events) = pipeline_with(simulated());
        let err = pipeline
            .update_ticket(&TicketId::from("1"), TicketPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_validates_then_inserts() {
        let (pipeline, store, _events) = pipeline_with(simulated());

        let err = pipeline
            .create_ticket(NewTicketBuilder::new().subject("Hi").description("short").build())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let created = pipeline
            .create_ticket(
                NewTicketBuilder::new()
                    .subject("Password reset email missing")
                    .description("I requested a reset an hour ago and got nothing")
                    .customer("104", "Ann Lee", "ann@example.com")
                    .build(),
            )
            .await
            .unwrap();

        let store = store.read().unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.list().last().unwrap().id, created.id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_ticket_mutations_apply_in_issue_order() {
        let backend = Arc::new(SimulatedBackend::with_tickets(
            Duration::from_millis(500),
            demo_tickets(),
        ));
        let (pipeline, store, _events) = pipeline_with(backend);
        let pipeline = Arc::new(pipeline);
        let id = TicketId::from("1");

        let first = {
            let pipeline = Arc::clone(&pipeline);
            let id = id.clone();
            tokio::spawn(async move {
                pipeline.update_ticket(&id, TicketPatch::priority(Priority::Low)).await
            })
        };
        tokio::task::yield_now().await;
        let second = {
            let pipeline = Arc::clone(&pipeline);
            let id = id.clone();
            tokio::spawn(async move {
                pipeline.update_ticket(&id, TicketPatch::priority(Priority::Urgent)).await
            })
        };

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();
        assert_eq!(store.read().unwrap().get(&id).unwrap().priority, Priority::Urgent);
    }

    #[tokio::test]
    async fn test_persist_move_adopts_saved_record() {
        let backend = simulated();
        let (pipeline, store, _events) = pipeline_with(Arc::clone(&backend) as Arc<dyn TicketBackend>);
        let id = TicketId::from("3");
        store
            .write()
            .unwrap()
            .apply(&id, &TicketPatch::status(Status::Open))
            .unwrap();

        pipeline.persist_move(&id, Status::Open).await.unwrap();

        let saved = backend.tickets().unwrap().into_iter().find(|t| t.id == id).unwrap();
        let local = store.read().unwrap().get(&id).unwrap().clone();
        assert_eq!(local.status, Status::Open);
        assert_eq!(local.updated_at, saved.updated_at);
    }

    #[tokio::test]
    async fn test_persist_move_keeps_newer_local_status() {
        let (pipeline, store, _events) = pipeline_with(simulated());
        let id = TicketId::from("3");
        store
            .write()
            .unwrap()
            .apply(&id, &TicketPatch::status(Status::Resolved))
            .unwrap();

        pipeline.persist_move(&id, Status::Open).await.unwrap();

        assert_eq!(store.read().unwrap().get(&id).unwrap().status, Status::Resolved);
    }

    #[tokio::test]
    async fn test_refresh_leaves_busy_tickets_alone() {
        let (pipeline, store, _events) = pipeline_with(simulated());
        let id = TicketId::from("3");
        store
            .write()
            .unwrap()
            .apply(&id, &TicketPatch::status(Status::Open))
            .unwrap();

        let held = pipeline.queue.enter(&id).await;
        pipeline.refresh().await.unwrap();
        assert_eq!(store.read().unwrap().get(&id).unwrap().status, Status::Open);

        drop(held);
        pipeline.refresh().await.unwrap();
        assert_eq!(store.read().unwrap().get(&id).unwrap().status, Status::New);
    }

    #[tokio::test]
    async fn test_refresh_upserts() {
        let backend = simulated();
        let (pipeline, store, _events) = pipeline_with(Arc::clone(&backend) as Arc<dyn TicketBackend>);
        backend
            .create_ticket(
                NewTicketBuilder::new()
                    .subject("Created elsewhere")
                    .description("Another agent filed this one directly")
                    .build(),
            )
            .await
            .unwrap();

        assert_eq!(pipeline.refresh().await.unwrap(), 4);
        assert_eq!(store.read().unwrap().len(), 4);
    }
}
