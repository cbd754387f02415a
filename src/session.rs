//! The desk session
//!
//! [`HelpDesk`] owns every piece of session state: the entity store, the
//! board's order table and WIP limits, the list query, the event bus and the
//! mutation pipeline. Nothing lives in globals; construct one with
//! [`HelpDesk::new`] and tear it down with [`HelpDesk::shutdown`].

use crate::backend::{SimulatedBackend, TicketBackend, demo_tickets};
use crate::board::{BoardColumn, KanbanBoard, MoveOutcome, WipLimits};
use crate::config::DeskConfig;
use crate::core::{
    DeskStats, FilterCriteria, ListQuery, NewTicket, Page, Priority, Status, Ticket, TicketId,
    TicketPatch,
};
use crate::debounce::{Debouncer, TokioScheduler};
use crate::error::{DeskError, Result};
use crate::integration::{DeskEvent, EventBus};
use crate::pipeline::{Author, MutationPipeline, SharedStore, read_store, write_store};
use crate::storage::{TicketRepository, TicketStore};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tokio::sync::{broadcast, watch};

pub struct HelpDesk {
    store: SharedStore,
    board: Mutex<KanbanBoard>,
    query: Arc<watch::Sender<ListQuery>>,
    search: Debouncer<TokioScheduler>,
    pipeline: MutationPipeline,
    events: EventBus,
    author: Author,
}

impl std::fmt::Debug for HelpDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpDesk")
            .field("author", &self.author)
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

impl HelpDesk {
    /// Creates a session talking to `backend`
    ///
    /// Must be called from within a tokio runtime; the debounced search
    /// schedules its timers there. The store starts empty until
    /// [`Self::load`] runs.
    pub fn new(config: &DeskConfig, backend: Arc<dyn TicketBackend>) -> Result<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            DeskError::InvalidInput("a desk session needs a running tokio runtime".to_string())
        })?;

        let store: SharedStore = Arc::new(RwLock::new(TicketStore::new()));
        let events = EventBus::new();
        let pipeline = MutationPipeline::new(
            backend,
            Arc::clone(&store),
            config.validation,
            events.clone(),
        );
        let (query, _) = watch::channel(ListQuery::new(config.page_size()?));

        tracing::debug!("Desk: session opened for {}", config.session.user_name);
        Ok(Self {
            store,
            board: Mutex::new(KanbanBoard::new(config.wip_limits()?)),
            query: Arc::new(query),
            search: Debouncer::new(TokioScheduler::new(runtime), config.search_debounce()),
            pipeline,
            events,
            author: config.author(),
        })
    }

    /// Session over the in-process backend seeded with the demo tickets
    pub async fn simulated(config: &DeskConfig) -> Result<Self> {
        let backend = SimulatedBackend::with_tickets(config.backend_latency(), demo_tickets());
        let desk = Self::new(config, Arc::new(backend))?;
        desk.load().await?;
        Ok(desk)
    }

    /// Ends the session, dropping any search still waiting to apply
    pub fn shutdown(self) {
        if self.search.cancel() {
            tracing::debug!("Desk: discarded pending search on shutdown");
        }
        tracing::debug!("Desk: session closed");
    }

    fn lock_board(&self) -> Result<MutexGuard<'_, KanbanBoard>> {
        self.board
            .lock()
            .map_err(|_| DeskError::persistence("board lock poisoned"))
    }

    /// Pulls the backend's tickets into the store
    pub async fn load(&self) -> Result<usize> {
        self.pipeline.refresh().await
    }

    /// Reloads a single ticket from the backend
    pub async fn refresh_ticket(&self, id: &TicketId) -> Result<Ticket> {
        self.pipeline.refresh_ticket(id).await
    }

    // Reads

    pub fn ticket(&self, id: &TicketId) -> Result<Ticket> {
        read_store(&self.store)?.get(id).cloned()
    }

    pub fn tickets(&self) -> Result<Vec<Ticket>> {
        Ok(read_store(&self.store)?.list().to_vec())
    }

    /// The current list page under the active query
    pub fn list_page(&self) -> Result<Page<Ticket>> {
        let store = read_store(&self.store)?;
        Ok(self.query.borrow().project(store.list()))
    }

    #[must_use]
    pub fn query(&self) -> ListQuery {
        self.query.borrow().clone()
    }

    /// Receives every change to the list query, debounced searches included
    #[must_use]
    pub fn watch_query(&self) -> watch::Receiver<ListQuery> {
        self.query.subscribe()
    }

    /// Board columns in workflow order, reconciled against the store
    pub fn board(&self) -> Result<Vec<BoardColumn>> {
        let mut board = self.lock_board()?;
        let store = read_store(&self.store)?;
        Ok(board.columns(store.list()))
    }

    pub fn stats(&self) -> Result<DeskStats> {
        Ok(DeskStats::compute(read_store(&self.store)?.list(), Utc::now()))
    }

    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<DeskEvent> {
        self.events.subscribe()
    }

    // List query

    pub fn set_filter(&self, criteria: FilterCriteria) {
        self.query.send_modify(|query| query.set_criteria(criteria));
    }

    pub fn toggle_status(&self, status: Status) {
        self.query.send_modify(|query| query.toggle_status(status));
    }

    pub fn toggle_priority(&self, priority: Priority) {
        self.query.send_modify(|query| query.toggle_priority(priority));
    }

    pub fn clear_filters(&self) {
        self.search.cancel();
        self.query.send_modify(ListQuery::clear_filters);
    }

    pub fn set_page(&self, page: usize) {
        self.query.send_modify(|query| query.set_page(page));
    }

    pub fn set_page_size(&self, page_size: usize) -> Result<()> {
        let mut result = Ok(());
        self.query.send_if_modified(|query| {
            result = query.set_page_size(page_size);
            result.is_ok()
        });
        result
    }

    /// Feeds one keystroke's worth of search text
    ///
    /// The query only changes once the input has been quiet for the
    /// configured debounce period; earlier text in a burst is discarded.
    pub fn search(&self, text: impl Into<String>) {
        let text = text.into();
        let query = Arc::clone(&self.query);
        self.search.call(move || {
            tracing::debug!("Desk: applying search '{}'", text);
            query.send_modify(|q| q.set_search(text));
        });
    }

    /// Applies `text` right away, superseding any pending search
    pub fn search_now(&self, text: impl Into<String>) {
        self.search.cancel();
        let text = text.into();
        self.query.send_modify(|q| q.set_search(text));
    }

    // Board

    pub fn set_wip_limits(&self, limits: WipLimits) -> Result<()> {
        self.lock_board()?.set_wip_limits(limits);
        Ok(())
    }

    /// Moves a ticket on the board, persisting column transfers
    ///
    /// Transfers are applied optimistically. When the backend then refuses
    /// the save, the transfer is undone unless the ticket was moved again
    /// in the meantime. The persistence error is returned either way.
    pub async fn move_ticket(
        &self,
        id: &TicketId,
        from: Status,
        to: Status,
        to_index: Option<usize>,
    ) -> Result<MoveOutcome> {
        let attempt = {
            let mut board = self.lock_board()?;
            let mut store = write_store(&self.store)?;
            board.move_ticket(&mut *store, id, from, to, to_index)
        };

        let outcome = match attempt {
            Ok(outcome) => outcome,
            Err(err) => {
                if let DeskError::WipLimitExceeded { status, limit } = &err {
                    self.events.wip_rejected(id, *status, *limit);
                }
                return Err(err);
            },
        };

        let MoveOutcome::Transferred(receipt) = &outcome else {
            return Ok(outcome);
        };
        self.events.status_changed(id, receipt.from, receipt.to);

        if let Err(err) = self.pipeline.persist_move(id, receipt.to).await {
            let rolled_back = {
                let mut board = self.lock_board()?;
                let mut store = write_store(&self.store)?;
                board.rollback(&mut *store, receipt.clone())?
            };
            if rolled_back {
                self.events.move_rolled_back(id, receipt.from);
            }
            return Err(err);
        }
        Ok(outcome)
    }

    // Mutations

    pub async fn update_ticket(&self, id: &TicketId, patch: TicketPatch) -> Result<Ticket> {
        self.pipeline.update_ticket(id, patch).await
    }

    /// Comments as the session's user
    pub async fn add_comment(&self, id: &TicketId, text: &str) -> Result<Ticket> {
        self.pipeline.add_comment(id, &self.author, text).await
    }

    pub async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket> {
        self.pipeline.create_ticket(ticket).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NewTicketBuilder;
    use crate::error::ErrorKind;
    use std::time::Duration;

    fn config() -> DeskConfig {
        let mut config = DeskConfig::default();
        config.backend.latency_ms = 0;
        config
    }

    async fn desk_with(config: &DeskConfig) -> (HelpDesk, Arc<SimulatedBackend>) {
        let backend = Arc::new(SimulatedBackend::with_tickets(Duration::ZERO, demo_tickets()));
        let desk = HelpDesk::new(config, Arc::clone(&backend) as Arc<dyn TicketBackend>).unwrap();
        desk.load().await.unwrap();
        (desk, backend)
    }

    fn column_ids(desk: &HelpDesk, status: Status) -> Vec<String> {
        desk.board()
            .unwrap()
            .into_iter()
            .find(|c| c.status == status)
            .map(|c| c.ids().iter().map(|id| id.as_str().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_new_outside_runtime_is_error() {
        let backend = Arc::new(SimulatedBackend::new(Duration::ZERO));
        let err = HelpDesk::new(&config(), backend).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_load_fills_store() {
        let (desk, _backend) = desk_with(&config()).await;
        assert_eq!(desk.tickets().unwrap().len(), 3);
        assert_eq!(desk.list_page().unwrap().total_items, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced() {
        let (desk, _backend) = desk_with(&config()).await;
        let mut changes = desk.watch_query();

        for text in ["l", "lo", "log", "login"] {
            desk.search(text);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(desk.query().criteria.search_query, "");

        changes.changed().await.unwrap();
        assert_eq!(changes.borrow_and_update().criteria.search_query, "login");

        let page = desk.list_page().unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].subject, "Unable to login to my account");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_filters_drops_pending_search() {
        let (desk, _backend) = desk_with(&config()).await;
        desk.search("billing");
        desk.clear_filters();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(desk.query().criteria.search_query, "");
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let (desk, _backend) = desk_with(&config()).await;
        desk.set_page_size(1).unwrap();
        desk.set_page(3);
        assert_eq!(desk.list_page().unwrap().page, 3);

        desk.toggle_priority(Priority::High);
        assert_eq!(desk.query().page, 1);
        assert!(desk.set_page_size(0).is_err());
        assert_eq!(desk.query().page_size.get(), 1);
    }

    #[tokio::test]
    async fn test_wip_rejection_publishes_event() {
        let mut config = config();
        config.board.wip_limits.insert("in_progress".to_string(), 1);
        let (desk, _backend) = desk_with(&config).await;
        let mut events = desk.events();
        let before = desk.tickets().unwrap();

        let err = desk
            .move_ticket(&TicketId::from("1"), Status::Open, Status::InProgress, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::WipLimitExceeded);
        assert_eq!(desk.tickets().unwrap(), before);
        assert!(matches!(
            events.try_recv(),
            Ok(DeskEvent::WipRejected { limit: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_move_rolls_back() {
        let (desk, backend) = desk_with(&config()).await;
        let before_open = column_ids(&desk, Status::Open);
        let mut events = desk.events();
        backend.fail_next(1);

        let err = desk
            .move_ticket(&TicketId::from("1"), Status::Open, Status::Resolved, Some(0))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(desk.ticket(&TicketId::from("1")).unwrap().status, Status::Open);
        assert_eq!(column_ids(&desk, Status::Open), before_open);
        assert!(column_ids(&desk, Status::Resolved).is_empty());

        let mut saw_rollback = false;
        while let Ok(event) = events.try_recv() {
            if let DeskEvent::MoveRolledBack { restored_status, .. } = event {
                assert_eq!(restored_status, Status::Open);
                saw_rollback = true;
            }
        }
        assert!(saw_rollback);
    }

    #[tokio::test]
    async fn test_successful_move_persists() {
        let (desk, backend) = desk_with(&config()).await;
        let id = TicketId::from("3");

        let outcome = desk
            .move_ticket(&id, Status::New, Status::Open, None)
            .await
            .unwrap();

        assert!(matches!(outcome, MoveOutcome::Transferred(_)));
        let saved = backend.tickets().unwrap();
        assert_eq!(saved.iter().find(|t| t.id == id).unwrap().status, Status::Open);
        assert_eq!(column_ids(&desk, Status::Open).last().map(String::as_str), Some("3"));
    }

    #[tokio::test]
    async fn test_comment_uses_session_author() {
        let mut config = config();
        config.session.user_name = "Dana".to_string();
        let (desk, _backend) = desk_with(&config).await;

        let ticket = desk.add_comment(&TicketId::from("2"), "On it").await.unwrap();
        let comment = ticket.comments.last().unwrap();
        assert_eq!(comment.author, "Dana");
        assert_eq!(comment.content, "On it");
    }

    #[tokio::test]
    async fn test_created_ticket_lands_at_column_tail() {
        let (desk, _backend) = desk_with(&config()).await;
        desk.board().unwrap();

        let created = desk
            .create_ticket(
                NewTicketBuilder::new()
                    .subject("Refund not received")
                    .description("The refund from March has not shown up yet")
                    .build(),
            )
            .await
            .unwrap();

        assert_eq!(
            column_ids(&desk, Status::New).last().map(String::as_str),
            Some(created.id.as_str())
        );
        assert_eq!(desk.stats().unwrap().total, 4);
    }
}
