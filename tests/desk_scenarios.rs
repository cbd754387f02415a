//! End-to-end scenarios against the library API

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ticket_desk::backend::{SimulatedBackend, TicketBackend, demo_tickets};
use ticket_desk::config::DeskConfig;
use ticket_desk::core::{
    FilterCriteria, NewTicket, Priority, Status, Ticket, TicketId, TicketPatch, filter_tickets,
    paginate,
};
use ticket_desk::error::{DeskError, ErrorKind, Result};
use ticket_desk::integration::DeskEvent;
use ticket_desk::session::HelpDesk;

fn quick_config() -> DeskConfig {
    let mut config = DeskConfig::default();
    config.backend.latency_ms = 0;
    config
}

async fn open_desk(config: &DeskConfig, backend: Arc<dyn TicketBackend>) -> HelpDesk {
    let desk = HelpDesk::new(config, backend).unwrap();
    desk.load().await.unwrap();
    desk
}

/// Backend whose saves take the scripted delays in call order
struct ScriptedBackend {
    inner: SimulatedBackend,
    delays: Mutex<VecDeque<Duration>>,
}

#[async_trait]
impl TicketBackend for ScriptedBackend {
    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket> {
        self.inner.create_ticket(ticket).await
    }

    async fn fetch_tickets(&self, criteria: &FilterCriteria) -> Result<Vec<Ticket>> {
        self.inner.fetch_tickets(criteria).await
    }

    async fn fetch_ticket_by_id(&self, id: &TicketId) -> Result<Ticket> {
        self.inner.fetch_ticket_by_id(id).await
    }

    async fn persist_patch(&self, id: &TicketId, patch: &TicketPatch) -> Result<Ticket> {
        let delay = self
            .delays
            .lock()
            .map_err(|_| DeskError::persistence("poisoned"))?
            .pop_front()
            .unwrap_or_default();
        tokio::time::sleep(delay).await;
        self.inner.persist_patch(id, patch).await
    }
}

#[test]
fn test_filter_then_paginate_is_a_subsequence() {
    let tickets = demo_tickets();
    let criteria = FilterCriteria::new().with_priorities([Priority::High, Priority::Low]);
    let visible = filter_tickets(&tickets, &criteria);

    let ids: Vec<&str> = visible.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);

    let page = paginate(&visible, 9, std::num::NonZeroUsize::MIN);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page, 2);
    assert_eq!(page.items[0].id.as_str(), "3");
}

#[tokio::test(start_paused = true)]
async fn test_later_mutation_wins_even_when_it_finishes_first() {
    let backend = Arc::new(ScriptedBackend {
        inner: SimulatedBackend::with_tickets(Duration::ZERO, demo_tickets()),
        delays: Mutex::new(VecDeque::from([
            Duration::from_millis(800),
            Duration::from_millis(10),
        ])),
    });
    let desk = Arc::new(open_desk(&quick_config(), backend).await);
    let id = TicketId::from("3");

    let slow = {
        let desk = Arc::clone(&desk);
        let id = id.clone();
        tokio::spawn(async move { desk.update_ticket(&id, TicketPatch::priority(Priority::High)).await })
    };
    tokio::task::yield_now().await;
    let fast = {
        let desk = Arc::clone(&desk);
        let id = id.clone();
        tokio::spawn(async move { desk.update_ticket(&id, TicketPatch::priority(Priority::Urgent)).await })
    };

    slow.await.unwrap().unwrap();
    fast.await.unwrap().unwrap();
    assert_eq!(desk.ticket(&id).unwrap().priority, Priority::Urgent);
}

#[tokio::test]
async fn test_wip_scenario_leaves_board_untouched() {
    let mut config = quick_config();
    config.board.wip_limits.insert("OPEN".to_string(), 1);
    let backend = Arc::new(SimulatedBackend::with_tickets(Duration::ZERO, demo_tickets()));
    let desk = open_desk(&config, backend).await;
    let board_before = desk.board().unwrap();

    let err = desk
        .move_ticket(&TicketId::from("3"), Status::New, Status::Open, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WipLimitExceeded);
    let board_after = desk.board().unwrap();
    for (before, after) in board_before.iter().zip(&board_after) {
        assert_eq!(before.ids(), after.ids());
    }
    assert_eq!(desk.ticket(&TicketId::from("3")).unwrap().status, Status::New);
}

#[tokio::test]
async fn test_board_keeps_manual_order_across_status_updates() {
    let backend = Arc::new(SimulatedBackend::with_tickets(Duration::ZERO, demo_tickets()));
    let desk = open_desk(&quick_config(), backend).await;

    desk.move_ticket(&TicketId::from("3"), Status::New, Status::Open, Some(0))
        .await
        .unwrap();
    // Status changed outside the board lands at the tail of its new column
    desk.update_ticket(&TicketId::from("2"), TicketPatch::status(Status::Open))
        .await
        .unwrap();

    let open = desk
        .board()
        .unwrap()
        .into_iter()
        .find(|c| c.status == Status::Open)
        .unwrap();
    let ids: Vec<String> = open.ids().iter().map(ToString::to_string).collect();
    assert_eq!(ids, vec!["3", "1", "2"]);
}

#[tokio::test]
async fn test_offline_backend_surfaces_persistence_errors() {
    let backend = Arc::new(SimulatedBackend::with_tickets(Duration::ZERO, demo_tickets()));
    let desk = open_desk(&quick_config(), Arc::clone(&backend) as Arc<dyn TicketBackend>).await;
    let mut events = desk.events();
    backend.set_offline(true);

    let err = desk.add_comment(&TicketId::from("1"), "Any update?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(err.is_recoverable());
    assert_eq!(desk.ticket(&TicketId::from("1")).unwrap().comments.len(), 2);

    match events.recv().await.unwrap() {
        DeskEvent::MutationFailed { kind, ticket_id, .. } => {
            assert_eq!(kind, ErrorKind::Persistence);
            assert_eq!(ticket_id, Some(TicketId::from("1")));
        },
        other => panic!("expected MutationFailed, got {other:?}"),
    }

    backend.set_offline(false);
    let ticket = desk.add_comment(&TicketId::from("1"), "Any update?").await.unwrap();
    assert_eq!(ticket.comments.len(), 3);
    desk.shutdown();
}
