//! Actor driving a collection view from a command stream
//!
//! One task owns the [`CollectionView`]; user intent arrives over an mpsc
//! command channel and observers follow state through a watch channel.
//! The 500 ms search debounce lives here: each edit re-arms the deadline,
//! and the deadline firing commits whatever edit is latest. Dropping the
//! handle stops the worker, killing any armed debounce; responses of
//! fetches that were in flight are discarded by the generation check.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::api::{QuoteApi, SortField};

use super::state::ViewState;
use super::sync::{Applied, CollectionView, QueryEdit};

/// Fixed debounce window between a query edit and its search
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// User intent consumed by the worker
#[derive(Clone, Debug)]
pub enum ViewCommand {
    /// The raw query buffer changed
    QueryEdited(String),
    /// A sort field was tapped
    SortTapped(SortField),
    /// The user asked for the next browse page
    LoadMore,
    /// Explicit user-triggered refresh (also the retry affordance)
    Refresh,
    /// A create/update/delete or batch run finished; reload the view
    MutationSettled,
    /// Stop the worker
    Shutdown,
}

/// Out-of-band signals the embedder must react to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// The backend rejected the session; re-authentication is required
    SessionInvalidated,
}

/// Handle to a spawned worker: command sender plus state/event receivers
pub struct ViewHandle {
    commands: mpsc::Sender<ViewCommand>,
    snapshots: watch::Receiver<ViewState>,
    events: mpsc::Receiver<ViewEvent>,
    task: JoinHandle<()>,
}

impl ViewHandle {
    /// Send a command; false when the worker has already stopped
    pub async fn send(&self, command: ViewCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }

    /// Current state snapshot
    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.snapshots.borrow().clone()
    }

    /// Wait for the next state change and return the new snapshot
    pub async fn changed(&mut self) -> Option<ViewState> {
        self.snapshots.changed().await.ok()?;
        Some(self.snapshots.borrow().clone())
    }

    /// Next out-of-band event, or `None` once the worker stopped
    pub async fn next_event(&mut self) -> Option<ViewEvent> {
        self.events.recv().await
    }

    /// Request shutdown and wait for the worker to finish
    pub async fn shutdown(self) {
        let _ = self.commands.send(ViewCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

/// Spawn a worker task owning the given view
pub fn spawn<C>(view: CollectionView<C>) -> ViewHandle
where
    C: QuoteApi + 'static,
{
    let (commands, command_rx) = mpsc::channel(32);
    let (snapshot_tx, snapshots) = watch::channel(view.state().clone());
    let (event_tx, events) = mpsc::channel(4);

    let worker = Worker {
        view,
        commands: command_rx,
        snapshots: snapshot_tx,
        events: event_tx,
        session_invalidated: false,
    };
    let task = tokio::spawn(worker.run());

    ViewHandle {
        commands,
        snapshots,
        events,
        task,
    }
}

struct Worker<C> {
    view: CollectionView<C>,
    commands: mpsc::Receiver<ViewCommand>,
    snapshots: watch::Sender<ViewState>,
    events: mpsc::Sender<ViewEvent>,
    session_invalidated: bool,
}

impl<C: QuoteApi> Worker<C> {
    async fn run(mut self) {
        let mut debounce: Option<Instant> = None;

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    if matches!(command, ViewCommand::Shutdown) {
                        break;
                    }
                    self.handle_command(command, &mut debounce).await;
                }
                () = wait_until(debounce), if debounce.is_some() => {
                    debounce = None;
                    let applied = self.view.commit_pending_query().await;
                    self.note_outcome(applied);
                }
            }
            self.publish();
        }

        debug!("collection view worker stopped");
    }

    async fn handle_command(&mut self, command: ViewCommand, debounce: &mut Option<Instant>) {
        match command {
            ViewCommand::QueryEdited(raw) => match self.view.note_query_edited(&raw) {
                QueryEdit::Debounce => {
                    *debounce = Some(Instant::now() + DEBOUNCE);
                }
                QueryEdit::ReloadBrowse => {
                    *debounce = None;
                    let applied = self.view.reload().await;
                    self.note_outcome(applied);
                }
            },
            ViewCommand::SortTapped(field) => {
                let applied = self.view.change_sort(field).await;
                self.note_outcome(applied);
            }
            ViewCommand::LoadMore => {
                let applied = self.view.load_more().await;
                self.note_outcome(applied);
            }
            ViewCommand::Refresh | ViewCommand::MutationSettled => {
                let applied = self.view.reload().await;
                self.note_outcome(applied);
            }
            ViewCommand::Shutdown => {}
        }
    }

    fn note_outcome(&mut self, applied: Applied) {
        match applied {
            Applied::Unauthenticated if !self.session_invalidated => {
                self.session_invalidated = true;
                if self.events.try_send(ViewEvent::SessionInvalidated).is_err() {
                    warn!("session invalidation event dropped");
                }
            }
            Applied::Stale => debug!("superseded fetch response discarded"),
            _ => {}
        }
    }

    fn publish(&self) {
        let _ = self.snapshots.send(self.view.state().clone());
    }
}

async fn wait_until(deadline: Option<Instant>) {
    if let Some(deadline) = deadline {
        tokio::time::sleep_until(deadline).await;
    }
}
