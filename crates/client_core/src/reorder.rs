//! Drag-and-drop slide reordering with optimistic apply and rollback.
//!
//! Each drop becomes a [`ReorderCommand`] holding the order and selection from
//! before and after the move. The new order is applied to the [`SlideStore`] at
//! once, persisted in the background, and undone from the command's own snapshot
//! if the backend refuses it. A failed command only rolls back while the list is
//! still at the revision its own move produced; if another operation has changed
//! the list since, even back to the same order, the failure is reported as
//! superseded and the list is left alone.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use shared::domain::{ProjectId, SlideId};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    api::SlidePersistence,
    error::ClientResult,
    slides::{SlideListState, SlideStore},
};

/// Removes the element at `source` and reinserts it at `destination`; every other
/// element keeps its relative order.
pub fn move_item<T>(items: &mut Vec<T>, source: usize, destination: usize) {
    if source == destination || source >= items.len() || destination >= items.len() {
        return;
    }
    let item = items.remove(source);
    items.insert(destination, item);
}

/// Index of the previously selected slide after moving `source` to `destination`.
pub fn track_selection(selected: usize, source: usize, destination: usize) -> usize {
    if selected == source {
        destination
    } else if source < selected && selected <= destination {
        selected - 1
    } else if destination <= selected && selected < source {
        selected + 1
    } else {
        selected
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderCommand {
    pub source: usize,
    pub destination: usize,
    pub original_order: Vec<SlideId>,
    pub original_selection: Option<usize>,
    pub new_order: Vec<SlideId>,
    pub new_selection: Option<usize>,
    /// List revision the move was planned against.
    pub base_revision: u64,
    /// List revision right after the move is applied.
    pub applied_revision: u64,
}

impl ReorderCommand {
    /// `None` for a cancelled drop (no destination) or a drop onto the same position.
    pub fn plan(
        state: &SlideListState,
        source: usize,
        destination: Option<usize>,
    ) -> ClientResult<Option<Self>> {
        let Some(destination) = destination else {
            return Ok(None);
        };
        if source == destination {
            return Ok(None);
        }
        state.check_index(source)?;
        state.check_index(destination)?;

        let original_order = state.order();
        let mut new_order = original_order.clone();
        move_item(&mut new_order, source, destination);

        let original_selection = state.selected();
        let new_selection =
            original_selection.map(|selected| track_selection(selected, source, destination));
        let base_revision = state.revision();

        Ok(Some(Self {
            source,
            destination,
            original_order,
            original_selection,
            new_order,
            new_selection,
            base_revision,
            applied_revision: base_revision + 1,
        }))
    }

    fn apply(&self, state: &mut SlideListState) {
        state.move_slide(
            self.source,
            self.destination,
            self.new_selection,
            self.applied_revision,
        );
    }

    /// Undoes the move on the live records, so edits made to individual slides while
    /// the request was in flight survive the rollback. The list returns to the
    /// revision it was planned against, which lets an older in-flight command that
    /// produced that revision roll back in turn.
    fn revert(&self, state: &mut SlideListState) {
        state.move_slide(
            self.destination,
            self.source,
            self.original_selection,
            self.base_revision,
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Cancelled or same-position drop; nothing changed and nothing was sent.
    NoOp,
    Saved {
        new_order: Vec<SlideId>,
    },
    Reverted {
        message: String,
    },
    /// The backend refused the order, but the list had already moved on.
    Superseded {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderEvent {
    Saving {
        project_id: ProjectId,
        new_order: Vec<SlideId>,
    },
    Saved {
        project_id: ProjectId,
    },
    Reverted {
        project_id: ProjectId,
        message: String,
    },
    Superseded {
        project_id: ProjectId,
        message: String,
    },
}

pub struct ReorderCoordinator {
    project_id: ProjectId,
    store: SlideStore,
    persistence: Arc<dyn SlidePersistence>,
    in_flight: Arc<AtomicUsize>,
    events: broadcast::Sender<ReorderEvent>,
}

struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ReorderCoordinator {
    pub fn new(
        project_id: ProjectId,
        store: SlideStore,
        persistence: Arc<dyn SlidePersistence>,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            project_id,
            store,
            persistence,
            in_flight: Arc::new(AtomicUsize::new(0)),
            events,
        }
    }

    pub fn store(&self) -> &SlideStore {
        &self.store
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ReorderEvent> {
        self.events.subscribe()
    }

    /// Advisory only; a second drag is never blocked on it.
    pub fn is_reordering(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Errors only for indices outside the list. Backend failures are absorbed and
    /// reported through the outcome and the event channel.
    pub async fn reorder(
        &self,
        source: usize,
        destination: Option<usize>,
    ) -> ClientResult<ReorderOutcome> {
        let command = {
            let mut state = self.store.lock().await;
            let Some(command) = ReorderCommand::plan(&state, source, destination)? else {
                return Ok(ReorderOutcome::NoOp);
            };
            command.apply(&mut state);
            command
        };

        let _guard = InFlightGuard::enter(&self.in_flight);
        info!(
            project_id = %self.project_id,
            source = command.source,
            destination = command.destination,
            "saving slide order"
        );
        self.emit(ReorderEvent::Saving {
            project_id: self.project_id,
            new_order: command.new_order.clone(),
        });

        match self
            .persistence
            .persist_order(self.project_id, &command.new_order)
            .await
        {
            Ok(()) => {
                info!(project_id = %self.project_id, "slide order saved");
                self.emit(ReorderEvent::Saved {
                    project_id: self.project_id,
                });
                Ok(ReorderOutcome::Saved {
                    new_order: command.new_order,
                })
            }
            Err(err) => Ok(self.roll_back(&command, err.to_string()).await),
        }
    }

    async fn roll_back(&self, command: &ReorderCommand, message: String) -> ReorderOutcome {
        let mut state = self.store.lock().await;
        if state.revision() != command.applied_revision {
            warn!(
                project_id = %self.project_id,
                error = %message,
                "slide order rejected after a newer change; keeping current order"
            );
            self.emit(ReorderEvent::Superseded {
                project_id: self.project_id,
                message: message.clone(),
            });
            return ReorderOutcome::Superseded { message };
        }

        command.revert(&mut state);
        warn!(
            project_id = %self.project_id,
            error = %message,
            "failed to save slide order; reverted to the previous order"
        );
        self.emit(ReorderEvent::Reverted {
            project_id: self.project_id,
            message: message.clone(),
        });
        ReorderOutcome::Reverted { message }
    }

    fn emit(&self, event: ReorderEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/reorder_tests.rs"]
mod tests;
