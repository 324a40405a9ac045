// Per-window state-change channel.
//
// Subscribers get a live, unbuffered stream: an event is delivered to every
// subscriber present when it is published, and to nobody else.

use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

use crate::modules::view::ViewState;

pub const REPLACE_STATE: &str = "replace-state";
pub const UPDATE_STATE: &str = "update-state";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateState {
    pub index: usize,
    pub state: ViewState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ViewEvent {
    /// Every view's state in tab order, after a membership or order change.
    ReplaceState(Vec<ViewState>),
    /// One view changed without the collection changing.
    UpdateState(UpdateState),
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplaceState(_) => REPLACE_STATE,
            Self::UpdateState(_) => UPDATE_STATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

pub struct EventStream {
    id: SubscriberId,
    receiver: mpsc::UnboundedReceiver<ViewEvent>,
}

impl EventStream {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next already-published event, without waiting.
    pub fn try_next(&mut self) -> Option<ViewEvent> {
        self.receiver.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<ViewEvent> {
        self.receiver.recv().await
    }
}

impl Stream for EventStream {
    type Item = ViewEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ViewEvent>> {
        self.receiver.poll_recv(cx)
    }
}

#[derive(Default)]
pub struct StateChangePublisher {
    next_id: u64,
    peers: Vec<(SubscriberId, mpsc::UnboundedSender<ViewEvent>)>,
}

impl StateChangePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> EventStream {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = mpsc::unbounded_channel();
        self.peers.push((id, tx));
        EventStream { id, receiver: rx }
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.peers.len();
        self.peers.retain(|(peer, _)| *peer != id);
        self.peers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.peers.len()
    }

    pub fn publish(&mut self, event: ViewEvent) {
        log::debug!("[Views] Emitting {}", event.name());
        // Dropped streams show up as send errors; forget those peers.
        self.peers.retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    pub fn replace_state(&mut self, states: Vec<ViewState>) {
        self.publish(ViewEvent::ReplaceState(states));
    }

    pub fn update_state(&mut self, index: usize, state: ViewState) {
        self.publish(ViewEvent::UpdateState(UpdateState { index, state }));
    }
}
