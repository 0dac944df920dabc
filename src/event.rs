//! Workspace events
//!
//! Background tasks (transport call, countdown ticker, banner timer) never
//! touch workspace state. They post one of these events and the host loop
//! feeds it back to [`Workspace::handle_event`](crate::workspace::Workspace::handle_event)
//! on its own thread of control.

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::request::{TransportError, ValuationResponse};

#[derive(Debug)]
pub enum WorkspaceEvent {
    /// Terminal outcome of the request identified by `request_id`
    Outcome {
        request_id: Uuid,
        outcome: Result<ValuationResponse, TransportError>,
    },
    /// One second of the countdown elapsed for `request_id`
    CountdownTick { request_id: Uuid },
    /// The banner with sequence number `seq` reached its expiry
    BannerExpired { seq: u64 },
}

pub type EventSender = mpsc::UnboundedSender<WorkspaceEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<WorkspaceEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
