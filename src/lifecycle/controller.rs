//! Request Lifecycle Controller
//!
//! Governs exactly one valuation request at a time:
//!
//! ```text
//! idle       --submit-->      generating
//! generating --success-->     idle
//! generating --failure-->     idle
//! generating --cancel-->      cancelling
//! cancelling --cancel-ack-->  cancelled
//! cancelling --failure-->     cancelled   (failure still reported)
//! cancelled  --submit-->      generating
//! *          --reset-->       idle
//! ```
//!
//! Outcomes arrive as events tagged with the id of the request that
//! produced them; anything not matching the active handle is stale and
//! dropped without touching state.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Countdown, RequestState};
use crate::event::{EventSender, WorkspaceEvent};
use crate::request::{CancellationToken, TransportError, ValuationRequest, ValuationResponse, ValuationTransport};

/// Identity of one in-flight request plus the token that aborts it
#[derive(Debug, Clone)]
pub struct RequestHandle {
    id: Uuid,
    token: CancellationToken,
}

impl RequestHandle {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started(Uuid),
    /// Another request is still in flight.
    Rejected(RequestState),
}

/// What the controller made of an outcome event
#[derive(Debug)]
pub enum Resolution {
    Completed(ValuationResponse),
    Failed(TransportError),
    Cancelled,
    /// A genuine failure arrived after cancel was requested. The request
    /// still settles as cancelled, but the failure must be reported.
    FailedWhileCancelling(TransportError),
    /// Event for a request that is no longer active; nothing changed.
    Stale,
}

struct ActiveRequest {
    handle: RequestHandle,
    call: JoinHandle<()>,
    started_at: Instant,
}

pub struct RequestController {
    transport: Arc<dyn ValuationTransport>,
    events: EventSender,
    state: RequestState,
    active: Option<ActiveRequest>,
    countdown: Countdown,
}

impl RequestController {
    pub fn new(
        transport: Arc<dyn ValuationTransport>,
        events: EventSender,
        countdown_seed: u32,
        tick: Duration,
    ) -> Self {
        Self {
            transport,
            events,
            state: RequestState::Idle,
            active: None,
            countdown: Countdown::new(countdown_seed, tick),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn handle(&self) -> Option<&RequestHandle> {
        self.active.as_ref().map(|a| &a.handle)
    }

    /// Seconds left on the estimate; only present while generating.
    pub fn countdown(&self) -> Option<u32> {
        (self.state == RequestState::Generating).then(|| self.countdown.remaining())
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// Dispatch `request` unless one is already in flight
    pub fn submit(&mut self, request: ValuationRequest) -> SubmitOutcome {
        if !self.state.accepts_submit() {
            debug!(state = %self.state, "Submit ignored: request already in flight");
            return SubmitOutcome::Rejected(self.state);
        }

        let handle = RequestHandle::new();
        let request_id = handle.id;
        info!(%request_id, inputs = request.input_list.len(), "Submitting valuation request");

        let transport = self.transport.clone();
        let events = self.events.clone();
        let token = handle.token.clone();
        let call = tokio::spawn(async move {
            let outcome = transport.evaluate(request, token).await;
            let _ = events.send(WorkspaceEvent::Outcome { request_id, outcome });
        });

        self.active = Some(ActiveRequest {
            handle,
            call,
            started_at: Instant::now(),
        });
        self.state = RequestState::Generating;
        self.countdown.start(request_id, self.events.clone());

        SubmitOutcome::Started(request_id)
    }

    /// Signal the active request to abort. Only acts while generating.
    pub fn cancel(&mut self) -> bool {
        if self.state != RequestState::Generating {
            debug!(state = %self.state, "Cancel ignored");
            return false;
        }
        let Some(active) = &self.active else {
            return false;
        };

        info!(request_id = %active.handle.id, "Cancelling valuation request");
        self.state = RequestState::Cancelling;
        self.countdown.stop();
        active.handle.token.cancel();
        true
    }

    /// Drop any in-flight request and return to idle
    pub fn reset(&mut self) {
        if let Some(active) = self.active.take() {
            info!(request_id = %active.handle.id, "Abandoning in-flight request on reset");
            active.handle.token.cancel();
            active.call.abort();
        }
        self.countdown.rewind();
        self.state = RequestState::Idle;
    }

    pub fn on_outcome(
        &mut self,
        request_id: Uuid,
        outcome: Result<ValuationResponse, TransportError>,
    ) -> Resolution {
        if !self.is_active(request_id) {
            debug!(%request_id, "Discarding outcome of a stale request");
            return Resolution::Stale;
        }

        match self.state {
            RequestState::Generating => match outcome {
                Ok(response) => {
                    self.finish(RequestState::Idle, "completed");
                    Resolution::Completed(response)
                }
                Err(TransportError::Cancelled) => {
                    self.finish(RequestState::Cancelled, "aborted by transport");
                    Resolution::Cancelled
                }
                Err(err) => {
                    warn!(%request_id, "Valuation request failed: {}", err);
                    self.finish(RequestState::Idle, "failed");
                    Resolution::Failed(err)
                }
            },
            RequestState::Cancelling => match outcome {
                Err(err) if !err.is_cancelled() => {
                    warn!(%request_id, "Valuation request failed while cancelling: {}", err);
                    self.finish(RequestState::Cancelled, "failed while cancelling");
                    Resolution::FailedWhileCancelling(err)
                }
                outcome => {
                    if outcome.is_ok() {
                        debug!(%request_id, "Result raced the cancellation; treating as acknowledgement");
                    }
                    self.finish(RequestState::Cancelled, "cancelled");
                    Resolution::Cancelled
                }
            },
            RequestState::Idle | RequestState::Cancelled => Resolution::Stale,
        }
    }

    pub fn on_tick(&mut self, request_id: Uuid) {
        if self.state == RequestState::Generating && self.is_active(request_id) {
            self.countdown.tick();
        } else {
            debug!(%request_id, "Dropping countdown tick outside its episode");
        }
    }

    fn is_active(&self, request_id: Uuid) -> bool {
        self.active.as_ref().is_some_and(|a| a.handle.id == request_id)
    }

    fn finish(&mut self, next: RequestState, verdict: &str) {
        self.countdown.stop();
        if let Some(active) = self.active.take() {
            info!(
                request_id = %active.handle.id,
                elapsed_ms = active.started_at.elapsed().as_millis() as u64,
                "Valuation request {}", verdict
            );
        }
        self.state = next;
    }
}

impl Drop for RequestController {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.handle.token.cancel();
            active.call.abort();
        }
    }
}
