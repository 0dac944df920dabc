//! Valuation Workspace
//!
//! Root object owned by the host loop. Owns the parameter store, the
//! request controller, the notification center and the last result, and
//! applies every [`WorkspaceEvent`] on the host's thread of control.

use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::event::{self, EventReceiver, WorkspaceEvent};
use crate::lifecycle::{RequestController, RequestState, Resolution, SubmitOutcome};
use crate::notify::{Banner, NotificationCenter};
use crate::params::{Field, ParamError, ParameterStore, RawValue, SetOutcome};
use crate::report::{self, ResultView, ValuationResult};
use crate::request::{self, ValuationTransport};

pub const SUCCESS_MESSAGE: &str = "Valuation completed successfully!";
pub const FAILURE_MESSAGE: &str = "Error generating valuation";
pub const CANCELLED_MESSAGE: &str = "Request cancelled successfully";

pub const RUN_LABEL: &str = "Run DCF Valuation";
pub const CANCELLING_LABEL: &str = "Cancelling...";
pub const INTERRUPT_LABEL: &str = "Interrupt Valuation";

pub struct Workspace {
    store: ParameterStore,
    controller: RequestController,
    notifications: NotificationCenter,
    result: Option<ValuationResult>,
}

impl Workspace {
    /// Build a workspace and the receiver its background tasks post to.
    /// The caller must drain the receiver into [`handle_event`](Self::handle_event).
    pub fn new(config: &AppConfig, transport: Arc<dyn ValuationTransport>) -> (Self, EventReceiver) {
        let (tx, rx) = event::channel();
        let workspace = Self {
            store: ParameterStore::new(),
            controller: RequestController::new(
                transport,
                tx.clone(),
                config.countdown_seed_secs,
                config.countdown_tick(),
            ),
            notifications: NotificationCenter::new(tx, config.banner_ttl()),
            result: None,
        };
        (workspace, rx)
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn state(&self) -> RequestState {
        self.controller.state()
    }

    pub fn countdown(&self) -> Option<u32> {
        self.controller.countdown()
    }

    pub fn active_request(&self) -> Option<Uuid> {
        self.controller.handle().map(|h| h.id())
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.notifications.current()
    }

    pub fn result(&self) -> Option<&ValuationResult> {
        self.result.as_ref()
    }

    pub fn view(&self) -> Option<ResultView> {
        report::present(self.result.as_ref())
    }

    pub fn set_field(
        &mut self,
        section_key: &str,
        item_key: &str,
        field: Field,
        raw: impl Into<RawValue>,
    ) -> Result<SetOutcome, ParamError> {
        self.store.set_field(section_key, item_key, field, raw)
    }

    /// Start a valuation from the current parameters
    pub fn submit(&mut self) -> SubmitOutcome {
        let state = self.controller.state();
        if !state.accepts_submit() {
            return SubmitOutcome::Rejected(state);
        }

        self.result = None;
        self.notifications.clear();
        let payload = request::build(&self.store.snapshot());
        self.controller.submit(payload)
    }

    pub fn cancel(&mut self) -> bool {
        self.controller.cancel()
    }

    /// Restore the default catalogue and abandon any in-flight request
    pub fn reset(&mut self) {
        info!("Resetting workspace");
        self.controller.reset();
        self.store.reset();
        self.result = None;
        self.notifications.clear();
    }

    pub fn handle_event(&mut self, event: WorkspaceEvent) {
        match event {
            WorkspaceEvent::Outcome { request_id, outcome } => {
                let resolution = self.controller.on_outcome(request_id, outcome);
                self.apply(resolution);
            }
            WorkspaceEvent::CountdownTick { request_id } => self.controller.on_tick(request_id),
            WorkspaceEvent::BannerExpired { seq } => self.notifications.on_expired(seq),
        }
    }

    /// Drain whatever is already queued without waiting
    pub fn pump(&mut self, events: &mut EventReceiver) -> usize {
        let mut applied = 0;
        while let Ok(event) = events.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Label of the primary action for the current state
    pub fn run_label(&self) -> String {
        match self.controller.state() {
            RequestState::Generating => format!(
                "Running Valuation (estimated {} seconds)",
                self.controller.countdown().unwrap_or(0)
            ),
            RequestState::Cancelling => CANCELLING_LABEL.to_string(),
            RequestState::Idle | RequestState::Cancelled => RUN_LABEL.to_string(),
        }
    }

    pub fn can_interrupt(&self) -> bool {
        self.controller.state() == RequestState::Generating
    }

    fn apply(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Completed(response) => match ValuationResult::from_response(response) {
                Some(result) => {
                    info!(rows = result.summaries.len(), "Valuation result stored");
                    self.result = Some(result);
                    self.notifications.success(SUCCESS_MESSAGE);
                }
                None => {
                    error!("Valuation response carried no summary rows");
                    self.result = None;
                    self.notifications.error(FAILURE_MESSAGE);
                }
            },
            Resolution::Failed(err) => {
                error!("Error generating valuation: {}", err);
                self.result = None;
                self.notifications.error(FAILURE_MESSAGE);
            }
            Resolution::FailedWhileCancelling(err) => {
                error!("Error generating valuation during cancellation: {}", err);
                self.result = None;
                self.notifications.error(FAILURE_MESSAGE);
            }
            Resolution::Cancelled => {
                self.result = None;
                self.notifications.warning(CANCELLED_MESSAGE);
            }
            Resolution::Stale => {}
        }
    }
}
