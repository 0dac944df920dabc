#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use dcf_valuation::config::AppConfig;
use dcf_valuation::event::EventReceiver;
use dcf_valuation::request::{
    CancellationToken, TransportError, ValuationRequest, ValuationResponse, ValuationTransport,
};
use dcf_valuation::Workspace;

pub type Outcome = Result<ValuationResponse, TransportError>;

/// Five percentile rows and four reports, in the service's display order.
pub const FIVE_ROW_RESPONSE: &str = r#"{
    "valuation_summary": [
        {"percentiles": 10, "equity_value": 41250.5, "equity_value_per_share": 120.12, "Price/Value": 1.32, "PNL": -24.5, "current_market_cap": 54500.0, "current_price_per_share": 158.75},
        {"percentiles": 20, "equity_value": 45010.25, "equity_value_per_share": 131.07, "Price/Value": 1.21, "PNL": -17.4, "current_market_cap": 54500.0, "current_price_per_share": 158.75},
        {"percentiles": 50, "equity_value": 51016.0, "equity_value_per_share": 148.56, "Price/Value": 1.07, "PNL": -6.42, "current_market_cap": 54500.0, "current_price_per_share": 158.75},
        {"percentiles": 80, "equity_value": 57120.75, "equity_value_per_share": 166.34, "Price/Value": 0.95, "PNL": 4.81, "current_market_cap": 54500.0, "current_price_per_share": 158.75},
        {"percentiles": 90, "equity_value": 60987.0, "equity_value_per_share": 177.6, "Price/Value": 0.89, "PNL": 11.9, "current_market_cap": 54500.0, "current_price_per_share": 158.75}
    ],
    "plots": {
        "histogram": {"html": "<div style=\"width: 900px; height: 450px\">h</div>"},
        "cdf": {"html": "<div style=\"width: 900px; height: 450px\">c</div>"},
        "roic": {"html": "<div style=\"width: 900px\">r</div>"},
        "return": {"html": "<div>t</div>"}
    }
}"#;

pub fn five_row_response() -> ValuationResponse {
    serde_json::from_str(FIVE_ROW_RESPONSE).expect("fixture parses")
}

enum Step {
    Reply(Outcome),
    Gate {
        release: oneshot::Receiver<Outcome>,
        honour_cancel: bool,
    },
}

/// Hand to a test so it decides when, and with what, a gated call answers
pub struct Gate {
    tx: oneshot::Sender<Outcome>,
}

impl Gate {
    pub fn release(self, outcome: Outcome) {
        let _ = self.tx.send(outcome);
    }
}

/// In-memory transport answering calls from a script, in order.
/// Unscripted calls fail with a network error.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<ValuationRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, outcome: Outcome) -> &Self {
        self.steps.lock().unwrap().push_back(Step::Reply(outcome));
        self
    }

    /// Next call waits for the returned gate. With `honour_cancel`
    /// it also returns `Cancelled` as soon as its token fires.
    pub fn gate(&self, honour_cancel: bool) -> Gate {
        let (tx, release) = oneshot::channel();
        self.steps.lock().unwrap().push_back(Step::Gate {
            release,
            honour_cancel,
        });
        Gate { tx }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ValuationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ValuationTransport for ScriptedTransport {
    async fn evaluate(&self, request: ValuationRequest, cancel: CancellationToken) -> Outcome {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            None => Err(TransportError::Network("no scripted reply".into())),
            Some(Step::Reply(outcome)) => outcome,
            Some(Step::Gate { release, honour_cancel: true }) => tokio::select! {
                _ = cancel.cancelled() => Err(TransportError::Cancelled),
                released = release => released.unwrap_or(Err(TransportError::Network("gate dropped".into()))),
            },
            Some(Step::Gate { release, honour_cancel: false }) => release
                .await
                .unwrap_or(Err(TransportError::Network("gate dropped".into()))),
        }
    }
}

pub fn workspace(transport: &ScriptedTransport) -> (Workspace, EventReceiver) {
    Workspace::new(&AppConfig::default(), Arc::new(transport.clone()))
}

/// Feed events to the workspace until its request settles
pub async fn settle(workspace: &mut Workspace, events: &mut EventReceiver) {
    while workspace.state().is_in_flight() {
        let event = events.recv().await.expect("event channel closed");
        workspace.handle_event(event);
    }
}
