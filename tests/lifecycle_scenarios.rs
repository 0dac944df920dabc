//! End-to-end lifecycle scenarios against a scripted transport.

mod common;

use std::time::Duration;
use uuid::Uuid;

use common::{five_row_response, settle, workspace, ScriptedTransport};
use dcf_valuation::event::WorkspaceEvent;
use dcf_valuation::lifecycle::SubmitOutcome;
use dcf_valuation::notify::Severity;
use dcf_valuation::params::{Field, ParameterStore, RawValue};
use dcf_valuation::request::TransportError;
use dcf_valuation::workspace::{CANCELLED_MESSAGE, FAILURE_MESSAGE, SUCCESS_MESSAGE};
use dcf_valuation::RequestState;

#[tokio::test]
async fn test_edited_parameter_reaches_payload() {
    let transport = ScriptedTransport::new();
    transport.reply(Ok(five_row_response()));
    let (mut ws, mut events) = workspace(&transport);

    ws.set_field("capitalStructure", "risk_free_rate", Field::Mean, "0.05").unwrap();
    ws.set_field("capitalStructure", "risk_free_rate", Field::Std, 0.002).unwrap();
    let item = ws.store().item("capitalStructure", "risk_free_rate").unwrap();
    assert_eq!(item.distribution().get(Field::Mean), Some(&RawValue::Text("0.05".into())));
    assert_eq!(item.distribution().get(Field::Std), Some(&RawValue::Number(0.002)));

    ws.submit();
    settle(&mut ws, &mut events).await;

    let request = transport.last_request().unwrap();
    assert_eq!(request.input_list.len(), 37);
    let entry = request.input_list.iter().find(|e| e.id == "risk_free_rate").unwrap();
    assert_eq!(entry.values.get(Field::Mean), Some(Some(0.05)));
    assert_eq!(entry.values.get(Field::Std), Some(Some(0.002)));
}

#[tokio::test]
async fn test_success_stores_five_rows() {
    let transport = ScriptedTransport::new();
    transport.reply(Ok(five_row_response()));
    let (mut ws, mut events) = workspace(&transport);

    assert!(matches!(ws.submit(), SubmitOutcome::Started(_)));
    settle(&mut ws, &mut events).await;

    assert_eq!(ws.state(), RequestState::Idle);
    assert!(ws.active_request().is_none());
    let banner = ws.banner().unwrap();
    assert_eq!(banner.message, SUCCESS_MESSAGE);
    assert_eq!(banner.severity, Severity::Success);

    let view = ws.view().unwrap();
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.rows[2].label, "P50");
    assert_eq!(view.rows[2].equity_value, "51,016.00");
    assert_eq!(view.rows[2].pnl, "-6.42%");
    assert_eq!(view.market_cap, "54,500.00");
    let names: Vec<&str> = view.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["histogram", "cdf", "roic", "return"]);
    assert!(view.reports[0].html.contains("width: 100%"));
    assert!(view.reports[0].html.contains("height: 600px"));
}

#[tokio::test]
async fn test_failure_clears_result() {
    let transport = ScriptedTransport::new();
    transport.reply(Ok(five_row_response()));
    transport.reply(Err(TransportError::Network("connection reset".into())));
    let (mut ws, mut events) = workspace(&transport);

    ws.submit();
    settle(&mut ws, &mut events).await;
    assert!(ws.result().is_some());

    ws.submit();
    // A new submission hides the previous result right away.
    assert!(ws.result().is_none());
    settle(&mut ws, &mut events).await;

    assert_eq!(ws.state(), RequestState::Idle);
    assert!(ws.result().is_none());
    assert_eq!(ws.banner().unwrap().message, FAILURE_MESSAGE);
    assert_eq!(ws.banner().unwrap().severity, Severity::Error);
}

#[tokio::test]
async fn test_submit_cancel_ack() {
    let transport = ScriptedTransport::new();
    let _gate = transport.gate(true);
    let (mut ws, mut events) = workspace(&transport);

    ws.submit();
    assert_eq!(ws.state(), RequestState::Generating);
    assert!(ws.cancel());
    assert_eq!(ws.state(), RequestState::Cancelling);
    assert_eq!(ws.run_label(), "Cancelling...");
    assert!(!ws.can_interrupt());

    settle(&mut ws, &mut events).await;

    assert_eq!(ws.state(), RequestState::Cancelled);
    assert!(ws.result().is_none());
    assert!(ws.active_request().is_none());
    let banner = ws.banner().unwrap();
    assert_eq!(banner.message, CANCELLED_MESSAGE);
    assert_eq!(banner.severity, Severity::Warning);
}

#[tokio::test]
async fn test_success_racing_cancel_is_acknowledgement() {
    let transport = ScriptedTransport::new();
    let gate = transport.gate(false);
    let (mut ws, mut events) = workspace(&transport);

    ws.submit();
    ws.cancel();
    gate.release(Ok(five_row_response()));
    settle(&mut ws, &mut events).await;

    assert_eq!(ws.state(), RequestState::Cancelled);
    assert!(ws.result().is_none());
    assert_eq!(ws.banner().unwrap().message, CANCELLED_MESSAGE);
}

#[tokio::test]
async fn test_failure_racing_cancel_still_reports_error() {
    let transport = ScriptedTransport::new();
    let gate = transport.gate(false);
    let (mut ws, mut events) = workspace(&transport);

    ws.submit();
    ws.cancel();
    gate.release(Err(TransportError::Network("connection reset".into())));
    settle(&mut ws, &mut events).await;

    assert_eq!(ws.state(), RequestState::Cancelled);
    assert!(ws.result().is_none());
    assert!(ws.active_request().is_none());
    let banner = ws.banner().unwrap();
    assert_eq!(banner.message, FAILURE_MESSAGE);
    assert_eq!(banner.severity, Severity::Error);
}

#[tokio::test]
async fn test_resubmit_after_cancel() {
    let transport = ScriptedTransport::new();
    let _gate = transport.gate(true);
    transport.reply(Ok(five_row_response()));
    let (mut ws, mut events) = workspace(&transport);

    let SubmitOutcome::Started(first) = ws.submit() else { panic!("first submit") };
    ws.cancel();
    settle(&mut ws, &mut events).await;

    let SubmitOutcome::Started(second) = ws.submit() else { panic!("resubmit") };
    assert_ne!(first, second);
    assert_eq!(ws.countdown(), Some(30));
    settle(&mut ws, &mut events).await;

    assert_eq!(ws.state(), RequestState::Idle);
    assert_eq!(ws.view().unwrap().rows.len(), 5);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_stale_outcomes_leave_state_alone() {
    let transport = ScriptedTransport::new();
    let _gate = transport.gate(true);
    let (mut ws, _events) = workspace(&transport);

    let SubmitOutcome::Started(active) = ws.submit() else { panic!() };

    ws.handle_event(WorkspaceEvent::Outcome {
        request_id: Uuid::new_v4(),
        outcome: Ok(five_row_response()),
    });
    ws.handle_event(WorkspaceEvent::Outcome {
        request_id: Uuid::new_v4(),
        outcome: Err(TransportError::Network("late".into())),
    });

    assert_eq!(ws.state(), RequestState::Generating);
    assert_eq!(ws.active_request(), Some(active));
    assert!(ws.result().is_none());
    assert!(ws.banner().is_none());
}

#[tokio::test]
async fn test_reset_abandons_request_and_restores_catalogue() {
    let transport = ScriptedTransport::new();
    let _gate = transport.gate(false);
    let (mut ws, mut events) = workspace(&transport);

    ws.set_field("capitalStructure", "ERP", Field::Mean, "0.1").unwrap();
    let SubmitOutcome::Started(abandoned) = ws.submit() else { panic!() };
    ws.reset();

    assert_eq!(ws.state(), RequestState::Idle);
    assert_eq!(ws.store().snapshot(), ParameterStore::new().snapshot());

    // Anything the abandoned request might still post is stale.
    ws.handle_event(WorkspaceEvent::Outcome {
        request_id: abandoned,
        outcome: Ok(five_row_response()),
    });
    assert!(ws.result().is_none());
    assert_eq!(ws.pump(&mut events), 0);
}

#[tokio::test(start_paused = true)]
async fn test_submit_while_generating_does_not_restart_countdown() {
    let transport = ScriptedTransport::new();
    let _gate = transport.gate(true);
    let (mut ws, mut events) = workspace(&transport);

    let SubmitOutcome::Started(active) = ws.submit() else { panic!() };
    tokio::time::sleep(Duration::from_millis(3500)).await;
    ws.pump(&mut events);
    assert_eq!(ws.countdown(), Some(27));
    assert_eq!(ws.run_label(), "Running Valuation (estimated 27 seconds)");

    assert_eq!(ws.submit(), SubmitOutcome::Rejected(RequestState::Generating));
    assert_eq!(ws.active_request(), Some(active));
    assert_eq!(ws.countdown(), Some(27));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_saturates_and_never_times_out() {
    let transport = ScriptedTransport::new();
    let _gate = transport.gate(true);
    let (mut ws, mut events) = workspace(&transport);

    ws.submit();
    tokio::time::sleep(Duration::from_secs(45)).await;
    ws.pump(&mut events);

    assert_eq!(ws.countdown(), Some(0));
    assert_eq!(ws.state(), RequestState::Generating);
    assert!(ws.banner().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_after_leaving_generating() {
    let transport = ScriptedTransport::new();
    let _gate = transport.gate(true);
    let (mut ws, mut events) = workspace(&transport);

    ws.submit();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    ws.pump(&mut events);
    assert_eq!(ws.countdown(), Some(29));

    ws.cancel();
    assert_eq!(ws.countdown(), None);
    settle(&mut ws, &mut events).await;

    tokio::time::sleep(Duration::from_secs(10)).await;
    while let Ok(event) = events.try_recv() {
        assert!(
            !matches!(event, WorkspaceEvent::CountdownTick { .. }),
            "tick after the request left generating"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_banner_expires_after_three_seconds() {
    let transport = ScriptedTransport::new();
    transport.reply(Ok(five_row_response()));
    let (mut ws, mut events) = workspace(&transport);

    ws.submit();
    settle(&mut ws, &mut events).await;
    assert!(ws.banner().is_some());

    tokio::time::sleep(Duration::from_millis(2900)).await;
    ws.pump(&mut events);
    assert!(ws.banner().is_some());

    tokio::time::sleep(Duration::from_millis(200)).await;
    ws.pump(&mut events);
    assert!(ws.banner().is_none());
    // The result outlives its banner.
    assert!(ws.result().is_some());
}
