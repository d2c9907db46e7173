//! Pipeline behavior tests for the transaction submitter.

use std::sync::Arc;

use fabric_bridge::gateway::{GatewayError, Submitter, TransactionRequest};

mod common;
use common::MockConnector;

fn quotation_request(params: &[&str]) -> TransactionRequest {
    TransactionRequest {
        organization: "Agency".to_string(),
        channel: "q1channel".to_string(),
        chaincode: "quotation".to_string(),
        msp: "AgencyMSP".to_string(),
        tx_name: "CreateQuotation".to_string(),
        tx_params: params.iter().map(|p| p.to_string()).collect(),
    }
}

#[tokio::test]
async fn submits_with_args_in_order_and_returns_json() {
    let connector = MockConnector::responding(br#"{"id":"Q-001","price":100}"#);
    let state = connector.state.clone();
    let submitter = Submitter::new(Arc::new(connector));

    let result = submitter
        .submit(&quotation_request(&["Q-001", "100"]))
        .await
        .unwrap();

    let call = state.last_call().unwrap();
    assert_eq!(call.transaction_name, "CreateQuotation");
    assert_eq!(call.args, vec!["Q-001", "100"]);
    assert_eq!(call.channel, "q1channel");
    assert_eq!(call.chaincode, "quotation");
    assert_eq!(call.msp, "AgencyMSP");

    assert_eq!(result.json().unwrap()["id"], "Q-001");
    assert_eq!(state.opened(), 1);
    assert_eq!(state.closed(), 1);
}

#[tokio::test]
async fn empty_params_invoke_transaction_name_alone() {
    let connector = MockConnector::responding(b"[]");
    let state = connector.state.clone();
    let submitter = Submitter::new(Arc::new(connector));

    let mut request = quotation_request(&[]);
    request.tx_name = "GetAllQuotations".to_string();
    submitter.submit(&request).await.unwrap();

    let call = state.last_call().unwrap();
    assert_eq!(call.transaction_name, "GetAllQuotations");
    assert!(call.args.is_empty());
}

#[tokio::test]
async fn session_released_once_on_submit_failure() {
    let connector = MockConnector::timing_out();
    let state = connector.state.clone();
    let submitter = Submitter::new(Arc::new(connector));

    let err = submitter
        .submit(&quotation_request(&["Q-001", "100"]))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::PhaseTimeout { phase: "commit status", .. }));
    assert_eq!(state.opened(), 1);
    assert_eq!(state.closed(), 1, "session must be released despite failure");
}

#[tokio::test]
async fn connect_failure_opens_no_session() {
    let connector = MockConnector::refusing_connections();
    let state = connector.state.clone();
    let submitter = Submitter::new(Arc::new(connector));

    submitter
        .submit(&quotation_request(&["Q-001", "100"]))
        .await
        .unwrap_err();

    assert_eq!(state.opened(), 0, "no transaction attempted");
    assert_eq!(state.closed(), 0, "nothing to release");
    assert!(state.last_call().is_none());
}

#[tokio::test]
async fn non_json_result_still_succeeds_and_releases() {
    let connector = MockConnector::responding(b"committed, no payload");
    let state = connector.state.clone();
    let submitter = Submitter::new(Arc::new(connector));

    let result = submitter
        .submit(&quotation_request(&["Q-001", "100"]))
        .await
        .unwrap();

    assert!(result.json().is_none());
    assert_eq!(result.text(), "committed, no payload");
    assert_eq!(state.closed(), 1, "decode failure must not skip cleanup");
}

#[tokio::test]
async fn empty_transaction_name_is_rejected_before_connecting() {
    let connector = MockConnector::responding(b"{}");
    let state = connector.state.clone();
    let submitter = Submitter::new(Arc::new(connector));

    let mut request = quotation_request(&[]);
    request.tx_name = String::new();
    let err = submitter.submit(&request).await.unwrap_err();

    assert!(matches!(err, GatewayError::InvalidRequest(_)));
    assert_eq!(state.opened(), 0);
}

#[tokio::test]
async fn evaluate_runs_same_pipeline_shape() {
    let connector = MockConnector::responding(br#"{"count":3}"#);
    let state = connector.state.clone();
    let submitter = Submitter::new(Arc::new(connector));

    let mut request = quotation_request(&[]);
    request.tx_name = "GetAllQuotations".to_string();
    let result = submitter.evaluate(&request).await.unwrap();

    assert_eq!(result.json().unwrap()["count"], 3);
    assert_eq!(state.opened(), 1);
    assert_eq!(state.closed(), 1);
}
