//! Integration tests for simulation building and execution
//!
//! Exercises the full path from builder to enriched result over a scripted
//! transport:
//! - Validation failures surface before any transport invocation
//! - Block selector exclusivity holds in either order
//! - Successful responses are parsed and enriched

mod common;

use alloy_primitives::U256;
use common::*;

use altitrace_sdk::{
    errors::ClientError,
    types::{BlockTag, TransactionCall},
    ValidationError,
};

const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const SENDER: &str = "0xC255fC198eEdAC7AF8aF0f6e0ca781794B094A61";

#[tokio::test]
async fn malformed_address_fails_before_any_network_call() {
    let transport = MockTransport::new(vec![]);
    let client = test_client(transport.clone());

    let result = client
        .simulate()
        .call(TransactionCall::new().to("0x1234"))
        .execute()
        .await;

    match result {
        Err(ClientError::Validation(ValidationError::InvalidAddress(addr))) => {
            assert_eq!(addr, "0x1234");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(transport.invocations(), 0);
}

#[tokio::test]
async fn empty_call_list_fails_before_any_network_call() {
    let transport = MockTransport::new(vec![]);
    let client = test_client(transport.clone());

    let result = client.simulate().execute().await;
    assert!(matches!(
        result,
        Err(ClientError::Validation(ValidationError::NoCalls))
    ));
    assert_eq!(transport.invocations(), 0);
}

#[tokio::test]
async fn block_number_and_tag_conflict_in_either_order() {
    let transport = MockTransport::new(vec![]);
    let client = test_client(transport.clone());

    let number_first = client
        .simulate()
        .call(TransactionCall::new().to(USDC))
        .block_number("0x10")
        .block_tag(BlockTag::Latest)
        .build();
    assert_eq!(number_first.unwrap_err(), ValidationError::BlockSelectorConflict);

    let tag_first = client
        .simulate()
        .call(TransactionCall::new().to(USDC))
        .block_tag(BlockTag::Latest)
        .block_number("0x10")
        .build();
    assert_eq!(tag_first.unwrap_err(), ValidationError::BlockSelectorConflict);

    assert_eq!(transport.invocations(), 0);
}

#[tokio::test]
async fn asset_tracing_without_account_is_rejected() {
    let transport = MockTransport::new(vec![]);
    let client = test_client(transport.clone());

    let result = client
        .simulate()
        .call(TransactionCall::new().to(USDC))
        .trace_asset_changes(true)
        .execute()
        .await;
    assert!(matches!(
        result,
        Err(ClientError::Validation(ValidationError::AccountRequired))
    ));
    assert_eq!(transport.invocations(), 0);
}

#[tokio::test]
async fn repeated_state_overrides_merge_per_address() {
    use altitrace_sdk::types::StateOverride;

    let transport = MockTransport::new(vec![]);
    let client = test_client(transport);

    let request = client
        .simulate()
        .call(TransactionCall::new().to(USDC))
        .with_state_override(StateOverride::for_address(USDC).balance("0x1e8480"))
        .with_state_override(StateOverride::for_address(USDC.to_ascii_lowercase()).nonce(7))
        .build()
        .unwrap();

    // Same address twice: fields merge into one entry, no duplicates
    let overrides = request.options.unwrap().state_overrides.unwrap();
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].balance.as_deref(), Some("0x1e8480"));
    assert_eq!(overrides[0].nonce, Some(7));
}

#[tokio::test]
async fn successful_simulation_is_parsed_and_enriched() {
    let transport = MockTransport::new(vec![MockOutcome::ok(success_envelope(
        simulation_result_json("sim_01", "success", "0x5208"),
    ))]);
    let client = test_client(transport.clone());

    let result = client
        .simulate()
        .call(TransactionCall::new().from(SENDER).to(USDC).data("0xa9059cbb"))
        .validation(true)
        .block_tag(BlockTag::Latest)
        .execute()
        .await
        .unwrap();

    assert!(result.is_success());
    assert!(!result.is_failed());
    assert_eq!(result.total_gas_used().unwrap(), U256::from(21000u64));
    assert_eq!(result.raw().simulation_id, "sim_01");
    assert_eq!(transport.invocations(), 1);
    assert_eq!(transport.seen_paths(), vec!["/simulate".to_string()]);
}

#[tokio::test]
async fn execute_twice_reissues_the_request() {
    let transport = MockTransport::new(vec![
        MockOutcome::ok(success_envelope(simulation_result_json("sim_01", "success", "0x5208"))),
        MockOutcome::ok(success_envelope(simulation_result_json("sim_02", "success", "0x5208"))),
    ]);
    let client = test_client(transport.clone());

    let builder = client.simulate().call(TransactionCall::new().to(USDC));
    let first = builder.execute().await.unwrap();
    let second = builder.execute().await.unwrap();

    // No caching: each execute hits the transport again
    assert_eq!(first.raw().simulation_id, "sim_01");
    assert_eq!(second.raw().simulation_id, "sim_02");
    assert_eq!(transport.invocations(), 2);
}

#[tokio::test]
async fn api_failure_envelope_becomes_typed_error() {
    let transport = MockTransport::new(vec![MockOutcome::status(
        400,
        error_envelope("INVALID_TRANSACTION", "Transaction validation failed"),
    )]);
    let client = test_client(transport.clone());

    let result = client
        .simulate()
        .call(TransactionCall::new().to(USDC))
        .execute()
        .await;

    match result {
        Err(ClientError::Api(api)) => {
            assert_eq!(api.code, "INVALID_TRANSACTION");
            assert_eq!(api.status, 400);
        }
        other => panic!("expected api error, got {other:?}"),
    }
    // 400 is not retryable
    assert_eq!(transport.invocations(), 1);
}

#[tokio::test]
async fn simulate_many_hits_the_batch_endpoint_once() {
    use altitrace_sdk::types::{SimulationParams, SimulationRequest};

    let transport = MockTransport::new(vec![MockOutcome::ok(success_envelope(
        serde_json::json!([
            simulation_result_json("sim_0", "success", "0x5208"),
            simulation_result_json("sim_1", "success", "0x5208"),
        ]),
    ))]);
    let client = test_client(transport.clone());

    let request = SimulationRequest {
        params: SimulationParams {
            calls: vec![TransactionCall::new().to(USDC)],
            ..SimulationParams::default()
        },
        options: None,
    };
    let results = client
        .simulate_many(&[request.clone(), request])
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_success()));
    // One round trip for the whole batch
    assert_eq!(transport.invocations(), 1);
    assert_eq!(transport.seen_paths(), vec!["/simulate/batch".to_string()]);
}

#[tokio::test]
async fn health_check_round_trips() {
    let transport = MockTransport::new(vec![MockOutcome::ok(success_envelope(
        serde_json::json!({"status": "healthy", "version": "0.3.0", "uptime": 120}),
    ))]);
    let client = test_client(transport.clone());

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version.as_deref(), Some("0.3.0"));
    assert_eq!(transport.seen_paths(), vec!["/health".to_string()]);
}
