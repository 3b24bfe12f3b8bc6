//! Tests for the guarded reconfiguration procedure
//!
//! A scripted fake client records the exact ordered call sequence so the
//! tests can assert the procedure's call-level contract: which device calls
//! happen, in which order, with which payload.

use std::sync::Mutex;

use async_trait::async_trait;

use devnet_core::{AdminState, InterfaceId, InterfaceSnapshot};
use devnet_transport::{InterfaceConfigClient, RawInterfaceConfig, TransportError};

use crate::procedure::{reconfigure, ProcedureError, ReconfigureOutcome};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Fetch,
    Shut,
    Unshut,
    Apply(InterfaceSnapshot),
}

#[derive(Default)]
struct FakeClient {
    current: RawInterfaceConfig,
    fail_fetch: bool,
    fail_shut: bool,
    /// Fail the nth apply_config call (1-based); the first apply is the
    /// modify, the second is the rollback push
    fail_apply_calls: Vec<usize>,
    fail_first_unshut: bool,
    calls: Mutex<Vec<Call>>,
    apply_count: Mutex<usize>,
    unshut_count: Mutex<usize>,
}

impl FakeClient {
    fn with_current(current: InterfaceSnapshot) -> Self {
        Self {
            current: RawInterfaceConfig {
                description: Some(current.description),
                ip_address: Some(current.ip_address),
                subnet_mask: Some(current.subnet_mask),
                admin_state: Some(AdminState::Up),
            },
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn simulated_error(step: &str) -> TransportError {
        TransportError::DeviceError {
            message: format!("simulated {} failure", step),
        }
    }
}

#[async_trait]
impl InterfaceConfigClient for FakeClient {
    async fn fetch_interface(
        &self,
        _id: &InterfaceId,
    ) -> Result<RawInterfaceConfig, TransportError> {
        self.record(Call::Fetch);
        if self.fail_fetch {
            return Err(Self::simulated_error("fetch"));
        }
        Ok(self.current.clone())
    }

    async fn set_admin_state(
        &self,
        _id: &InterfaceId,
        state: AdminState,
    ) -> Result<(), TransportError> {
        match state {
            AdminState::Down => {
                self.record(Call::Shut);
                if self.fail_shut {
                    return Err(Self::simulated_error("shut"));
                }
            }
            AdminState::Up => {
                self.record(Call::Unshut);
                let mut count = self.unshut_count.lock().unwrap();
                *count += 1;
                if self.fail_first_unshut && *count == 1 {
                    return Err(Self::simulated_error("un-shut"));
                }
            }
        }
        Ok(())
    }

    async fn apply_config(
        &self,
        _id: &InterfaceId,
        fields: &InterfaceSnapshot,
    ) -> Result<(), TransportError> {
        self.record(Call::Apply(fields.clone()));
        let mut count = self.apply_count.lock().unwrap();
        *count += 1;
        if self.fail_apply_calls.contains(&count) {
            return Err(Self::simulated_error("modify"));
        }
        Ok(())
    }
}

fn iface(id: &str) -> InterfaceId {
    InterfaceId::new(id)
}

fn snapshot(desc: &str, ip: &str, mask: &str) -> InterfaceSnapshot {
    InterfaceSnapshot::new(desc, ip, mask)
}

fn desired() -> InterfaceSnapshot {
    snapshot("new", "10.0.0.2", "255.255.255.0")
}

fn original() -> InterfaceSnapshot {
    snapshot("old", "10.0.0.1", "255.255.255.0")
}

#[tokio::test]
async fn test_management_guard_refuses_without_io() {
    let client = FakeClient::with_current(original());
    let result = reconfigure(&client, &iface("1"), &desired(), &iface("1")).await;

    assert!(matches!(
        result,
        Err(ProcedureError::RefusedManagementInterface { .. })
    ));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_matching_config_is_a_noop() {
    let client = FakeClient::with_current(desired());
    let outcome = reconfigure(&client, &iface("2"), &desired(), &iface("1"))
        .await
        .unwrap();

    assert_eq!(outcome, ReconfigureOutcome::NoChangeNeeded);
    assert_eq!(client.calls(), vec![Call::Fetch]);
}

#[tokio::test]
async fn test_successful_reconfiguration_sequence() {
    let client = FakeClient::with_current(original());
    let outcome = reconfigure(&client, &iface("2"), &desired(), &iface("1"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReconfigureOutcome::Reconfigured {
            previous: original()
        }
    );
    assert_eq!(
        client.calls(),
        vec![
            Call::Fetch,
            Call::Shut,
            Call::Apply(desired()),
            Call::Unshut,
        ]
    );
}

#[tokio::test]
async fn test_fetch_failure_stops_before_mutation() {
    let client = FakeClient {
        fail_fetch: true,
        ..FakeClient::with_current(original())
    };
    let result = reconfigure(&client, &iface("2"), &desired(), &iface("1")).await;

    assert!(matches!(
        result,
        Err(ProcedureError::ConfigFetchFailed { .. })
    ));
    assert_eq!(client.calls(), vec![Call::Fetch]);
}

#[tokio::test]
async fn test_modify_failure_rolls_back_and_brings_up() {
    let client = FakeClient {
        fail_apply_calls: vec![1],
        ..FakeClient::with_current(original())
    };
    let err = reconfigure(&client, &iface("2"), &desired(), &iface("1"))
        .await
        .unwrap_err();

    match err {
        ProcedureError::ReconfigurationFailed { cause, rollback } => {
            assert!(cause.to_string().contains("simulated modify failure"));
            assert!(rollback.config_restored);
            assert!(rollback.interface_up);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        client.calls(),
        vec![
            Call::Fetch,
            Call::Shut,
            Call::Apply(desired()),
            Call::Apply(original()),
            Call::Unshut,
        ]
    );
}

#[tokio::test]
async fn test_rollback_failure_keeps_original_cause() {
    let client = FakeClient {
        // modify fails, and so does the rollback push
        fail_apply_calls: vec![1, 2],
        ..FakeClient::with_current(original())
    };
    let err = reconfigure(&client, &iface("2"), &desired(), &iface("1"))
        .await
        .unwrap_err();

    match err {
        ProcedureError::ReconfigurationFailed { cause, rollback } => {
            assert!(cause.to_string().contains("simulated modify failure"));
            assert!(!rollback.config_restored);
            // un-shut is still attempted after the failed rollback push
            assert!(rollback.interface_up);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        client.calls(),
        vec![
            Call::Fetch,
            Call::Shut,
            Call::Apply(desired()),
            Call::Apply(original()),
            Call::Unshut,
        ]
    );
}

#[tokio::test]
async fn test_shut_failure_enters_rollback_branch() {
    let client = FakeClient {
        fail_shut: true,
        ..FakeClient::with_current(original())
    };
    let err = reconfigure(&client, &iface("2"), &desired(), &iface("1"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProcedureError::ReconfigurationFailed { .. }
    ));
    // nothing changed yet, but the rollback branch still runs in full
    assert_eq!(
        client.calls(),
        vec![
            Call::Fetch,
            Call::Shut,
            Call::Apply(original()),
            Call::Unshut,
        ]
    );
}

#[tokio::test]
async fn test_unshut_failure_rolls_back() {
    let client = FakeClient {
        fail_first_unshut: true,
        ..FakeClient::with_current(original())
    };
    let err = reconfigure(&client, &iface("2"), &desired(), &iface("1"))
        .await
        .unwrap_err();

    match err {
        ProcedureError::ReconfigurationFailed { cause, rollback } => {
            assert!(cause.to_string().contains("un-shut"));
            assert!(rollback.config_restored);
            assert!(rollback.interface_up);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        client.calls(),
        vec![
            Call::Fetch,
            Call::Shut,
            Call::Apply(desired()),
            Call::Unshut,
            Call::Apply(original()),
            Call::Unshut,
        ]
    );
}

#[tokio::test]
async fn test_missing_fetched_fields_compare_as_empty() {
    // Device reports nothing for any field; a desired state of empty strings
    // therefore matches and no mutation happens.
    let client = FakeClient::default();
    let outcome = reconfigure(
        &client,
        &iface("2"),
        &snapshot("", "", ""),
        &iface("1"),
    )
    .await
    .unwrap();

    assert_eq!(outcome, ReconfigureOutcome::NoChangeNeeded);
    assert_eq!(client.calls(), vec![Call::Fetch]);
}

#[tokio::test]
async fn test_partial_field_difference_triggers_full_sequence() {
    // Only the description differs; the full payload is still sent.
    let current = snapshot("old", "10.0.0.2", "255.255.255.0");
    let client = FakeClient::with_current(current);
    let outcome = reconfigure(&client, &iface("2"), &desired(), &iface("1"))
        .await
        .unwrap();

    assert!(matches!(outcome, ReconfigureOutcome::Reconfigured { .. }));
    assert_eq!(
        client.calls(),
        vec![
            Call::Fetch,
            Call::Shut,
            Call::Apply(desired()),
            Call::Unshut,
        ]
    );
}
