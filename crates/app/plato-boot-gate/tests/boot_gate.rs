//! Boot gate decision tests
//!
//! Timing-sensitive cases run on tokio's paused clock, so the 3 s check
//! timeout and the 8 s failsafe are observed exactly rather than waited out.

mod util;

use std::{sync::Arc, time::Duration};

use plato_boot_gate::{BuildProfile, GateOutcome, GatePhase, ReadyReason};
use plato_version_check::UpdateType;
use tokio::time::Instant;
use util::*;

#[tokio::test]
async fn no_updates_opens_the_gate() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(None));
    let ota = Arc::new(RecordingOta::new(Probe::Unavailable));
    let gate = gate(authority.clone(), ota.clone());

    assert_eq!(gate.phase(), GatePhase::Checking);
    assert!(!gate.is_safe_to_render());

    let outcome = gate.run().await;

    assert_eq!(outcome, GateOutcome::Ready(ReadyReason::NoUpdate));
    assert_eq!(gate.phase(), GatePhase::Ready);
    assert!(gate.is_safe_to_render());
    assert_eq!(authority.calls(), 1);
    assert_eq!(ota.calls(), vec![OtaCall::Check]);
}

#[tokio::test]
async fn mandatory_native_blocks_and_skips_ota() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(Some(row(
        51,
        UpdateType::Native,
        true,
    ))));
    let ota = Arc::new(RecordingOta::new(Probe::Available));
    let gate = gate(authority, ota.clone());

    let outcome = gate.run().await;

    let GateOutcome::Blocked(record) = outcome else {
        panic!("expected a blocked outcome, got {:?}", outcome);
    };
    assert_eq!(record.version_code.get(), 51);
    assert!(gate.phase().is_blocked());
    assert!(!gate.is_safe_to_render());
    assert_eq!(ota.calls(), vec![OtaCall::Check]);
}

#[tokio::test(start_paused = true)]
async fn slow_mandatory_native_still_beats_fast_ota() {
    let authority = ScriptedAuthority::new(AuthorityScript::Delay(
        Duration::from_millis(2500),
        Some(row(51, UpdateType::Native, true)),
    ));
    let ota = Arc::new(RecordingOta::new(Probe::Available));
    let gate = gate(authority, ota.clone());

    let outcome = gate.run().await;

    assert!(matches!(outcome, GateOutcome::Blocked(_)));
    assert_eq!(ota.calls(), vec![OtaCall::Check]);
}

#[tokio::test]
async fn ota_patch_is_fetched_then_reloaded_once() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(None));
    let ota = Arc::new(RecordingOta::new(Probe::Available));
    let gate = gate(authority, ota.clone());

    let outcome = gate.run().await;

    assert_eq!(outcome, GateOutcome::Reloading);
    assert_eq!(
        ota.calls(),
        vec![OtaCall::Check, OtaCall::Fetch, OtaCall::Reload]
    );
    assert_eq!(gate.phase(), GatePhase::Ready);
}

#[tokio::test]
async fn optional_native_does_not_stop_ota() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(Some(row(
        51,
        UpdateType::Native,
        false,
    ))));
    let ota = Arc::new(RecordingOta::new(Probe::Available));
    let gate = gate(authority, ota.clone());

    assert_eq!(gate.run().await, GateOutcome::Reloading);
    assert_eq!(
        ota.calls(),
        vec![OtaCall::Check, OtaCall::Fetch, OtaCall::Reload]
    );
}

#[tokio::test]
async fn mandatory_ota_record_is_not_a_native_block() {
    let authority =
        ScriptedAuthority::new(AuthorityScript::Answer(Some(row(51, UpdateType::Ota, true))));
    let ota = Arc::new(RecordingOta::new(Probe::Unavailable));
    let gate = gate(authority, ota);

    assert_eq!(gate.run().await, GateOutcome::Ready(ReadyReason::NoUpdate));
    assert!(gate.is_safe_to_render());
}

#[tokio::test]
async fn failed_fetch_opens_without_reload() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(None));
    let ota = Arc::new(RecordingOta::new(Probe::Available).with_fetch(Step::Fail));
    let gate = gate(authority, ota.clone());

    let outcome = gate.run().await;

    assert_eq!(outcome, GateOutcome::Ready(ReadyReason::OtaFetchFailed));
    assert_eq!(ota.calls(), vec![OtaCall::Check, OtaCall::Fetch]);
    assert!(gate.is_safe_to_render());
}

#[tokio::test]
async fn failed_reload_opens_the_gate() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(None));
    let ota = Arc::new(RecordingOta::new(Probe::Available).with_reload(Step::Fail));
    let gate = gate(authority, ota.clone());

    assert_eq!(
        gate.run().await,
        GateOutcome::Ready(ReadyReason::OtaReloadFailed)
    );
    assert!(gate.is_safe_to_render());
}

#[tokio::test]
async fn failing_native_check_still_applies_ota() {
    let authority = ScriptedAuthority::new(AuthorityScript::Fail);
    let ota = Arc::new(RecordingOta::new(Probe::Available));
    let gate = gate(authority, ota.clone());

    assert_eq!(gate.run().await, GateOutcome::Reloading);
    assert_eq!(
        ota.calls(),
        vec![OtaCall::Check, OtaCall::Fetch, OtaCall::Reload]
    );
}

#[tokio::test]
async fn failing_ota_probe_does_not_hide_native_block() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(Some(row(
        51,
        UpdateType::Native,
        true,
    ))));
    let ota = Arc::new(RecordingOta::new(Probe::Fail));
    let gate = gate(authority, ota);

    assert!(matches!(gate.run().await, GateOutcome::Blocked(_)));
}

#[tokio::test]
async fn panicking_ota_probe_does_not_hide_native_block() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(Some(row(
        51,
        UpdateType::Native,
        true,
    ))));
    let ota = Arc::new(RecordingOta::new(Probe::Panic));
    let gate = gate(authority, ota);

    assert!(matches!(gate.run().await, GateOutcome::Blocked(_)));
}

#[tokio::test]
async fn failing_ota_probe_alone_opens_the_gate() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(None));
    let ota = Arc::new(RecordingOta::new(Probe::Fail));
    let gate = gate(authority, ota.clone());

    assert_eq!(gate.run().await, GateOutcome::Ready(ReadyReason::NoUpdate));
    assert_eq!(ota.calls(), vec![OtaCall::Check]);
}

#[tokio::test(start_paused = true)]
async fn hanging_checks_time_out_without_the_failsafe() {
    let authority = ScriptedAuthority::new(AuthorityScript::Hang);
    let ota = Arc::new(RecordingOta::new(Probe::Hang));
    let gate = gate(authority, ota.clone());
    let started = Instant::now();

    let outcome = gate.run().await;

    let elapsed = started.elapsed();
    assert_eq!(outcome, GateOutcome::Ready(ReadyReason::NoUpdate));
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_secs(3) + Duration::from_millis(50));
    assert!(gate.is_safe_to_render());
    assert_eq!(ota.calls(), vec![OtaCall::Check]);
}

#[tokio::test(start_paused = true)]
async fn hanging_ota_probe_does_not_hide_native_block() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(Some(row(
        51,
        UpdateType::Native,
        true,
    ))));
    let ota = Arc::new(RecordingOta::new(Probe::Hang));
    let gate = gate(authority, ota.clone());
    let started = Instant::now();

    let outcome = gate.run().await;

    let GateOutcome::Blocked(record) = outcome else {
        panic!("expected a blocked outcome, got {:?}", outcome);
    };
    assert_eq!(record.version_code.get(), 51);
    assert!(started.elapsed() < Duration::from_secs(8));
    assert!(!gate.is_safe_to_render());
    assert_eq!(ota.calls(), vec![OtaCall::Check]);
}

#[tokio::test(start_paused = true)]
async fn native_timeout_alone_does_not_trigger_failsafe() {
    let authority = ScriptedAuthority::new(AuthorityScript::Hang);
    let ota = Arc::new(RecordingOta::new(Probe::Unavailable));
    let gate = gate(authority, ota);
    let started = Instant::now();

    let outcome = gate.run().await;

    let elapsed = started.elapsed();
    assert_eq!(outcome, GateOutcome::Ready(ReadyReason::NoUpdate));
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn failsafe_during_fetch_never_reloads() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(None));
    let ota = Arc::new(RecordingOta::new(Probe::Available).with_fetch(Step::Hang));
    let gate = gate(authority, ota.clone());

    let started = Instant::now();

    let outcome = gate.run().await;
    assert_eq!(outcome, GateOutcome::Ready(ReadyReason::Failsafe));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(8));
    assert!(elapsed < Duration::from_secs(8) + Duration::from_millis(50));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(ota.calls(), vec![OtaCall::Check, OtaCall::Fetch]);
    assert_eq!(gate.phase(), GatePhase::Ready);
}

#[tokio::test(start_paused = true)]
async fn reload_is_not_cut_short_by_the_failsafe() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(None));
    let ota = Arc::new(
        RecordingOta::new(Probe::Available)
            .with_fetch(Step::Delay(Duration::from_secs(7)))
            .with_reload(Step::Delay(Duration::from_secs(5))),
    );
    let gate = gate(authority, ota.clone());
    let started = Instant::now();

    let outcome = gate.run().await;

    assert_eq!(outcome, GateOutcome::Reloading);
    assert!(started.elapsed() >= Duration::from_secs(12));
    assert_eq!(
        ota.calls(),
        vec![OtaCall::Check, OtaCall::Fetch, OtaCall::Reload]
    );
}

#[tokio::test]
async fn development_build_skips_all_checks() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(Some(row(
        51,
        UpdateType::Native,
        true,
    ))));
    let ota = Arc::new(RecordingOta::new(Probe::Available));
    let gate = gate_with_profile(authority.clone(), ota.clone(), BuildProfile::Development);

    let outcome = gate.run().await;

    assert_eq!(outcome, GateOutcome::Ready(ReadyReason::DevelopmentBypass));
    assert_eq!(authority.calls(), 0);
    assert!(ota.calls().is_empty());
}

#[tokio::test]
async fn second_run_reports_settled_phase_without_rechecking() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(Some(row(
        51,
        UpdateType::Native,
        true,
    ))));
    let ota = Arc::new(RecordingOta::new(Probe::Unavailable));
    let gate = gate(authority.clone(), ota.clone());

    let first = gate.run().await;
    let second = gate.run().await;

    assert_eq!(first, second);
    assert_eq!(authority.calls(), 1);
    assert_eq!(ota.calls(), vec![OtaCall::Check]);
}

#[tokio::test]
async fn subscribers_see_the_settled_phase() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(Some(row(
        51,
        UpdateType::Native,
        true,
    ))));
    let ota = Arc::new(RecordingOta::new(Probe::Unavailable));
    let gate = Arc::new(gate(authority, ota));

    let watcher = tokio::spawn({
        let gate = gate.clone();
        async move { gate.wait_settled().await }
    });
    gate.run().await;

    let seen = watcher.await.unwrap();
    assert!(seen.is_blocked());
    assert_eq!(seen, gate.phase());
}
