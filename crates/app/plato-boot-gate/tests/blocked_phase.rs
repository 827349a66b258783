//! Behaviour of the gate while a mandatory native update is pending

mod util;

use std::sync::Arc;

use parking_lot::Mutex;
use plato_boot_gate::{BackPressOutcome, GateError, GatePhase, UrlOpener};
use plato_version_check::UpdateType;
use url::Url;
use util::*;

#[derive(Default)]
struct RecordingOpener {
    opened: Mutex<Vec<Url>>,
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &Url) -> Result<(), String> {
        self.opened.lock().push(url.clone());
        Ok(())
    }
}

async fn blocked_gate() -> plato_boot_gate::BootGate {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(Some(row(
        60,
        UpdateType::Native,
        true,
    ))));
    let gate = gate(authority, Arc::new(RecordingOta::new(Probe::Unavailable)));
    gate.run().await;
    gate
}

#[tokio::test]
async fn back_press_is_suppressed_and_phase_kept() {
    let gate = blocked_gate().await;
    let before = gate.phase();
    assert!(before.is_blocked());

    for _ in 0..3 {
        assert_eq!(gate.handle_back_press(), BackPressOutcome::Suppressed);
    }

    assert_eq!(gate.phase(), before);
    assert!(!gate.is_safe_to_render());
}

#[tokio::test]
async fn back_press_passes_through_once_ready() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(None));
    let gate = gate(authority, Arc::new(RecordingOta::new(Probe::Unavailable)));

    assert_eq!(gate.handle_back_press(), BackPressOutcome::PassThrough);
    gate.run().await;
    assert_eq!(gate.handle_back_press(), BackPressOutcome::PassThrough);
    assert_eq!(gate.phase(), GatePhase::Ready);
}

#[tokio::test]
async fn blocked_screen_shows_release_details() {
    let gate = blocked_gate().await;

    let screen = gate.blocked_screen().expect("blocked gate has a screen");

    assert_eq!(screen.version_name, "5.60.0");
    assert_eq!(screen.message, "Kitchen display protocol changed");
    assert!(screen.download_url.is_some());
}

#[tokio::test]
async fn download_action_opens_store_page() {
    let gate = blocked_gate().await;
    let opener = RecordingOpener::default();

    gate.open_download(&opener).unwrap();

    let opened = opener.opened.lock();
    assert_eq!(
        opened.first().map(Url::as_str),
        Some("https://play.google.com/store/apps/details?id=app.plato")
    );
    assert!(gate.phase().is_blocked());
}

#[tokio::test]
async fn no_screen_or_download_when_ready() {
    let authority = ScriptedAuthority::new(AuthorityScript::Answer(None));
    let gate = gate(authority, Arc::new(RecordingOta::new(Probe::Unavailable)));
    gate.run().await;

    assert!(gate.blocked_screen().is_none());
    assert!(matches!(
        gate.open_download(&RecordingOpener::default()),
        Err(GateError::NotBlocked)
    ));
}
