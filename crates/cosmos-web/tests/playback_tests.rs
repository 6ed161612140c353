// Host-side tests for the play button's one-shot audio setup.

use cosmos_web::playback::AudioGate;

#[test]
fn failed_setup_is_reported_once_and_never_retried() {
    let mut gate = AudioGate::default();
    let mut attempts = 0;
    for _ in 0..3 {
        let ready = gate.ensure(|| {
            attempts += 1;
            Err::<(), _>("no AudioContext")
        });
        assert!(!ready);
    }
    assert_eq!(attempts, 1);
    assert_eq!(gate, AudioGate::Failed);
}

#[test]
fn successful_setup_runs_once() {
    let mut gate = AudioGate::default();
    let mut attempts = 0;
    for _ in 0..3 {
        assert!(gate.ensure(|| {
            attempts += 1;
            Ok::<(), String>(())
        }));
    }
    assert_eq!(attempts, 1);
    assert_eq!(gate, AudioGate::Attached);
}
