//! Tests for the watcher lifecycle: tail + parse composed over a live file

use sc_log_monitor::{EventFilter, EventKind, LogWatcher};

const KILL_LINE: &str =
    "<2025-12-01T14:30:22.123Z> <Actor Death> CActor::Kill: 'Rival456' [1] in zone 'AEGS_Sabre_07' killed by 'Hero123' [2] with damage type 'Ballistic'";
const JUMP_LINE: &str =
    "<2025-12-01T14:31:00.000Z> <Jump Drive Changing State> from REQUEST_JUMP to JUMP_DRIVE_ENGAGED";
const CHATTER_LINE: &str = "<2025-12-01T14:31:05.000Z> CIdleManager: nothing happening here";

#[test]
fn test_watch_appended_events() {
    // Given: a started watcher over an empty log
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut watcher = LogWatcher::new();
    watcher.start(file.path().to_str().unwrap(), false).unwrap();
    assert!(watcher.is_running());

    // When: the game appends a kill, a jump, and some chatter
    let body = format!("{}\n{}\n{}\n", KILL_LINE, JUMP_LINE, CHATTER_LINE);
    std::fs::write(file.path(), &body).unwrap();
    let outcome = watcher.poll_once(Some("Hero123")).unwrap();

    // Then: two classified events in log order, no reset
    assert!(!outcome.reset);
    assert_eq!(outcome.events.len(), 2);
    assert!(matches!(outcome.events[0].kind, EventKind::PvpKill(_)));
    assert!(matches!(outcome.events[1].kind, EventKind::Jump { .. }));
}

#[test]
fn test_truncation_propagates_reset_before_events() {
    // Given: a watcher that has consumed one session
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), format!("{}\n{}\n", KILL_LINE, CHATTER_LINE)).unwrap();

    let mut watcher = LogWatcher::new();
    watcher.start(file.path().to_str().unwrap(), true).unwrap();
    watcher.poll_once(Some("Hero123")).unwrap();

    // When: the log is replaced by a shorter new-session file
    std::fs::write(file.path(), format!("{}\n", JUMP_LINE)).unwrap();
    let outcome = watcher.poll_once(Some("Hero123")).unwrap();

    // Then: the reset flag and the new session's events arrive together
    assert!(outcome.reset);
    assert_eq!(outcome.events.len(), 1);
    assert!(matches!(outcome.events[0].kind, EventKind::Jump { .. }));
}

#[test]
fn test_reprocess_reemits_without_reset() {
    // Given: a consumed log containing two classifiable lines
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        format!("{}\n{}\n{}\n", KILL_LINE, CHATTER_LINE, JUMP_LINE),
    )
    .unwrap();

    let mut watcher = LogWatcher::new();
    watcher.start(file.path().to_str().unwrap(), true).unwrap();
    let first = watcher.poll_once(Some("Hero123")).unwrap();
    assert_eq!(first.events.len(), 2);

    // When: explicitly reprocessing the whole file
    let events = watcher.reprocess(Some("Hero123")).unwrap();

    // Then: the same events come back
    assert_eq!(events.len(), 2);
}

#[test]
fn test_player_name_is_read_per_call() {
    // Given: a log line where classification depends on who the player is
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut watcher = LogWatcher::new();
    watcher.start(file.path().to_str().unwrap(), false).unwrap();

    std::fs::write(file.path(), format!("{}\n", KILL_LINE)).unwrap();
    let as_killer = watcher.poll_once(Some("Hero123")).unwrap();
    assert!(matches!(as_killer.events[0].kind, EventKind::PvpKill(_)));

    // When: the player name changes between calls (no restart)
    let events = watcher.reprocess(Some("Rival456")).unwrap();

    // Then: the same line now classifies as the local player's death
    assert!(matches!(events[0].kind, EventKind::Death(_)));
}

#[test]
fn test_stop_releases_state_and_is_idempotent() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut watcher = LogWatcher::new();
    watcher.start(file.path().to_str().unwrap(), false).unwrap();

    watcher.stop();
    assert!(!watcher.is_running());
    watcher.stop();

    // Polling after stop is a no-op, not an error
    let outcome = watcher.poll_once(None).unwrap();
    assert!(outcome.events.is_empty());
}

#[test]
fn test_consumer_filter_applies_after_the_core() {
    // Given: a default filter (corpses hidden) and a corpse + kill feed
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        format!(
            "{}\n<2025-12-01T14:32:00.000Z> <Corpse> Player 'Hero123' corpse placed\n",
            KILL_LINE
        ),
    )
    .unwrap();

    let mut watcher = LogWatcher::new();
    watcher.start(file.path().to_str().unwrap(), true).unwrap();
    let outcome = watcher.poll_once(Some("Hero123")).unwrap();

    // Then: the core reports both events; the filter is a consumer concern
    assert_eq!(outcome.events.len(), 2);
    let filter = EventFilter::default();
    let shown: Vec<_> = outcome
        .events
        .iter()
        .filter(|e| filter.allows(&e.kind))
        .collect();
    assert_eq!(shown.len(), 1);
    assert!(matches!(shown[0].kind, EventKind::PvpKill(_)));
}
