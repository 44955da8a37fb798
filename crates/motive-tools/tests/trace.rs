use motive_core::{MessengerService, ReactionMask, ReactionService};
use motive_tools::{Notification, ReactionCall, Recorder};

#[test]
fn notify_is_recorded_in_order() {
    let rec = Recorder::new();
    rec.notify("Walk", "initialize");
    rec.notify("Walk", "tick");
    rec.notify("Stop", "initialize");

    let log = rec.snapshot();
    assert_eq!(log.notifications.len(), 3);
    assert_eq!(log.notifications[2], Notification::new("Stop", "initialize"));
    assert_eq!(log.messages_from("Walk"), vec!["initialize", "tick"]);
    assert_eq!(log.count("Walk", "tick"), 1);
}

#[test]
fn services_share_one_log() {
    let rec = Recorder::new();
    let services = rec.services();

    services.notify("Seq", "tick");
    services.reactions().activate(ReactionMask::KNEE_JERK);
    services.reactions().release(ReactionMask::KNEE_JERK);

    let log = rec.snapshot();
    assert_eq!(log.notifications.len(), 1);
    assert_eq!(
        log.reactions,
        vec![
            ReactionCall::Activate(ReactionMask::KNEE_JERK),
            ReactionCall::Release(ReactionMask::KNEE_JERK),
        ]
    );
    assert!(log.reactions_balanced());
}

#[test]
fn unbalanced_reactions_are_detected() {
    let rec = Recorder::new();
    rec.activate(ReactionMask::KNEE_JERK);
    rec.activate(ReactionMask::FLINCH);
    rec.release(ReactionMask::KNEE_JERK);
    assert!(!rec.snapshot().reactions_balanced());

    rec.clear();
    rec.activate(ReactionMask::FLINCH);
    assert!(!rec.snapshot().reactions_balanced());
}
