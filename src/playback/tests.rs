use std::path::Path;
use std::time::Duration;

use super::track::UNKNOWN_DURATION_CAP;
use super::*;
use crate::audio::fake::{FakeEngine, Op};
use crate::library::TrackInfo;

const TICK: Duration = Duration::from_millis(250);

fn controller(engine: FakeEngine) -> (Controller<FakeEngine, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (Controller::with_clock(engine, clock.clone(), 1.0), clock)
}

fn infos(paths: &[&str]) -> Vec<TrackInfo> {
    paths.iter().map(|p| TrackInfo::from_path(*p)).collect()
}

fn abc() -> (Controller<FakeEngine, ManualClock>, ManualClock) {
    let engine = FakeEngine::new()
        .with_duration("/m/a.mp3", 3)
        .with_duration("/m/b.mp3", 4)
        .with_duration("/m/c.mp3", 5);
    let (mut c, clock) = controller(engine);
    c.import(infos(&["/m/a.mp3", "/m/b.mp3", "/m/c.mp3"]));
    (c, clock)
}

fn poll_for(
    c: &mut Controller<FakeEngine, ManualClock>,
    clock: &ManualClock,
    total: Duration,
) -> Vec<PollOutcome> {
    let mut outcomes = Vec::new();
    let mut waited = Duration::ZERO;
    while waited < total {
        clock.advance(TICK);
        waited += TICK;
        outcomes.push(c.poll());
    }
    outcomes
}

fn engaged(c: &Controller<FakeEngine, ManualClock>) -> usize {
    c.tracks()
        .iter()
        .filter(|t| t.state() != PlaybackState::Stopped)
        .count()
}

#[test]
fn import_keeps_order_and_rejects_duplicates() {
    let (mut c, _clock) = controller(FakeEngine::new());

    let first = c.import(infos(&["/m/a.mp3", "/m/b.mp3"]));
    assert_eq!(first, ImportReport { added: 2, duplicates: 0, failed: 0 });

    let second = c.import(infos(&["/m/b.mp3", "/m/c.mp3", "/m/a.mp3"]));
    assert_eq!(second, ImportReport { added: 1, duplicates: 2, failed: 0 });

    let order: Vec<&Path> = c.tracks().iter().map(|t| t.path()).collect();
    assert_eq!(order, vec![Path::new("/m/a.mp3"), Path::new("/m/b.mp3"), Path::new("/m/c.mp3")]);
    // No second load, so no second handle, for the rejected paths.
    assert_eq!(c.engine().live_handles, 3);
}

#[test]
fn failed_load_is_kept_as_unplayable_and_isolated() {
    let engine = FakeEngine::new().failing_load("/m/bad.mp3");
    let (mut c, _clock) = controller(engine);

    let report = c.import(infos(&["/m/good.mp3", "/m/bad.mp3"]));
    assert_eq!(report, ImportReport { added: 1, duplicates: 0, failed: 1 });
    assert_eq!(c.len(), 2);

    let bad = c.track(Path::new("/m/bad.mp3")).unwrap();
    assert!(!bad.is_playable());
    assert!(bad.error().unwrap().contains("not audio"));

    c.request_play(Path::new("/m/bad.mp3"));
    assert_eq!(c.active(), None);

    c.request_play(Path::new("/m/good.mp3"));
    assert_eq!(c.state_of(Path::new("/m/good.mp3")), Some(PlaybackState::Playing));
}

#[test]
fn toggle_pairs_play_pause_resume_without_restart() {
    let (mut c, clock) = abc();
    let a = Path::new("/m/a.mp3");

    c.request_play(a);
    assert_eq!(c.state_of(a), Some(PlaybackState::Playing));
    assert_eq!(c.active(), Some(a));

    clock.advance(Duration::from_millis(1200));
    c.request_play(a);
    assert_eq!(c.state_of(a), Some(PlaybackState::Paused));
    assert_eq!(c.position_of(a), Some(Duration::from_millis(1200)));
    assert!(!c.is_polling());

    // Time spent paused does not count.
    clock.advance(Duration::from_secs(10));
    c.request_play(a);
    assert_eq!(c.state_of(a), Some(PlaybackState::Playing));
    assert_eq!(c.engine().plays_of("/m/a.mp3"), vec![Duration::ZERO]);
    assert_eq!(c.engine().count(&Op::Resume(a.to_path_buf())), 1);

    clock.advance(Duration::from_millis(300));
    assert_eq!(
        c.poll(),
        PollOutcome::Progress { position: Duration::from_millis(1500) }
    );
}

#[test]
fn starting_another_track_stops_the_active_one() {
    let (mut c, clock) = abc();
    let a = Path::new("/m/a.mp3");
    let b = Path::new("/m/b.mp3");

    c.request_play(a);
    clock.advance(Duration::from_secs(1));
    c.poll();
    assert_eq!(c.position_of(a), Some(Duration::from_secs(1)));

    c.request_play(b);
    assert_eq!(c.state_of(a), Some(PlaybackState::Stopped));
    assert_eq!(c.position_of(a), Some(Duration::ZERO));
    assert_eq!(c.state_of(b), Some(PlaybackState::Playing));
    assert_eq!(c.active(), Some(b));
    assert_eq!(c.engine().count(&Op::Stop(a.to_path_buf())), 1);
}

#[test]
fn exclusivity_holds_for_any_request_sequence() {
    let (mut c, clock) = abc();
    let keys = ["/m/a.mp3", "/m/b.mp3", "/m/c.mp3", "/m/missing.mp3"];

    // Deterministic pseudo-random walk over keys, with time passing in between.
    let mut seed: u32 = 7;
    for _ in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let key = keys[(seed >> 16) as usize % keys.len()];
        c.request_play(Path::new(key));
        clock.advance(Duration::from_millis(u64::from(seed % 700)));
        c.poll();

        assert!(engaged(&c) <= 1);
        if let Some(active) = c.active() {
            assert_ne!(c.state_of(active), Some(PlaybackState::Stopped));
        } else {
            assert_eq!(engaged(&c), 0);
        }
    }
}

#[test]
fn seek_clamps_to_track_bounds() {
    let (mut c, _clock) = abc();
    let a = Path::new("/m/a.mp3");
    c.request_play(a);

    c.seek(a, -5.0);
    assert_eq!(c.position_of(a), Some(Duration::ZERO));

    c.seek(a, 3.0 + 100.0);
    assert_eq!(c.position_of(a), Some(Duration::from_secs(3)));

    c.seek(a, f64::NAN);
    assert_eq!(c.position_of(a), Some(Duration::ZERO));

    c.seek(a, 1.5);
    assert_eq!(c.position_of(a), Some(Duration::from_millis(1500)));
    // True seek: audio restarts at every clamped target.
    assert_eq!(
        c.engine().plays_of("/m/a.mp3"),
        vec![
            Duration::ZERO,
            Duration::ZERO,
            Duration::from_secs(3),
            Duration::ZERO,
            Duration::from_millis(1500)
        ]
    );
}

#[test]
fn huge_seek_on_unknown_duration_is_capped_and_polls_safely() {
    let (mut c, clock) = controller(FakeEngine::new());
    c.import(infos(&["/m/stream.mp3"]));
    let key = Path::new("/m/stream.mp3");
    assert_eq!(c.track(key).unwrap().duration(), None);
    c.request_play(key);

    c.seek(key, 1e300);
    assert_eq!(c.position_of(key), Some(UNKNOWN_DURATION_CAP));

    clock.advance(TICK);
    assert_eq!(
        c.poll(),
        PollOutcome::Progress { position: UNKNOWN_DURATION_CAP + TICK }
    );

    // Past the real end the decoder drains and the track completes.
    c.engine_mut().drain("/m/stream.mp3");
    clock.advance(TICK);
    assert_eq!(c.poll(), PollOutcome::Finished { last: key.to_path_buf() });
    assert_eq!(c.active(), None);
}

#[test]
fn seek_is_ignored_for_inactive_tracks() {
    let (mut c, _clock) = abc();
    c.request_play(Path::new("/m/a.mp3"));

    c.seek(Path::new("/m/b.mp3"), 2.0);
    assert_eq!(c.position_of(Path::new("/m/b.mp3")), Some(Duration::ZERO));
    assert!(c.engine().plays_of("/m/b.mp3").is_empty());
}

#[test]
fn seek_keeps_paused_track_paused_and_polling_continues_from_target() {
    let (mut c, clock) = abc();
    let c_key = Path::new("/m/c.mp3");
    c.request_play(c_key);
    c.request_play(c_key);
    assert_eq!(c.state_of(c_key), Some(PlaybackState::Paused));

    c.seek(c_key, 2.0);
    assert_eq!(c.state_of(c_key), Some(PlaybackState::Paused));
    assert_eq!(c.engine().ops.last(), Some(&Op::Pause(c_key.to_path_buf())));

    c.request_play(c_key);
    clock.advance(Duration::from_millis(500));
    assert_eq!(
        c.poll(),
        PollOutcome::Progress { position: Duration::from_millis(2500) }
    );
}

#[test]
fn seek_by_moves_relative_to_current_position() {
    let (mut c, clock) = abc();
    let c_key = Path::new("/m/c.mp3");
    c.request_play(c_key);
    clock.advance(Duration::from_secs(2));
    c.poll();

    c.seek_by(c_key, -5.0);
    assert_eq!(c.position_of(c_key), Some(Duration::ZERO));
    c.seek_by(c_key, 4.0);
    assert_eq!(c.position_of(c_key), Some(Duration::from_secs(4)));
}

#[test]
fn drag_pauses_polling_and_resumes_from_dragged_position() {
    let (mut c, clock) = abc();
    let c_key = Path::new("/m/c.mp3");
    c.request_play(c_key);
    clock.advance(Duration::from_secs(1));
    c.poll();

    c.begin_drag(c_key);
    assert!(c.is_dragging(c_key));
    assert_eq!(c.state_of(c_key), Some(PlaybackState::Paused));

    c.drag_to(c_key, 4.0);
    clock.advance(Duration::from_secs(3));
    assert_eq!(c.poll(), PollOutcome::Idle);
    assert_eq!(c.position_of(c_key), Some(Duration::from_secs(4)));

    c.end_drag(c_key);
    assert!(!c.is_dragging(c_key));
    assert_eq!(c.state_of(c_key), Some(PlaybackState::Playing));
    assert_eq!(
        c.engine().plays_of("/m/c.mp3"),
        vec![Duration::ZERO, Duration::from_secs(4)]
    );

    clock.advance(Duration::from_millis(500));
    assert_eq!(
        c.poll(),
        PollOutcome::Progress { position: Duration::from_millis(4500) }
    );
}

#[test]
fn drag_on_paused_track_stays_paused() {
    let (mut c, _clock) = abc();
    let a = Path::new("/m/a.mp3");
    c.request_play(a);
    c.request_play(a);

    c.begin_drag(a);
    c.drag_to(a, 2.0);
    c.end_drag(a);

    assert_eq!(c.state_of(a), Some(PlaybackState::Paused));
    assert_eq!(c.position_of(a), Some(Duration::from_secs(2)));
}

#[test]
fn removing_active_track_clears_active_and_spares_others() {
    let (mut c, _clock) = abc();
    let a = Path::new("/m/a.mp3");
    let b = Path::new("/m/b.mp3");
    c.request_play(b);

    assert!(c.remove(b));
    assert_eq!(c.active(), None);
    assert!(!c.is_polling());
    assert_eq!(c.state_of(a), Some(PlaybackState::Stopped));
    assert_eq!(c.len(), 2);

    let ops = &c.engine().ops;
    let stop = ops.iter().position(|o| *o == Op::Stop(b.to_path_buf())).unwrap();
    let release = ops.iter().position(|o| *o == Op::Release(b.to_path_buf())).unwrap();
    assert!(stop < release);
    assert_eq!(c.engine().live_handles, 2);
}

#[test]
fn removing_inactive_track_leaves_active_untouched() {
    let (mut c, clock) = abc();
    let a = Path::new("/m/a.mp3");
    c.request_play(a);
    clock.advance(Duration::from_secs(1));
    c.poll();

    assert!(c.remove(Path::new("/m/c.mp3")));
    assert_eq!(c.active(), Some(a));
    assert_eq!(c.state_of(a), Some(PlaybackState::Playing));
    assert_eq!(c.position_of(a), Some(Duration::from_secs(1)));
    assert!(c.is_polling());

    assert!(!c.remove(Path::new("/m/c.mp3")));
}

#[test]
fn stale_keys_are_no_ops() {
    let (mut c, _clock) = abc();
    let gone = Path::new("/m/gone.mp3");

    c.request_play(gone);
    c.seek(gone, 1.0);
    c.begin_drag(gone);
    c.drag_to(gone, 1.0);
    c.end_drag(gone);
    c.set_volume(gone, 0.2);
    assert!(!c.remove(gone));

    assert_eq!(c.active(), None);
    assert_eq!(c.len(), 3);
}

#[test]
fn clear_all_releases_every_handle() {
    let (mut c, _clock) = abc();
    c.request_play(Path::new("/m/a.mp3"));

    c.clear_all();
    assert!(c.is_empty());
    assert_eq!(c.active(), None);
    assert!(!c.is_polling());
    assert_eq!(c.engine().live_handles, 0);

    // Cleared paths can be imported again.
    let report = c.import(infos(&["/m/a.mp3"]));
    assert_eq!(report.added, 1);
}

#[test]
fn auto_advance_follows_playlist_order_without_wraparound() {
    let (mut c, clock) = abc();
    let a = Path::new("/m/a.mp3");
    let b = Path::new("/m/b.mp3");
    let c_key = Path::new("/m/c.mp3");

    c.request_play(a);
    let outcomes = poll_for(&mut c, &clock, Duration::from_secs(3));
    assert_eq!(
        outcomes.last(),
        Some(&PollOutcome::Advanced { from: a.to_path_buf(), to: b.to_path_buf() })
    );
    assert_eq!(c.active(), Some(b));

    c.request_play(c_key);
    let outcomes = poll_for(&mut c, &clock, Duration::from_secs(5));
    assert_eq!(
        outcomes.last(),
        Some(&PollOutcome::Finished { last: c_key.to_path_buf() })
    );
    assert_eq!(c.active(), None);
    assert!(!c.is_polling());
    assert_eq!(c.state_of(a), Some(PlaybackState::Stopped));
    assert_eq!(c.state_of(c_key), Some(PlaybackState::Stopped));
    assert_eq!(c.poll(), PollOutcome::Idle);
}

#[test]
fn two_track_scenario_advances_after_first_duration() {
    let engine = FakeEngine::new()
        .with_duration("/m/one.mp3", 3)
        .with_duration("/m/two.mp3", 5);
    let (mut c, clock) = controller(engine);
    c.import(infos(&["/m/one.mp3", "/m/two.mp3"]));
    let one = Path::new("/m/one.mp3");
    let two = Path::new("/m/two.mp3");

    c.request_play(one);
    assert_eq!(c.state_of(one), Some(PlaybackState::Playing));
    assert_eq!(c.active(), Some(one));

    // 13 ticks of 250 ms = 3.25 s of simulated polling.
    poll_for(&mut c, &clock, Duration::from_millis(3100));

    assert_eq!(c.active(), Some(two));
    assert_eq!(c.state_of(two), Some(PlaybackState::Playing));
    assert_eq!(c.state_of(one), Some(PlaybackState::Stopped));
    assert_eq!(c.position_of(one), Some(Duration::ZERO));
}

#[test]
fn auto_advance_skips_unplayable_tracks() {
    let engine = FakeEngine::new()
        .with_duration("/m/a.mp3", 1)
        .failing_load("/m/b.mp3")
        .with_duration("/m/c.mp3", 1);
    let (mut c, clock) = controller(engine);
    c.import(infos(&["/m/a.mp3", "/m/b.mp3", "/m/c.mp3"]));

    c.request_play(Path::new("/m/a.mp3"));
    poll_for(&mut c, &clock, Duration::from_secs(1));
    assert_eq!(c.active(), Some(Path::new("/m/c.mp3")));
}

#[test]
fn drained_handle_completes_track_with_unknown_duration() {
    let (mut c, clock) = controller(FakeEngine::new());
    c.import(infos(&["/m/x.mp3", "/m/y.mp3"]));
    let x = Path::new("/m/x.mp3");

    c.request_play(x);
    clock.advance(TICK);
    assert!(matches!(c.poll(), PollOutcome::Progress { .. }));

    c.engine_mut().drain("/m/x.mp3");
    clock.advance(TICK);
    assert_eq!(
        c.poll(),
        PollOutcome::Advanced { from: x.to_path_buf(), to: "/m/y.mp3".into() }
    );
}

#[test]
fn play_failure_marks_track_unplayable_without_touching_others() {
    let engine = FakeEngine::new().failing_play("/m/b.mp3");
    let (mut c, _clock) = controller(engine);
    c.import(infos(&["/m/a.mp3", "/m/b.mp3"]));
    let a = Path::new("/m/a.mp3");
    let b = Path::new("/m/b.mp3");

    c.request_play(a);
    c.request_play(b);

    assert_eq!(c.active(), None);
    let bad = c.track(b).unwrap();
    assert!(!bad.is_playable());
    assert!(bad.error().is_some());
    assert_eq!(c.state_of(a), Some(PlaybackState::Stopped));
    assert_eq!(c.engine().live_handles, 1);
}

#[test]
fn volume_is_clamped_and_applied_to_handle() {
    let (mut c, _clock) = abc();
    let a = Path::new("/m/a.mp3");

    c.set_volume(a, 1.7);
    assert_eq!(c.track(a).unwrap().volume(), 1.0);

    c.adjust_volume(a, -0.25);
    assert_eq!(c.track(a).unwrap().volume(), 0.75);
    assert_eq!(c.engine().ops.last(), Some(&Op::Volume(a.to_path_buf(), 0.75)));

    c.set_volume(a, f32::NAN);
    assert_eq!(c.track(a).unwrap().volume(), 0.0);
}

#[test]
fn shutdown_fades_active_track_then_clears() {
    let (mut c, _clock) = abc();
    let b = Path::new("/m/b.mp3");
    c.request_play(b);

    c.shutdown(Duration::from_millis(10));
    assert_eq!(c.engine().count(&Op::FadeOut(b.to_path_buf())), 1);
    assert!(c.is_empty());
    assert_eq!(c.engine().live_handles, 0);
}

#[test]
fn progress_reflects_position_over_duration() {
    let (mut c, clock) = abc();
    let a = Path::new("/m/a.mp3");
    c.request_play(a);
    clock.advance(Duration::from_millis(1500));
    c.poll();

    let track = c.track(a).unwrap();
    assert!((track.progress() - 0.5).abs() < 1e-9);
    assert_eq!(track.clamp_position(f64::INFINITY), Duration::from_secs(3));
}
