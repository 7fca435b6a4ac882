use likeburst::config::{GestureConfig, ParticleConfig};
use likeburst::prelude::*;
use std::time::Duration;
use tokio::time::advance;

fn single_tap_config() -> LikeBurstConfig {
    LikeBurstConfig {
        resolution: ClockResolution::High,
        gesture: GestureConfig {
            taps_required: 1,
            multi_tap_window_ms: 300,
        },
        particles: ParticleConfig { seed: Some(1) },
    }
}

fn flags(state: &AnimationPhaseState) -> [bool; 7] {
    [
        state.liked(),
        state.started(),
        state.background_expanded(),
        state.ring_revealed(),
        state.firework_fired(),
        state.sequence_ended(),
        state.ready_to_reset(),
    ]
}

async fn advance_and_step(engine: &LikeBurstEngine, millis: u64) -> usize {
    advance(Duration::from_millis(millis)).await;
    engine.step().await
}

#[tokio::test(start_paused = true)]
async fn test_forward_timeline() {
    let engine = LikeBurstEngine::new(single_tap_config());
    let button = engine.mount_button(false).await;

    assert_eq!(engine.tap(button).await, Some(TapOutcome::Started));
    let state = engine.phase_state(button).await.unwrap();
    assert_eq!(flags(&state), [true, true, false, false, false, false, false]);

    assert_eq!(advance_and_step(&engine, 249).await, 0);
    assert_eq!(advance_and_step(&engine, 1).await, 1);
    let state = engine.phase_state(button).await.unwrap();
    assert_eq!(flags(&state), [true, true, true, false, false, false, false]);

    assert_eq!(advance_and_step(&engine, 300).await, 1);
    let state = engine.phase_state(button).await.unwrap();
    assert_eq!(flags(&state), [true, true, true, true, true, false, false]);

    assert_eq!(advance_and_step(&engine, 400).await, 1);
    let state = engine.phase_state(button).await.unwrap();
    assert_eq!(flags(&state), [true, true, true, true, true, true, false]);

    assert_eq!(advance_and_step(&engine, 300).await, 1);
    let state = engine.phase_state(button).await.unwrap();
    assert_eq!(flags(&state), [true; 7]);

    assert_eq!(engine.tap(button).await, Some(TapOutcome::Reset));
    let state = engine.phase_state(button).await.unwrap();
    assert_eq!(flags(&state), [false; 7]);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_taps_run_one_sequence() {
    let engine = LikeBurstEngine::new(single_tap_config());
    let button = engine.mount_button(false).await;
    let mut phases = engine.subscribe_phase_events();

    assert_eq!(engine.tap(button).await, Some(TapOutcome::Started));
    advance(Duration::from_millis(10)).await;
    assert_eq!(engine.tap(button).await, Some(TapOutcome::Ignored));
    assert_eq!(engine.next_deadline().await, Some(Duration::from_millis(250)));

    advance_and_step(&engine, 2000).await;

    let mut seen = Vec::new();
    while let Ok(event) = phases.try_recv() {
        seen.push(event.phase);
    }
    assert_eq!(
        seen,
        vec![
            Phase::Started,
            Phase::BackgroundExpanded,
            Phase::RingRevealed,
            Phase::SequenceEnded,
            Phase::ReadyToReset,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_mid_sequence_tap_changes_nothing() {
    let engine = LikeBurstEngine::new(single_tap_config());
    let button = engine.mount_button(false).await;
    engine.tap(button).await;
    advance_and_step(&engine, 600).await;

    let before = engine.phase_state(button).await.unwrap();
    assert_eq!(engine.tap(button).await, Some(TapOutcome::Ignored));
    assert_eq!(engine.phase_state(button).await.unwrap(), before);
}

#[tokio::test(start_paused = true)]
async fn test_like_events_on_start_and_reset() {
    let engine = LikeBurstEngine::new(single_tap_config());
    let button = engine.mount_button(false).await;
    let mut likes = engine.subscribe_like_events();

    engine.tap(button).await;
    advance_and_step(&engine, 1250).await;
    engine.tap(button).await;

    assert_eq!(likes.try_recv().unwrap(), LikeEvent { button, liked: true });
    assert_eq!(likes.try_recv().unwrap(), LikeEvent { button, liked: false });
    assert!(likes.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_unmount_cancels_pending_steps() {
    let engine = LikeBurstEngine::new(single_tap_config());
    let button = engine.mount_button(false).await;
    let mut system = engine.subscribe_system_events();

    engine.tap(button).await;
    advance_and_step(&engine, 300).await;
    assert!(engine.unmount_button(button).await);
    assert!(!engine.unmount_button(button).await);

    match system.try_recv().unwrap() {
        SystemEvent::ButtonUnmounted {
            id,
            cancelled_steps,
        } => {
            assert_eq!(id, button);
            assert_eq!(cancelled_steps, 3);
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(advance_and_step(&engine, 2000).await, 0);
    assert_eq!(engine.tap(button).await, None);
    assert_eq!(engine.phase_state(button).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_buttons_are_independent() {
    let engine = LikeBurstEngine::new(single_tap_config());
    let first = engine.mount_button(false).await;
    let second = engine.mount_button(true).await;

    engine.tap(first).await;
    advance_and_step(&engine, 500).await;
    engine.tap(second).await;
    advance_and_step(&engine, 100).await;

    let first_state = engine.phase_state(first).await.unwrap();
    let second_state = engine.phase_state(second).await.unwrap();
    assert_eq!(first_state.phase(), Phase::RingRevealed);
    assert_eq!(second_state.phase(), Phase::Started);
    assert_eq!(engine.next_deadline().await, Some(Duration::from_millis(750)));
}

#[tokio::test(start_paused = true)]
async fn test_double_tap_gesture() {
    let engine = LikeBurstEngine::new(LikeBurstConfig::default());
    let button = engine.mount_button(false).await;

    assert_eq!(engine.tap(button).await, Some(TapOutcome::Pending));
    advance(Duration::from_millis(400)).await;
    assert_eq!(engine.tap(button).await, Some(TapOutcome::Pending));
    advance(Duration::from_millis(100)).await;
    assert_eq!(engine.tap(button).await, Some(TapOutcome::Started));
    assert!(engine.liked(button).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_set_liked_does_not_animate() {
    let engine = LikeBurstEngine::new(single_tap_config());
    let button = engine.mount_button(false).await;
    assert!(engine.set_liked(button, true).await);
    let state = engine.phase_state(button).await.unwrap();
    assert!(state.liked());
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(engine.next_deadline().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_visual_state_follows_phases() {
    let engine = LikeBurstEngine::new(single_tap_config());
    let button = engine.mount_button(false).await;

    let idle = engine.visual_state(button).await.unwrap();
    assert_eq!(idle.ring_radius, 0.0);
    assert_eq!(idle.disc_scale, 0.0);

    engine.tap(button).await;
    advance_and_step(&engine, 550).await;
    let revealed = engine.visual_state(button).await.unwrap();
    assert_eq!(revealed.ring_radius, 29.0);
    assert_eq!(revealed.disc_scale, 2.2);
    assert_eq!(revealed.background_opacity, 1.0);
    assert_eq!(revealed.particles.len(), 12);
}

#[tokio::test(start_paused = true)]
async fn test_run_until_fires_steps_at_deadlines() {
    // Coarse ticks (every 100 ms) must not delay any step.
    let config = LikeBurstConfig {
        resolution: ClockResolution::Low,
        ..single_tap_config()
    };
    let engine = LikeBurstEngine::new(config);
    let button = engine.mount_button(false).await;
    let mut phases = engine.subscribe_phase_events();
    let mut system = engine.subscribe_system_events();

    advance(Duration::from_millis(37)).await;
    engine.tap(button).await;
    engine
        .run_until(async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        })
        .await
        .unwrap();

    let mut fired = Vec::new();
    while let Ok(event) = phases.try_recv() {
        assert_eq!(event.fired_at, event.due, "{:?} fired late", event.step);
        fired.push((event.step, event.due));
    }
    let tap = Duration::from_millis(37);
    assert_eq!(
        fired,
        vec![
            (SequenceStep::Start, tap),
            (SequenceStep::ExpandBackground, tap + Duration::from_millis(250)),
            (SequenceStep::RevealRing, tap + Duration::from_millis(550)),
            (SequenceStep::EndSequence, tap + Duration::from_millis(950)),
            (SequenceStep::ArmReset, tap + Duration::from_millis(1250)),
        ]
    );
    assert!(engine.phase_state(button).await.unwrap().ready_to_reset());

    let mut saw_shutdown = false;
    while let Ok(event) = system.try_recv() {
        saw_shutdown |= matches!(event, SystemEvent::EngineShutdown);
    }
    assert!(saw_shutdown);
}
