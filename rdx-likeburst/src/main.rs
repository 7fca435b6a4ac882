use anyhow::Result;
use likeburst::prelude::*;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Long enough for a full forward sequence plus a margin of a few ticks.
const SEQUENCE_BUDGET: Duration = Duration::from_millis(1500);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // 2. Load the configuration from an optional file argument and the environment.
    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = LikeBurstConfig::load(config_path.as_deref())?;

    // 3. Create the engine and the sample feed on top of it.
    let engine = LikeBurstEngine::new(config);
    spawn_event_listeners(&engine);
    let mut feed = Feed::sample(engine.clone()).await;

    // 4. Run the engine while a scripted session likes and un-likes the first post.
    let script_engine = engine.clone();
    engine
        .run_until(async move {
            let first = feed.posts()[0].id;

            info!("[SCRIPT] Liking '{}'.", feed.posts()[0].image_name);
            feed.like_gesture(first).await;
            tokio::time::sleep(SEQUENCE_BUDGET).await;
            feed.sync().await;

            if let Some(button) = feed.get(first).map(|post| post.button) {
                if let Some(visual) = script_engine.visual_state(button).await {
                    info!("[SCRIPT] Resting visuals: {:?}", visual.icon_glyph);
                }
            }

            info!("[SCRIPT] Un-liking '{}'.", feed.posts()[0].image_name);
            feed.like_gesture(first).await;
            for post in feed.posts() {
                info!("[FEED] {} liked: {}", post.image_name, post.is_liked);
            }
            feed.teardown().await;
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    Ok(())
}

/// Spawns several tasks, each subscribing to a different event stream from the engine.
fn spawn_event_listeners(engine: &LikeBurstEngine) {
    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            info!("[SYSTEM] => {:?}", event);
        }
    });

    let mut tap_rx = engine.subscribe_tap_events();
    tokio::spawn(async move {
        while let Ok(event) = tap_rx.recv().await {
            info!("[TAP] => {:?} at {:?}", event.outcome, event.at);
        }
    });

    let mut phase_rx = engine.subscribe_phase_events();
    tokio::spawn(async move {
        while let Ok(event) = phase_rx.recv().await {
            info!(
                "[PHASE] => {} (due {:?}, fired {:?})",
                event.phase, event.due, event.fired_at
            );
        }
    });

    let mut like_rx = engine.subscribe_like_events();
    tokio::spawn(async move {
        while let Ok(event) = like_rx.recv().await {
            info!("[LIKE] => {:?} liked: {}", event.button, event.liked);
        }
    });
}
