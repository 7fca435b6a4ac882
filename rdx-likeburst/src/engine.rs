//! The engine that hosts every mounted like button and drives their timelines.

use crate::common::ButtonId;
use crate::components::gesture::TapRecognizer;
use crate::components::phase::AnimationPhaseState;
use crate::components::sequencer::{AnimationSequencer, SequenceStep, TapOutcome};
use crate::components::visual::{PaletteColors, VisualState};
use crate::config::LikeBurstConfig;
use crate::events::{LikeEvent, PhaseEvent, SystemEvent, TapEvent};
use crate::time::{SystemClock, TickEvent};
use slotmap::SlotMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, Notify, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, info, trace};

/// Per-button record: the tap recognizer in front of the sequencer.
struct LikeButton {
    recognizer: TapRecognizer,
    sequencer: AnimationSequencer,
}

/// The main Likeburst engine.
///
/// Each mounted button owns an independent `AnimationSequencer`; nothing is
/// shared between buttons. The engine is a cheap, cloneable handle: every
/// clone drives the same set of buttons. Engine time is measured from the
/// moment the engine was created on the tokio clock, so tests can pause and
/// advance it.
#[derive(Clone)]
pub struct LikeBurstEngine {
    config: Arc<LikeBurstConfig>,
    epoch: Instant,
    tick_sender: broadcast::Sender<Arc<TickEvent>>,
    system_event_sender: broadcast::Sender<SystemEvent>,
    tap_event_sender: broadcast::Sender<TapEvent>,
    phase_event_sender: broadcast::Sender<PhaseEvent>,
    like_event_sender: broadcast::Sender<LikeEvent>,
    buttons: Arc<RwLock<SlotMap<ButtonId, LikeButton>>>,
    colors: Arc<Mutex<PaletteColors>>,
    schedule_changed: Arc<Notify>,
}

// Core implementation block for internal logic.
impl LikeBurstEngine {
    /// Creates a new `LikeBurstEngine` with the given configuration.
    pub fn new(config: LikeBurstConfig) -> Self {
        const CHANNEL_CAPACITY: usize = 256;
        let (tick_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (system_event_sender, _) = broadcast::channel(64);
        let (tap_event_sender, _) = broadcast::channel(64);
        let (phase_event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (like_event_sender, _) = broadcast::channel(64);
        let colors = PaletteColors::new(config.particles.seed);

        Self {
            config: Arc::new(config),
            epoch: Instant::now(),
            tick_sender,
            system_event_sender,
            tap_event_sender,
            phase_event_sender,
            like_event_sender,
            buttons: Arc::new(RwLock::new(SlotMap::with_key())),
            colors: Arc::new(Mutex::new(colors)),
            schedule_changed: Arc::new(Notify::new()),
        }
    }

    /// Runs the engine until Ctrl+C is received.
    pub async fn run(&self) -> anyhow::Result<()> {
        self.run_until(async {
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received.");
            Ok::<(), anyhow::Error>(())
        })
        .await
    }

    /// Runs the engine's main loop until `shutdown` completes.
    ///
    /// This method will:
    /// 1. Spawn the `SystemClock` task.
    /// 2. Spawn the dispatcher task that advances every button on each tick.
    /// 3. Wait for `shutdown`, then stop both tasks.
    pub async fn run_until<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        info!("LikeBurstEngine starting up...");
        let (shutdown_tx, _) = broadcast::channel(1);

        let clock = SystemClock::new(self.config.resolution.clone(), self.tick_sender.clone());
        let clock_task = tokio::spawn(clock.run(shutdown_tx.subscribe()));

        let dispatcher = self.clone();
        let dispatcher_shutdown_rx = shutdown_tx.subscribe();
        let dispatcher_task =
            tokio::spawn(async move { dispatcher.dispatcher_loop(dispatcher_shutdown_rx).await });

        info!("Engine running at {:?}.", self.config.resolution);
        let result = shutdown.await;

        info!("Broadcasting shutdown to all tasks...");
        if shutdown_tx.send(()).is_err() {
            error!("Failed to send shutdown signal. Some tasks may not terminate gracefully.");
        }
        clock_task.await.ok();
        dispatcher_task.await.ok();
        self.system_event_sender
            .send(SystemEvent::EngineShutdown)
            .ok();
        info!("LikeBurstEngine has shut down.");
        result
    }

    #[doc(hidden)]
    async fn dispatcher_loop(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut tick_rx = self.tick_sender.subscribe();
        self.system_event_sender
            .send(SystemEvent::EngineStarted {
                timestamp: Instant::now(),
            })
            .ok();
        loop {
            // Steps fire at their own deadlines, not on the next tick.
            let next_deadline = self.next_deadline().await;
            let deadline_reached = async {
                match next_deadline {
                    Some(due) => tokio::time::sleep_until(self.epoch + due).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                _ = deadline_reached => {
                    self.step().await;
                }
                _ = self.schedule_changed.notified() => {
                    trace!("Schedule changed, recomputing next deadline.");
                }
                Ok(tick) = tick_rx.recv() => {
                    trace!("Tick #{} received.", tick.tick_count);
                    self.step().await;
                }
            }
        }
    }

    fn phase_event(
        button: ButtonId,
        step: SequenceStep,
        due: Duration,
        fired_at: Duration,
    ) -> PhaseEvent {
        PhaseEvent {
            button,
            step,
            phase: step.phase(),
            motions: step.motions(),
            due,
            fired_at,
        }
    }

    fn announce_like(&self, button: ButtonId, before: bool, after: bool) {
        if before != after {
            self.like_event_sender
                .send(LikeEvent {
                    button,
                    liked: after,
                })
                .ok();
        }
    }
}

// Public API implementation block.
impl LikeBurstEngine {
    pub fn config(&self) -> &LikeBurstConfig {
        &self.config
    }

    /// Engine time: how long since the engine was created.
    pub fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Applies every step that is due at the current engine time, on every
    /// button, and broadcasts a `PhaseEvent` for each.
    ///
    /// Called by the dispatcher on each tick. Returns the number of steps fired.
    pub async fn step(&self) -> usize {
        let now = self.now();
        let mut buttons = self.buttons.write().await;
        let mut fired_count = 0;
        for (id, button) in buttons.iter_mut() {
            for fired in button.sequencer.advance(now) {
                debug!(
                    "Button {:?} entered {} (due {:?}, fired {:?}).",
                    id,
                    fired.step.phase(),
                    fired.due,
                    fired.fired_at
                );
                self.phase_event_sender
                    .send(Self::phase_event(id, fired.step, fired.due, fired.fired_at))
                    .ok();
                fired_count += 1;
            }
        }
        fired_count
    }

    /// Mounts a new button with the caller's initial `liked` value.
    pub async fn mount_button(&self, initial_liked: bool) -> ButtonId {
        let button = LikeButton {
            recognizer: TapRecognizer::new(
                self.config.gesture.taps_required,
                self.config.gesture.window(),
            ),
            sequencer: AnimationSequencer::new(initial_liked),
        };
        let id = self.buttons.write().await.insert(button);
        info!("Mounted button {:?} (liked: {}).", id, initial_liked);
        self.system_event_sender
            .send(SystemEvent::ButtonMounted { id })
            .ok();
        id
    }

    /// Unmounts a button, cancelling any steps still pending for it.
    ///
    /// Returns `true` if the button was found and removed.
    pub async fn unmount_button(&self, id: ButtonId) -> bool {
        let Some(mut button) = self.buttons.write().await.remove(id) else {
            return false;
        };
        let cancelled_steps = button.sequencer.cancel();
        info!(
            "Unmounted button {:?}, cancelled {} pending steps.",
            id, cancelled_steps
        );
        self.system_event_sender
            .send(SystemEvent::ButtonUnmounted {
                id,
                cancelled_steps,
            })
            .ok();
        true
    }

    /// Delivers one raw tap to a button.
    ///
    /// Returns `None` if the button is not mounted.
    pub async fn tap(&self, id: ButtonId) -> Option<TapOutcome> {
        let now = self.now();
        let mut buttons = self.buttons.write().await;
        let button = buttons.get_mut(id)?;

        let outcome = if button.recognizer.register(now) {
            let liked_before = button.sequencer.state().liked();
            let outcome = button.sequencer.on_tap(now);
            match outcome {
                TapOutcome::Started => {
                    debug!("Button {:?} started its sequence at {:?}.", id, now);
                    self.schedule_changed.notify_one();
                    self.phase_event_sender
                        .send(Self::phase_event(id, SequenceStep::Start, now, now))
                        .ok();
                }
                TapOutcome::Reset => debug!("Button {:?} reset.", id),
                TapOutcome::Ignored => trace!("Button {:?} ignored a tap mid-sequence.", id),
                TapOutcome::Pending => {}
            }
            self.announce_like(id, liked_before, button.sequencer.state().liked());
            outcome
        } else {
            TapOutcome::Pending
        };

        self.tap_event_sender
            .send(TapEvent {
                button: id,
                outcome,
                at: now,
            })
            .ok();
        Some(outcome)
    }

    /// Writes the externally bound `liked` value without animating.
    ///
    /// Returns `false` if the button is not mounted.
    pub async fn set_liked(&self, id: ButtonId, liked: bool) -> bool {
        let mut buttons = self.buttons.write().await;
        let Some(button) = buttons.get_mut(id) else {
            return false;
        };
        let before = button.sequencer.state().liked();
        button.sequencer.set_liked(liked);
        self.announce_like(id, before, liked);
        true
    }

    pub async fn liked(&self, id: ButtonId) -> Option<bool> {
        self.phase_state(id).await.map(|state| state.liked())
    }

    /// A snapshot of a button's phase flags.
    pub async fn phase_state(&self, id: ButtonId) -> Option<AnimationPhaseState> {
        self.buttons
            .read()
            .await
            .get(id)
            .map(|button| *button.sequencer.state())
    }

    /// The derived visual state of a button, with freshly drawn particle colours.
    pub async fn visual_state(&self, id: ButtonId) -> Option<VisualState> {
        let state = self.phase_state(id).await?;
        let mut colors = self.colors.lock().await;
        Some(VisualState::derive(&state, &mut *colors))
    }

    /// The earliest pending step deadline across all buttons.
    pub async fn next_deadline(&self) -> Option<Duration> {
        self.buttons
            .read()
            .await
            .values()
            .filter_map(|button| button.sequencer.next_deadline())
            .min()
    }

    pub async fn button_count(&self) -> usize {
        self.buttons.read().await.len()
    }

    /// Subscribes to the `TickEvent` stream.
    pub fn subscribe_tick_events(&self) -> broadcast::Receiver<Arc<TickEvent>> {
        self.tick_sender.subscribe()
    }

    /// Subscribes to the `SystemEvent` stream.
    pub fn subscribe_system_events(&self) -> broadcast::Receiver<SystemEvent> {
        self.system_event_sender.subscribe()
    }

    /// Subscribes to the `TapEvent` stream.
    pub fn subscribe_tap_events(&self) -> broadcast::Receiver<TapEvent> {
        self.tap_event_sender.subscribe()
    }

    /// Subscribes to the `PhaseEvent` stream.
    pub fn subscribe_phase_events(&self) -> broadcast::Receiver<PhaseEvent> {
        self.phase_event_sender.subscribe()
    }

    /// Subscribes to the `LikeEvent` stream.
    pub fn subscribe_like_events(&self) -> broadcast::Receiver<LikeEvent> {
        self.like_event_sender.subscribe()
    }
}
