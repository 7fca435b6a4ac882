use anyhow::Result;
use colored::Colorize;
use likeburst::prelude::*;
use likeburst::{ENGINE_NAME, VERSION as LIB_VERSION};
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct ShellHighlighter;

impl Highlighter for ShellHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.magenta().bold();
            let colored_rest = rest.magenta();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.magenta().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    const LOGO_TEXT: &str = include_str!("../logo.log");
    println!("{}", LOGO_TEXT.red());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    println!("{}", "-------------------------------------------------------------".dimmed());
    println!("{}", version_string);
    println!("{}", "-------------------------------------------------------------".dimmed());
}

/// Spawns the listeners that echo engine events into the shell.
fn spawn_event_listeners(engine: &LikeBurstEngine, is_watching_phases: Arc<AtomicBool>) {
    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            if matches!(event, SystemEvent::EngineStarted { .. }) {
                println!("\n<-- [SYSTEM EVENT] {:?}\n>> ", event);
            }
        }
    });

    let mut phase_rx = engine.subscribe_phase_events();
    tokio::spawn(async move {
        while let Ok(event) = phase_rx.recv().await {
            if is_watching_phases.load(Ordering::Relaxed) {
                println!(
                    "<-- [PHASE] {:?} -> {} at {:?}",
                    event.button,
                    event.phase.to_string().yellow(),
                    event.fired_at
                );
            }
        }
    });
}

/// Parses the `<n>` argument of a post command into a post id.
fn post_arg(feed: &Feed, args: &[&str], usage: &str) -> Option<PostId> {
    let Some(index_str) = args.get(1) else {
        println!("Usage: {}", usage);
        return None;
    };
    match index_str.parse::<usize>() {
        Ok(index) => match feed.posts().get(index) {
            Some(post) => Some(post.id),
            None => {
                println!("Error: No post #{}. Use 'feed' to list posts.", index);
                None
            }
        },
        Err(_) => {
            println!("Error: Post number must be a number (e.g., '0', '1').");
            None
        }
    }
}

async fn print_feed(feed: &mut Feed) {
    feed.sync().await;
    println!("Feed:");
    for (index, post) in feed.posts().iter().enumerate() {
        let phase = feed
            .engine()
            .phase_state(post.button)
            .await
            .map(|state| state.phase())
            .unwrap_or(Phase::Idle);
        let heart = if post.is_liked {
            "♥".red().bold()
        } else {
            "♡".dimmed()
        };
        println!("  #{} {} {:<12} [{}]", index, heart, post.image_name, phase);
    }
}

async fn print_visuals(feed: &Feed, id: PostId) {
    let Some(button) = feed.get(id).map(|post| post.button) else {
        return;
    };
    let Some(visual) = feed.engine().visual_state(button).await else {
        println!("--> Error: Button is no longer mounted.");
        return;
    };
    println!(
        "  icon        {} scale {} opacity {}",
        visual.icon_glyph.symbol_name(),
        visual.icon_scale,
        visual.icon_opacity
    );
    println!(
        "  background  disc scale {} opacity {}",
        visual.disc_scale, visual.background_opacity
    );
    println!("  ring        radius {}", visual.ring_radius);
    for particle in &visual.particles {
        println!(
            "  particle    {:>5.1}° ({:>6.1}, {:>6.1}) {:?}",
            particle.angle_degrees, particle.position.x, particle.position.y, particle.color
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let config_path = env::args().nth(1).map(std::path::PathBuf::from);
    let config = LikeBurstConfig::load(config_path.as_deref())?;
    let engine = LikeBurstEngine::new(config);
    let engine_handle = engine.clone();

    let is_watching_phases = Arc::new(AtomicBool::new(false));
    spawn_event_listeners(&engine_handle, is_watching_phases.clone());

    info!("Spawning {} in the background...", ENGINE_NAME);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let engine_task = tokio::spawn(async move {
        let stopped = async move {
            stop_rx.await.ok();
            Ok::<(), anyhow::Error>(())
        };
        if let Err(e) = engine.run_until(stopped).await {
            eprintln!("\nEngine stopped with an error: {}", e);
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut feed = Feed::sample(engine_handle.clone()).await;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ShellHighlighter));

    println!("{} is running. Type 'help' for commands or 'exit' to quit.", ENGINE_NAME.red());

    loop {
        let prompt = format!("{}", ">> ".red().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.split_whitespace().collect::<Vec<_>>();

                if let Some(command) = args.first() {
                    match *command {
                        "feed" => print_feed(&mut feed).await,
                        "tap" => {
                            if let Some(id) = post_arg(&feed, &args, "tap <N>") {
                                if let Some(outcome) = feed.tap(id).await {
                                    println!("--> Tap: {:?}", outcome);
                                }
                            }
                        }
                        "like" => {
                            if let Some(id) = post_arg(&feed, &args, "like <N>") {
                                if let Some(outcome) = feed.like_gesture(id).await {
                                    println!("--> Gesture: {:?}", outcome);
                                }
                            }
                        }
                        "toggle" => {
                            if let Some(id) = post_arg(&feed, &args, "toggle <N>") {
                                if let Some(liked) = feed.toggle_like(id).await {
                                    let label = if liked { "liked" } else { "not liked" };
                                    println!("--> Post is now {}.", label);
                                }
                            }
                        }
                        "show" => {
                            if let Some(id) = post_arg(&feed, &args, "show <N>") {
                                print_visuals(&feed, id).await;
                            }
                        }
                        "watch" => match args.get(1) {
                            Some(&"on") => {
                                is_watching_phases.store(true, Ordering::Relaxed);
                                println!("--> Printing phase transitions.");
                            }
                            Some(&"off") => {
                                is_watching_phases.store(false, Ordering::Relaxed);
                                println!("--> Stopped printing phase transitions.");
                            }
                            _ => println!("Usage: watch on|off"),
                        },
                        "help" => {
                            println!("Available commands:");
                            println!("  feed          - Lists posts, their like state and phase.");
                            println!("  tap <N>       - Sends one raw tap to post N's overlay.");
                            println!("  like <N>      - Sends a full like gesture to post N.");
                            println!("  toggle <N>    - Flips post N's like without animating.");
                            println!("  show <N>      - Prints post N's current visual state.");
                            println!("  watch on|off  - Starts or stops printing phase transitions.");
                            println!("  exit          - Quits the shell.");
                        }
                        "exit" => break,
                        _ => println!("Unknown command: '{}'. Type 'help'.", line),
                    }
                }
            }
            Err(_) => {
                println!("Exiting likeshell...");
                break;
            }
        }
    }

    feed.teardown().await;
    stop_tx.send(()).ok();
    engine_task.await.ok();
    Ok(())
}
