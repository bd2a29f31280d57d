use std::io::BufRead;
use std::time::Duration;

use anyhow::Context;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use snakehem::input::{Button, ChannelInputProvider, InputEvent, InputSender};
use snakehem::{GamePhase, GameConfig, GameSnapshot, Renderer, Simulation, SimulationError};

/// Logs what a screen would show
#[derive(Default)]
struct LogRenderer {
    last_phase: Option<GamePhase>,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, snapshot: &GameSnapshot) {
        if self.last_phase != Some(snapshot.phase) {
            info!(phase = snapshot.phase.name(), snakes = snapshot.snakes.len(), "Now showing");
            self.last_phase = Some(snapshot.phase);
        }

        if snapshot.phase == GamePhase::Action {
            let scores: Vec<String> = snapshot
                .snakes
                .iter()
                .map(|s| format!("{}={}", s.controller_id, s.score))
                .collect();
            debug!(
                frame = snapshot.elapsed_frames,
                countdown = snapshot.countdown_seconds,
                apple = ?snapshot.apple,
                scores = %scores.join(" "),
                "Frame"
            );
        }
    }
}

/// One stdin line to an input event
///
/// `<controller> <button>` presses a button, `connect <id>` and
/// `disconnect <id>` manage controllers, `quit` is the global exit.
fn parse_command(line: &str) -> Option<InputEvent> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    let second = parts.next();

    match (first, second) {
        ("quit", None) => Some(InputEvent::GlobalExit),
        ("connect", Some(id)) => Some(InputEvent::Connected(id.to_string())),
        ("disconnect", Some(id)) => Some(InputEvent::Disconnected(id.to_string())),
        (id, Some(button)) => Button::parse(button).map(|button| InputEvent::Pressed {
            controller_id: id.to_string(),
            button,
        }),
        _ => None,
    }
}

/// Blocking stdin poller; runs on its own thread
///
/// `wait <ms>` pauses the reader so piped scripts can pace themselves. End of
/// input counts as `quit`.
fn read_stdin(sender: InputSender) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(ms) = line.strip_prefix("wait ") {
            match ms.trim().parse::<u64>() {
                Ok(ms) => std::thread::sleep(Duration::from_millis(ms)),
                Err(_) => warn!("Bad wait '{}'", ms),
            }
            continue;
        }

        match parse_command(line) {
            Some(event) => {
                if sender.try_send(event).is_err() {
                    warn!("Input buffer full, dropping '{}'", line);
                }
            }
            None => warn!("Unrecognised input '{}'", line),
        }
    }

    let _ = sender.try_send(InputEvent::GlobalExit);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Snakehem v{}", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::load_or_default();
    let tps = config.tps();

    let provider = ChannelInputProvider::default();
    let sender = provider.sender();
    let haptics = provider.haptics();

    let mut simulation = Simulation::builder()
        .with_config(config)
        .with_input_provider(provider)
        .build()
        .context("Failed to build simulation")?;

    std::thread::Builder::new()
        .name("stdin-input".to_string())
        .spawn(move || read_stdin(sender))
        .context("Failed to spawn input thread")?;

    info!("Type '<controller> <up|down|left|right|start|exit>' to play, 'quit' to leave");

    let mut renderer = LogRenderer::default();
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / tps as f64));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match simulation.tick() {
                    Ok(()) => {}
                    Err(SimulationError::UserExit) => {
                        info!("Exit requested");
                        break;
                    }
                }

                simulation.render(&mut renderer);

                // No rumble hardware here, just report it
                for request in haptics.try_iter() {
                    debug!(
                        controller = %request.controller_id,
                        duration_ms = request.duration.as_millis() as u64,
                        "Vibrate"
                    );
                }
            }
            _ = &mut ctrl_c => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    let standings = simulation.standings();
    println!(
        "{}",
        serde_json::to_string_pretty(&standings).context("Failed to serialize standings")?
    );

    info!(frames = simulation.elapsed_frames(), "Simulation stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_press() {
        assert_eq!(
            parse_command("kb left"),
            Some(InputEvent::Pressed {
                controller_id: "kb".to_string(),
                button: Button::Left,
            })
        );
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!(parse_command("quit"), Some(InputEvent::GlobalExit));
        assert_eq!(parse_command("connect pad-0"), Some(InputEvent::Connected("pad-0".to_string())));
        assert_eq!(
            parse_command("disconnect pad-0"),
            Some(InputEvent::Disconnected("pad-0".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_command("kb jump"), None);
        assert_eq!(parse_command("kb"), None);
        assert_eq!(parse_command(""), None);
    }
}
