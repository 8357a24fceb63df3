//! Line-based operator console.
//!
//! Stands in for a game server: each line joins, moves or hurts a simulated
//! player, or issues a teleport on their behalf. Messages sent to players are
//! logged as JSON.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use waystone_domain::{DomainError, PlayerId, Position, Warp};
use waystone_shared::ServerMessage;

use crate::app::App;
use crate::infrastructure::ports::{PlayerRegistry, WarpRepo};
use crate::use_cases::teleport::{
    HomeTarget, LastLocationTarget, LocationTarget, PlayerTarget, TeleportTarget, WarpTarget,
};
use crate::use_cases::{EnqueueOutcome, LifecycleError, SchedulerError};

const HELP: &str = "commands: join <name> <world> <x> <y> <z> | quit <name> | \
move <name> <world> <x> <y> <z> | die <name> | hurt <name> | \
setwarp <name> <world> <x> <y> <z> | delwarp <name> | warp <player> <warp> | \
sethome <player> <home> | home <player> <home> | back <player> | \
tp <player> <x> <y> <z> | tpto <player> <other> | cancel <player> | status";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Join { name: String, position: Position },
    Quit { name: String },
    Move { name: String, position: Position },
    Die { name: String },
    Hurt { name: String },
    SetWarp { name: String, position: Position },
    DelWarp { name: String },
    Warp { player: String, warp: String },
    SetHome { player: String, home: String },
    Home { player: String, home: String },
    Back { player: String },
    Tp { player: String, x: f64, y: f64, z: f64 },
    TpTo { player: String, other: String },
    Cancel { player: String },
    Status,
}

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Not a number: {0}")]
    InvalidNumber(String),
    #[error("{0} is not online")]
    NotOnline(String),
    #[error("No such {kind}: {name}")]
    Missing { kind: &'static str, name: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Parse one console line.
pub fn parse(line: &str) -> Result<ConsoleCommand, ConsoleError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = parts.split_first() else {
        return Err(ConsoleError::Empty);
    };

    let command = match (command.to_ascii_lowercase().as_str(), args) {
        ("join", [name, world, x, y, z]) => ConsoleCommand::Join {
            name: name.to_string(),
            position: position(world, x, y, z)?,
        },
        ("join", _) => return Err(ConsoleError::Usage("join <name> <world> <x> <y> <z>")),
        ("quit", [name]) => ConsoleCommand::Quit {
            name: name.to_string(),
        },
        ("quit", _) => return Err(ConsoleError::Usage("quit <name>")),
        ("move", [name, world, x, y, z]) => ConsoleCommand::Move {
            name: name.to_string(),
            position: position(world, x, y, z)?,
        },
        ("move", _) => return Err(ConsoleError::Usage("move <name> <world> <x> <y> <z>")),
        ("die", [name]) => ConsoleCommand::Die {
            name: name.to_string(),
        },
        ("die", _) => return Err(ConsoleError::Usage("die <name>")),
        ("hurt", [name]) => ConsoleCommand::Hurt {
            name: name.to_string(),
        },
        ("hurt", _) => return Err(ConsoleError::Usage("hurt <name>")),
        ("setwarp", [name, world, x, y, z]) => ConsoleCommand::SetWarp {
            name: name.to_string(),
            position: position(world, x, y, z)?,
        },
        ("setwarp", _) => {
            return Err(ConsoleError::Usage("setwarp <name> <world> <x> <y> <z>"))
        }
        ("delwarp", [name]) => ConsoleCommand::DelWarp {
            name: name.to_string(),
        },
        ("delwarp", _) => return Err(ConsoleError::Usage("delwarp <name>")),
        ("warp", [player, warp]) => ConsoleCommand::Warp {
            player: player.to_string(),
            warp: warp.to_string(),
        },
        ("warp", _) => return Err(ConsoleError::Usage("warp <player> <warp>")),
        ("sethome", [player, home]) => ConsoleCommand::SetHome {
            player: player.to_string(),
            home: home.to_string(),
        },
        ("sethome", _) => return Err(ConsoleError::Usage("sethome <player> <home>")),
        ("home", [player, home]) => ConsoleCommand::Home {
            player: player.to_string(),
            home: home.to_string(),
        },
        ("home", _) => return Err(ConsoleError::Usage("home <player> <home>")),
        ("back", [player]) => ConsoleCommand::Back {
            player: player.to_string(),
        },
        ("back", _) => return Err(ConsoleError::Usage("back <player>")),
        ("tp", [player, x, y, z]) => ConsoleCommand::Tp {
            player: player.to_string(),
            x: number(x)?,
            y: number(y)?,
            z: number(z)?,
        },
        ("tp", _) => return Err(ConsoleError::Usage("tp <player> <x> <y> <z>")),
        ("tpto", [player, other]) => ConsoleCommand::TpTo {
            player: player.to_string(),
            other: other.to_string(),
        },
        ("tpto", _) => return Err(ConsoleError::Usage("tpto <player> <other>")),
        ("cancel", [player]) => ConsoleCommand::Cancel {
            player: player.to_string(),
        },
        ("cancel", _) => return Err(ConsoleError::Usage("cancel <player>")),
        ("status", []) => ConsoleCommand::Status,
        ("status", _) => return Err(ConsoleError::Usage("status")),
        (other, _) => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn number(raw: &str) -> Result<f64, ConsoleError> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ConsoleError::InvalidNumber(raw.to_string()))
}

fn position(world: &str, x: &str, y: &str, z: &str) -> Result<Position, ConsoleError> {
    Ok(Position::new(world, number(x)?, number(y)?, number(z)?))
}

/// Read commands from stdin until EOF or cancellation.
pub async fn run(app: Arc<App>, cancel: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::info!("Console input closed");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read console input");
                    break;
                }
            },
        };

        if line.trim().is_empty() {
            continue;
        }
        match parse(&line) {
            Ok(command) => match execute(&app, command).await {
                Ok(reply) => println!("{reply}"),
                Err(e) => println!("error: {e}"),
            },
            Err(e) => println!("error: {e}\n{HELP}"),
        }
    }
}

/// Apply a parsed command and describe what happened.
pub async fn execute(app: &App, command: ConsoleCommand) -> Result<String, ConsoleError> {
    match command {
        ConsoleCommand::Join { name, position } => {
            let id = PlayerId::from_name(&name);
            let outbound = app.players.connect(id, name.clone(), position);
            tokio::spawn(log_outbound(name.clone(), outbound));
            app.events.on_join(id).await?;
            Ok(format!("{name} joined ({id})"))
        }
        ConsoleCommand::Quit { name } => {
            let id = online(app, &name)?;
            let saved = app.events.on_quit(id).await;
            app.players.disconnect(id);
            saved?;
            Ok(format!("{name} left"))
        }
        ConsoleCommand::Move { name, position } => {
            let id = online(app, &name)?;
            let from = app.players.position(id).unwrap_or_else(|| position.clone());
            let interrupted = app.events.on_moved(id, &from, &position);

            let players = app.players.clone();
            let to = position.clone();
            app.world().submit(Box::new(move || {
                players.set_position(id, to);
            }));

            Ok(if interrupted {
                format!("{name} moved to {position}, teleport interrupted")
            } else {
                format!("{name} moved to {position}")
            })
        }
        ConsoleCommand::Die { name } => {
            let id = online(app, &name)?;
            Ok(if app.events.on_death(id) {
                format!("{name} died, location recorded")
            } else {
                format!("{name} died")
            })
        }
        ConsoleCommand::Hurt { name } => {
            let id = online(app, &name)?;
            Ok(if app.events.on_damaged(id) {
                format!("{name} was hurt, teleport interrupted")
            } else {
                format!("{name} was hurt")
            })
        }
        ConsoleCommand::SetWarp { name, position } => {
            let warp = Warp::new(&name, position)?;
            let reply = format!("warp {} set at {}", warp.name(), warp.position());
            app.warps.set(warp);
            Ok(reply)
        }
        ConsoleCommand::DelWarp { name } => match app.warps.remove(&name) {
            Some(warp) => Ok(format!("warp {} deleted", warp.name())),
            None => Err(ConsoleError::Missing { kind: "warp", name }),
        },
        ConsoleCommand::Warp { player, warp } => {
            let id = online(app, &player)?;
            if app.warps.get(&Warp::normalize_name(&warp)).is_none() {
                return Err(ConsoleError::Missing { kind: "warp", name: warp });
            }
            let target = WarpTarget::new(&warp, app.warps.clone());
            queue(app, id, Box::new(target))
        }
        ConsoleCommand::SetHome { player, home } => {
            let id = online(app, &player)?;
            let position = app
                .players
                .position(id)
                .ok_or_else(|| ConsoleError::NotOnline(player.clone()))?;
            app.profiles.set_home(id, &home, position.clone())?;
            Ok(format!("home {home} of {player} set at {position}"))
        }
        ConsoleCommand::Home { player, home } => {
            let id = online(app, &player)?;
            if app.profiles.home(id, &home).is_none() {
                return Err(ConsoleError::Missing { kind: "home", name: home });
            }
            let target = HomeTarget::new(id, home, app.profiles.clone());
            queue(app, id, Box::new(target))
        }
        ConsoleCommand::Back { player } => {
            let id = online(app, &player)?;
            let target = LastLocationTarget::new(id, &app.profiles);
            if !target.is_known() {
                return Err(ConsoleError::Missing {
                    kind: "last location for",
                    name: player,
                });
            }
            queue(app, id, Box::new(target))
        }
        ConsoleCommand::Tp { player, x, y, z } => {
            let id = online(app, &player)?;
            let world = app
                .players
                .position(id)
                .map(|p| p.world)
                .ok_or_else(|| ConsoleError::NotOnline(player.clone()))?;
            let target = LocationTarget::new(Position::new(world, x, y, z));
            queue(app, id, Box::new(target))
        }
        ConsoleCommand::TpTo { player, other } => {
            let id = online(app, &player)?;
            let other_id = online(app, &other)?;
            let target = PlayerTarget::new(other_id, other, app.players.clone());
            queue(app, id, Box::new(target))
        }
        ConsoleCommand::Cancel { player } => {
            let id = online(app, &player)?;
            Ok(if app.scheduler.interrupt(id) {
                format!("teleport of {player} cancelled")
            } else {
                format!("{player} has no pending teleport")
            })
        }
        ConsoleCommand::Status => Ok(status(app)),
    }
}

fn online(app: &App, name: &str) -> Result<PlayerId, ConsoleError> {
    let id = PlayerId::from_name(name);
    if app.players.is_online(id) {
        Ok(id)
    } else {
        Err(ConsoleError::NotOnline(name.to_string()))
    }
}

fn queue(app: &App, id: PlayerId, target: Box<dyn TeleportTarget>) -> Result<String, ConsoleError> {
    let text = target.describe();
    let reply = match app.scheduler.queue_teleport(id, target)? {
        EnqueueOutcome::Executed => format!("teleporting to {text}"),
        EnqueueOutcome::Queued { superseded: false } => format!(
            "teleport to {text} in {}s",
            app.scheduler.remaining_seconds(id).unwrap_or_default()
        ),
        EnqueueOutcome::Queued { superseded: true } => {
            format!("pending teleport replaced by {text}")
        }
    };
    Ok(reply)
}

fn status(app: &App) -> String {
    let mut players = app.players.list();
    players.sort_by(|a, b| a.1.cmp(&b.1));

    let mut lines = vec![format!(
        "{} online, {} pending, {} warps",
        players.len(),
        app.scheduler.pending_count(),
        app.warps.list().len()
    )];
    for (id, name) in players {
        let position = app
            .players
            .position(id)
            .map(|p| p.to_string())
            .unwrap_or_default();
        let line = match app.scheduler.get(id) {
            Some(pending) => format!(
                "  {name} at {position}, teleporting to {} in {}s",
                pending.target_text, pending.remaining_seconds
            ),
            None => format!("  {name} at {position}"),
        };
        lines.push(line);
    }
    lines.join("\n")
}

async fn log_outbound(name: String, mut outbound: mpsc::Receiver<ServerMessage>) {
    while let Some(message) = outbound.recv().await {
        match serde_json::to_string(&message) {
            Ok(json) => tracing::info!(player = %name, message = %json, "Outbound message"),
            Err(e) => tracing::warn!(player = %name, error = %e, "Failed to encode message"),
        }
    }
}
