//! main.rs — Race replay entry point
//!
//! Runs two concurrent tasks around one shared `AnimationClock`:
//!   1. Tick loop: calls `tick()` at tick_rate_hz and broadcasts each frame
//!   2. WebSocket server: control panel on ctrl_port (play/pause/speed,
//!      boat and team selection, display mode) and frame relay to the map
//!
//! Ticks and commands both take the write lock, so a command never lands in
//! the middle of a tick.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use clap::Parser;
use race_replay::{loader, AnimationClock, CommandOutcome, ReplayConfig};
use race_types::{ControlCommand, ReplayEvent, TeamInfo};
use tokio::sync::{broadcast, RwLock};
use tokio::time::interval;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "race-replay", about = "Ocean race replay on a virtual clock")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
    /// Data directory (team list + teams/)
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Team list name, without .json
    #[arg(long)]
    team_list: Option<String>,
    /// Team to preload (repeatable)
    #[arg(long = "team")]
    teams: Vec<String>,
    /// Control panel WebSocket port
    #[arg(long)]
    ctrl_port: Option<u16>,
    /// Start playing as soon as the preloaded teams are in
    #[arg(long)]
    autoplay: bool,
}

// ── Shared state ──────────────────────────────────────────────────────────────

struct ReplayState {
    clock: AnimationClock,
    data_dir: PathBuf,
    teams: Vec<TeamInfo>,
    /// Last serialized frame, replayed to newly connected clients
    last_frame: Option<String>,
}

impl ReplayState {
    fn teams_event(&self) -> ReplayEvent {
        ReplayEvent::Teams {
            teams: self.teams.clone(),
            loaded: self.clock.loaded_teams().to_vec(),
        }
    }
}

type SharedState = Arc<RwLock<ReplayState>>;
type EventTx = Arc<broadcast::Sender<String>>;

fn publish(tx: &EventTx, event: &ReplayEvent) {
    match serde_json::to_string(event) {
        Ok(json) => {
            let _ = tx.send(json);
        }
        Err(e) => warn!("Event serialize failed: {e}"),
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "race_replay=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut cfg = ReplayConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(dir) = args.data_dir {
        cfg.data.dir = dir;
    }
    if let Some(list) = args.team_list {
        cfg.data.team_list = list;
    }
    if let Some(port) = args.ctrl_port {
        cfg.server.ctrl_port = port;
    }

    info!(
        "🌊 Race replay starting — start {}, ×1 = {} ms/tick at {} Hz",
        cfg.race.start, cfg.animation.tick_base_ms, cfg.animation.tick_rate_hz
    );

    let teams = match loader::load_team_list(&cfg.team_list_path()).await {
        Ok(teams) => teams,
        Err(e) => {
            warn!("No team list: {e}");
            Vec::new()
        }
    };

    let mut clock = cfg.build_clock()?;
    for team in &args.teams {
        match loader::load_team(&cfg.data.dir, team).await {
            Ok(boats) => {
                clock.load_team(team, boats, false);
            }
            Err(e) => warn!("Team '{team}' not loaded: {e}"),
        }
    }
    if args.autoplay {
        clock.play();
    }

    let shared: SharedState = Arc::new(RwLock::new(ReplayState {
        clock,
        data_dir: cfg.data.dir.clone(),
        teams,
        last_frame: None,
    }));

    // Broadcast channel for frames and control events (web UI)
    let (event_tx, _) = broadcast::channel::<String>(64);
    let event_tx: EventTx = Arc::new(event_tx);

    tokio::spawn(tick_loop(shared.clone(), event_tx.clone(), cfg.tick_interval_ms()));

    let ctrl_addr = format!("0.0.0.0:{}", cfg.server.ctrl_port);
    info!("🖥  Control panel WebSocket at ws://{ctrl_addr}/ws");

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "race-replay ok" }))
        .with_state((shared, event_tx))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let listener = tokio::net::TcpListener::bind(&ctrl_addr)
        .await
        .with_context(|| format!("binding {ctrl_addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

async fn tick_loop(state: SharedState, events: EventTx, tick_ms: u64) {
    let mut ticker = interval(Duration::from_millis(tick_ms.max(1)));
    let mut frames: u64 = 0;

    info!("⚓ Tick loop running every {tick_ms} ms");

    loop {
        ticker.tick().await;

        let frame = {
            let mut s = state.write().await;
            if !s.clock.is_ticking() {
                continue;
            }
            let Some(frame) = s.clock.tick() else { continue };
            let event = ReplayEvent::Frame(frame.clone());
            if let Ok(json) = serde_json::to_string(&event) {
                s.last_frame = Some(json);
            }
            frame
        };

        frames += 1;
        if frame.finished {
            info!("🏁 Race replay finished after {frames} frames");
            frames = 0;
        } else if frames % 300 == 0 {
            debug!("⏱ ts={} | boats={} | ×{}", frame.timestamp, frame.boats.len(), frame.speed);
        }

        publish(&events, &ReplayEvent::Frame(frame));
    }
}

// ── WebSocket control handler ─────────────────────────────────────────────────

async fn ws_handler(
    ws: WebSocketUpgrade,
    State((state, events)): State<(SharedState, EventTx)>,
) -> Response {
    ws.on_upgrade(move |socket| handle_ws(socket, state, events))
}

async fn handle_ws(mut socket: WebSocket, state: SharedState, events: EventTx) {
    let mut event_rx = events.subscribe();

    // Current picture immediately on connect
    let (teams_json, frame_json) = {
        let s = state.read().await;
        (serde_json::to_string(&s.teams_event()).unwrap_or_default(), s.last_frame.clone())
    };
    let _ = socket.send(Message::Text(teams_json)).await;
    if let Some(frame) = frame_json {
        let _ = socket.send(Message::Text(frame)).await;
    }

    loop {
        tokio::select! {
            Ok(msg) = event_rx.recv() => {
                if socket.send(Message::Text(msg)).await.is_err() { break; }
            }
            Some(Ok(Message::Text(cmd))) = socket.recv() => {
                handle_command(&state, &events, &cmd).await;
            }
            else => break,
        }
    }
}

/// Commands are JSON: { "cmd": "...", "args": {...} }
async fn handle_command(state: &SharedState, events: &EventTx, raw: &str) {
    let cmd: ControlCommand = match serde_json::from_str(raw) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!("Unknown control command {raw}: {e}");
            return;
        }
    };

    match cmd {
        ControlCommand::LoadTeam { id, single } => {
            let data_dir = state.read().await.data_dir.clone();
            // file read outside the lock, ticks keep running meanwhile
            let boats = match loader::load_team(&data_dir, &id).await {
                Ok(boats) => boats,
                Err(e) => {
                    warn!("Team '{id}' not loaded: {e}");
                    return;
                }
            };
            let event = {
                let mut s = state.write().await;
                s.clock.load_team(&id, boats, single);
                s.teams_event()
            };
            publish(events, &event);
        }
        cmd => {
            let is_team_change = matches!(cmd, ControlCommand::UnloadTeam { .. });
            let (outcome, teams) = {
                let mut s = state.write().await;
                let outcome = s.clock.apply(cmd);
                (outcome, is_team_change.then(|| s.teams_event()))
            };
            match outcome {
                CommandOutcome::Stopped { restart_available } => {
                    publish(events, &ReplayEvent::Stopped { restart_available });
                }
                CommandOutcome::Ignored => debug!("Command had no effect: {raw}"),
                CommandOutcome::Applied => {}
            }
            if let Some(teams) = teams {
                publish(events, &teams);
            }
        }
    }
}
