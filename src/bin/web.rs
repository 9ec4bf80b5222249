//! Single binary web server: score sheet page from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, RUMMY_DATA_DIR (snapshot directory, default `data`),
//! RUMMY_SESSION_KEY (at least 64 bytes; sessions survive restarts when set).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get, middleware, post, put,
    web::{self, Data, Json},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use rummy_record::storage::save_or_log;
use rummy_record::{
    add_round, export, game_elapsed, record_points, reset_game, round_durations, start_game_in,
    Game, GameError, GameEvent, GameId, GamePhase, GameSnapshot, JsonFileStore, PlayerId,
    SnapshotStore, Standing, Winner,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-session entry: game data + last activity time (for auto-cleanup).
struct GameEntry {
    game: Game,
    last_activity: Instant,
}

/// In-memory games by id plus the snapshot store behind them.
struct Games {
    entries: RwLock<HashMap<GameId, GameEntry>>,
    store: Box<dyn SnapshotStore>,
}

type AppState = Data<Games>;

/// Session key holding the game id.
const GAME_ID_KEY: &str = "game_id";

/// Inactivity threshold: games not accessed for this long are dropped from memory (kept on disk).
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct StartGameBody {
    names: Vec<String>,
}

#[derive(Deserialize)]
struct RecordPointsBody {
    player_id: PlayerId,
    round_num: u32,
    value: String,
}

/// Everything the page needs to render the score table.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GameView<'a> {
    #[serde(flatten)]
    snapshot: GameSnapshot,
    phase: GamePhase,
    winner: Option<&'a Winner>,
    /// Per player, in player order.
    standings: Vec<Standing>,
    round_durations: Vec<String>,
    elapsed: Option<String>,
    /// Notifications produced by this request.
    events: Vec<GameEvent>,
}

impl<'a> GameView<'a> {
    fn new(game: &'a Game, events: Vec<GameEvent>, now: DateTime<Utc>) -> Self {
        Self {
            snapshot: GameSnapshot::from(game),
            phase: game.phase,
            winner: game.winner.as_ref(),
            standings: game.players.iter().map(|p| p.standing()).collect(),
            round_durations: round_durations(game, now),
            elapsed: game_elapsed(game, now),
            events,
        }
    }
}

fn game_response(game: &Game, events: Vec<GameEvent>) -> HttpResponse {
    HttpResponse::Ok().json(GameView::new(game, events, Utc::now()))
}

fn error_response(e: GameError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string(), "kind": e.kind() }))
}

/// Game id for this session, assigning a fresh one on first visit.
fn session_game_id(session: &Session) -> GameId {
    match session.get::<GameId>(GAME_ID_KEY) {
        Ok(Some(id)) => id,
        Ok(None) | Err(_) => {
            let id = Uuid::new_v4();
            if let Err(e) = session.insert(GAME_ID_KEY, id) {
                log::warn!("Could not store game id in session: {}", e);
            }
            id
        }
    }
}

/// Entry for a game id: from memory, else resumed from the store, else a new empty game.
fn entry_for<'a>(
    entries: &'a mut HashMap<GameId, GameEntry>,
    store: &dyn SnapshotStore,
    id: GameId,
) -> &'a mut GameEntry {
    let entry = entries.entry(id).or_insert_with(|| {
        let game = match store.load(id) {
            Ok(Some(game)) => {
                log::info!("Resumed game {} at round {}", id, game.current_round);
                game
            }
            Ok(None) => Game::with_id(id),
            Err(e) => {
                log::warn!("Could not load game {}: {}", id, e);
                Game::with_id(id)
            }
        };
        GameEntry {
            game,
            last_activity: Instant::now(),
        }
    });
    entry.last_activity = Instant::now();
    entry
}

/// Save a game on the blocking pool, after the state lock has been released.
async fn persist(state: &AppState, game: Game) {
    let id = game.id;
    let store_state = state.clone();
    if let Err(e) = web::block(move || save_or_log(store_state.store.as_ref(), &game)).await {
        log::warn!("Snapshot save for game {} did not run: {}", id, e);
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "rummy-record",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Current game for this session (empty NotStarted game on first visit).
#[get("/api/game")]
async fn api_get_game(state: AppState, session: Session) -> HttpResponse {
    let id = session_game_id(&session);
    let mut g = match state.entries.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = entry_for(&mut g, state.store.as_ref(), id);
    game_response(&entry.game, Vec::new())
}

/// Start the game with the submitted names and open round 1.
#[post("/api/game/start")]
async fn api_start_game(state: AppState, session: Session, body: Json<StartGameBody>) -> HttpResponse {
    let id = session_game_id(&session);
    let (response, changed) = {
        let mut g = match state.entries.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        let entry = entry_for(&mut g, state.store.as_ref(), id);
        match start_game_in(&mut entry.game, body.names.as_slice()) {
            Ok(()) => (game_response(&entry.game, Vec::new()), Some(entry.game.clone())),
            Err(e) => (error_response(e), None),
        }
    };
    if let Some(game) = changed {
        persist(&state, game).await;
    }
    response
}

/// Open the next round (every active player must have an entry for the current one).
#[post("/api/game/rounds")]
async fn api_add_round(state: AppState, session: Session) -> HttpResponse {
    let id = session_game_id(&session);
    let (response, changed) = {
        let mut g = match state.entries.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        let entry = entry_for(&mut g, state.store.as_ref(), id);
        match add_round(&mut entry.game) {
            Ok(_) => (game_response(&entry.game, Vec::new()), Some(entry.game.clone())),
            Err(e) => (error_response(e), None),
        }
    };
    if let Some(game) = changed {
        persist(&state, game).await;
    }
    response
}

/// Record one cell of the score table: points, "D" (dropped) or "W"/"0" (winner).
#[put("/api/game/points")]
async fn api_record_points(
    state: AppState,
    session: Session,
    body: Json<RecordPointsBody>,
) -> HttpResponse {
    let id = session_game_id(&session);
    let (response, changed) = {
        let mut g = match state.entries.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        let entry = entry_for(&mut g, state.store.as_ref(), id);
        match record_points(&mut entry.game, body.player_id, body.round_num, &body.value) {
            Ok(events) => (game_response(&entry.game, events), Some(entry.game.clone())),
            Err(e) => (error_response(e), None),
        }
    };
    if let Some(game) = changed {
        persist(&state, game).await;
    }
    response
}

/// Clear all players and scores (restart / clear all).
#[post("/api/game/reset")]
async fn api_reset_game(state: AppState, session: Session) -> HttpResponse {
    let id = session_game_id(&session);
    let response = {
        let mut g = match state.entries.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        let entry = entry_for(&mut g, state.store.as_ref(), id);
        reset_game(&mut entry.game);
        game_response(&entry.game, Vec::new())
    };
    let store_state = state.clone();
    let removed = web::block(move || store_state.store.remove(id)).await;
    match removed {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::warn!("Could not remove snapshot for game {}: {}", id, e),
        Err(e) => log::warn!("Snapshot removal for game {} did not run: {}", id, e),
    }
    response
}

/// Download the score sheet as CSV.
#[get("/api/game/export.csv")]
async fn api_export_csv(state: AppState, session: Session) -> HttpResponse {
    let id = session_game_id(&session);
    let mut g = match state.entries.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = entry_for(&mut g, state.store.as_ref(), id);
    match export::score_sheet_csv(&entry.game) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"rummy-scores.csv\"",
            ))
            .body(csv),
        Err(e) => {
            log::warn!("Could not export game {}: {}", id, e);
            HttpResponse::InternalServerError().body("export error")
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Cookie signing key from RUMMY_SESSION_KEY, or a random one (sessions end on restart).
fn session_key() -> Key {
    match std::env::var("RUMMY_SESSION_KEY") {
        Ok(secret) => match Key::try_from(secret.as_bytes()) {
            Ok(key) => key,
            Err(_) => {
                log::warn!("RUMMY_SESSION_KEY must be at least 64 bytes; using a random key");
                Key::generate()
            }
        },
        Err(_) => Key::generate(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_dir = std::env::var("RUMMY_DATA_DIR").unwrap_or_else(|_| default_data_dir());
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Saving games to {}", data_dir);

    let state = Data::new(Games {
        entries: RwLock::new(HashMap::new()),
        store: Box::new(JsonFileStore::new(data_dir)),
    });
    let key = session_key();

    // Background task: every 30 minutes, drop games inactive for 12+ hours from memory
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.entries.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Unloaded {} inactive game(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_name("rummy-session".to_string())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_get_game)
            .service(api_start_game)
            .service(api_add_round)
            .service(api_record_points)
            .service(api_reset_game)
            .service(api_export_csv)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
