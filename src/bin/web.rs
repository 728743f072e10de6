//! Single binary web server: JSON API over one club session.
//! Run with: cargo run --bin web
//! Configuration through env: HOST, PORT, COURTS, LEVEL_MODE, DATA_DIR (see `config`).

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use court_rotation::config::ServerConfig;
use court_rotation::logic::{
    add_player, assign_participants, clear_court, decode_csv_rows, delete_player,
    export_players, handle_import_data, level_based_court_assignment, link_update,
    load_players, make_player_active, make_player_paused, players_json_to_csv,
    recover_session, set_court_double, set_court_last_game, set_court_paused,
    toggle_player_presence, undo, update_player_level,
};
use court_rotation::models::{
    Admin, AdminError, Alert, DialogSlot, FileStorage, Gender, SessionView,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// The one session served by this process, with its dialog slot.
struct Session {
    admin: Admin,
    dialogs: DialogSlot,
}

type AppState = Data<RwLock<Session>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    #[serde(default)]
    gender: Gender,
    #[serde(default = "default_level")]
    level: u8,
    #[serde(default)]
    player_id: Option<String>,
}

fn default_level() -> u8 {
    1
}

#[derive(Deserialize)]
struct LevelBody {
    level: u8,
}

#[derive(Deserialize)]
struct CourtDoubleBody {
    double: bool,
}

#[derive(Deserialize)]
struct CourtPausedBody {
    paused: bool,
}

#[derive(Deserialize)]
struct LastGameBody {
    last_game: bool,
}

#[derive(Deserialize)]
struct LevelModeBody {
    three_level: bool,
}

#[derive(Deserialize)]
struct DismissBody {
    #[serde(default)]
    result: bool,
}

#[derive(Serialize)]
struct AssignResponse {
    assigned: Vec<usize>,
    session: SessionView,
}

fn error_response(e: AdminError) -> HttpResponse {
    match e {
        AdminError::Invariant(e) => {
            log::error!("Session invariant violated: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
        AdminError::Input(e) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

/// Run a command on the session and answer with the resulting session view.
fn with_session(
    state: &AppState,
    command: impl FnOnce(&mut Session) -> Result<(), AdminError>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match command(&mut g) {
        Ok(()) => HttpResponse::Ok().json(SessionView::from_admin(&g.admin)),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-rotation",
    })
}

#[get("/api/session")]
async fn api_get_session(state: AppState) -> HttpResponse {
    with_session(&state, |_| Ok(()))
}

/// Register a player by hand.
#[post("/api/players")]
async fn api_add_player(state: AppState, body: Json<AddPlayerBody>) -> HttpResponse {
    with_session(&state, |s| {
        add_player(
            &mut s.admin,
            &body.name,
            body.gender,
            body.level,
            body.player_id.as_deref(),
        )
        .map(|_| ())
    })
}

#[delete("/api/players/{id}")]
async fn api_delete_player(state: AppState, path: Path<String>) -> HttpResponse {
    with_session(&state, |s| Ok(delete_player(&mut s.admin, &path)?))
}

#[put("/api/players/{id}/level")]
async fn api_set_level(state: AppState, path: Path<String>, body: Json<LevelBody>) -> HttpResponse {
    with_session(&state, |s| Ok(update_player_level(&mut s.admin, &path, body.level)?))
}

/// Check a player in or out (card scan or click).
#[post("/api/players/{id}/presence")]
async fn api_toggle_presence(state: AppState, path: Path<String>) -> HttpResponse {
    with_session(&state, |s| Ok(toggle_player_presence(&mut s.admin, &path)?))
}

#[post("/api/players/{id}/pause")]
async fn api_pause_player(state: AppState, path: Path<String>) -> HttpResponse {
    with_session(&state, |s| Ok(make_player_paused(&mut s.admin, &path)?))
}

#[post("/api/players/{id}/activate")]
async fn api_activate_player(state: AppState, path: Path<String>) -> HttpResponse {
    with_session(&state, |s| Ok(make_player_active(&mut s.admin, &path)?))
}

/// One click of the two-click link protocol.
#[post("/api/players/{id}/link")]
async fn api_link_player(state: AppState, path: Path<String>) -> HttpResponse {
    with_session(&state, |s| {
        Ok(link_update(&mut s.admin, &path, &mut s.dialogs)?)
    })
}

/// Fill free courts. Answers with the courts that got a new game.
#[post("/api/assign")]
async fn api_assign(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let mut assigned = Vec::new();
    match assign_participants(&mut g.admin, |nr| assigned.push(nr)) {
        Ok(()) => HttpResponse::Ok().json(AssignResponse {
            assigned,
            session: SessionView::from_admin(&g.admin),
        }),
        Err(e) => error_response(e.into()),
    }
}

#[post("/api/courts/{nr}/clear")]
async fn api_clear_court(state: AppState, path: Path<usize>) -> HttpResponse {
    with_session(&state, |s| Ok(clear_court(&mut s.admin, *path)?))
}

#[put("/api/courts/{nr}/double")]
async fn api_court_double(
    state: AppState,
    path: Path<usize>,
    body: Json<CourtDoubleBody>,
) -> HttpResponse {
    with_session(&state, |s| set_court_double(&mut s.admin, *path, body.double))
}

#[put("/api/courts/{nr}/paused")]
async fn api_court_paused(
    state: AppState,
    path: Path<usize>,
    body: Json<CourtPausedBody>,
) -> HttpResponse {
    with_session(&state, |s| set_court_paused(&mut s.admin, *path, body.paused))
}

#[put("/api/courts/{nr}/last-game")]
async fn api_court_last_game(
    state: AppState,
    path: Path<usize>,
    body: Json<LastGameBody>,
) -> HttpResponse {
    with_session(&state, |s| {
        Ok(set_court_last_game(&mut s.admin, *path, body.last_game)?)
    })
}

#[put("/api/level-mode")]
async fn api_level_mode(state: AppState, body: Json<LevelModeBody>) -> HttpResponse {
    with_session(&state, |s| {
        Ok(level_based_court_assignment(&mut s.admin, body.three_level)?)
    })
}

#[post("/api/undo")]
async fn api_undo(state: AppState) -> HttpResponse {
    with_session(&state, |s| {
        undo(&mut s.admin, &mut s.dialogs)?;
        Ok(())
    })
}

/// Replace the registry with an uploaded CSV club list.
#[post("/api/import")]
async fn api_import(state: AppState, body: Bytes) -> HttpResponse {
    let rows = match decode_csv_rows(&body) {
        Ok(rows) => rows,
        Err(e) => return error_response(e.into()),
    };
    with_session(&state, |s| {
        let dialogs = &mut s.dialogs;
        handle_import_data(&mut s.admin, &rows, |warnings| {
            dialogs.display("Import", &warnings.join("\n"))
        })?;
        Ok(())
    })
}

/// Known players as a CSV download.
#[get("/api/export")]
async fn api_export(state: AppState) -> HttpResponse {
    let json = match state.read() {
        Ok(g) => export_players(&g.admin).unwrap_or_else(|| "[]".to_string()),
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match players_json_to_csv(&json) {
        Ok(csv) => {
            let file_name = format!(
                "players_export_{}.csv",
                chrono::Local::now().format("%Y%m%d")
            );
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", file_name),
                ))
                .body(format!("\u{FEFF}{}", csv))
        }
        Err(e) => error_response(e.into()),
    }
}

#[get("/api/dialog")]
async fn api_get_dialog(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(g.dialogs.active()),
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

#[post("/api/dialog/dismiss")]
async fn api_dismiss_dialog(state: AppState, body: Json<DismissBody>) -> HttpResponse {
    with_session(&state, |s| {
        s.dialogs.dismiss(body.result);
        Ok(())
    })
}

/// Build the session from storage and continue the previous run, if any.
fn open_session(config: &ServerConfig) -> std::io::Result<Session> {
    let storage = FileStorage::new(&config.data_dir)?;
    let mut admin = Admin::new(config.courts, Box::new(storage));
    let mut dialogs = DialogSlot::new();
    let startup = |admin: &mut Admin, dialogs: &mut DialogSlot| -> Result<bool, AdminError> {
        level_based_court_assignment(admin, config.three_level)?;
        load_players(admin)?;
        Ok(recover_session(admin, dialogs)?)
    };
    let recovered = startup(&mut admin, &mut dialogs).map_err(std::io::Error::other)?;
    log::info!(
        "Session ready: {} courts, {} known players, previous state {}",
        admin.courts.len(),
        admin.players.len(),
        if recovered { "restored" } else { "not restored" }
    );
    Ok(Session { admin, dialogs })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let session = open_session(&config)?;
    let state = Data::new(RwLock::new(session));

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_get_session)
            .service(api_add_player)
            .service(api_delete_player)
            .service(api_set_level)
            .service(api_toggle_presence)
            .service(api_pause_player)
            .service(api_activate_player)
            .service(api_link_player)
            .service(api_assign)
            .service(api_clear_court)
            .service(api_court_double)
            .service(api_court_paused)
            .service(api_court_last_game)
            .service(api_level_mode)
            .service(api_undo)
            .service(api_import)
            .service(api_export)
            .service(api_get_dialog)
            .service(api_dismiss_dialog)
    })
    .bind(bind)?
    .run()
    .await
}
