//! Admin JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set DATA_DIR to keep tournaments on disk; otherwise they live in memory.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_engine::{
    assign_teams, commit_bracket, read_player_pool_csv, report_result, report_score,
    schedule_match, set_status, start_match, IndividualPlayer, JsonFileStore, MatchId,
    MatchResult, MemoryStore, Player, Score, StoreError, Team, Tournament, TournamentDetails,
    TournamentError, TournamentId, TournamentStatus, TournamentStore,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

type AppState = Data<dyn TournamentStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct SetStatusBody {
    status: TournamentStatus,
}

#[derive(Deserialize)]
struct NewPlayerBody {
    name: String,
    position: String,
}

#[derive(Deserialize)]
struct RegisterTeamBody {
    name: String,
    #[serde(default)]
    registration_id: Option<String>,
    #[serde(default)]
    players: Vec<NewPlayerBody>,
}

#[derive(Deserialize)]
struct ScheduleBody {
    scheduled_time: Option<DateTime<Utc>>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn store_error(e: StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(_) => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
        }
        e => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

fn bad_request(e: TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Read-modify-write of one tournament: load, apply `f`, save the whole record on success.
fn update_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut t = match state.load_tournament(id) {
        Ok(t) => t,
        Err(e) => return store_error(e),
    };
    if let Err(e) = f(&mut t) {
        return bad_request(e);
    }
    match state.save_tournament(id, &t) {
        Ok(()) => HttpResponse::Ok().json(&t),
        Err(e) => store_error(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-engine",
    })
}

/// Create a new tournament in Draft.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<TournamentDetails>) -> HttpResponse {
    let tournament = match Tournament::new(body.into_inner()) {
        Ok(t) => t,
        Err(e) => return bad_request(e),
    };
    match state.save_tournament(tournament.id, &tournament) {
        Ok(()) => HttpResponse::Ok().json(&tournament),
        Err(e) => store_error(e),
    }
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    match state.list_tournaments() {
        Ok(all) => HttpResponse::Ok().json(all),
        Err(e) => store_error(e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.load_tournament(path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => store_error(e),
    }
}

/// Open or close registration (Draft / RegistrationOpen / RegistrationClosed only).
#[put("/api/tournaments/{id}/status")]
async fn api_set_status(state: AppState, path: Path<TournamentPath>, body: Json<SetStatusBody>) -> HttpResponse {
    update_tournament(&state, path.id, |t| set_status(t, body.status))
}

/// Register a whole team.
#[post("/api/tournaments/{id}/teams")]
async fn api_register_team(state: AppState, path: Path<TournamentPath>, body: Json<RegisterTeamBody>) -> HttpResponse {
    if let Err(e) = state.load_tournament(path.id) {
        return store_error(e);
    }
    let body = body.into_inner();
    let players = body
        .players
        .into_iter()
        .map(|p| Player::new(p.name.trim(), p.position.trim()))
        .collect();
    let team = Team::registered(body.name.trim(), body.registration_id, players);
    match state.add_registered_team(path.id, team.clone()) {
        Ok(()) => HttpResponse::Ok().json(team),
        Err(e) => store_error(e),
    }
}

/// Add one individually registered player to the pool.
#[post("/api/tournaments/{id}/individuals")]
async fn api_add_individual(state: AppState, path: Path<TournamentPath>, body: Json<IndividualPlayer>) -> HttpResponse {
    if let Err(e) = state.load_tournament(path.id) {
        return store_error(e);
    }
    match state.add_individual_player(path.id, body.into_inner()) {
        Ok(()) => match state.load_individual_player_pool(path.id) {
            Ok(pool) => HttpResponse::Ok().json(pool),
            Err(e) => store_error(e),
        },
        Err(e) => store_error(e),
    }
}

/// Bulk import individuals from a CSV body with an `id,name,position` header.
#[post("/api/tournaments/{id}/individuals/csv")]
async fn api_import_individuals(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    if let Err(e) = state.load_tournament(path.id) {
        return store_error(e);
    }
    let imported = match read_player_pool_csv(body.as_bytes()) {
        Ok(pool) => pool,
        Err(e) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    };
    let count = imported.len();
    if let Err(e) = state.add_individual_players(path.id, imported) {
        return store_error(e);
    }
    log::info!("Imported {} individual player(s) into tournament {}", count, path.id);
    HttpResponse::Ok().json(serde_json::json!({ "imported": count }))
}

/// Fill the tournament with registered teams, then auto-formed teams from the pool.
#[post("/api/tournaments/{id}/teams/assign")]
async fn api_assign_teams(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let registered = match state.load_registered_teams(path.id) {
        Ok(teams) => teams,
        Err(e) => return store_error(e),
    };
    let pool = match state.load_individual_player_pool(path.id) {
        Ok(pool) => pool,
        Err(e) => return store_error(e),
    };
    update_tournament(&state, path.id, |t| {
        assign_teams(t, registered, pool, &mut rand::thread_rng())
    })
}

/// Generate and commit the bracket; the tournament moves to InProgress.
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, commit_bracket)
}

/// Record a match result (winner authoritative) and advance the winner.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_report_result(state: AppState, path: Path<TournamentMatchPath>, body: Json<MatchResult>) -> HttpResponse {
    update_tournament(&state, path.id, |t| {
        report_result(t, path.match_id, body.into_inner()).map(|_| ())
    })
}

/// Record a match result from the score; the higher score wins.
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_report_score(state: AppState, path: Path<TournamentMatchPath>, body: Json<Score>) -> HttpResponse {
    update_tournament(&state, path.id, |t| {
        report_score(t, path.match_id, body.into_inner()).map(|_| ())
    })
}

#[put("/api/tournaments/{id}/matches/{match_id}/start")]
async fn api_start_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    update_tournament(&state, path.id, |t| start_match(&mut t.bracket, path.match_id))
}

#[put("/api/tournaments/{id}/matches/{match_id}/schedule")]
async fn api_schedule_match(state: AppState, path: Path<TournamentMatchPath>, body: Json<ScheduleBody>) -> HttpResponse {
    update_tournament(&state, path.id, |t| {
        schedule_match(&mut t.bracket, path.match_id, body.scheduled_time)
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn open_store() -> Result<Arc<dyn TournamentStore>, StoreError> {
    match std::env::var("DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => Ok(Arc::new(JsonFileStore::open(dir)?)),
        _ => {
            log::info!("DATA_DIR not set, tournaments are kept in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
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
    let bind = (host.as_str(), port);

    let store = open_store().map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let state: AppState = Data::from(store);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_set_status)
            .service(api_register_team)
            .service(api_add_individual)
            .service(api_import_individuals)
            .service(api_assign_teams)
            .service(api_generate_bracket)
            .service(api_report_result)
            .service(api_report_score)
            .service(api_start_match)
            .service(api_schedule_match)
    })
    .bind(bind)?
    .run()
    .await
}
