//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use court_planner::{
    add_knockout_stage, add_sample_teams, balance_plan_groups, bracket_csv, display_grid,
    generate_round_robin, grid_csv, schedule_csv, schedule_plan, BracketSide, PlanError, PlanId,
    PlanSettings, PlanSnapshot, ScheduleOutput, TeamId, TournamentPlan,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-plan entry: plan data + last activity time (for auto-cleanup).
struct PlanEntry {
    plan: TournamentPlan,
    last_activity: Instant,
}

/// In-memory state: many plans by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<PlanId, PlanEntry>>>;

const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
    #[serde(default)]
    level: Option<String>,
}

#[derive(Deserialize)]
struct SampleTeamsBody {
    #[serde(default = "default_sample_count")]
    count: usize,
}

fn default_sample_count() -> usize {
    8
}

#[derive(Deserialize)]
struct BalanceBody {
    groups: usize,
}

#[derive(Deserialize)]
struct KnockoutBody {
    group_1: String,
    group_2: String,
    #[serde(default = "default_include_losers")]
    include_losers: bool,
}

fn default_include_losers() -> bool {
    true
}

#[derive(Deserialize)]
struct PlanPath {
    id: PlanId,
}

#[derive(Deserialize)]
struct PlanTeamPath {
    id: PlanId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct BracketPath {
    id: PlanId,
    side: String,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No plan" }))
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Run `op` on the plan and answer with the updated plan.
fn update_plan<F>(state: &AppState, id: PlanId, op: F) -> HttpResponse
where
    F: FnOnce(&mut TournamentPlan) -> Result<(), PlanError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let plan = &mut entry.plan;
    match op(plan) {
        Ok(()) => HttpResponse::Ok().json(&*plan),
        Err(e) => bad_request(e),
    }
}

/// Render the plan's last schedule as a CSV download.
fn download_schedule<F>(state: &AppState, id: PlanId, file_name: &str, render: F) -> HttpResponse
where
    F: FnOnce(&ScheduleOutput) -> Result<String, Box<dyn Error>>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let output = match entry.plan.schedule.as_ref() {
        Some(o) => o,
        None => return bad_request("Run the scheduler first"),
    };
    match render(output) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file_name),
            ))
            .body(body),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "export failed" }))
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-planner",
    })
}

#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new plan. The body is a JSON settings object; omitted fields take their defaults,
/// so `{}` gives a default plan. A malformed body is rejected with 400.
#[post("/api/plans")]
async fn api_create_plan(state: AppState, body: Json<PlanSettings>) -> HttpResponse {
    let settings = body.into_inner();
    if let Err(e) = settings.validate() {
        return bad_request(e);
    }
    let plan = TournamentPlan::new(settings);
    let id = plan.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&plan);
    g.insert(
        id,
        PlanEntry {
            plan,
            last_activity: Instant::now(),
        },
    );
    log::info!("Created plan {}", id);
    response
}

#[get("/api/plans/{id}")]
async fn api_get_plan(state: AppState, path: Path<PlanPath>) -> HttpResponse {
    update_plan(&state, path.id, |_| Ok(()))
}

#[put("/api/plans/{id}/settings")]
async fn api_set_settings(
    state: AppState,
    path: Path<PlanPath>,
    body: Json<PlanSettings>,
) -> HttpResponse {
    let settings = body.into_inner();
    update_plan(&state, path.id, |p| p.set_settings(settings))
}

#[post("/api/plans/{id}/teams")]
async fn api_add_team(state: AppState, path: Path<PlanPath>, body: Json<AddTeamBody>) -> HttpResponse {
    let AddTeamBody { name, level } = body.into_inner();
    update_plan(&state, path.id, |p| p.add_team(name, level).map(|_| ()))
}

#[delete("/api/plans/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<PlanTeamPath>) -> HttpResponse {
    update_plan(&state, path.id, |p| p.remove_team(path.team_id))
}

#[delete("/api/plans/{id}/teams")]
async fn api_clear_teams(state: AppState, path: Path<PlanPath>) -> HttpResponse {
    update_plan(&state, path.id, |p| {
        p.clear_teams();
        Ok(())
    })
}

/// Add ungrouped sample teams for trying out a layout.
#[post("/api/plans/{id}/teams/sample")]
async fn api_sample_teams(
    state: AppState,
    path: Path<PlanPath>,
    body: Option<Json<SampleTeamsBody>>,
) -> HttpResponse {
    let count = body.map_or_else(default_sample_count, |b| b.count);
    update_plan(&state, path.id, |p| {
        add_sample_teams(p, count, &mut rand::thread_rng());
        Ok(())
    })
}

/// Shuffle the roster into N balanced groups.
#[post("/api/plans/{id}/teams/balance")]
async fn api_balance_groups(
    state: AppState,
    path: Path<PlanPath>,
    body: Json<BalanceBody>,
) -> HttpResponse {
    update_plan(&state, path.id, |p| {
        balance_plan_groups(p, body.groups, &mut rand::thread_rng())
    })
}

/// Replace the catalog with the round robin of the current groups.
#[post("/api/plans/{id}/matches/round-robin")]
async fn api_round_robin(state: AppState, path: Path<PlanPath>) -> HttpResponse {
    update_plan(&state, path.id, |p| generate_round_robin(p).map(|_| ()))
}

/// Append semifinals, optional losers bracket, 3rd place and grand final.
#[post("/api/plans/{id}/matches/knockout")]
async fn api_knockout(state: AppState, path: Path<PlanPath>, body: Json<KnockoutBody>) -> HttpResponse {
    update_plan(&state, path.id, |p| {
        add_knockout_stage(p, &body.group_1, &body.group_2, body.include_losers).map(|_| ())
    })
}

#[delete("/api/plans/{id}/matches")]
async fn api_clear_matches(state: AppState, path: Path<PlanPath>) -> HttpResponse {
    update_plan(&state, path.id, |p| {
        p.clear_matches();
        Ok(())
    })
}

/// Run the scheduler; unplaced matches are reported in `schedule.unscheduled`.
#[post("/api/plans/{id}/schedule")]
async fn api_schedule(state: AppState, path: Path<PlanPath>) -> HttpResponse {
    update_plan(&state, path.id, |p| schedule_plan(p).map(|_| ()))
}

#[get("/api/plans/{id}/schedule/grid")]
async fn api_schedule_grid(state: AppState, path: Path<PlanPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(&path.id) {
        Some(entry) => match entry.plan.schedule.as_ref() {
            Some(output) => HttpResponse::Ok().json(display_grid(output)),
            None => bad_request("Run the scheduler first"),
        },
        None => not_found(),
    }
}

#[get("/api/plans/{id}/schedule.csv")]
async fn api_schedule_csv(state: AppState, path: Path<PlanPath>) -> HttpResponse {
    download_schedule(&state, path.id, "match_list.csv", schedule_csv)
}

#[get("/api/plans/{id}/grid.csv")]
async fn api_grid_csv(state: AppState, path: Path<PlanPath>) -> HttpResponse {
    download_schedule(&state, path.id, "master_schedule.csv", grid_csv)
}

/// Bracket score sheet: side is `winners` or `losers`.
#[get("/api/plans/{id}/brackets/{side}.csv")]
async fn api_bracket_csv(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let side = match path.side.as_str() {
        "winners" => BracketSide::Winners,
        "losers" => BracketSide::Losers,
        _ => return bad_request("Bracket side must be winners or losers"),
    };
    let file_name = format!("{}_bracket.csv", path.side);
    download_schedule(&state, path.id, &file_name, |o| bracket_csv(o, side))
}

/// Export roster and catalog as JSON.
#[get("/api/plans/{id}/config")]
async fn api_export_config(state: AppState, path: Path<PlanPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(&path.id) {
        Some(entry) => HttpResponse::Ok()
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"tournament_config.json\"",
            ))
            .json(entry.plan.snapshot()),
        None => not_found(),
    }
}

/// Replace roster and catalog from a previously exported JSON config.
#[put("/api/plans/{id}/config")]
async fn api_import_config(
    state: AppState,
    path: Path<PlanPath>,
    body: Json<PlanSnapshot>,
) -> HttpResponse {
    let snapshot = body.into_inner();
    update_plan(&state, path.id, |p| p.restore(snapshot))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
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
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<PlanId, PlanEntry>::new()));

    // Every 30 minutes, drop plans inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive plan(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_plan)
            .service(api_get_plan)
            .service(api_set_settings)
            .service(api_add_team)
            .service(api_clear_teams)
            .service(api_sample_teams)
            .service(api_balance_groups)
            .service(api_remove_team)
            .service(api_round_robin)
            .service(api_knockout)
            .service(api_clear_matches)
            .service(api_schedule)
            .service(api_schedule_grid)
            .service(api_schedule_csv)
            .service(api_grid_csv)
            .service(api_bracket_csv)
            .service(api_export_config)
            .service(api_import_config)
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

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    fn empty_state() -> AppState {
        Data::new(RwLock::new(HashMap::new()))
    }

    #[actix_web::test]
    async fn create_plan_rejects_malformed_settings() {
        let state = empty_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).service(api_create_plan)).await;

        let req = test::TestRequest::post()
            .uri("/api/plans")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{ "num_courts": "four" }"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/plans")
            .set_json(serde_json::json!({ "num_courts": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert!(state.read().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn create_plan_fills_omitted_settings_with_defaults() {
        let state = empty_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).service(api_create_plan)).await;

        let req = test::TestRequest::post()
            .uri("/api/plans")
            .set_json(serde_json::json!({ "num_courts": 4 }))
            .to_request();
        let plan: TournamentPlan = test::call_and_read_body_json(&app, req).await;
        assert_eq!(plan.settings.num_courts, 4);
        assert_eq!(plan.settings.points_per_matchup, 5);
        assert!(state.read().unwrap().contains_key(&plan.id));
    }
}
