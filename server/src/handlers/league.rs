use crate::config::Config;
use crate::db::Db;
use crate::error::AppError;
use crate::models::activity::*;
use crate::services::league as service;
use chrono::Utc;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub async fn create_league(
    db: web::types::State<Arc<Db>>,
    body: web::types::Json<LeagueCreateRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let result = service::create_league(&db, req, now_ms())?;
    Ok(HttpResponse::Created().json(&result))
}

pub async fn get_league(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
) -> Result<HttpResponse, AppError> {
    let league_id = path.into_inner();
    let league = service::get_league(&db, &league_id)?;
    Ok(HttpResponse::Ok().json(&league))
}

/// Body is taken as raw JSON so shape errors name the offending argument.
pub async fn report_results(
    db: web::types::State<Arc<Db>>,
    config: web::types::State<Arc<Config>>,
    path: web::types::Path<String>,
    body: web::types::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let league_id = path.into_inner();
    let activities = body.into_inner();
    let result = service::report_results(&db, &league_id, &activities, config.max_batch_size, now_ms())?;
    Ok(HttpResponse::Ok().json(&result))
}

pub async fn commit_week(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
    query: web::types::Query<CommitRequest>,
) -> Result<HttpResponse, AppError> {
    let league_id = path.into_inner();
    let result = service::commit_week(&db, &league_id, query.force, now_ms())?;
    Ok(HttpResponse::Ok().json(&result))
}

pub async fn get_player_standing(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (league_id, player_id) = path.into_inner();
    let standing = service::player_standing(&db, &league_id, &player_id)?;
    Ok(HttpResponse::Ok().json(&standing))
}

pub async fn get_ignored_matches(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
    query: web::types::Query<IgnoredQuery>,
) -> Result<HttpResponse, AppError> {
    let league_id = path.into_inner();
    let entries = service::ignored_matches(&db, &league_id, query.limit)?;
    Ok(HttpResponse::Ok().json(&entries))
}
