use crate::db::Db;
use crate::error::AppError;
use crate::models::player::*;
use crate::services::players as service;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn register_player(
    db: web::types::State<Arc<Db>>,
    body: web::types::Json<PlayerRegistration>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let player = service::register_player(&db, req)?;
    Ok(HttpResponse::Ok().json(&player))
}

pub async fn get_player(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
) -> Result<HttpResponse, AppError> {
    let player_id = path.into_inner();
    let player = service::get_player(&db, &player_id)?;
    Ok(HttpResponse::Ok().json(&player))
}
