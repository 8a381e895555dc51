use serde::{Deserialize, Serialize};

use crate::models::league::{InProgress, LeagueState, PlayerId, PlayerScore, RankingTable};

#[derive(Debug, Deserialize)]
pub struct LeagueCreateRequest {
    #[serde(default)]
    pub name: String,
    pub ranking: RankingTable,
    /// Epoch ms of the first week's start; defaults to now.
    pub start_ts: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LeagueCreateResult {
    pub id: String,
    pub name: String,
    pub state: LeagueState,
}

#[derive(Debug, Serialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub state: LeagueState,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct IgnoredMatchEntry {
    pub id: String,
    pub reason: String,
    pub message: String,
    #[serde(rename = "match")]
    pub match_result: serde_json::Value,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ReportResult {
    pub accepted: usize,
    pub ignored: Vec<IgnoredMatchEntry>,
    pub in_progress: InProgress,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommitRequest {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct CommitResult {
    pub committed: bool,
    pub state: LeagueState,
}

#[derive(Debug, Serialize)]
pub struct PlayerStanding {
    pub player_id: PlayerId,
    pub alias: String,
    pub place: usize,
    pub ranked: bool,
    pub score: PlayerScore,
    pub challengeable: Vec<Vec<PlayerId>>,
}

#[derive(Debug, Deserialize)]
pub struct IgnoredQuery {
    pub limit: Option<i64>,
}
