use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use uuid::Uuid;

use crate::db::Db;
use crate::error::AppError;
use crate::league::eligibility::Rejection;
use crate::league::{commit, ranking, weekly, IgnoredMatchLog, PlayerDirectory};
use crate::models::activity::*;
use crate::models::league::{LeagueState, MatchResult, PlayerId, PlayerScore};
use crate::services::players::AliasBook;
use crate::validation;

const DEFAULT_IGNORED_LIMIT: i64 = 50;

/// Collects rejections for storage and the response.
#[derive(Default)]
struct IgnoredMatches {
    entries: Vec<IgnoredMatchEntry>,
}

impl IgnoredMatchLog for IgnoredMatches {
    fn log_ignored_match(&mut self, message: &str, result: &MatchResult) {
        self.record("ignored", message, result);
    }

    fn log_rejection(&mut self, rejection: Rejection, message: &str, result: &MatchResult) {
        self.record(rejection.code(), message, result);
    }
}

impl IgnoredMatches {
    fn record(&mut self, reason: &str, message: &str, result: &MatchResult) {
        tracing::warn!(reason, winner = %result.winner, "{}", message);
        self.entries.push(IgnoredMatchEntry {
            id: Uuid::new_v4().to_string(),
            reason: reason.to_string(),
            message: message.to_string(),
            match_result: serde_json::to_value(result).unwrap_or(Value::Null),
            created_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });
    }
}

pub fn create_league(db: &Db, req: LeagueCreateRequest, now_ms: i64) -> Result<LeagueCreateResult, AppError> {
    validation::validate_ranking(&req.ranking)?;
    let name = validation::validate_league_name(&req.name);
    let start = req.start_ts.unwrap_or(now_ms);
    validation::validate_start_ts(start)?;
    let state = LeagueState::new(req.ranking, commit::first_week(start)?, now_ms);

    let id = Uuid::new_v4().to_string();
    let state_json = serde_json::to_string(&state)?;

    db.with_conn(|conn| -> Result<(), AppError> {
        conn.execute(
            "INSERT INTO leagues (id, name, state) VALUES (?1, ?2, ?3)",
            params![id, name, state_json],
        )?;
        Ok(())
    })?;

    tracing::info!(league = %id, players = state.in_progress.scoreboard.len(), "league created");
    Ok(LeagueCreateResult { id, name, state })
}

pub fn get_league(db: &Db, league_id: &str) -> Result<League, AppError> {
    db.with_conn(|conn| load_league(conn, league_id))
}

/// Folds a batch of reported results into the league's live scoreboard.
///
/// A batch carrying a `batchId` already applied to this league is refused.
/// Batches without one are always folded.
pub fn report_results(
    db: &Db,
    league_id: &str,
    activities: &Value,
    max_batch: usize,
    now_ms: i64,
) -> Result<ReportResult, AppError> {
    let results = weekly::reported_results(activities)?;
    validation::validate_batch_size(results.len(), max_batch)?;
    let batch_id = batch_id(activities)?;

    db.with_conn(|conn| -> Result<ReportResult, AppError> {
        let tx = conn.unchecked_transaction()?;
        let raw: String = tx
            .query_row(
                "SELECT state FROM leagues WHERE id = ?1",
                params![league_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| AppError::NotFound("League not found".into()))?;
        let mut league = weekly::league_state(&serde_json::from_str::<Value>(&raw)?)?;

        if let Some(batch_id) = &batch_id {
            let replayed: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM result_batches WHERE league_id = ?1 AND batch_id = ?2",
                    params![league_id, batch_id],
                    |row| row.get(0),
                )
                .optional()?;
            if replayed.is_some() {
                return Err(AppError::Conflict(format!(
                    "Batch {} was already reported",
                    batch_id
                )));
            }
        }

        let aliases = AliasBook::load(&tx)?;
        let mut ignored = IgnoredMatches::default();
        let mut in_progress = weekly::fold(&results, &league, &aliases, &mut ignored);
        in_progress.last_update_ts = now_ms;
        league.in_progress = in_progress;

        save_state(&tx, league_id, &league)?;
        for entry in &ignored.entries {
            tx.execute(
                "INSERT INTO ignored_matches (id, league_id, reason, message, match_json, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.id,
                    league_id,
                    entry.reason,
                    entry.message,
                    entry.match_result.to_string(),
                    entry.created_at,
                ],
            )?;
        }
        if let Some(batch_id) = &batch_id {
            tx.execute(
                "INSERT INTO result_batches (league_id, batch_id) VALUES (?1, ?2)",
                params![league_id, batch_id],
            )?;
        }
        tx.commit()?;

        let accepted = results.len() - ignored.entries.len();
        tracing::info!(
            league = %league_id,
            accepted,
            ignored = ignored.entries.len(),
            "reported results folded"
        );
        Ok(ReportResult {
            accepted,
            ignored: ignored.entries,
            in_progress: league.in_progress,
        })
    })
}

/// Commits the league's week when it is over, or unconditionally with `force`.
pub fn commit_week(db: &Db, league_id: &str, force: bool, now_ms: i64) -> Result<CommitResult, AppError> {
    db.with_conn(|conn| -> Result<CommitResult, AppError> {
        let tx = conn.unchecked_transaction()?;
        let league = load_league(&tx, league_id)?;

        if !force && !commit::is_week_over(now_ms, &league.state.current_week) {
            return Ok(CommitResult {
                committed: false,
                state: league.state,
            });
        }

        let next = commit::commit(&league.state)?;
        save_state(&tx, league_id, &next)?;
        tx.commit()?;

        tracing::info!(
            league = %league_id,
            ranked = next.ranking.len(),
            week_start = next.current_week.start,
            week_end = next.current_week.end,
            "week committed"
        );
        Ok(CommitResult {
            committed: true,
            state: next,
        })
    })
}

/// Commits every league whose week has ended. One failing league does not
/// hold back the others.
pub fn commit_due_leagues(db: &Db, now_ms: i64) -> Result<Vec<String>, AppError> {
    let ids = db.with_conn(|conn| -> Result<Vec<String>, AppError> {
        let mut stmt = conn.prepare("SELECT id FROM leagues ORDER BY created_at")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    })?;

    let mut committed = Vec::new();
    for id in ids {
        match commit_week(db, &id, false, now_ms) {
            Ok(result) if result.committed => committed.push(id),
            Ok(_) => {}
            Err(e) => tracing::error!(league = %id, error = %e, "scheduled commit failed"),
        }
    }
    Ok(committed)
}

pub fn player_standing(db: &Db, league_id: &str, player_id: &str) -> Result<PlayerStanding, AppError> {
    validation::validate_player_id(player_id)?;

    db.with_conn(|conn| -> Result<PlayerStanding, AppError> {
        let league = load_league(conn, league_id)?;
        let aliases = AliasBook::load(conn)?;
        let state = &league.state;

        let player = PlayerId::new(player_id);
        let place = state.ranking.place_of(&player);
        let score = state
            .in_progress
            .scoreboard
            .get(&player)
            .cloned()
            .unwrap_or_else(|| PlayerScore::unranked(place));
        let challengeable = ranking::challengeable_players(place, score.range, &state.ranking).to_vec();

        Ok(PlayerStanding {
            alias: aliases.alias(&player),
            player_id: player,
            place,
            ranked: place <= state.ranking.len(),
            score,
            challengeable,
        })
    })
}

pub fn ignored_matches(db: &Db, league_id: &str, limit: Option<i64>) -> Result<Vec<IgnoredMatchEntry>, AppError> {
    let limit = limit.unwrap_or(DEFAULT_IGNORED_LIMIT).clamp(1, 500);

    db.with_conn(|conn| -> Result<Vec<IgnoredMatchEntry>, AppError> {
        load_league(conn, league_id)?;
        let mut stmt = conn.prepare(
            "SELECT id, reason, message, match_json, created_at
             FROM ignored_matches WHERE league_id = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![league_id, limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, reason, message, match_json, created_at) = row?;
            entries.push(IgnoredMatchEntry {
                id,
                reason,
                message,
                match_result: serde_json::from_str(&match_json)?,
                created_at,
            });
        }
        Ok(entries)
    })
}

fn load_league(conn: &Connection, league_id: &str) -> Result<League, AppError> {
    let row = conn
        .query_row(
            "SELECT id, name, state, updated_at FROM leagues WHERE id = ?1",
            params![league_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let (id, name, raw, updated_at) = row.ok_or_else(|| AppError::NotFound("League not found".into()))?;
    Ok(League {
        id,
        name,
        state: serde_json::from_str(&raw)?,
        updated_at,
    })
}

fn save_state(conn: &Connection, league_id: &str, state: &LeagueState) -> Result<(), AppError> {
    conn.execute(
        "UPDATE leagues SET state = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![serde_json::to_string(state)?, league_id],
    )?;
    Ok(())
}

fn batch_id(activities: &Value) -> Result<Option<String>, AppError> {
    match activities.get("batchId") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => {
            validation::validate_batch_id(id)?;
            Ok(Some(id.clone()))
        }
        Some(_) => Err(AppError::BadRequest("batchId must be a string".into())),
    }
}
