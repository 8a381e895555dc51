use std::collections::HashSet;

use crate::error::AppError;
use crate::models::league::{PlayerId, RankingTable};

const MAX_PLAYER_ID_LEN: usize = 64;
const MAX_ALIAS_LEN: usize = 32;
const MAX_LEAGUE_NAME_LEN: usize = 64;
const MAX_BATCH_ID_LEN: usize = 64;
// 9999-12-31T23:59:59.999Z
const MAX_START_TS: i64 = 253_402_300_799_999;

pub fn validate_player_id(id: &str) -> Result<(), AppError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_PLAYER_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid player id: {}", id)))
    }
}

pub fn validate_alias(alias: &str) -> String {
    let trimmed = alias.trim();
    if trimmed.is_empty() {
        "Anonymous".to_string()
    } else {
        trimmed.chars().take(MAX_ALIAS_LEN).collect()
    }
}

pub fn validate_league_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        "Smash League".to_string()
    } else {
        trimmed.chars().take(MAX_LEAGUE_NAME_LEN).collect()
    }
}

/// At least one place, every player at most once, no empty groups.
pub fn validate_ranking(ranking: &RankingTable) -> Result<(), AppError> {
    if ranking.is_empty() {
        return Err(AppError::BadRequest("Ranking must have at least one place".into()));
    }
    let mut seen: HashSet<&PlayerId> = HashSet::new();
    for (idx, group) in ranking.groups().iter().enumerate() {
        if group.is_empty() {
            return Err(AppError::BadRequest(format!("Ranking place {} is empty", idx + 1)));
        }
        for player in group {
            validate_player_id(player.as_str())?;
            if !seen.insert(player) {
                return Err(AppError::BadRequest(format!(
                    "Player {} appears more than once in the ranking",
                    player
                )));
            }
        }
    }
    Ok(())
}

pub fn validate_batch_size(len: usize, max: usize) -> Result<(), AppError> {
    if len > max {
        Err(AppError::BadRequest(format!(
            "Too many reported results: {} (max {})",
            len, max
        )))
    } else {
        Ok(())
    }
}

/// League start, in epoch milliseconds, between 1970 and the end of year 9999.
pub fn validate_start_ts(ts: i64) -> Result<(), AppError> {
    if (0..=MAX_START_TS).contains(&ts) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Start timestamp out of range: {}", ts)))
    }
}

pub fn validate_batch_id(id: &str) -> Result<(), AppError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_BATCH_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid batch id: {}", id)))
    }
}
