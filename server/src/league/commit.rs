use chrono::Duration;
use std::collections::BTreeMap;

use crate::league::LeagueError;
use crate::models::league::{
    InProgress, LeagueState, PlayerId, PlayerScore, RankingTable, Scoreboard, WeekWindow,
};

const TIE_BREAK_SCALE: i64 = 1000;

pub fn is_week_over(now_ms: i64, week: &WeekWindow) -> bool {
    week.end <= now_ms
}

/// The week that follows one ending at `last_end`.
pub fn next_week(last_end: i64) -> Result<WeekWindow, LeagueError> {
    let start = last_end.checked_add(1);
    let end = last_end.checked_add(Duration::days(7).num_milliseconds());
    match (start, end) {
        (Some(start), Some(end)) => Ok(WeekWindow { start, end }),
        _ => Err(LeagueError::WeekOutOfRange { after: last_end }),
    }
}

pub fn first_week(start: i64) -> Result<WeekWindow, LeagueError> {
    let last_end = start
        .checked_sub(1)
        .ok_or(LeagueError::WeekOutOfRange { after: start })?;
    next_week(last_end)
}

/// Leaving every coin unspent costs one point when there were coins to spend.
pub fn final_points(score: &PlayerScore) -> u32 {
    let no_show = score.initial_coins > 0 && score.coins == score.initial_coins;
    let total = i64::from(score.points) + i64::from(score.stand_points) + i64::from(score.range)
        - i64::from(score.initial_coins)
        - i64::from(no_show);
    total.max(0) as u32
}

fn tie_break_score(score: &PlayerScore) -> i64 {
    let gained = i64::from(score.range) - i64::from(score.initial_coins);
    i64::from(score.points) * TIE_BREAK_SCALE + gained
}

/// Ranking built from a scoreboard whose `points` are already final.
/// Players scoring below one point are left unranked.
pub fn ranking_from_scoreboard(scoreboard: &Scoreboard) -> RankingTable {
    let mut by_score: BTreeMap<i64, Vec<PlayerId>> = BTreeMap::new();
    for (player, score) in scoreboard.iter() {
        let tie_break = tie_break_score(score);
        if tie_break < TIE_BREAK_SCALE {
            continue;
        }
        by_score.entry(tie_break).or_default().push(player.clone());
    }
    RankingTable::new(by_score.into_values().rev().collect())
}

/// Closes the current week and opens the next one.
pub fn commit(league: &LeagueState) -> Result<LeagueState, LeagueError> {
    let current_week = next_week(league.current_week.end)?;

    let finals = Scoreboard(
        league
            .in_progress
            .scoreboard
            .iter()
            .map(|(player, score)| {
                let finalized = PlayerScore {
                    points: final_points(score),
                    ..score.clone()
                };
                (player.clone(), finalized)
            })
            .collect(),
    );

    let ranking = ranking_from_scoreboard(&finals);

    let mut seeded = Scoreboard::default();
    for (idx, group) in ranking.groups().iter().enumerate() {
        for player in group {
            let points = finals.get(player).map(|s| s.points).unwrap_or(0);
            seeded.insert(player.clone(), PlayerScore::seeded(idx + 1, points));
        }
    }

    Ok(LeagueState {
        ranking,
        scoreboard: finals,
        in_progress: InProgress {
            scoreboard: seeded,
            last_update_ts: league.in_progress.last_update_ts,
        },
        current_week,
        last_update_ts: league.in_progress.last_update_ts,
    })
}
