use serde::Deserialize;
use serde_json::Value;

use crate::league::eligibility::is_valid;
use crate::league::roles::identify;
use crate::league::{rules, IgnoredMatchLog, LeagueError, PlayerDirectory};
use crate::models::league::{InProgress, LeagueState, MatchResult, PlayerScore};

/// Folds `results`, in order, into the league's in-progress scoreboard.
/// Roles come from the committed ranking, which stays fixed all week.
pub fn fold(
    results: &[MatchResult],
    league: &LeagueState,
    directory: &dyn PlayerDirectory,
    log: &mut dyn IgnoredMatchLog,
) -> InProgress {
    let ranking = &league.ranking;
    let mut scoreboard = league.in_progress.scoreboard.clone();

    for result in results {
        let roles = identify(&result.player1, &result.player2, ranking);
        let challenger = match scoreboard.get(&roles.challenger) {
            Some(score) => score.clone(),
            None => PlayerScore::unranked(roles.challenger_place),
        };

        if !is_valid(&roles, ranking, &challenger, result, directory, log) {
            continue;
        }

        let scored = if result.winner == roles.challenger {
            rules::challenger_wins(&challenger, roles.challenger_place)
        } else {
            if let Some(defender) = scoreboard.get(&roles.challenged) {
                let defender = rules::challenged_wins(
                    defender,
                    &roles.challenged,
                    &challenger.completed_challenges,
                );
                scoreboard.insert(roles.challenged.clone(), defender);
            }
            rules::challenger_loses(&challenger)
        };

        scoreboard.insert(roles.challenger, rules::record_challenge(scored, result));
    }

    InProgress {
        scoreboard,
        last_update_ts: league.in_progress.last_update_ts,
    }
}

/// Decodes and checks a batch of reported results, given as
/// `{ "reportedResults": [...] }`.
pub fn reported_results(activities: &Value) -> Result<Vec<MatchResult>, LeagueError> {
    require_object("activities", activities)?;
    let raw = activities
        .get("reportedResults")
        .cloned()
        .unwrap_or(Value::Array(Vec::new()));
    let results: Vec<MatchResult> =
        serde_json::from_value(raw).map_err(|source| LeagueError::Malformed {
            argument: "activities",
            source,
        })?;

    for result in &results {
        if !result.involves(&result.winner) {
            return Err(LeagueError::UnknownWinner {
                winner: result.winner.clone(),
                player1: result.player1.clone(),
                player2: result.player2.clone(),
            });
        }
    }
    Ok(results)
}

pub fn league_state(league: &Value) -> Result<LeagueState, LeagueError> {
    require_object("league", league)?;
    LeagueState::deserialize(league).map_err(|source| LeagueError::Malformed {
        argument: "league",
        source,
    })
}

fn require_object(argument: &'static str, value: &Value) -> Result<(), LeagueError> {
    if value.is_object() {
        return Ok(());
    }
    Err(LeagueError::NotAnObject {
        argument,
        observed: json_type_name(value),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::RawIds;
    use crate::models::league::{PlayerId, RankingTable, WeekWindow};
    use serde_json::json;

    fn ladder(n: usize) -> LeagueState {
        let ranking = RankingTable::new((1..=n).map(|i| vec![PlayerId::new(format!("p{i}"))]).collect());
        LeagueState::new(ranking, WeekWindow { start: 0, end: 1_000 }, 0)
    }

    fn game(p1: &str, p2: &str, winner: &str) -> MatchResult {
        MatchResult {
            player1: p1.into(),
            player2: p2.into(),
            player1_result: if p1 == winner { 3.0 } else { 1.0 },
            player2_result: if p2 == winner { 3.0 } else { 1.0 },
            winner: winner.into(),
        }
    }

    fn score<'a>(state: &'a InProgress, id: &str) -> &'a PlayerScore {
        state.scoreboard.get(&id.into()).unwrap()
    }

    #[test]
    fn test_challenger_climbs_and_then_loses() {
        let league = ladder(6);
        let mut log: Vec<(String, MatchResult)> = Vec::new();

        // Place 6 beats place 5, then place 3.
        let results = vec![game("p6", "p5", "p6"), game("p3", "p6", "p6")];
        let after = fold(&results, &league, &RawIds, &mut log);
        let p6 = score(&after, "p6");
        assert_eq!((p6.initial_coins, p6.coins, p6.range), (2, 2, 4));
        assert_eq!(p6.completed_challenges.len(), 2);
        assert!(log.is_empty());

        // Then loses to place 2.
        let mut next = league.clone();
        next.in_progress = after;
        let after = fold(&[game("p6", "p2", "p2")], &next, &RawIds, &mut log);
        let p6 = score(&after, "p6");
        assert_eq!(p6.coins, 1);
        assert_eq!(p6.range, 4);
        assert_eq!(score(&after, "p2").stand_points, 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_broke_challenger_is_ignored() {
        let mut league = ladder(6);
        let mut broke = PlayerScore::unranked(6);
        broke.coins = 0;
        league.in_progress.scoreboard.insert("p6".into(), broke);

        let mut log: Vec<(String, MatchResult)> = Vec::new();
        let after = fold(&[game("p6", "p5", "p6")], &league, &RawIds, &mut log);
        assert_eq!(after, league.in_progress);
        assert_eq!(log.len(), 1);
        assert!(log[0].0.contains("has 0 coins"));
    }

    #[test]
    fn test_stand_points_capped_per_challenger() {
        let league = ladder(11);
        let mut log: Vec<(String, MatchResult)> = Vec::new();
        // p11 starts with 3 coins and 3 range.
        let results = vec![
            game("p11", "p10", "p10"),
            game("p11", "p10", "p10"),
            game("p11", "p9", "p9"),
        ];
        let after = fold(&results, &league, &RawIds, &mut log);
        assert_eq!(score(&after, "p10").stand_points, 1);
        assert_eq!(score(&after, "p9").stand_points, 1);
        assert_eq!(score(&after, "p11").coins, 0);
    }

    #[test]
    fn test_later_matches_see_earlier_ones() {
        let league = ladder(3);
        let mut log: Vec<(String, MatchResult)> = Vec::new();
        // p3 has one coin; the second attempt has nothing left.
        let results = vec![game("p3", "p2", "p2"), game("p3", "p2", "p3")];
        let after = fold(&results, &league, &RawIds, &mut log);
        assert_eq!(score(&after, "p3").coins, 0);
        assert_eq!(score(&after, "p3").range, 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_unknown_challenger_is_created_lazily() {
        let league = ladder(2);
        let mut log: Vec<(String, MatchResult)> = Vec::new();
        let after = fold(&[game("newbie", "p2", "newbie")], &league, &RawIds, &mut log);
        let newbie = score(&after, "newbie");
        // Unranked at place 3: one coin, range grows to 2, still short of the top.
        assert_eq!(newbie.initial_coins, 1);
        assert_eq!(newbie.range, 2);
        assert_eq!(newbie.coins, 1);
        assert!(league.in_progress.scoreboard.get(&"newbie".into()).is_none());
    }

    #[test]
    fn test_absent_defender_gets_nothing() {
        let mut league = ladder(3);
        league.in_progress.scoreboard.0.remove(&PlayerId::from("p2"));
        let mut log: Vec<(String, MatchResult)> = Vec::new();
        let after = fold(&[game("p3", "p2", "p2")], &league, &RawIds, &mut log);
        assert!(after.scoreboard.get(&"p2".into()).is_none());
        assert_eq!(score(&after, "p3").coins, 0);
    }

    #[test]
    fn test_boundary_rejects_non_objects() {
        let err = reported_results(&json!("oops")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The \"activities\" argument must be an object but received \"string\" instead."
        );

        let err = league_state(&json!([1])).unwrap_err();
        assert!(matches!(
            err,
            LeagueError::NotAnObject { argument: "league", observed: "array" }
        ));

        let err = league_state(&json!({ "ranking": 3 })).unwrap_err();
        assert!(matches!(err, LeagueError::Malformed { argument: "league", .. }));
    }

    #[test]
    fn test_decoded_input_folds() {
        let league = league_state(&serde_json::to_value(ladder(2)).unwrap()).unwrap();
        let results = reported_results(&json!({
            "reportedResults": [
                { "player1": "p1", "player2": "p2", "player1Result": 0, "player2Result": 2, "winner": "p2" }
            ]
        }))
        .unwrap();
        let mut log: Vec<(String, MatchResult)> = Vec::new();
        let after = fold(&results, &league, &RawIds, &mut log);
        assert_eq!(score(&after, "p2").range, 2);
        assert!(reported_results(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_winner_must_have_played() {
        let activities = json!({
            "reportedResults": [
                { "player1": "a", "player2": "b", "player1Result": 1, "player2Result": 0, "winner": "c" }
            ]
        });
        assert!(matches!(
            reported_results(&activities),
            Err(LeagueError::UnknownWinner { .. })
        ));
    }
}
