use crate::models::league::{MatchResult, PlayerId, PlayerScore};

/// Challenger beat a better-placed player: reach grows by one. Reaching
/// place 1 spends the rest of the week's coins.
pub fn challenger_wins(score: &PlayerScore, challenger_place: usize) -> PlayerScore {
    let range = score.range + 1;
    let coins = if challenger_place <= range as usize {
        0
    } else {
        score.coins
    };
    PlayerScore {
        range,
        coins,
        ..score.clone()
    }
}

pub fn challenger_loses(score: &PlayerScore) -> PlayerScore {
    PlayerScore {
        coins: score.coins.saturating_sub(1),
        ..score.clone()
    }
}

pub fn challenged_wins(
    score: &PlayerScore,
    challenged: &PlayerId,
    challenger_history: &[MatchResult],
) -> PlayerScore {
    if already_beat_challenger(challenged, challenger_history) {
        return score.clone();
    }
    PlayerScore {
        stand_points: score.stand_points + 1,
        ..score.clone()
    }
}

pub fn record_challenge(score: PlayerScore, result: &MatchResult) -> PlayerScore {
    let mut completed_challenges = score.completed_challenges;
    completed_challenges.push(result.clone());
    PlayerScore {
        completed_challenges,
        ..score
    }
}

fn already_beat_challenger(challenged: &PlayerId, challenger_history: &[MatchResult]) -> bool {
    challenger_history.iter().any(|m| &m.winner == challenged)
}
