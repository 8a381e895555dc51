use crate::league::ranking::place_of;
use crate::league::roles::Roles;
use crate::league::{IgnoredMatchLog, PlayerDirectory};
use crate::models::league::{MatchResult, PlayerScore, RankingTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SamePlace,
    NoCoins,
    OutOfRange { range: u32 },
    AlreadyWonAgainstPlace,
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::SamePlace => "same_place",
            Rejection::NoCoins => "no_coins",
            Rejection::OutOfRange { .. } => "out_of_range",
            Rejection::AlreadyWonAgainstPlace => "already_won_against_place",
        }
    }

    pub fn message(&self, roles: &Roles, directory: &dyn PlayerDirectory) -> String {
        let challenger = directory.alias(&roles.challenger);
        let challenged = directory.alias(&roles.challenged);
        match self {
            Rejection::SamePlace => format!(
                "Ignored result between players \"{}\" & \"{}\" because they are in the same place.",
                challenger, challenged
            ),
            Rejection::NoCoins => format!(
                "Ignored result because \"{}\" has 0 coins, so they cannot challenge \"{}\"",
                challenger, challenged
            ),
            Rejection::OutOfRange { range } => format!(
                "Ignored result because \"{}\" (place {}) cannot reach \"{}\" (place {}) with only {} of range",
                challenger, roles.challenger_place, challenged, roles.challenged_place, range
            ),
            Rejection::AlreadyWonAgainstPlace => format!(
                "Ignored result because \"{}\" already won against a player in the same place as \"{}\" (place {})",
                challenger, challenged, roles.challenged_place
            ),
        }
    }
}

/// Checks a candidate match against the challenger's budget and history.
pub fn check(
    roles: &Roles,
    ranking: &RankingTable,
    challenger: &PlayerScore,
) -> Result<(), Rejection> {
    if roles.challenger_place == roles.challenged_place {
        return Err(Rejection::SamePlace);
    }

    if challenger.coins < 1 {
        return Err(Rejection::NoCoins);
    }

    // Reach only counts upward; a better-placed target saturates to 0.
    let distance = roles.challenger_place.saturating_sub(roles.challenged_place);
    if distance > challenger.range as usize {
        return Err(Rejection::OutOfRange {
            range: challenger.range,
        });
    }

    if already_won_against_place(roles, ranking, challenger) {
        return Err(Rejection::AlreadyWonAgainstPlace);
    }

    Ok(())
}

pub fn is_valid(
    roles: &Roles,
    ranking: &RankingTable,
    challenger: &PlayerScore,
    result: &MatchResult,
    directory: &dyn PlayerDirectory,
    log: &mut dyn IgnoredMatchLog,
) -> bool {
    match check(roles, ranking, challenger) {
        Ok(()) => true,
        Err(rejection) => {
            log.log_rejection(rejection, &rejection.message(roles, directory), result);
            false
        }
    }
}

fn already_won_against_place(roles: &Roles, ranking: &RankingTable, challenger: &PlayerScore) -> bool {
    challenger.completed_challenges.iter().any(|m| {
        m.winner == roles.challenger
            && place_of(m.opponent_of(&roles.challenger), ranking) == roles.challenged_place
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::roles::identify;
    use crate::league::RawIds;
    use crate::models::league::PlayerId;

    fn ranking() -> RankingTable {
        RankingTable::new(
            ["p1", "p2", "p3", "p4", "p5", "p6"]
                .iter()
                .map(|id| vec![PlayerId::from(*id)])
                .collect(),
        )
    }

    fn played(a: &str, b: &str, winner: &str) -> MatchResult {
        MatchResult {
            player1: a.into(),
            player2: b.into(),
            player1_result: if a == winner { 2.0 } else { 0.0 },
            player2_result: if b == winner { 2.0 } else { 0.0 },
            winner: winner.into(),
        }
    }

    #[test]
    fn test_accepts_within_range() {
        let r = ranking();
        let roles = identify(&"p6".into(), &"p5".into(), &r);
        assert_eq!(check(&roles, &r, &PlayerScore::unranked(6)), Ok(()));
    }

    #[test]
    fn test_same_place_always_rejected() {
        let r = RankingTable::new(vec![vec!["a".into(), "b".into()], vec!["c".into()]]);
        let roles = identify(&"a".into(), &"b".into(), &r);
        let mut rich = PlayerScore::unranked(9);
        rich.coins = 5;
        rich.range = 50;
        assert_eq!(check(&roles, &r, &rich), Err(Rejection::SamePlace));

        // Two unranked players share the sentinel place.
        let roles = identify(&"x".into(), &"y".into(), &r);
        assert_eq!(check(&roles, &r, &rich), Err(Rejection::SamePlace));
    }

    #[test]
    fn test_no_coins_rejected_and_logged() {
        let r = ranking();
        let roles = identify(&"p6".into(), &"p5".into(), &r);
        let mut score = PlayerScore::unranked(6);
        score.coins = 0;
        let mut log: Vec<(String, MatchResult)> = Vec::new();
        let m = played("p6", "p5", "p6");
        assert!(!is_valid(&roles, &r, &score, &m, &RawIds, &mut log));
        assert_eq!(log.len(), 1);
        assert!(log[0].0.contains("0 coins"));
        assert_eq!(log[0].1, m);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let r = ranking();
        let roles = identify(&"p6".into(), &"p2".into(), &r);
        let score = PlayerScore::unranked(6);
        assert_eq!(
            check(&roles, &r, &score),
            Err(Rejection::OutOfRange { range: 2 })
        );
        let msg = Rejection::OutOfRange { range: 2 }.message(&roles, &RawIds);
        assert!(msg.contains("(place 6)"));
        assert!(msg.contains("(place 2)"));
    }

    #[test]
    fn test_repeat_win_against_place_rejected_for_any_occupant() {
        let r = RankingTable::new(vec![
            vec!["p1".into()],
            vec!["p2".into()],
            vec!["p3".into(), "p3b".into()],
            vec!["p4".into()],
        ]);
        let mut score = PlayerScore::unranked(4);
        score.completed_challenges.push(played("p4", "p3", "p4"));

        let roles = identify(&"p4".into(), &"p3b".into(), &r);
        assert_eq!(
            check(&roles, &r, &score),
            Err(Rejection::AlreadyWonAgainstPlace)
        );

        // A previous loss against that place does not block a rematch.
        let mut lost = PlayerScore::unranked(4);
        lost.completed_challenges.push(played("p4", "p3", "p3"));
        assert_eq!(check(&roles, &r, &lost), Ok(()));
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(Rejection::SamePlace.code(), "same_place");
        assert_eq!(Rejection::NoCoins.code(), "no_coins");
        assert_eq!(Rejection::OutOfRange { range: 1 }.code(), "out_of_range");
        assert_eq!(
            Rejection::AlreadyWonAgainstPlace.code(),
            "already_won_against_place"
        );
    }
}
