use crate::models::league::{PlayerId, RankingTable};

const PLAYERS_PER_COIN: usize = 5;
const MAX_INITIAL_COINS: u32 = 5;

/// 1-based place of `player`, or `len + 1` when unranked.
pub fn place_of(player: &PlayerId, ranking: &RankingTable) -> usize {
    ranking
        .groups()
        .iter()
        .position(|group| group.contains(player))
        .map(|idx| idx + 1)
        .unwrap_or(ranking.len() + 1)
}

pub fn initial_coins_for_place(place: usize) -> u32 {
    if place <= 1 {
        return 0;
    }
    let coins = place.div_ceil(PLAYERS_PER_COIN) as u32;
    coins.min(MAX_INITIAL_COINS)
}

pub fn challengeable_players(place: usize, range: u32, ranking: &RankingTable) -> &[Vec<PlayerId>] {
    let range = range as usize;
    let groups = ranking.groups();
    let start = place.saturating_sub(range + 1).min(groups.len());
    let end = (start + range).min(groups.len());
    &groups[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(groups: &[&[&str]]) -> RankingTable {
        RankingTable::new(
            groups
                .iter()
                .map(|g| g.iter().map(|id| PlayerId::from(*id)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_place_of_ranked_and_unranked() {
        let ranking = table(&[&["a"], &["b", "c"], &["d"]]);
        assert_eq!(place_of(&"a".into(), &ranking), 1);
        assert_eq!(place_of(&"c".into(), &ranking), 2);
        assert_eq!(place_of(&"d".into(), &ranking), 3);
        assert_eq!(place_of(&"zz".into(), &ranking), 4);
        assert_eq!(place_of(&"a".into(), &RankingTable::default()), 1);
    }

    #[test]
    fn test_place_of_stays_in_bounds() {
        let ranking = table(&[&["a", "b"], &["c"], &["d"], &["e"]]);
        for id in ["a", "b", "c", "d", "e", "x", "y"] {
            let place = place_of(&id.into(), &ranking);
            assert!((1..=ranking.len() + 1).contains(&place));
            let ranked = ranking.groups().iter().any(|g| g.contains(&id.into()));
            assert_eq!(place == ranking.len() + 1, !ranked);
        }
    }

    #[test]
    fn test_initial_coins() {
        assert_eq!(initial_coins_for_place(1), 0);
        assert_eq!(initial_coins_for_place(2), 1);
        assert_eq!(initial_coins_for_place(5), 1);
        assert_eq!(initial_coins_for_place(6), 2);
        assert_eq!(initial_coins_for_place(11), 3);
        assert_eq!(initial_coins_for_place(25), 5);
        assert_eq!(initial_coins_for_place(26), 5);
        assert_eq!(initial_coins_for_place(400), 5);
    }

    #[test]
    fn test_challengeable_players_window() {
        let ranking = table(&[&["a"], &["b"], &["c"], &["d"], &["e"], &["f"]]);
        let targets = challengeable_players(6, 2, &ranking);
        assert_eq!(targets, &ranking.groups()[3..5]);

        // Reach past the top is clamped to the first group.
        let targets = challengeable_players(3, 4, &ranking);
        assert_eq!(targets, &ranking.groups()[0..4]);

        assert!(challengeable_players(1, 0, &ranking).is_empty());
        assert!(challengeable_players(9, 1, &ranking).is_empty());
    }
}
