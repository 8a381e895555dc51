use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::league::ranking;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId(id.to_string())
    }
}

/// Ordered placement groups. Index 0 is place 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankingTable(pub Vec<Vec<PlayerId>>);

impl RankingTable {
    pub fn new(groups: Vec<Vec<PlayerId>>) -> Self {
        RankingTable(groups)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn groups(&self) -> &[Vec<PlayerId>] {
        &self.0
    }

    pub fn place_of(&self, player: &PlayerId) -> usize {
        ranking::place_of(player, self)
    }
}

/// A reported match. `winner` is always one of the two players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player1: PlayerId,
    pub player2: PlayerId,
    #[serde(rename = "player1Result")]
    pub player1_result: f64,
    #[serde(rename = "player2Result")]
    pub player2_result: f64,
    pub winner: PlayerId,
}

impl MatchResult {
    pub fn opponent_of(&self, player: &PlayerId) -> &PlayerId {
        if &self.player1 == player {
            &self.player2
        } else {
            &self.player1
        }
    }

    pub fn involves(&self, player: &PlayerId) -> bool {
        &self.player1 == player || &self.player2 == player
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub stand_points: u32,
    pub points: u32,
    pub initial_coins: u32,
    pub coins: u32,
    pub range: u32,
    #[serde(default)]
    pub completed_challenges: Vec<MatchResult>,
}

impl PlayerScore {
    pub fn unranked(place: usize) -> Self {
        Self::seeded(place, 0)
    }

    pub fn seeded(place: usize, points: u32) -> Self {
        let initial_coins = ranking::initial_coins_for_place(place);
        PlayerScore {
            stand_points: 0,
            points,
            initial_coins,
            coins: initial_coins,
            range: initial_coins,
            completed_challenges: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scoreboard(pub BTreeMap<PlayerId, PlayerScore>);

impl Scoreboard {
    pub fn get(&self, player: &PlayerId) -> Option<&PlayerScore> {
        self.0.get(player)
    }

    pub fn insert(&mut self, player: PlayerId, score: PlayerScore) {
        self.0.insert(player, score);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &PlayerScore)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Week boundaries in epoch milliseconds. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InProgress {
    pub scoreboard: Scoreboard,
    pub last_update_ts: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueState {
    pub ranking: RankingTable,
    #[serde(default)]
    pub scoreboard: Scoreboard,
    pub in_progress: InProgress,
    pub current_week: WeekWindow,
    #[serde(default)]
    pub last_update_ts: i64,
}

impl LeagueState {
    /// A league opening with `ranking`, every ranked player seeded for `week`.
    pub fn new(ranking: RankingTable, week: WeekWindow, now_ms: i64) -> Self {
        let mut seeded = Scoreboard::default();
        for (idx, group) in ranking.groups().iter().enumerate() {
            for player in group {
                seeded.insert(player.clone(), PlayerScore::seeded(idx + 1, 0));
            }
        }
        LeagueState {
            ranking,
            scoreboard: Scoreboard::default(),
            in_progress: InProgress {
                scoreboard: seeded,
                last_update_ts: now_ms,
            },
            current_week: week,
            last_update_ts: now_ms,
        }
    }
}
