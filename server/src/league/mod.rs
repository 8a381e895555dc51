//! Pure scoring core of the challenge ladder.

pub mod commit;
pub mod eligibility;
pub mod ranking;
pub mod roles;
pub mod rules;
pub mod weekly;

use crate::models::league::{MatchResult, PlayerId};
use eligibility::Rejection;
use thiserror::Error;

/// Input-contract failures. These are caller bugs and are never swallowed.
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("The \"{argument}\" argument must be an object but received \"{observed}\" instead.")]
    NotAnObject {
        argument: &'static str,
        observed: &'static str,
    },
    #[error("The \"{argument}\" argument is malformed: {source}")]
    Malformed {
        argument: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("winner \"{winner}\" did not play in the match between \"{player1}\" and \"{player2}\"")]
    UnknownWinner {
        winner: PlayerId,
        player1: PlayerId,
        player2: PlayerId,
    },
    #[error("no week can follow one ending at {after}")]
    WeekOutOfRange { after: i64 },
}

/// Receives one call per reported match that was not allowed to count.
pub trait IgnoredMatchLog {
    fn log_ignored_match(&mut self, message: &str, result: &MatchResult);

    fn log_rejection(&mut self, _rejection: Rejection, message: &str, result: &MatchResult) {
        self.log_ignored_match(message, result);
    }
}

/// Display names for rejection messages. Must not fail.
pub trait PlayerDirectory {
    fn alias(&self, player: &PlayerId) -> String;
}

#[cfg(test)]
pub struct RawIds;

#[cfg(test)]
impl PlayerDirectory for RawIds {
    fn alias(&self, player: &PlayerId) -> String {
        player.to_string()
    }
}

#[cfg(test)]
impl IgnoredMatchLog for Vec<(String, MatchResult)> {
    fn log_ignored_match(&mut self, message: &str, result: &MatchResult) {
        self.push((message.to_string(), result.clone()));
    }
}
