use crate::league::ranking::place_of;
use crate::models::league::{PlayerId, RankingTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roles {
    pub challenger: PlayerId,
    pub challenger_place: usize,
    pub challenged: PlayerId,
    pub challenged_place: usize,
}

/// The worse-placed player is the challenger. On equal places `b` challenges.
pub fn identify(a: &PlayerId, b: &PlayerId, ranking: &RankingTable) -> Roles {
    let place_a = place_of(a, ranking);
    let place_b = place_of(b, ranking);

    if place_a > place_b {
        Roles {
            challenger: a.clone(),
            challenger_place: place_a,
            challenged: b.clone(),
            challenged_place: place_b,
        }
    } else {
        Roles {
            challenger: b.clone(),
            challenger_place: place_b,
            challenged: a.clone(),
            challenged_place: place_a,
        }
    }
}
