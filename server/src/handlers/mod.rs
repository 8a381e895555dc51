pub mod league;
pub mod players;
