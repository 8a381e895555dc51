pub mod activity;
pub mod league;
pub mod player;
