use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PlayerRegistration {
    pub id: String,
    pub alias: String,
}

#[derive(Debug, Serialize)]
pub struct Player {
    pub id: String,
    pub alias: String,
    pub updated_at: String,
}
