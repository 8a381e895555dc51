use rusqlite::{params, Connection};
use std::collections::HashMap;

use crate::db::Db;
use crate::error::AppError;
use crate::league::PlayerDirectory;
use crate::models::league::PlayerId;
use crate::models::player::*;
use crate::validation;

pub fn register_player(db: &Db, req: PlayerRegistration) -> Result<Player, AppError> {
    validation::validate_player_id(&req.id)?;
    let alias = validation::validate_alias(&req.alias);

    db.with_conn(|conn| -> Result<Player, AppError> {
        conn.execute(
            "INSERT INTO players (id, alias) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET alias = excluded.alias, updated_at = datetime('now')",
            params![req.id, alias],
        )?;
        Ok(fetch_player(conn, &req.id)?)
    })
}

pub fn get_player(db: &Db, id: &str) -> Result<Player, AppError> {
    let result = db.with_conn(|conn| fetch_player(conn, id));

    match result {
        Ok(player) => Ok(player),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(AppError::NotFound("Player not found".into())),
        Err(e) => Err(AppError::from(e)),
    }
}

fn fetch_player(conn: &Connection, id: &str) -> Result<Player, rusqlite::Error> {
    conn.query_row(
        "SELECT id, alias, updated_at FROM players WHERE id = ?1",
        params![id],
        |row| {
            Ok(Player {
                id: row.get(0)?,
                alias: row.get(1)?,
                updated_at: row.get(2)?,
            })
        },
    )
}

/// Aliases loaded up front so rejection messages never touch the database.
pub struct AliasBook {
    aliases: HashMap<PlayerId, String>,
}

impl AliasBook {
    pub fn load(conn: &Connection) -> Result<Self, rusqlite::Error> {
        let mut stmt = conn.prepare("SELECT id, alias FROM players")?;
        let rows = stmt.query_map([], |row| {
            Ok((PlayerId(row.get::<_, String>(0)?), row.get::<_, String>(1)?))
        })?;

        let mut aliases = HashMap::new();
        for row in rows {
            let (id, alias) = row?;
            aliases.insert(id, alias);
        }
        Ok(AliasBook { aliases })
    }
}

impl PlayerDirectory for AliasBook {
    fn alias(&self, player: &PlayerId) -> String {
        self.aliases
            .get(player)
            .cloned()
            .unwrap_or_else(|| player.to_string())
    }
}
