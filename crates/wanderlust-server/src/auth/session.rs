use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Session, User};

const SESSION_DURATION_DAYS: i64 = 30;

pub fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub fn create_session(pool: &DbPool, username: &str) -> AppResult<Session> {
    let conn = pool.get()?;
    let id = Uuid::new_v4().to_string();
    let token = generate_token();
    let created_at = timestamp_now();
    let expires_at = (Utc::now() + Duration::days(SESSION_DURATION_DAYS))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    conn.execute(
        "INSERT INTO sessions (id, username, token, expires_at, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![id, username, token, expires_at, created_at],
    )?;

    Ok(Session {
        id,
        username: username.to_string(),
        token,
        expires_at,
        created_at,
    })
}

pub fn validate_session(pool: &DbPool, token: &str) -> AppResult<(Session, User)> {
    let conn = pool.get()?;
    let now = timestamp_now();

    let mut stmt = conn.prepare(
        "SELECT s.id, s.username, s.token, s.expires_at, s.created_at,
                u.username, u.password_hash, u.created_at
         FROM sessions s
         JOIN users u ON u.username = s.username
         WHERE s.token = ?1 AND s.expires_at > ?2",
    )?;

    let result = stmt.query_row(rusqlite::params![token, now], |row| {
        let session = Session {
            id: row.get(0)?,
            username: row.get(1)?,
            token: row.get(2)?,
            expires_at: row.get(3)?,
            created_at: row.get(4)?,
        };
        let user = User {
            username: row.get(5)?,
            password_hash: row.get(6)?,
            created_at: row.get(7)?,
        };
        Ok((session, user))
    });

    match result {
        Ok(pair) => Ok(pair),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(AppError::Unauthorized),
        Err(e) => Err(AppError::Database(e)),
    }
}

pub fn delete_session(pool: &DbPool, token: &str) -> AppResult<()> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM sessions WHERE token = ?1", rusqlite::params![token])?;
    Ok(())
}

pub fn generate_token() -> String {
    use base64::Engine;
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
