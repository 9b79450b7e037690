//! Accounts and per-user trip history.
//!
//! Each function is a single statement against the pool; there are no
//! transactions spanning calls and concurrent writers are last-write-wins.

use crate::auth::password;
use crate::auth::session::timestamp_now;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Itinerary, TripRecord, User};

pub fn create_account(pool: &DbPool, username: &str, password: &str) -> AppResult<User> {
    if username.trim().is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }
    if username.trim() != username {
        return Err(AppError::BadRequest(
            "Username cannot start or end with spaces".into(),
        ));
    }
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }

    let password_hash = password::hash_password(password)?;
    let created_at = timestamp_now();
    let conn = pool.get()?;

    let result = conn.execute(
        "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![username, password_hash, created_at],
    );

    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(AppError::Conflict("Username already taken".into()));
        }
        Err(e) => return Err(AppError::Database(e)),
    }

    tracing::info!("Account created for {username}");
    Ok(User {
        username: username.to_string(),
        password_hash,
        created_at,
    })
}

/// Unknown user and wrong password both come back as `Unauthorized`.
pub fn verify_credentials(pool: &DbPool, username: &str, password: &str) -> AppResult<User> {
    let conn = pool.get()?;
    let user = conn.query_row(
        "SELECT username, password_hash, created_at FROM users WHERE username = ?1",
        rusqlite::params![username],
        |row| {
            Ok(User {
                username: row.get(0)?,
                password_hash: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    );

    let user = match user {
        Ok(u) => u,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(AppError::Unauthorized),
        Err(e) => return Err(AppError::Database(e)),
    };

    if !password::verify_password(password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }
    Ok(user)
}

pub fn save_trip(
    pool: &DbPool,
    username: &str,
    destination: &str,
    itinerary: &Itinerary,
) -> AppResult<TripRecord> {
    let trip_data = serde_json::to_string(itinerary)?;
    let created_at = timestamp_now();
    let conn = pool.get()?;

    conn.execute(
        "INSERT INTO history (username, destination, trip_data, notes, created_at) VALUES (?1, ?2, ?3, '', ?4)",
        rusqlite::params![username, destination, trip_data, created_at],
    )?;

    Ok(TripRecord {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
        destination: destination.to_string(),
        itinerary: itinerary.clone(),
        notes: String::new(),
        created_at,
    })
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TripRecord> {
    let trip_data: String = row.get(3)?;
    let itinerary = serde_json::from_str(&trip_data).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(TripRecord {
        id: row.get(0)?,
        username: row.get(1)?,
        destination: row.get(2)?,
        itinerary,
        notes: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Newest first.
pub fn list_trips(pool: &DbPool, username: &str) -> AppResult<Vec<TripRecord>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, username, destination, trip_data, notes, created_at
         FROM history
         WHERE username = ?1
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(rusqlite::params![username], record_from_row)?;
    let trips: Result<Vec<_>, _> = rows.collect();
    Ok(trips?)
}

pub fn get_trip(pool: &DbPool, username: &str, id: i64) -> AppResult<TripRecord> {
    let conn = pool.get()?;
    conn.query_row(
        "SELECT id, username, destination, trip_data, notes, created_at
         FROM history
         WHERE id = ?1 AND username = ?2",
        rusqlite::params![id, username],
        record_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("Trip not found".into()),
        e => AppError::Database(e),
    })
}

pub fn update_note(pool: &DbPool, username: &str, id: i64, note: &str) -> AppResult<()> {
    let conn = pool.get()?;
    let affected = conn.execute(
        "UPDATE history SET notes = ?1 WHERE id = ?2 AND username = ?3",
        rusqlite::params![note, id, username],
    )?;

    if affected == 0 {
        return Err(AppError::NotFound("Trip not found".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;
    use crate::models::TripType;
    use crate::services::planner::fallback::fallback_itinerary;

    fn pool() -> (tempfile::TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.db");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        (dir, pool)
    }

    #[test]
    fn duplicate_username_conflicts() {
        let (_dir, pool) = pool();
        create_account(&pool, "asha", "pw-one").unwrap();
        let err = create_account(&pool, "asha", "pw-two").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn credentials_are_exact_and_case_sensitive() {
        let (_dir, pool) = pool();
        create_account(&pool, "asha", "Monsoon!").unwrap();

        assert_eq!(verify_credentials(&pool, "asha", "Monsoon!").unwrap().username, "asha");
        assert!(matches!(
            verify_credentials(&pool, "asha", "monsoon!"),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            verify_credentials(&pool, "Asha", "Monsoon!"),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            verify_credentials(&pool, "nobody", "Monsoon!"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn padded_usernames_are_distinct() {
        let (_dir, pool) = pool();
        create_account(&pool, "asha", "pw").unwrap();

        assert!(matches!(
            create_account(&pool, " asha", "pw"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            create_account(&pool, "   ", "pw"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            verify_credentials(&pool, " asha", "pw"),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            verify_credentials(&pool, "asha ", "pw"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn history_lists_newest_first() {
        let (_dir, pool) = pool();
        create_account(&pool, "asha", "pw").unwrap();
        create_account(&pool, "ravi", "pw").unwrap();

        for city in ["Goa", "Jaipur", "Kochi"] {
            save_trip(&pool, "asha", city, &fallback_itinerary(city, 2, TripType::Solo)).unwrap();
        }
        save_trip(&pool, "ravi", "Leh", &fallback_itinerary("Leh", 2, TripType::Solo)).unwrap();

        let trips = list_trips(&pool, "asha").unwrap();
        let cities: Vec<_> = trips.iter().map(|t| t.destination.as_str()).collect();
        assert_eq!(cities, vec!["Kochi", "Jaipur", "Goa"]);
        assert_eq!(trips[0].itinerary.title, "The Ultimate Kochi Experience");
    }

    #[test]
    fn update_note_touches_one_record() {
        let (_dir, pool) = pool();
        create_account(&pool, "asha", "pw").unwrap();
        let goa = save_trip(&pool, "asha", "Goa", &fallback_itinerary("Goa", 2, TripType::Solo)).unwrap();
        let pune = save_trip(&pool, "asha", "Pune", &fallback_itinerary("Pune", 2, TripType::Solo)).unwrap();

        update_note(&pool, "asha", goa.id, "Book the ferry early").unwrap();

        assert_eq!(get_trip(&pool, "asha", goa.id).unwrap().notes, "Book the ferry early");
        let untouched = get_trip(&pool, "asha", pune.id).unwrap();
        assert_eq!(untouched.notes, "");
        assert_eq!(untouched.itinerary, pune.itinerary);
    }

    #[test]
    fn notes_are_scoped_to_owner() {
        let (_dir, pool) = pool();
        create_account(&pool, "asha", "pw").unwrap();
        create_account(&pool, "ravi", "pw").unwrap();
        let goa = save_trip(&pool, "asha", "Goa", &fallback_itinerary("Goa", 2, TripType::Solo)).unwrap();

        assert!(matches!(
            update_note(&pool, "ravi", goa.id, "mine now"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(get_trip(&pool, "ravi", goa.id), Err(AppError::NotFound(_))));
    }
}
