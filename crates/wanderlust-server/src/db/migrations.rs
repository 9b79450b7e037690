use rusqlite::Connection;

const SCHEMA: &str = include_str!("schema.sql");

pub fn run(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;

    // Migration: history tables created before notes existed
    let has_notes: bool = conn
        .prepare("SELECT COUNT(*) FROM pragma_table_info('history') WHERE name='notes'")?
        .query_row([], |row| row.get::<_, i32>(0))
        .map(|c| c > 0)
        .unwrap_or(false);

    if !has_notes {
        conn.execute_batch("ALTER TABLE history ADD COLUMN notes TEXT NOT NULL DEFAULT '';")?;
    }

    Ok(())
}
