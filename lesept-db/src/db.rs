use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, Row};
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_id      TEXT PRIMARY KEY,
    date         TEXT,
    primary_1    INTEGER NOT NULL,
    primary_2    INTEGER NOT NULL,
    primary_3    INTEGER NOT NULL,
    primary_4    INTEGER NOT NULL,
    primary_5    INTEGER NOT NULL,
    primary_6    INTEGER NOT NULL,
    primary_7    INTEGER NOT NULL,
    secondary_1  INTEGER NOT NULL,
    secondary_2  INTEGER NOT NULL,
    secondary_3  INTEGER NOT NULL,
    secondary_4  INTEGER NOT NULL,
    secondary_5  INTEGER NOT NULL
);
";

const SELECT_COLUMNS: &str = "draw_id, date,
    primary_1, primary_2, primary_3, primary_4, primary_5, primary_6, primary_7,
    secondary_1, secondary_2, secondary_3, secondary_4, secondary_5";

// Les dates NULL passent en dernier en ordre décroissant
const ORDER_RECENT_FIRST: &str = "ORDER BY date DESC, draw_id DESC";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lesept.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let date = draw.date.map(|d| d.format("%Y-%m-%d").to_string());
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_id, date,
            primary_1, primary_2, primary_3, primary_4, primary_5, primary_6, primary_7,
            secondary_1, secondary_2, secondary_3, secondary_4, secondary_5)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        rusqlite::params![
            draw.draw_id,
            date,
            draw.primary[0],
            draw.primary[1],
            draw.primary[2],
            draw.primary[3],
            draw.primary[4],
            draw.primary[5],
            draw.primary[6],
            draw.secondary[0],
            draw.secondary[1],
            draw.secondary[2],
            draw.secondary[3],
            draw.secondary[4],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &Row<'_>) -> rusqlite::Result<Draw> {
    let date: Option<String> = row.get(1)?;
    Ok(Draw {
        draw_id: row.get(0)?,
        date: date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        primary: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
            row.get::<_, u8>(8)?,
        ],
        secondary: [
            row.get::<_, u8>(9)?,
            row.get::<_, u8>(10)?,
            row.get::<_, u8>(11)?,
            row.get::<_, u8>(12)?,
            row.get::<_, u8>(13)?,
        ],
    })
}

/// Tous les tirages, le plus récent en premier.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM draws {ORDER_RECENT_FIRST}");
    let mut stmt = conn.prepare(&sql)?;
    let draws = stmt
        .query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Les `limit` derniers tirages, le plus récent en premier.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM draws {ORDER_RECENT_FIRST} LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(id: &str, date: Option<&str>) -> Draw {
        Draw {
            draw_id: id.to_string(),
            date: date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            primary: [1, 2, 3, 4, 5, 6, 7],
            secondary: [8, 9, 10, 11, 12],
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw("001", Some("2024-01-01"))).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = memory_db();

        assert!(insert_draw(&conn, &test_draw("001", Some("2024-01-01"))).unwrap());
        assert!(!insert_draw(&conn, &test_draw("001", Some("2024-01-01"))).unwrap());
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order_most_recent_first() {
        let conn = memory_db();

        insert_draw(&conn, &test_draw("001", Some("2024-01-01"))).unwrap();
        insert_draw(&conn, &test_draw("002", Some("2024-01-05"))).unwrap();
        insert_draw(&conn, &test_draw("003", Some("2024-01-03"))).unwrap();
        insert_draw(&conn, &test_draw("004", None)).unwrap();

        let draws = fetch_all_draws(&conn).unwrap();
        assert_eq!(draws.len(), 4);
        assert_eq!(draws[0].draw_id, "002");
        assert_eq!(draws[1].draw_id, "003");
        assert_eq!(draws[2].draw_id, "001");
        assert_eq!(draws[3].date, None);
    }

    #[test]
    fn test_fetch_last_draws_limit() {
        let conn = memory_db();
        for (i, day) in ["2024-02-01", "2024-02-02", "2024-02-03"].iter().enumerate() {
            insert_draw(&conn, &test_draw(&format!("{:03}", i), Some(day))).unwrap();
        }

        let draws = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].draw_id, "002");
    }

    #[test]
    fn test_roundtrip_numbers() {
        let conn = memory_db();
        let mut draw = test_draw("010", Some("2024-03-09"));
        draw.primary = [28, 3, 17, 9, 1, 22, 14];
        draw.secondary = [5, 26, 11, 19, 7];
        insert_draw(&conn, &draw).unwrap();

        let loaded = fetch_all_draws(&conn).unwrap();
        assert_eq!(loaded[0], draw);
    }
}
