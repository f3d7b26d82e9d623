use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use lesept_db::rusqlite::Connection;
use std::path::Path;

use lesept_db::db::insert_draw;
use lesept_db::models::{Draw, validate_draw, PRIMARY_COUNT, SECONDARY_COUNT};

// draw_id ; date ; 7 principaux ; 5 secondaires
const FIRST_PRIMARY: usize = 2;
const FIRST_SECONDARY: usize = FIRST_PRIMARY + PRIMARY_COUNT;
const COLUMN_COUNT: usize = FIRST_SECONDARY + SECONDARY_COUNT;

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    if record.len() < COLUMN_COUNT {
        bail!("{} colonnes au lieu de {}", record.len(), COLUMN_COUNT);
    }

    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let draw_id = get(0)?;
    if draw_id.is_empty() {
        bail!("Identifiant de tirage vide");
    }
    let date = parse_date(&get(1)?)?;

    let mut primary = [0u8; PRIMARY_COUNT];
    for (k, slot) in primary.iter_mut().enumerate() {
        *slot = get_u8(FIRST_PRIMARY + k)?;
    }
    let mut secondary = [0u8; SECONDARY_COUNT];
    for (k, slot) in secondary.iter_mut().enumerate() {
        *slot = get_u8(FIRST_SECONDARY + k)?;
    }

    validate_draw(&primary, &secondary)?;

    Ok(Draw { draw_id, date, primary, secondary })
}

/// Accepte JJ/MM/AAAA ou AAAA-MM-JJ ; vide = date inconnue.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map(Some)
        .with_context(|| format!("Format de date invalide: '{}'", raw))
}

#[derive(Debug, Default)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    import_records(conn, reader)
}

pub fn import_records<R: std::io::Read>(conn: &Connection, mut reader: csv::Reader<R>) -> Result<ImportResult> {
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => match insert_draw(&tx, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        log::warn!("Erreur insertion ligne {}: {:#}", result.total_records, e);
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    log::warn!("Ligne {} rejetée: {:#}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::warn!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesept_db::db::{count_draws, fetch_all_draws, migrate};

    const HEADER: &str = "draw_id;date;p1;p2;p3;p4;p5;p6;p7;s1;s2;s3;s4;s5\n";

    fn import_str(conn: &Connection, body: &str) -> ImportResult {
        let data = format!("{HEADER}{body}");
        let reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(data.as_bytes());
        import_records(conn, reader).unwrap()
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 17);
        assert_eq!(parse_date("17/02/2026").unwrap(), expected);
        assert_eq!(parse_date("2026-02-17").unwrap(), expected);
        assert_eq!(parse_date("  ").unwrap(), None);
        assert!(parse_date("17.02.2026").is_err());
    }

    #[test]
    fn test_import_valid_and_duplicate() {
        let conn = memory_db();
        let result = import_str(
            &conn,
            "0001;01/01/2024;1;2;3;4;5;6;7;8;9;10;11;12\n\
             0002;2024-01-04;28;27;26;25;24;23;22;1;2;3;4;5\n\
             0001;01/01/2024;1;2;3;4;5;6;7;8;9;10;11;12\n",
        );
        assert_eq!(result.total_records, 3);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, 0);

        let draws = fetch_all_draws(&conn).unwrap();
        assert_eq!(draws[0].draw_id, "0002");
        assert_eq!(draws[0].secondary, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_invalid_rows_counted_not_fatal() {
        let conn = memory_db();
        let result = import_str(
            &conn,
            "0001;01/01/2024;1;2;3;4;5;6;29;8;9;10;11;12\n\
             0002;01/01/2024;1;2;3;4;5;6;7;7;9;10;11;12\n\
             0003;01/01/2024;1;2;3;4;5;6;7;8;9;10;11\n\
             0004;01/01/2024;1;2;3;4;5;6;7;8;9;10;11;12\n",
        );
        assert_eq!(result.total_records, 4);
        assert_eq!(result.errors, 3);
        assert_eq!(result.inserted, 1);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }
}
