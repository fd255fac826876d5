use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Patient;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, first_name, last_name, contact_number, date_of_birth, address, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            patient.id.to_string(),
            patient.first_name,
            patient.last_name,
            patient.contact_number,
            patient.date_of_birth.map(|d| d.to_string()),
            patient.address,
            patient.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, contact_number, date_of_birth, address, created_at
         FROM patients WHERE id = ?1",
    )?;
    let result = stmt.query_row(params![id.to_string()], row_to_patient);
    match result {
        Ok(patient) => Ok(Some(patient)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, contact_number, date_of_birth, address, created_at
         FROM patients ORDER BY last_name, first_name",
    )?;
    let rows = stmt.query_map([], row_to_patient)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Load patients by id set, ordered by name. Empty input returns empty.
pub fn list_patients_by_ids(
    conn: &Connection,
    ids: &[Uuid],
) -> Result<Vec<Patient>, DatabaseError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!(
        "SELECT id, first_name, last_name, contact_number, date_of_birth, address, created_at
         FROM patients WHERE id IN ({placeholders}) ORDER BY last_name, first_name"
    );
    let mut stmt = conn.prepare(&sql)?;
    let id_strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    let rows = stmt.query_map(
        rusqlite::params_from_iter(id_strings.iter()),
        row_to_patient,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn row_to_patient(row: &rusqlite::Row) -> Result<Patient, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let dob_str: Option<String> = row.get(4)?;
    let created_str: String = row.get(6)?;

    Ok(Patient {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        contact_number: row.get(3)?,
        date_of_birth: dob_str.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        address: row.get(5)?,
        created_at: NaiveDateTime::parse_from_str(&created_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
    })
}
