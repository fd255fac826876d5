use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Procedure, ProcedureFilter, ProcedureStatus};

const COLUMNS: &str = "id, patient_id, doctor_id, nurse_id, name, procedure_type, performed_at,
         treatment_notes, prescription, fee, status, created_at, created_by";

pub fn insert_procedure(conn: &Connection, proc_: &Procedure) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO procedures (id, patient_id, doctor_id, nurse_id, name, procedure_type,
         performed_at, treatment_notes, prescription, fee, status, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            proc_.id.to_string(),
            proc_.patient_id.to_string(),
            proc_.doctor_id.to_string(),
            proc_.nurse_id.map(|id| id.to_string()),
            proc_.name,
            proc_.procedure_type,
            proc_.performed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            proc_.treatment_notes,
            proc_.prescription,
            proc_.fee,
            proc_.status.as_str(),
            proc_.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            proc_.created_by,
        ],
    )?;
    Ok(())
}

pub fn get_procedure(conn: &Connection, id: &Uuid) -> Result<Option<Procedure>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM procedures WHERE id = ?1"))?;
    let result = stmt.query_row(params![id.to_string()], row_to_procedure);
    match result {
        Ok(proc_) => Ok(Some(proc_)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List procedures, newest first. `assignee` restricts to rows where the
/// given staff profile is the doctor or the nurse; `None` is unrestricted.
pub fn list_procedures(
    conn: &Connection,
    assignee: Option<&Uuid>,
    filter: &ProcedureFilter,
) -> Result<Vec<Procedure>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM procedures
         WHERE (?1 IS NULL OR doctor_id = ?1 OR nurse_id = ?1)
           AND (?2 IS NULL OR patient_id = ?2)
           AND (?3 IS NULL OR status = ?3)
           AND (?4 IS NULL OR performed_at >= ?4)
           AND (?5 IS NULL OR performed_at <= ?5)
         ORDER BY performed_at DESC"
    ))?;
    let rows = stmt.query_map(
        params![
            assignee.map(|id| id.to_string()),
            filter.patient_id.map(|id| id.to_string()),
            filter.status.map(|s| s.as_str()),
            filter.from.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
            filter.to.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        ],
        row_to_procedure,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Distinct patient ids with a procedure assigned to the given profile.
pub fn assigned_patient_ids(
    conn: &Connection,
    profile_id: &Uuid,
) -> Result<Vec<Uuid>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT patient_id FROM procedures WHERE doctor_id = ?1 OR nurse_id = ?1",
    )?;
    let rows = stmt.query_map(params![profile_id.to_string()], |row| {
        row.get::<_, String>(0)
    })?;
    let mut ids = Vec::new();
    for row in rows {
        if let Ok(id) = Uuid::parse_str(&row?) {
            ids.push(id);
        }
    }
    Ok(ids)
}

pub fn count_procedures(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM procedures", [], |row| row.get(0))?;
    Ok(count)
}

pub fn count_procedures_by_assignee(
    conn: &Connection,
    profile_id: &Uuid,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM procedures WHERE doctor_id = ?1 OR nurse_id = ?1",
        params![profile_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn row_to_procedure(row: &rusqlite::Row) -> Result<Procedure, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let patient_str: String = row.get(1)?;
    let doctor_str: String = row.get(2)?;
    let nurse_str: Option<String> = row.get(3)?;
    let performed_str: String = row.get(6)?;
    let status_str: String = row.get(10)?;
    let created_str: String = row.get(11)?;

    Ok(Procedure {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: Uuid::parse_str(&patient_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        doctor_id: Uuid::parse_str(&doctor_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
        nurse_id: nurse_str.and_then(|s| Uuid::parse_str(&s).ok()),
        name: row.get(4)?,
        procedure_type: row.get(5)?,
        performed_at: NaiveDateTime::parse_from_str(&performed_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        treatment_notes: row.get(7)?,
        prescription: row.get(8)?,
        fee: row.get(9)?,
        status: ProcedureStatus::from_str(&status_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(10, rusqlite::types::Type::Text, Box::new(e))
        })?,
        created_at: NaiveDateTime::parse_from_str(&created_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        created_by: row.get(12)?,
    })
}
