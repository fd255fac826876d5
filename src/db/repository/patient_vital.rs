use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{PatientVital, VitalFilter};

const COLUMNS: &str = "id, patient_id, nurse_id, procedure_id, appointment_id, recorded_at,
         bp_systolic, bp_diastolic, temperature, pulse, respiratory_rate, oxygen_saturation,
         weight_kg, height_cm, notes, created_at, recorded_by";

pub fn insert_patient_vital(conn: &Connection, vital: &PatientVital) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patient_vitals (id, patient_id, nurse_id, procedure_id, appointment_id,
         recorded_at, bp_systolic, bp_diastolic, temperature, pulse, respiratory_rate,
         oxygen_saturation, weight_kg, height_cm, notes, created_at, recorded_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            vital.id.to_string(),
            vital.patient_id.to_string(),
            vital.nurse_id.map(|id| id.to_string()),
            vital.procedure_id.map(|id| id.to_string()),
            vital.appointment_id.map(|id| id.to_string()),
            vital.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            vital.bp_systolic,
            vital.bp_diastolic,
            vital.temperature,
            vital.pulse,
            vital.respiratory_rate,
            vital.oxygen_saturation,
            vital.weight_kg,
            vital.height_cm,
            vital.notes,
            vital.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            vital.recorded_by,
        ],
    )?;
    Ok(())
}

pub fn get_patient_vital(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<PatientVital>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM patient_vitals WHERE id = ?1"
    ))?;
    let result = stmt.query_row(params![id.to_string()], row_to_vital);
    match result {
        Ok(vital) => Ok(Some(vital)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List vitals, newest first. `recorder` restricts to measurements taken
/// by the given nurse profile; `None` is unrestricted.
pub fn list_patient_vitals(
    conn: &Connection,
    recorder: Option<&Uuid>,
    filter: &VitalFilter,
) -> Result<Vec<PatientVital>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM patient_vitals
         WHERE (?1 IS NULL OR nurse_id = ?1)
           AND (?2 IS NULL OR patient_id = ?2)
         ORDER BY recorded_at DESC"
    ))?;
    let rows = stmt.query_map(
        params![
            recorder.map(|id| id.to_string()),
            filter.patient_id.map(|id| id.to_string()),
        ],
        row_to_vital,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Distinct patient ids with vitals recorded by the given nurse profile.
pub fn assigned_patient_ids(
    conn: &Connection,
    profile_id: &Uuid,
) -> Result<Vec<Uuid>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT patient_id FROM patient_vitals WHERE nurse_id = ?1")?;
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

pub fn count_vitals_by_recorder(
    conn: &Connection,
    profile_id: &Uuid,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM patient_vitals WHERE nurse_id = ?1",
        params![profile_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn row_to_vital(row: &rusqlite::Row) -> Result<PatientVital, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let patient_str: String = row.get(1)?;
    let nurse_str: Option<String> = row.get(2)?;
    let procedure_str: Option<String> = row.get(3)?;
    let appointment_str: Option<String> = row.get(4)?;
    let recorded_str: String = row.get(5)?;
    let created_str: String = row.get(15)?;

    Ok(PatientVital {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: Uuid::parse_str(&patient_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        nurse_id: nurse_str.and_then(|s| Uuid::parse_str(&s).ok()),
        procedure_id: procedure_str.and_then(|s| Uuid::parse_str(&s).ok()),
        appointment_id: appointment_str.and_then(|s| Uuid::parse_str(&s).ok()),
        recorded_at: NaiveDateTime::parse_from_str(&recorded_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        bp_systolic: row.get(6)?,
        bp_diastolic: row.get(7)?,
        temperature: row.get(8)?,
        pulse: row.get(9)?,
        respiratory_rate: row.get(10)?,
        oxygen_saturation: row.get(11)?,
        weight_kg: row.get(12)?,
        height_cm: row.get(13)?,
        notes: row.get(14)?,
        created_at: NaiveDateTime::parse_from_str(&created_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        recorded_by: row.get(16)?,
    })
}
