use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{NoteFilter, NursingNote};

const COLUMNS: &str = "id, patient_id, nurse_id, procedure_id, appointment_id, note_date,
         notes, vitals, patient_progress, medications_administered, created_at, created_by";

pub fn insert_nursing_note(conn: &Connection, note: &NursingNote) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO nursing_notes (id, patient_id, nurse_id, procedure_id, appointment_id,
         note_date, notes, vitals, patient_progress, medications_administered, created_at,
         created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            note.id.to_string(),
            note.patient_id.to_string(),
            note.nurse_id.map(|id| id.to_string()),
            note.procedure_id.map(|id| id.to_string()),
            note.appointment_id.map(|id| id.to_string()),
            note.note_date.format("%Y-%m-%d %H:%M:%S").to_string(),
            note.notes,
            note.vitals,
            note.patient_progress,
            note.medications_administered,
            note.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            note.created_by,
        ],
    )?;
    Ok(())
}

pub fn get_nursing_note(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<NursingNote>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM nursing_notes WHERE id = ?1"
    ))?;
    let result = stmt.query_row(params![id.to_string()], row_to_note);
    match result {
        Ok(note) => Ok(Some(note)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List notes, newest first. `author` restricts to notes written by the
/// given nurse profile; `None` is unrestricted.
pub fn list_nursing_notes(
    conn: &Connection,
    author: Option<&Uuid>,
    filter: &NoteFilter,
) -> Result<Vec<NursingNote>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM nursing_notes
         WHERE (?1 IS NULL OR nurse_id = ?1)
           AND (?2 IS NULL OR patient_id = ?2)
           AND (?3 IS NULL OR procedure_id = ?3)
         ORDER BY note_date DESC"
    ))?;
    let rows = stmt.query_map(
        params![
            author.map(|id| id.to_string()),
            filter.patient_id.map(|id| id.to_string()),
            filter.procedure_id.map(|id| id.to_string()),
        ],
        row_to_note,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Update the mutable fields of a note. The patient, nurse, and record
/// links are fixed at creation.
pub fn update_nursing_note(conn: &Connection, note: &NursingNote) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE nursing_notes
         SET notes = ?2, vitals = ?3, patient_progress = ?4, medications_administered = ?5
         WHERE id = ?1",
        params![
            note.id.to_string(),
            note.notes,
            note.vitals,
            note.patient_progress,
            note.medications_administered,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "NursingNote".into(),
            id: note.id.to_string(),
        });
    }
    Ok(())
}

/// Distinct patient ids with a note written by the given nurse profile.
pub fn assigned_patient_ids(
    conn: &Connection,
    profile_id: &Uuid,
) -> Result<Vec<Uuid>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT patient_id FROM nursing_notes WHERE nurse_id = ?1")?;
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

pub fn count_notes_by_author(
    conn: &Connection,
    profile_id: &Uuid,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM nursing_notes WHERE nurse_id = ?1",
        params![profile_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Notes written by the given nurse profile today (local date).
pub fn count_today_notes_by_author(
    conn: &Connection,
    profile_id: &Uuid,
) -> Result<i64, DatabaseError> {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let count = conn.query_row(
        "SELECT COUNT(*) FROM nursing_notes WHERE nurse_id = ?1 AND note_date LIKE ?2 || '%'",
        params![profile_id.to_string(), today],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn row_to_note(row: &rusqlite::Row) -> Result<NursingNote, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let patient_str: String = row.get(1)?;
    let nurse_str: Option<String> = row.get(2)?;
    let procedure_str: Option<String> = row.get(3)?;
    let appointment_str: Option<String> = row.get(4)?;
    let note_date_str: String = row.get(5)?;
    let created_str: String = row.get(10)?;

    Ok(NursingNote {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: Uuid::parse_str(&patient_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        nurse_id: nurse_str.and_then(|s| Uuid::parse_str(&s).ok()),
        procedure_id: procedure_str.and_then(|s| Uuid::parse_str(&s).ok()),
        appointment_id: appointment_str.and_then(|s| Uuid::parse_str(&s).ok()),
        note_date: NaiveDateTime::parse_from_str(&note_date_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        notes: row.get(6)?,
        vitals: row.get(7)?,
        patient_progress: row.get(8)?,
        medications_administered: row.get(9)?,
        created_at: NaiveDateTime::parse_from_str(&created_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        created_by: row.get(11)?,
    })
}
