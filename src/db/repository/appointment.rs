use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentFilter, AppointmentStatus};

const COLUMNS: &str = "id, patient_id, doctor_id, nurse_id, scheduled_at, appointment_type,
         status, reason, notes, consultation_fee, created_at, created_by";

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, nurse_id, scheduled_at,
         appointment_type, status, reason, notes, consultation_fee, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.doctor_id.map(|id| id.to_string()),
            appt.nurse_id.map(|id| id.to_string()),
            appt.scheduled_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            appt.appointment_type,
            appt.status.as_str(),
            appt.reason,
            appt.notes,
            appt.consultation_fee,
            appt.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            appt.created_by,
        ],
    )?;
    Ok(())
}

pub fn get_appointment(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE id = ?1"
    ))?;
    let result = stmt.query_row(params![id.to_string()], row_to_appointment);
    match result {
        Ok(appt) => Ok(Some(appt)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List appointments, newest first. `assignee` restricts to rows where the
/// given staff profile is the doctor or the nurse; `None` is unrestricted.
pub fn list_appointments(
    conn: &Connection,
    assignee: Option<&Uuid>,
    filter: &AppointmentFilter,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM appointments
         WHERE (?1 IS NULL OR doctor_id = ?1 OR nurse_id = ?1)
           AND (?2 IS NULL OR patient_id = ?2)
           AND (?3 IS NULL OR status = ?3)
           AND (?4 IS NULL OR scheduled_at >= ?4)
           AND (?5 IS NULL OR scheduled_at <= ?5)
         ORDER BY scheduled_at DESC"
    ))?;
    let rows = stmt.query_map(
        params![
            assignee.map(|id| id.to_string()),
            filter.patient_id.map(|id| id.to_string()),
            filter.status.map(|s| s.as_str()),
            filter.from.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
            filter.to.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        ],
        row_to_appointment,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Distinct patient ids with an appointment assigned to the given profile.
pub fn assigned_patient_ids(
    conn: &Connection,
    profile_id: &Uuid,
) -> Result<Vec<Uuid>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT patient_id FROM appointments WHERE doctor_id = ?1 OR nurse_id = ?1",
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

fn row_to_appointment(row: &rusqlite::Row) -> Result<Appointment, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let patient_str: String = row.get(1)?;
    let doctor_str: Option<String> = row.get(2)?;
    let nurse_str: Option<String> = row.get(3)?;
    let scheduled_str: String = row.get(4)?;
    let status_str: String = row.get(6)?;
    let created_str: String = row.get(10)?;

    Ok(Appointment {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_id: Uuid::parse_str(&patient_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        doctor_id: doctor_str.and_then(|s| Uuid::parse_str(&s).ok()),
        nurse_id: nurse_str.and_then(|s| Uuid::parse_str(&s).ok()),
        scheduled_at: NaiveDateTime::parse_from_str(&scheduled_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        appointment_type: row.get(5)?,
        status: AppointmentStatus::from_str(&status_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?,
        reason: row.get(7)?,
        notes: row.get(8)?,
        consultation_fee: row.get(9)?,
        created_at: NaiveDateTime::parse_from_str(&created_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        created_by: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::patient::insert_patient;
    use crate::db::repository::staff_profile::insert_staff_profile;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Patient, StaffKind, StaffProfile};

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn seed_patient(conn: &Connection) -> Uuid {
        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: "Amina".into(),
            last_name: "Khan".into(),
            contact_number: None,
            date_of_birth: None,
            address: None,
            created_at: chrono::Local::now().naive_local(),
        };
        insert_patient(conn, &patient).unwrap();
        patient.id
    }

    fn seed_nurse(conn: &Connection) -> Uuid {
        let profile = StaffProfile {
            id: Uuid::new_v4(),
            kind: StaffKind::Nurse,
            first_name: "Jane".into(),
            last_name: "Nurse".into(),
            email: None,
            contact_number: None,
            department: Some("Nursing".into()),
            specialization: None,
            license_number: None,
            employee_id: None,
            account_id: None,
            is_active: true,
            created_at: chrono::Local::now().naive_local(),
            updated_at: None,
        };
        insert_staff_profile(conn, &profile).unwrap();
        profile.id
    }

    fn make_appointment(patient_id: Uuid, nurse_id: Option<Uuid>) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id: None,
            nurse_id,
            scheduled_at: chrono::Local::now().naive_local(),
            appointment_type: "General".into(),
            status: AppointmentStatus::Scheduled,
            reason: None,
            notes: None,
            consultation_fee: 1500.0,
            created_at: chrono::Local::now().naive_local(),
            created_by: None,
        }
    }

    #[test]
    fn insert_and_retrieve() {
        let conn = test_db();
        let patient_id = seed_patient(&conn);
        let appt = make_appointment(patient_id, None);
        insert_appointment(&conn, &appt).unwrap();

        let found = get_appointment(&conn, &appt.id).unwrap().unwrap();
        assert_eq!(found.patient_id, patient_id);
        assert_eq!(found.status, AppointmentStatus::Scheduled);
        assert!((found.consultation_fee - 1500.0).abs() < 0.01);
    }

    #[test]
    fn assignee_filter_matches_nurse_column() {
        let conn = test_db();
        let patient_id = seed_patient(&conn);
        let nurse_id = seed_nurse(&conn);
        insert_appointment(&conn, &make_appointment(patient_id, Some(nurse_id))).unwrap();
        insert_appointment(&conn, &make_appointment(patient_id, None)).unwrap();

        let mine = list_appointments(&conn, Some(&nurse_id), &AppointmentFilter::default()).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].nurse_id, Some(nurse_id));

        let all = list_appointments(&conn, None, &AppointmentFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn status_filter() {
        let conn = test_db();
        let patient_id = seed_patient(&conn);
        let mut completed = make_appointment(patient_id, None);
        completed.status = AppointmentStatus::Completed;
        insert_appointment(&conn, &completed).unwrap();
        insert_appointment(&conn, &make_appointment(patient_id, None)).unwrap();

        let filter = AppointmentFilter {
            status: Some(AppointmentStatus::Completed),
            ..Default::default()
        };
        let hits = list_appointments(&conn, None, &filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].status, AppointmentStatus::Completed);
    }

    #[test]
    fn assigned_patient_ids_distinct() {
        let conn = test_db();
        let patient_id = seed_patient(&conn);
        let nurse_id = seed_nurse(&conn);
        insert_appointment(&conn, &make_appointment(patient_id, Some(nurse_id))).unwrap();
        insert_appointment(&conn, &make_appointment(patient_id, Some(nurse_id))).unwrap();

        let ids = assigned_patient_ids(&conn, &nurse_id).unwrap();
        assert_eq!(ids, vec![patient_id]);
    }

    #[test]
    fn foreign_key_requires_patient() {
        let conn = test_db();
        let appt = make_appointment(Uuid::new_v4(), None);
        assert!(insert_appointment(&conn, &appt).is_err());
    }
}
