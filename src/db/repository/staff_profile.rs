use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{StaffKind, StaffProfile};

const COLUMNS: &str = "id, kind, first_name, last_name, email, contact_number, department,
         specialization, license_number, employee_id, account_id, is_active, created_at, updated_at";

pub fn insert_staff_profile(conn: &Connection, profile: &StaffProfile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO staff_profiles (id, kind, first_name, last_name, email, contact_number,
         department, specialization, license_number, employee_id, account_id, is_active,
         created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            profile.id.to_string(),
            profile.kind.as_str(),
            profile.first_name,
            profile.last_name,
            profile.email,
            profile.contact_number,
            profile.department,
            profile.specialization,
            profile.license_number,
            profile.employee_id,
            profile.account_id.map(|id| id.to_string()),
            profile.is_active as i32,
            profile.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            profile.updated_at.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_staff_profile(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<StaffProfile>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM staff_profiles WHERE id = ?1"
    ))?;
    let result = stmt.query_row(params![id.to_string()], row_to_profile);
    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find the profile of a given kind linked to an account via its back-reference.
pub fn find_profile_by_account(
    conn: &Connection,
    kind: StaffKind,
    account_id: &Uuid,
) -> Result<Option<StaffProfile>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM staff_profiles WHERE kind = ?1 AND account_id = ?2 LIMIT 1"
    ))?;
    let result = stmt.query_row(params![kind.as_str(), account_id.to_string()], row_to_profile);
    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find a profile of a given kind by email, case-insensitively.
pub fn find_profile_by_email(
    conn: &Connection,
    kind: StaffKind,
    email: &str,
) -> Result<Option<StaffProfile>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM staff_profiles
         WHERE kind = ?1 AND email IS NOT NULL AND LOWER(email) = LOWER(?2) LIMIT 1"
    ))?;
    let result = stmt.query_row(params![kind.as_str(), email], row_to_profile);
    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Set the account back-reference on an unlinked profile.
pub fn link_profile_to_account(
    conn: &Connection,
    profile_id: &Uuid,
    account_id: &Uuid,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE staff_profiles SET account_id = ?2, updated_at = ?3 WHERE id = ?1",
        params![
            profile_id.to_string(),
            account_id.to_string(),
            chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "StaffProfile".into(),
            id: profile_id.to_string(),
        });
    }
    Ok(())
}

pub fn update_staff_profile(conn: &Connection, profile: &StaffProfile) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE staff_profiles SET first_name = ?2, last_name = ?3, email = ?4,
         contact_number = ?5, department = ?6, specialization = ?7, license_number = ?8,
         employee_id = ?9, account_id = ?10, is_active = ?11, updated_at = ?12
         WHERE id = ?1",
        params![
            profile.id.to_string(),
            profile.first_name,
            profile.last_name,
            profile.email,
            profile.contact_number,
            profile.department,
            profile.specialization,
            profile.license_number,
            profile.employee_id,
            profile.account_id.map(|id| id.to_string()),
            profile.is_active as i32,
            profile.updated_at.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "StaffProfile".into(),
            id: profile.id.to_string(),
        });
    }
    Ok(())
}

/// List profiles of one kind, newest first.
pub fn list_staff_profiles(
    conn: &Connection,
    kind: StaffKind,
    active_only: bool,
) -> Result<Vec<StaffProfile>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM staff_profiles
         WHERE kind = ?1 AND (?2 = 0 OR is_active = 1)
         ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(params![kind.as_str(), active_only as i32], row_to_profile)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Count active staff across all kinds (dashboard statistic).
pub fn count_active_staff(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM staff_profiles WHERE is_active = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn row_to_profile(row: &rusqlite::Row) -> Result<StaffProfile, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let kind_str: String = row.get(1)?;
    let account_str: Option<String> = row.get(10)?;
    let created_str: String = row.get(12)?;
    let updated_str: Option<String> = row.get(13)?;

    Ok(StaffProfile {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        kind: StaffKind::from_str(&kind_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        contact_number: row.get(5)?,
        department: row.get(6)?,
        specialization: row.get(7)?,
        license_number: row.get(8)?,
        employee_id: row.get(9)?,
        account_id: account_str.and_then(|s| Uuid::parse_str(&s).ok()),
        is_active: row.get::<_, i32>(11)? != 0,
        created_at: NaiveDateTime::parse_from_str(&created_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        updated_at: updated_str
            .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
    })
}
