use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Account, Role};

pub fn insert_account(conn: &Connection, account: &Account) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO accounts (id, email, first_name, last_name, phone, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            account.id.to_string(),
            account.email,
            account.first_name,
            account.last_name,
            account.phone,
            account.role.as_str(),
            account.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_account(conn: &Connection, id: &Uuid) -> Result<Option<Account>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, email, first_name, last_name, phone, role, created_at
         FROM accounts WHERE id = ?1",
    )?;
    let result = stmt.query_row(params![id.to_string()], row_to_account);
    match result {
        Ok(account) => Ok(Some(account)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find an account by email, case-insensitively.
pub fn find_account_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Account>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, email, first_name, last_name, phone, role, created_at
         FROM accounts WHERE LOWER(email) = LOWER(?1) LIMIT 1",
    )?;
    let result = stmt.query_row(params![email], row_to_account);
    match result {
        Ok(account) => Ok(Some(account)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List accounts, optionally narrowed by a name/email substring search.
pub fn list_accounts(
    conn: &Connection,
    search: Option<&str>,
) -> Result<Vec<Account>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, email, first_name, last_name, phone, role, created_at
         FROM accounts
         WHERE ?1 IS NULL
            OR first_name LIKE '%' || ?1 || '%'
            OR last_name LIKE '%' || ?1 || '%'
            OR email LIKE '%' || ?1 || '%'
         ORDER BY last_name, first_name",
    )?;
    let rows = stmt.query_map(params![search], row_to_account)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn update_account(conn: &Connection, account: &Account) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE accounts SET email = ?2, first_name = ?3, last_name = ?4, phone = ?5, role = ?6
         WHERE id = ?1",
        params![
            account.id.to_string(),
            account.email,
            account.first_name,
            account.last_name,
            account.phone,
            account.role.as_str(),
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Account".into(),
            id: account.id.to_string(),
        });
    }
    Ok(())
}

/// Delete an account. The currently signed-in account may not delete itself.
pub fn delete_account(
    conn: &Connection,
    id: &Uuid,
    current_account_id: &Uuid,
) -> Result<(), DatabaseError> {
    if id == current_account_id {
        return Err(DatabaseError::ConstraintViolation(
            "cannot delete the signed-in account".into(),
        ));
    }
    let rows = conn.execute("DELETE FROM accounts WHERE id = ?1", params![id.to_string()])?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Account".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let role_str: String = row.get(5)?;
    let created_str: String = row.get(6)?;

    Ok(Account {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        phone: row.get(4)?,
        role: Role::from_str(&role_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?,
        created_at: NaiveDateTime::parse_from_str(&created_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
    })
}
