//! Profile provisioning — keeping staff profiles in step with accounts.
//!
//! Called after an account is created or its role edited. Idempotent: a
//! second call with the same account updates the existing row instead of
//! inserting a duplicate. Provisioning failure is reported to the caller
//! but never rolls back the account write that triggered it.

use rusqlite::Connection;
use std::str::FromStr;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::repository::staff_profile::{
    find_profile_by_account, insert_staff_profile, update_staff_profile,
};
use crate::db::DatabaseError;
use crate::models::{Account, Role, StaffKind, StaffProfile};

/// Profile columns are sized for this; longer input is truncated, not rejected.
const MAX_CONTACT_LEN: usize = 15;

/// Profile fields supplied by the account form.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub department: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub employee_id: Option<String>,
}

/// What `ensure_profile` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created(Uuid),
    Updated(Uuid),
    /// The role carries no staff profile, or the role name was unknown.
    Skipped,
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Profile {profile_id} not found after save")]
    VerificationFailed { profile_id: Uuid },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Create or update the staff profile backing an account.
///
/// The existence check is by (kind, account); at most one profile per kind
/// is ever provisioned for an account. After an insert, a verification read
/// confirms the row landed — its absence is the one provisioning failure
/// that is not a database error.
pub fn ensure_profile(
    conn: &Connection,
    account: &Account,
    role: Role,
    form: &ProfileForm,
) -> Result<ProvisionOutcome, ProvisionError> {
    let Some(kind) = role.staff_kind() else {
        info!(
            account_id = %account.id,
            role = role.as_str(),
            "role carries no staff profile, nothing to provision"
        );
        return Ok(ProvisionOutcome::Skipped);
    };

    if form.first_name.trim().is_empty() {
        return Err(ProvisionError::Validation {
            field: "first_name".into(),
            message: "must not be empty".into(),
        });
    }
    if form.last_name.trim().is_empty() {
        return Err(ProvisionError::Validation {
            field: "last_name".into(),
            message: "must not be empty".into(),
        });
    }

    let contact_number = form.contact_number.as_deref().map(truncate_contact);

    if let Some(mut existing) = find_profile_by_account(conn, kind, &account.id)? {
        existing.first_name = form.first_name.clone();
        existing.last_name = form.last_name.clone();
        existing.email = form.email.clone().or(Some(account.email.clone()));
        existing.contact_number = contact_number;
        // Only-if-supplied: an edit that omits a field keeps the stored
        // value; role defaults apply on create only.
        if form.department.is_some() {
            existing.department = form.department.clone();
        }
        if form.specialization.is_some() {
            existing.specialization = form.specialization.clone();
        }
        if form.license_number.is_some() {
            existing.license_number = form.license_number.clone();
        }
        if form.employee_id.is_some() {
            existing.employee_id = form.employee_id.clone();
        }
        existing.updated_at = Some(chrono::Local::now().naive_local());
        update_staff_profile(conn, &existing)?;
        info!(
            profile_id = %existing.id,
            account_id = %account.id,
            kind = kind.as_str(),
            "updated staff profile"
        );
        return Ok(ProvisionOutcome::Updated(existing.id));
    }

    let department = form
        .department
        .clone()
        .or_else(|| role.default_department().map(String::from));
    let specialization = form.specialization.clone().or_else(|| match kind {
        StaffKind::Doctor => Some("General".into()),
        _ => None,
    });

    let profile = StaffProfile {
        id: Uuid::new_v4(),
        kind,
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone().or(Some(account.email.clone())),
        contact_number,
        department,
        specialization,
        license_number: form.license_number.clone(),
        employee_id: form.employee_id.clone(),
        account_id: Some(account.id),
        is_active: true,
        created_at: chrono::Local::now().naive_local(),
        updated_at: None,
    };
    insert_staff_profile(conn, &profile)?;

    // Post-save verification read.
    if find_profile_by_account(conn, kind, &account.id)?.is_none() {
        return Err(ProvisionError::VerificationFailed {
            profile_id: profile.id,
        });
    }

    info!(
        profile_id = %profile.id,
        account_id = %account.id,
        kind = kind.as_str(),
        "created staff profile"
    );
    Ok(ProvisionOutcome::Created(profile.id))
}

/// String boundary for callers holding a role name rather than a `Role`.
/// Unknown names are logged and skipped, never a failure.
pub fn ensure_profile_for_role_name(
    conn: &Connection,
    account: &Account,
    role_name: &str,
    form: &ProfileForm,
) -> Result<ProvisionOutcome, ProvisionError> {
    match Role::from_str(role_name) {
        Ok(role) => ensure_profile(conn, account, role, form),
        Err(_) => {
            warn!(
                account_id = %account.id,
                role = role_name,
                "unknown role name, skipping profile provisioning"
            );
            Ok(ProvisionOutcome::Skipped)
        }
    }
}

fn truncate_contact(contact: &str) -> String {
    if contact.chars().count() > MAX_CONTACT_LEN {
        warn!(len = contact.chars().count(), "contact number truncated");
        contact.chars().take(MAX_CONTACT_LEN).collect()
    } else {
        contact.to_string()
    }
}
