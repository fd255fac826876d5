//! Identity resolution — mapping a signed-in account to its staff profile.
//!
//! The back-reference (`staff_profiles.account_id`) is the primary lookup.
//! Profiles created before the account existed (legacy imports, pre-created
//! staff rows) are found by email instead, and the missing back-reference is
//! repaired in place so the next resolution takes the fast path.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db::repository::staff_profile::{
    find_profile_by_account, find_profile_by_email, link_profile_to_account,
};
use crate::db::DatabaseError;
use crate::models::{Account, StaffProfile};

/// Outcome of resolving an account to its staff profile.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The account maps to this profile.
    Linked(StaffProfile),
    /// No profile exists for the account, or its role carries none.
    NotFound,
}

impl Resolution {
    pub fn profile(&self) -> Option<&StaffProfile> {
        match self {
            Resolution::Linked(profile) => Some(profile),
            Resolution::NotFound => None,
        }
    }

    pub fn profile_id(&self) -> Option<uuid::Uuid> {
        self.profile().map(|p| p.id)
    }
}

/// Resolve the staff profile for an account.
///
/// Lookup order:
/// 1. back-reference match on (kind, account_id);
/// 2. case-insensitive email match within the same kind, skipped when the
///    account has no email. An unlinked match
///    is self-healed by writing the back-reference; a match already linked
///    to a different account is returned anyway and logged as a conflict.
pub fn resolve(conn: &Connection, account: &Account) -> Result<Resolution, DatabaseError> {
    let Some(kind) = account.role.staff_kind() else {
        debug!(
            account_id = %account.id,
            role = account.role.as_str(),
            "role carries no staff profile"
        );
        return Ok(Resolution::NotFound);
    };

    if let Some(profile) = find_profile_by_account(conn, kind, &account.id)? {
        return Ok(Resolution::Linked(profile));
    }

    // An empty email must not match profiles whose email is the empty
    // string; that would mislink an unrelated profile.
    if account.email.is_empty() {
        debug!(account_id = %account.id, "account has no email, skipping fallback");
        return Ok(Resolution::NotFound);
    }

    match find_profile_by_email(conn, kind, &account.email)? {
        Some(mut profile) => match profile.account_id {
            None => {
                link_profile_to_account(conn, &profile.id, &account.id)?;
                info!(
                    profile_id = %profile.id,
                    account_id = %account.id,
                    "repaired missing account link on profile found by email"
                );
                profile.account_id = Some(account.id);
                Ok(Resolution::Linked(profile))
            }
            Some(other) if other != account.id => {
                warn!(
                    profile_id = %profile.id,
                    account_id = %account.id,
                    linked_account_id = %other,
                    "profile email matches but is linked to a different account"
                );
                Ok(Resolution::Linked(profile))
            }
            Some(_) => Ok(Resolution::Linked(profile)),
        },
        None => {
            debug!(
                account_id = %account.id,
                kind = kind.as_str(),
                "no staff profile found for account"
            );
            Ok(Resolution::NotFound)
        }
    }
}
