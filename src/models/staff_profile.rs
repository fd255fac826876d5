use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::StaffKind;

/// A role-specific clinical/administrative identity.
///
/// One table holds all variants, discriminated by `kind`. `account_id` is
/// the back-reference to the login account and stays `None` until the
/// profile is linked (at provisioning time, or by the identity resolver's
/// email self-heal for legacy rows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffProfile {
    pub id: Uuid,
    pub kind: StaffKind,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub department: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub employee_id: Option<String>,
    pub account_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl StaffProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
