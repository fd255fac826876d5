use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

/// A scheduled visit. Either a doctor, a nurse, or both may be assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub nurse_id: Option<Uuid>,
    pub scheduled_at: NaiveDateTime,
    pub appointment_type: String, // "General", "Follow-up", "Emergency", ...
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub consultation_fee: f64,
    pub created_at: NaiveDateTime,
    pub created_by: Option<String>,
}
