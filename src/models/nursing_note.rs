use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A nursing documentation entry, optionally tied to a procedure or
/// appointment. `vitals` holds a JSON snapshot (see `VitalsSnapshot`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NursingNote {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub nurse_id: Option<Uuid>,
    pub procedure_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub note_date: NaiveDateTime,
    pub notes: Option<String>,
    pub vitals: Option<String>,
    pub patient_progress: Option<String>,
    pub medications_administered: Option<String>,
    pub created_at: NaiveDateTime,
    pub created_by: Option<String>,
}

/// Compact vitals summary embedded in a nursing note as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse: Option<i32>,
}

impl VitalsSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}
