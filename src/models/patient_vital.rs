use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single vitals measurement taken at the bedside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientVital {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub nurse_id: Option<Uuid>,
    pub procedure_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub recorded_at: NaiveDateTime,
    pub bp_systolic: Option<i32>,
    pub bp_diastolic: Option<i32>,
    pub temperature: Option<f64>,
    pub pulse: Option<i32>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub recorded_by: Option<String>,
}
