use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ProcedureStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Procedure {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub nurse_id: Option<Uuid>,
    pub name: String,
    pub procedure_type: String, // "Normal Delivery", "Ultrasound", "Surgery", "OPD", ...
    pub performed_at: NaiveDateTime,
    pub treatment_notes: Option<String>,
    pub prescription: Option<String>,
    pub fee: f64,
    pub status: ProcedureStatus,
    pub created_at: NaiveDateTime,
    pub created_by: Option<String>,
}
