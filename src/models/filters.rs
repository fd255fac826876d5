use chrono::NaiveDateTime;
use uuid::Uuid;

use super::enums::{AppointmentStatus, ProcedureStatus};

#[derive(Debug, Default)]
pub struct NoteFilter {
    pub patient_id: Option<Uuid>,
    pub procedure_id: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct VitalFilter {
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct AppointmentFilter {
    pub patient_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

#[derive(Debug, Default)]
pub struct ProcedureFilter {
    pub patient_id: Option<Uuid>,
    pub status: Option<ProcedureStatus>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}
