//! Repository layer — entity-scoped database operations.
//!
//! Record modules (appointments, procedures, notes, vitals) share the same
//! shape: insert/get/list plus `assigned_patient_ids` for scope resolution.
//! All access is module-qualified; the record modules intentionally share
//! function names, so there is no flat re-export.

pub mod account;
pub mod appointment;
pub mod nursing_note;
pub mod patient;
pub mod patient_vital;
pub mod procedure;
pub mod staff_profile;
