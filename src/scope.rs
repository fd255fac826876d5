//! Scope filtering — what a caller may see and write.
//!
//! Default-deny cascade:
//! 1. Admin → FULL (every record, every patient)
//! 2. Linked staff → ASSIGNED (records where the caller is the assignee,
//!    patients reachable through any such record)
//! 3. Unlinked staff → nothing (empty lists, zeroed statistics, writes denied)
//!
//! The same scope value drives list views, dropdown population, and write
//! authorization, so the read and write sides can never disagree.

use std::collections::BTreeSet;

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository::{
    appointment, nursing_note, patient, patient_vital, procedure, staff_profile,
};
use crate::db::DatabaseError;
use crate::identity::Resolution;
use crate::models::{
    Appointment, AppointmentFilter, NoteFilter, NursingNote, Patient, PatientVital,
    Procedure, ProcedureFilter, Role, VitalFilter,
};

/// Visibility scope for a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Unrestricted (admin).
    Full,
    /// Restricted to records assigned to this staff profile.
    Assigned(Uuid),
    /// Staff role with no linked profile. Sees nothing, writes nothing.
    Unlinked,
}

impl Scope {
    /// Compute the scope for a caller from their role and resolved identity.
    pub fn for_caller(role: Role, resolution: &Resolution) -> Self {
        if role == Role::Admin {
            return Scope::Full;
        }
        match resolution.profile_id() {
            Some(profile_id) => Scope::Assigned(profile_id),
            None => Scope::Unlinked,
        }
    }

    /// The assignee restriction to apply to record queries, if any.
    /// `None` inside `Some` means unrestricted; outer `None` means deny.
    fn assignee(&self) -> Option<Option<&Uuid>> {
        match self {
            Scope::Full => Some(None),
            Scope::Assigned(profile_id) => Some(Some(profile_id)),
            Scope::Unlinked => None,
        }
    }
}

/// Why a write was allowed or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReason {
    /// Admin caller, no restriction.
    FullAccess,
    /// The record (or target patient) is assigned to the caller.
    AssignedToCaller,
    /// Staff caller with no linked profile.
    ProfileNotLinked,
    /// The target patient is not reachable through any assigned record.
    PatientOutOfScope,
    /// The record belongs to a different staff member.
    NotRecordOwner,
}

/// Result of a write authorization check.
#[derive(Debug, Clone, Copy)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

impl AccessDecision {
    fn allow(reason: AccessReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    fn deny(reason: AccessReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

pub fn list_nursing_notes(
    conn: &Connection,
    scope: Scope,
    filter: &NoteFilter,
) -> Result<Vec<NursingNote>, DatabaseError> {
    match scope.assignee() {
        Some(author) => nursing_note::list_nursing_notes(conn, author, filter),
        None => Ok(Vec::new()),
    }
}

pub fn list_patient_vitals(
    conn: &Connection,
    scope: Scope,
    filter: &VitalFilter,
) -> Result<Vec<PatientVital>, DatabaseError> {
    match scope.assignee() {
        Some(recorder) => patient_vital::list_patient_vitals(conn, recorder, filter),
        None => Ok(Vec::new()),
    }
}

pub fn list_appointments(
    conn: &Connection,
    scope: Scope,
    filter: &AppointmentFilter,
) -> Result<Vec<Appointment>, DatabaseError> {
    match scope.assignee() {
        Some(assignee) => appointment::list_appointments(conn, assignee, filter),
        None => Ok(Vec::new()),
    }
}

pub fn list_procedures(
    conn: &Connection,
    scope: Scope,
    filter: &ProcedureFilter,
) -> Result<Vec<Procedure>, DatabaseError> {
    match scope.assignee() {
        Some(assignee) => procedure::list_procedures(conn, assignee, filter),
        None => Ok(Vec::new()),
    }
}

/// Patient ids visible to the caller: every patient reachable through an
/// assigned record of any type, or all patients under full scope.
pub fn visible_patient_ids(conn: &Connection, scope: Scope) -> Result<Vec<Uuid>, DatabaseError> {
    let profile_id = match scope {
        Scope::Full => {
            return Ok(patient::list_patients(conn)?.into_iter().map(|p| p.id).collect());
        }
        Scope::Assigned(profile_id) => profile_id,
        Scope::Unlinked => return Ok(Vec::new()),
    };

    let mut ids = BTreeSet::new();
    ids.extend(appointment::assigned_patient_ids(conn, &profile_id)?);
    ids.extend(procedure::assigned_patient_ids(conn, &profile_id)?);
    ids.extend(nursing_note::assigned_patient_ids(conn, &profile_id)?);
    ids.extend(patient_vital::assigned_patient_ids(conn, &profile_id)?);
    Ok(ids.into_iter().collect())
}

pub fn visible_patients(conn: &Connection, scope: Scope) -> Result<Vec<Patient>, DatabaseError> {
    match scope {
        Scope::Full => patient::list_patients(conn),
        Scope::Assigned(_) => {
            let ids = visible_patient_ids(conn, scope)?;
            patient::list_patients_by_ids(conn, &ids)
        }
        Scope::Unlinked => Ok(Vec::new()),
    }
}

/// Transitive visibility: a patient is in scope if any assigned record
/// reaches them.
pub fn can_view_patient(
    conn: &Connection,
    scope: Scope,
    patient_id: &Uuid,
) -> Result<bool, DatabaseError> {
    match scope {
        Scope::Full => Ok(true),
        Scope::Assigned(_) => Ok(visible_patient_ids(conn, scope)?.contains(patient_id)),
        Scope::Unlinked => Ok(false),
    }
}

/// Authorize a record write.
///
/// Create paths pass `assignee = None` and the target patient: the patient
/// must be in scope. Edit and delete paths pass the record's assignee: the
/// caller must be that assignee (or admin).
pub fn check_record_write(
    conn: &Connection,
    scope: Scope,
    patient_id: &Uuid,
    assignee: Option<&Uuid>,
) -> Result<AccessDecision, DatabaseError> {
    let caller = match scope {
        Scope::Full => return Ok(AccessDecision::allow(AccessReason::FullAccess)),
        Scope::Assigned(profile_id) => profile_id,
        Scope::Unlinked => return Ok(AccessDecision::deny(AccessReason::ProfileNotLinked)),
    };

    if let Some(owner) = assignee {
        if *owner != caller {
            return Ok(AccessDecision::deny(AccessReason::NotRecordOwner));
        }
        return Ok(AccessDecision::allow(AccessReason::AssignedToCaller));
    }

    if can_view_patient(conn, scope, patient_id)? {
        Ok(AccessDecision::allow(AccessReason::AssignedToCaller))
    } else {
        Ok(AccessDecision::deny(AccessReason::PatientOutOfScope))
    }
}

/// Dashboard statistics, scoped the same way the list views are.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardStats {
    pub active_staff: i64,
    pub total_procedures: i64,
    pub my_procedures: i64,
    pub my_notes: i64,
    pub my_vitals: i64,
    pub today_notes: i64,
}

pub fn dashboard_stats(conn: &Connection, scope: Scope) -> Result<DashboardStats, DatabaseError> {
    let profile_id = match scope {
        Scope::Full => {
            return Ok(DashboardStats {
                active_staff: staff_profile::count_active_staff(conn)?,
                total_procedures: procedure::count_procedures(conn)?,
                ..Default::default()
            });
        }
        Scope::Assigned(profile_id) => profile_id,
        Scope::Unlinked => return Ok(DashboardStats::default()),
    };

    Ok(DashboardStats {
        active_staff: staff_profile::count_active_staff(conn)?,
        total_procedures: procedure::count_procedures(conn)?,
        my_procedures: procedure::count_procedures_by_assignee(conn, &profile_id)?,
        my_notes: nursing_note::count_notes_by_author(conn, &profile_id)?,
        my_vitals: patient_vital::count_vitals_by_recorder(conn, &profile_id)?,
        today_notes: nursing_note::count_today_notes_by_author(conn, &profile_id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::account::insert_account;
    use crate::db::repository::appointment::insert_appointment;
    use crate::db::repository::nursing_note::insert_nursing_note;
    use crate::db::repository::patient::insert_patient;
    use crate::db::repository::patient_vital::insert_patient_vital;
    use crate::db::repository::procedure::insert_procedure;
    use crate::db::repository::staff_profile::insert_staff_profile;
    use crate::db::sqlite::open_memory_database;
    use crate::identity::resolve;
    use crate::models::{
        Account, AppointmentStatus, Patient, ProcedureStatus, StaffKind, StaffProfile,
    };

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn seed_patient(conn: &Connection, first: &str) -> Uuid {
        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: first.into(),
            last_name: "Test".into(),
            contact_number: None,
            date_of_birth: None,
            address: None,
            created_at: chrono::Local::now().naive_local(),
        };
        insert_patient(conn, &patient).unwrap();
        patient.id
    }

    fn seed_staff(conn: &Connection, kind: StaffKind) -> Uuid {
        let profile = StaffProfile {
            id: Uuid::new_v4(),
            kind,
            first_name: "Staff".into(),
            last_name: "Member".into(),
            email: None,
            contact_number: None,
            department: None,
            specialization: None,
            license_number: None,
            employee_id: None,
            account_id: None,
            is_active: true,
            created_at: chrono::Local::now().naive_local(),
            updated_at: None,
        };
        insert_staff_profile(conn, &profile).unwrap();
        profile.id
    }

    fn seed_note(conn: &Connection, patient_id: Uuid, nurse_id: Option<Uuid>) {
        insert_nursing_note(
            conn,
            &NursingNote {
                id: Uuid::new_v4(),
                patient_id,
                nurse_id,
                procedure_id: None,
                appointment_id: None,
                note_date: chrono::Local::now().naive_local(),
                notes: Some("note".into()),
                vitals: None,
                patient_progress: None,
                medications_administered: None,
                created_at: chrono::Local::now().naive_local(),
                created_by: None,
            },
        )
        .unwrap();
    }

    fn seed_vital(conn: &Connection, patient_id: Uuid, nurse_id: Option<Uuid>) {
        insert_patient_vital(
            conn,
            &PatientVital {
                id: Uuid::new_v4(),
                patient_id,
                nurse_id,
                procedure_id: None,
                appointment_id: None,
                recorded_at: chrono::Local::now().naive_local(),
                bp_systolic: Some(118),
                bp_diastolic: Some(76),
                temperature: None,
                pulse: None,
                respiratory_rate: None,
                oxygen_saturation: None,
                weight_kg: None,
                height_cm: None,
                notes: None,
                created_at: chrono::Local::now().naive_local(),
                recorded_by: None,
            },
        )
        .unwrap();
    }

    fn seed_appointment(conn: &Connection, patient_id: Uuid, nurse_id: Option<Uuid>) {
        insert_appointment(
            conn,
            &Appointment {
                id: Uuid::new_v4(),
                patient_id,
                doctor_id: None,
                nurse_id,
                scheduled_at: chrono::Local::now().naive_local(),
                appointment_type: "General".into(),
                status: AppointmentStatus::Scheduled,
                reason: None,
                notes: None,
                consultation_fee: 0.0,
                created_at: chrono::Local::now().naive_local(),
                created_by: None,
            },
        )
        .unwrap();
    }

    fn seed_procedure(conn: &Connection, patient_id: Uuid, doctor_id: Uuid, nurse_id: Option<Uuid>) {
        insert_procedure(
            conn,
            &Procedure {
                id: Uuid::new_v4(),
                patient_id,
                doctor_id,
                nurse_id,
                name: "Ultrasound".into(),
                procedure_type: "Ultrasound".into(),
                performed_at: chrono::Local::now().naive_local(),
                treatment_notes: None,
                prescription: None,
                fee: 0.0,
                status: ProcedureStatus::Scheduled,
                created_at: chrono::Local::now().naive_local(),
                created_by: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn admin_scope_is_full_even_without_profile() {
        let scope = Scope::for_caller(Role::Admin, &Resolution::NotFound);
        assert_eq!(scope, Scope::Full);
    }

    #[test]
    fn unlinked_staff_sees_nothing() {
        let conn = test_db();
        let patient_id = seed_patient(&conn, "Amina");
        seed_note(&conn, patient_id, None);

        let scope = Scope::for_caller(Role::Nurse, &Resolution::NotFound);
        assert_eq!(scope, Scope::Unlinked);

        assert!(list_nursing_notes(&conn, scope, &NoteFilter::default())
            .unwrap()
            .is_empty());
        assert!(visible_patients(&conn, scope).unwrap().is_empty());
        assert!(!can_view_patient(&conn, scope, &patient_id).unwrap());

        let stats = dashboard_stats(&conn, scope).unwrap();
        assert_eq!(stats.my_notes, 0);
        assert_eq!(stats.active_staff, 0);
    }

    #[test]
    fn full_scope_matches_unfiltered_baseline() {
        let conn = test_db();
        let patient_id = seed_patient(&conn, "Amina");
        let nurse_a = seed_staff(&conn, StaffKind::Nurse);
        let nurse_b = seed_staff(&conn, StaffKind::Nurse);
        seed_note(&conn, patient_id, Some(nurse_a));
        seed_note(&conn, patient_id, Some(nurse_b));

        let all = list_nursing_notes(&conn, Scope::Full, &NoteFilter::default()).unwrap();
        let baseline =
            nursing_note::list_nursing_notes(&conn, None, &NoteFilter::default()).unwrap();
        assert_eq!(all.len(), baseline.len());
    }

    #[test]
    fn assigned_scope_restricts_to_own_records() {
        let conn = test_db();
        let patient_id = seed_patient(&conn, "Amina");
        let nurse_a = seed_staff(&conn, StaffKind::Nurse);
        let nurse_b = seed_staff(&conn, StaffKind::Nurse);
        seed_note(&conn, patient_id, Some(nurse_a));
        seed_note(&conn, patient_id, Some(nurse_b));
        seed_vital(&conn, patient_id, Some(nurse_b));

        let scope = Scope::Assigned(nurse_a);
        let notes = list_nursing_notes(&conn, scope, &NoteFilter::default()).unwrap();
        assert_eq!(notes.len(), 1);
        assert!(notes.iter().all(|n| n.nurse_id == Some(nurse_a)));

        let vitals = list_patient_vitals(&conn, scope, &VitalFilter::default()).unwrap();
        assert!(vitals.is_empty());
    }

    #[test]
    fn visible_patients_union_across_record_types() {
        let conn = test_db();
        let nurse_id = seed_staff(&conn, StaffKind::Nurse);
        let doctor_id = seed_staff(&conn, StaffKind::Doctor);

        let via_appointment = seed_patient(&conn, "Appt");
        let via_procedure = seed_patient(&conn, "Proc");
        let via_note = seed_patient(&conn, "Note");
        let via_vital = seed_patient(&conn, "Vital");
        let unrelated = seed_patient(&conn, "Other");

        seed_appointment(&conn, via_appointment, Some(nurse_id));
        seed_procedure(&conn, via_procedure, doctor_id, Some(nurse_id));
        seed_note(&conn, via_note, Some(nurse_id));
        seed_vital(&conn, via_vital, Some(nurse_id));

        let scope = Scope::Assigned(nurse_id);
        let ids = visible_patient_ids(&conn, scope).unwrap();
        assert_eq!(ids.len(), 4);
        assert!(!ids.contains(&unrelated));

        let patients = visible_patients(&conn, scope).unwrap();
        assert_eq!(patients.len(), 4);

        assert!(can_view_patient(&conn, scope, &via_vital).unwrap());
        assert!(!can_view_patient(&conn, scope, &unrelated).unwrap());

        // Full scope sees everyone.
        assert_eq!(visible_patients(&conn, Scope::Full).unwrap().len(), 5);
    }

    #[test]
    fn write_check_create_requires_patient_in_scope() {
        let conn = test_db();
        let nurse_id = seed_staff(&conn, StaffKind::Nurse);
        let in_scope = seed_patient(&conn, "Mine");
        let out_of_scope = seed_patient(&conn, "Other");
        seed_appointment(&conn, in_scope, Some(nurse_id));

        let scope = Scope::Assigned(nurse_id);
        let ok = check_record_write(&conn, scope, &in_scope, None).unwrap();
        assert!(ok.allowed);
        assert_eq!(ok.reason, AccessReason::AssignedToCaller);

        let denied = check_record_write(&conn, scope, &out_of_scope, None).unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.reason, AccessReason::PatientOutOfScope);
    }

    #[test]
    fn write_check_edit_requires_ownership() {
        let conn = test_db();
        let nurse_a = seed_staff(&conn, StaffKind::Nurse);
        let nurse_b = seed_staff(&conn, StaffKind::Nurse);
        let patient_id = seed_patient(&conn, "Amina");

        let scope = Scope::Assigned(nurse_a);
        let own = check_record_write(&conn, scope, &patient_id, Some(&nurse_a)).unwrap();
        assert!(own.allowed);

        let foreign = check_record_write(&conn, scope, &patient_id, Some(&nurse_b)).unwrap();
        assert!(!foreign.allowed);
        assert_eq!(foreign.reason, AccessReason::NotRecordOwner);

        let admin = check_record_write(&conn, Scope::Full, &patient_id, Some(&nurse_b)).unwrap();
        assert!(admin.allowed);
        assert_eq!(admin.reason, AccessReason::FullAccess);

        let unlinked =
            check_record_write(&conn, Scope::Unlinked, &patient_id, Some(&nurse_a)).unwrap();
        assert!(!unlinked.allowed);
        assert_eq!(unlinked.reason, AccessReason::ProfileNotLinked);
    }

    #[test]
    fn dashboard_counts_are_caller_specific() {
        let conn = test_db();
        let patient_id = seed_patient(&conn, "Amina");
        let nurse_a = seed_staff(&conn, StaffKind::Nurse);
        let nurse_b = seed_staff(&conn, StaffKind::Nurse);
        let doctor_id = seed_staff(&conn, StaffKind::Doctor);

        seed_note(&conn, patient_id, Some(nurse_a));
        seed_note(&conn, patient_id, Some(nurse_a));
        seed_note(&conn, patient_id, Some(nurse_b));
        seed_vital(&conn, patient_id, Some(nurse_a));
        seed_procedure(&conn, patient_id, doctor_id, Some(nurse_a));
        seed_procedure(&conn, patient_id, doctor_id, None);

        let stats = dashboard_stats(&conn, Scope::Assigned(nurse_a)).unwrap();
        assert_eq!(stats.active_staff, 3);
        assert_eq!(stats.total_procedures, 2);
        assert_eq!(stats.my_procedures, 1);
        assert_eq!(stats.my_notes, 2);
        assert_eq!(stats.my_vitals, 1);
        assert_eq!(stats.today_notes, 2);

        let admin = dashboard_stats(&conn, Scope::Full).unwrap();
        assert_eq!(admin.total_procedures, 2);
        assert_eq!(admin.my_notes, 0);
    }

    // End-to-end: sign-in, identity resolution, then scoped views.
    #[test]
    fn nurse_session_sees_only_own_work() {
        let conn = test_db();
        let account = Account {
            id: Uuid::new_v4(),
            email: "nurse.jane@clinic.test".into(),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            phone: None,
            role: Role::Nurse,
            created_at: chrono::Local::now().naive_local(),
        };
        insert_account(&conn, &account).unwrap();

        // Pre-created profile, unlinked: resolution repairs the link.
        let profile = StaffProfile {
            id: Uuid::new_v4(),
            kind: StaffKind::Nurse,
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: Some("Nurse.Jane@clinic.test".into()),
            contact_number: None,
            department: Some("Nursing".into()),
            specialization: None,
            license_number: None,
            employee_id: None,
            account_id: None,
            is_active: true,
            created_at: chrono::Local::now().naive_local(),
            updated_at: None,
        };
        insert_staff_profile(&conn, &profile).unwrap();

        let other_nurse = seed_staff(&conn, StaffKind::Nurse);
        let my_patient = seed_patient(&conn, "Mine");
        let other_patient = seed_patient(&conn, "Other");
        seed_note(&conn, my_patient, Some(profile.id));
        seed_note(&conn, other_patient, Some(other_nurse));

        let resolution = resolve(&conn, &account).unwrap();
        let scope = Scope::for_caller(account.role, &resolution);
        assert_eq!(scope, Scope::Assigned(profile.id));

        let notes = list_nursing_notes(&conn, scope, &NoteFilter::default()).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].patient_id, my_patient);

        let patients = visible_patients(&conn, scope).unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].id, my_patient);
    }
}
