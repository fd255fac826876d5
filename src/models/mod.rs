pub mod account;
pub mod appointment;
pub mod enums;
pub mod filters;
pub mod nursing_note;
pub mod patient;
pub mod patient_vital;
pub mod procedure;
pub mod staff_profile;

pub use account::Account;
pub use appointment::Appointment;
pub use enums::*;
pub use filters::*;
pub use nursing_note::{NursingNote, VitalsSnapshot};
pub use patient::Patient;
pub use patient_vital::PatientVital;
pub use procedure::Procedure;
pub use staff_profile::StaffProfile;
