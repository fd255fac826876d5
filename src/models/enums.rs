use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    Admin => "admin",
    Doctor => "doctor",
    Nurse => "nurse",
    ReceptionStaff => "reception_staff",
    AccountsStaff => "accounts_staff",
    LabStaff => "lab_staff",
    Patient => "patient",
});

str_enum!(StaffKind {
    Doctor => "doctor",
    Nurse => "nurse",
    Reception => "reception",
    Accounts => "accounts",
});

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no_show",
});

str_enum!(ProcedureStatus {
    Scheduled => "scheduled",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl Role {
    /// The staff profile variant this role maps to, if any.
    ///
    /// Lab staff share the reception variant with department "Laboratory".
    /// Admin and Patient carry no clinical profile.
    pub fn staff_kind(self) -> Option<StaffKind> {
        match self {
            Role::Doctor => Some(StaffKind::Doctor),
            Role::Nurse => Some(StaffKind::Nurse),
            Role::ReceptionStaff | Role::LabStaff => Some(StaffKind::Reception),
            Role::AccountsStaff => Some(StaffKind::Accounts),
            Role::Admin | Role::Patient => None,
        }
    }

    /// Default department assigned when a profile is first provisioned.
    pub fn default_department(self) -> Option<&'static str> {
        match self {
            Role::Nurse => Some("Nursing"),
            Role::ReceptionStaff => Some("Reception"),
            Role::LabStaff => Some("Laboratory"),
            Role::AccountsStaff => Some("Accounts"),
            _ => None,
        }
    }
}
