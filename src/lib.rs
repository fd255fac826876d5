//! Clinicore — identity resolution and authorization scoping for a clinic
//! management system.
//!
//! Three pieces, built around one SQLite database:
//! - `identity`: map a signed-in account to its staff profile, repairing
//!   missing links found via email fallback;
//! - `scope`: narrow record and patient visibility to what the caller is
//!   assigned to, and authorize writes with the same rules;
//! - `provision`: create or update the staff profile backing an account
//!   when it is created or its role changes.

pub mod config;
pub mod db;
pub mod identity;
pub mod models;
pub mod provision;
pub mod scope;

use tracing_subscriber::EnvFilter;

pub use identity::{resolve, Resolution};
pub use provision::{ensure_profile, ensure_profile_for_role_name, ProfileForm, ProvisionOutcome};
pub use scope::{AccessDecision, AccessReason, Scope};

/// Initialize tracing from RUST_LOG, falling back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
