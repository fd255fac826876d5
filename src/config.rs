use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Clinicore";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Clinicore/ on all platforms (user-visible by design)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Clinicore")
}

/// Path of the clinic database file
pub fn database_path() -> PathBuf {
    app_data_dir().join("clinic.db")
}

/// Default log filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}
