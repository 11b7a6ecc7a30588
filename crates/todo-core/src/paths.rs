use std::path::PathBuf;

const APP_DIR_NAME: &str = "todo-store";

/// Per-user data directory, falling back to the temp dir when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}
