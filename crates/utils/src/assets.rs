use std::path::PathBuf;

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");

/// Directory holding the application's mutable data (database, logs).
pub fn asset_dir() -> PathBuf {
    let path = if cfg!(debug_assertions) {
        PathBuf::from(PROJECT_ROOT).join("../../dev_assets")
    } else {
        ProjectDirs::from("dev", "corkboard", "corkboard")
            .expect("OS didn't give us a home directory")
            .data_dir()
            .to_path_buf()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).expect("Failed to create asset directory");
    }

    path
}

/// Database file path.
///
/// Respects the `CORKBOARD_DATABASE_PATH` environment variable for custom
/// locations; defaults to `{asset_dir}/corkboard.db`.
pub fn database_path() -> PathBuf {
    if let Ok(path) = std::env::var("CORKBOARD_DATABASE_PATH") {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).expect("Failed to create database directory");
        }
        return path;
    }
    asset_dir().join("corkboard.db")
}
