use crate::constants::MACRO_FILE_NAME;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

pub struct AppPaths {
    pub data: PathBuf,
}

impl AppPaths {
    pub fn from_project_dirs() -> Option<Self> {
        ProjectDirs::from("com", "imagemapper", "ImageMapper").map(|dirs| Self {
            data: dirs.data_dir().to_path_buf(),
        })
    }

    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data)
    }

    pub fn macro_file(&self) -> PathBuf {
        self.data.join(MACRO_FILE_NAME)
    }
}

/// Where the macro document lives: the per-user data directory, or the
/// working directory when no home directory is known.
pub fn macro_file() -> PathBuf {
    match AppPaths::from_project_dirs() {
        Some(paths) => {
            if let Err(err) = paths.ensure_dirs_exist() {
                log::warn!("Could not create {}: {}", paths.data.display(), err);
            }
            paths.macro_file()
        }
        None => PathBuf::from(MACRO_FILE_NAME),
    }
}
