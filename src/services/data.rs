use crate::models::{Job, Profile, Recommendation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when reading or writing data files
#[derive(Debug, Error)]
pub enum DataError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid profile {id}: {message}")]
    InvalidProfile { id: String, message: String },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfilesFile {
    #[serde(default)]
    profiles: Vec<Profile>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JobsFile {
    #[serde(default)]
    jobs: Vec<Job>,
}

/// JSON-backed store of profiles and jobs
///
/// Files use top-level `"profiles"` / `"jobs"` keys. A missing file is not
/// an error: it is logged and treated as an empty collection.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    profiles: Vec<Profile>,
    jobs: Vec<Job>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(profiles: Vec<Profile>, jobs: Vec<Job>) -> Self {
        Self { profiles, jobs }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Load profiles, validating each one
    pub fn load_profiles<P: AsRef<Path>>(&mut self, path: P) -> Result<&[Profile], DataError> {
        let file: ProfilesFile = read_or_empty(path.as_ref())?;

        for profile in &file.profiles {
            profile.validate().map_err(|e| DataError::InvalidProfile {
                id: profile.id.clone(),
                message: e.to_string(),
            })?;
        }

        tracing::info!("Loaded {} profiles from {}", file.profiles.len(), path.as_ref().display());
        self.profiles = file.profiles;
        Ok(&self.profiles)
    }

    /// Load jobs
    pub fn load_jobs<P: AsRef<Path>>(&mut self, path: P) -> Result<&[Job], DataError> {
        let file: JobsFile = read_or_empty(path.as_ref())?;
        tracing::info!("Loaded {} jobs from {}", file.jobs.len(), path.as_ref().display());
        self.jobs = file.jobs;
        Ok(&self.jobs)
    }

    pub fn get_profile(&self, profile_id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == profile_id)
    }

    pub fn save_profiles<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        write_json(path.as_ref(), &ProfilesFile { profiles: self.profiles.clone() })?;
        tracing::info!("Saved {} profiles", self.profiles.len());
        Ok(())
    }

    pub fn save_jobs<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        write_json(path.as_ref(), &JobsFile { jobs: self.jobs.clone() })?;
        tracing::info!("Saved {} jobs", self.jobs.len());
        Ok(())
    }
}

/// Write every profile's recommendations, keyed by profile id
pub fn export_recommendations<P: AsRef<Path>>(
    path: P,
    recommendations: &BTreeMap<String, Vec<Recommendation>>,
) -> Result<(), DataError> {
    write_json(path.as_ref(), recommendations)?;
    tracing::info!(
        "Exported recommendations for {} profiles to {}",
        recommendations.len(),
        path.as_ref().display()
    );
    Ok(())
}

fn read_json<T>(path: &Path) -> Result<T, DataError>
where
    T: for<'de> Deserialize<'de>,
{
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataError::FileNotFound(path.to_path_buf()),
        _ => DataError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    serde_json::from_str(&contents).map_err(|e| DataError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_or_empty<T>(path: &Path) -> Result<T, DataError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match read_json(path) {
        Err(DataError::FileNotFound(missing)) => {
            tracing::warn!("Data file not found: {}", missing.display());
            Ok(T::default())
        }
        other => other,
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DataError> {
    let io_err = |source| DataError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(value).map_err(|e| DataError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, json).map_err(io_err)
}
