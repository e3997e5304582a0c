//! Update service: the external check/download/install collaborator.
//!
//! All operations are fire-and-forget; outcomes arrive later as
//! [`UpdateEvent`]s on the channel handed to the service at construction.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use serde::Deserialize;
use tokio::{
    fs,
    io::{AsyncReadExt, AsyncWriteExt},
    process::Command,
    sync::mpsc,
};
use tracing::{debug, info, warn};

use crate::{
    error::ReminderError,
    messages::{UpdateEvent, UpdateInfo},
    utils::Lifecycle,
};

/// Current application version (from Cargo.toml)
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const CHUNK_SIZE: usize = 64 * 1024;

/// Check/download/install contract of the update backend
pub trait UpdateService: Send + Sync {
    fn check_for_updates(&self);
    fn download_update(&self);
    /// Expected to terminate the process and relaunch the new version
    fn quit_and_install(&self);
}

/// Release description published in the update feed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub version: String,
    #[serde(default)]
    pub release_notes: Option<String>,
    /// Path to the new application binary
    pub artifact: PathBuf,
}

impl FeedEntry {
    fn info(&self) -> UpdateInfo {
        UpdateInfo {
            version: self.version.clone(),
            release_notes: self.release_notes.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct FeedProgress {
    available: Option<FeedEntry>,
    staged: Option<PathBuf>,
}

/// Update service reading releases from a local JSON feed file
#[derive(Clone)]
pub struct FeedUpdateService {
    feed: Option<PathBuf>,
    staging_dir: PathBuf,
    current_version: semver::Version,
    events: mpsc::UnboundedSender<UpdateEvent>,
    progress: Arc<Mutex<FeedProgress>>,
    lifecycle: Lifecycle,
}

impl FeedUpdateService {
    pub fn new(
        feed: Option<PathBuf>,
        events: mpsc::UnboundedSender<UpdateEvent>,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            feed,
            staging_dir: std::env::temp_dir().join("stand-reminder-update"),
            current_version: semver::Version::new(0, 0, 0),
            events,
            progress: Arc::new(Mutex::new(FeedProgress::default())),
            lifecycle,
        }
        .with_current_version(CURRENT_VERSION)
    }

    /// Override the version releases are compared against
    pub fn with_current_version(mut self, version: &str) -> Self {
        match semver::Version::parse(version) {
            Ok(parsed) => self.current_version = parsed,
            Err(e) => warn!("Ignoring unparsable current version {}: {}", version, e),
        }
        self
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    fn emit(&self, event: UpdateEvent) {
        debug!("Update service event: {}", event.name());
        if self.events.send(event).is_err() {
            warn!("Update event dropped, dispatcher is gone");
        }
    }

    fn emit_error(&self, error: ReminderError) {
        warn!("Update service error: {}", error);
        self.emit(UpdateEvent::Error {
            message: error.to_string(),
        });
    }

    async fn run_check(&self) {
        self.emit(UpdateEvent::CheckingForUpdate);

        match self.read_feed().await {
            Ok(entry) => match semver::Version::parse(&entry.version) {
                Ok(latest) if latest > self.current_version => {
                    info!("Update available: {} -> {}", self.current_version, latest);
                    let info = entry.info();
                    self.with_progress(|p| {
                        p.available = Some(entry);
                        p.staged = None;
                    });
                    self.emit(UpdateEvent::UpdateAvailable(info));
                }
                Ok(_) => {
                    info!("Already on the latest version {}", self.current_version);
                    self.with_progress(|p| p.available = None);
                    self.emit(UpdateEvent::UpdateNotAvailable(UpdateInfo::new(
                        self.current_version.to_string(),
                    )));
                }
                Err(e) => self.emit_error(ReminderError::Update(format!(
                    "invalid version {:?} in feed: {}",
                    entry.version, e
                ))),
            },
            Err(e) => self.emit_error(e),
        }
    }

    async fn read_feed(&self) -> Result<FeedEntry, ReminderError> {
        let path = self
            .feed
            .as_ref()
            .ok_or_else(|| ReminderError::Update("no update feed configured".to_string()))?;

        let data = fs::read_to_string(path).await.map_err(|e| {
            ReminderError::Update(format!("failed to read feed {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&data)
            .map_err(|e| ReminderError::Update(format!("failed to parse feed: {}", e)))
    }

    async fn run_download(&self) {
        let Some(entry) = self.with_progress(|p| p.available.clone()) else {
            warn!("Download requested with no available update, ignoring");
            return;
        };

        match self.stage_artifact(&entry).await {
            Ok(staged) => {
                info!("Update {} staged at {}", entry.version, staged.display());
                self.with_progress(|p| p.staged = Some(staged));
                self.emit(UpdateEvent::UpdateDownloaded(entry.info()));
            }
            Err(e) => self.emit_error(e),
        }
    }

    async fn stage_artifact(&self, entry: &FeedEntry) -> Result<PathBuf, ReminderError> {
        let io_err = |what: &str, path: &Path, e: std::io::Error| {
            ReminderError::Update(format!("failed to {} {}: {}", what, path.display(), e))
        };

        let mut source = fs::File::open(&entry.artifact)
            .await
            .map_err(|e| io_err("open", &entry.artifact, e))?;
        let total = source
            .metadata()
            .await
            .map_err(|e| io_err("inspect", &entry.artifact, e))?
            .len();

        fs::create_dir_all(&self.staging_dir)
            .await
            .map_err(|e| io_err("create", &self.staging_dir, e))?;

        let file_name = entry
            .artifact
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "stand-reminder".into());
        let target = self.staging_dir.join(file_name);
        let mut dest = fs::File::create(&target)
            .await
            .map_err(|e| io_err("create", &target, e))?;

        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut copied: u64 = 0;
        loop {
            let read = source
                .read(&mut buf)
                .await
                .map_err(|e| io_err("read", &entry.artifact, e))?;
            if read == 0 {
                break;
            }
            dest.write_all(&buf[..read])
                .await
                .map_err(|e| io_err("write", &target, e))?;
            copied += read as u64;
            self.emit(UpdateEvent::DownloadProgress {
                percent: percent_of(copied, total),
            });
        }
        if total == 0 {
            self.emit(UpdateEvent::DownloadProgress { percent: 100.0 });
        }
        dest.flush().await.map_err(|e| io_err("flush", &target, e))?;

        Ok(target)
    }

    async fn run_install(&self) {
        let Some(staged) = self.with_progress(|p| p.staged.clone()) else {
            warn!("Install requested with no downloaded update, ignoring");
            return;
        };

        info!("Launching staged update {}", staged.display());
        match Command::new(&staged).spawn() {
            Ok(_) => self.lifecycle.request_quit(),
            Err(e) => self.emit_error(ReminderError::Update(format!(
                "failed to launch {}: {}",
                staged.display(),
                e
            ))),
        }
    }

    fn with_progress<T>(&self, f: impl FnOnce(&mut FeedProgress) -> T) -> T {
        let mut guard = self
            .progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl UpdateService for FeedUpdateService {
    fn check_for_updates(&self) {
        let service = self.clone();
        tokio::spawn(async move { service.run_check().await });
    }

    fn download_update(&self) {
        let service = self.clone();
        tokio::spawn(async move { service.run_download().await });
    }

    fn quit_and_install(&self) {
        let service = self.clone();
        tokio::spawn(async move { service.run_install().await });
    }
}

fn percent_of(done: u64, total: u64) -> f64 {
    if total == 0 {
        100.0
    } else {
        (done as f64 / total as f64 * 100.0).min(100.0)
    }
}
