// Command executor: runs scheduled commands off the event loop and feeds
// exactly one completion per command back into the event channel.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::api::SiteApi;
use crate::command::{Command, Completion, SiteAccess, UploadOutcome};
use crate::credentials::CredentialStore;
use crate::error::CommandError;
use crate::transition::Event;

/// Native file selection. `Ok(None)` means the user cancelled.
pub trait FilePicker: Send + Sync {
    fn pick(&self) -> Result<Option<PathBuf>, CommandError>;
}

/// Blocking native dialog via `rfd`.
pub struct NativePicker;

impl FilePicker for NativePicker {
    fn pick(&self) -> Result<Option<PathBuf>, CommandError> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Select a file to upload")
            .pick_file()
        else {
            return Ok(None);
        };
        fs::canonicalize(&path)
            .map(Some)
            .map_err(|e| CommandError::Picker(format!("{}: {e}", path.display())))
    }
}

/// Everything a command may touch. Cheap to clone into worker threads.
#[derive(Clone)]
pub struct Executor {
    api: Arc<dyn SiteApi>,
    picker: Arc<dyn FilePicker>,
    store: CredentialStore,
    downloads_dir: PathBuf,
}

impl Executor {
    pub fn new(
        api: Arc<dyn SiteApi>,
        picker: Arc<dyn FilePicker>,
        store: CredentialStore,
        downloads_dir: impl Into<PathBuf>,
    ) -> Self {
        Executor {
            api,
            picker,
            store,
            downloads_dir: downloads_dir.into(),
        }
    }

    /// Run `command` on a worker thread and send its completion to `events`.
    ///
    /// A panicking command still reports a failure, so the session never
    /// waits on a completion that will not come.
    pub fn dispatch(&self, command: Command, events: Sender<Event>) -> JoinHandle<()> {
        let executor = self.clone();
        thread::spawn(move || {
            let kind = command.kind();
            let completion = panic::catch_unwind(AssertUnwindSafe(|| executor.run(command)))
                .unwrap_or_else(|payload| {
                    let cause = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    tracing::error!(?kind, %cause, "command panicked");
                    Completion::failure(kind, CommandError::Crashed(cause))
                });
            // The receiver is gone only when the client is shutting down.
            let _ = events.send(Event::Completed(completion));
        })
    }

    /// Run `command` to completion on the calling thread.
    pub fn run(&self, command: Command) -> Completion {
        let kind = command.kind();
        tracing::info!(?kind, "command started");
        let completion = match command {
            Command::FetchSiteFiles {
                site_name,
                password,
            } => Completion::SiteFetched(self.fetch_site(&site_name, &password)),
            Command::CreateSite {
                site_name,
                password,
            } => Completion::SiteCreated(self.create_site(&site_name, &password)),
            Command::DownloadFile {
                file_id,
                file_name,
                auth_token,
            } => Completion::FileDownloaded(self.download(file_id, &file_name, &auth_token)),
            Command::UploadFile {
                local_path,
                site_name,
                password,
                auth_token,
            } => Completion::FileUploaded(self.upload(
                &local_path,
                &site_name,
                &password,
                &auth_token,
            )),
            Command::PickFile => Completion::FilePicked(self.picker.pick()),
        };
        if completion.is_success() {
            tracing::info!(?kind, "command finished");
        } else {
            tracing::warn!(?kind, ?completion, "command failed");
        }
        completion
    }

    fn fetch_site(&self, site_name: &str, password: &str) -> Result<SiteAccess, CommandError> {
        let access = self.api.fetch_site(site_name, password)?;
        self.store.save(&access.auth_token)?;
        Ok(access)
    }

    fn create_site(&self, site_name: &str, password: &str) -> Result<String, CommandError> {
        let token = self.api.create_site(site_name, password)?;
        self.store.save(&token)?;
        Ok(token)
    }

    /// The session's token, or the stored one from an earlier run.
    fn resolve_token(&self, session_token: &str) -> Result<String, CommandError> {
        if !session_token.is_empty() {
            return Ok(session_token.to_string());
        }
        self.store.load()?.ok_or(CommandError::MissingToken)
    }

    fn download(
        &self,
        file_id: i64,
        file_name: &str,
        session_token: &str,
    ) -> Result<PathBuf, CommandError> {
        let token = self.resolve_token(session_token)?;
        let content = self.api.get_file(file_id, &token)?;

        // Only the last component of the server's name is trusted.
        let local_name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| CommandError::Parse(format!("invalid file name {file_name:?}")))?;

        fs::create_dir_all(&self.downloads_dir)
            .map_err(|e| CommandError::io("error creating downloads directory", e))?;
        let path = self.downloads_dir.join(local_name);
        fs::write(&path, content).map_err(|e| CommandError::io("error saving file", e))?;
        Ok(path)
    }

    fn upload(
        &self,
        local_path: &Path,
        site_name: &str,
        password: &str,
        session_token: &str,
    ) -> Result<UploadOutcome, CommandError> {
        let token = self.resolve_token(session_token)?;
        let bytes = self.api.upload_file(site_name, local_path, &token)?;

        let refreshed = self
            .fetch_site(site_name, password)
            .map_err(|e| CommandError::RefreshAfterUpload(Box::new(e)))?;

        let file_name = local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| local_path.display().to_string());
        Ok(UploadOutcome {
            file_name,
            bytes,
            refreshed,
        })
    }
}
