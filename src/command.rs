// Commands scheduled by the transition function and the completion values
// the executor reports for them. A command carries everything it needs;
// it never looks at the session.

use std::path::PathBuf;

use crate::error::CommandError;
use crate::state::{FileEntry, SiteCredentials};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchSiteFiles {
        site_name: String,
        password: String,
    },
    CreateSite {
        site_name: String,
        password: String,
    },
    DownloadFile {
        file_id: i64,
        file_name: String,
        auth_token: String,
    },
    /// `password` is needed for the follow-up listing refresh.
    UploadFile {
        local_path: PathBuf,
        site_name: String,
        password: String,
        auth_token: String,
    },
    PickFile,
}

/// Which operation is outstanding; shown while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    FetchSiteFiles,
    CreateSite,
    DownloadFile,
    UploadFile,
    PickFile,
}

impl CommandKind {
    pub fn describe(self) -> &'static str {
        match self {
            CommandKind::FetchSiteFiles => "Opening site",
            CommandKind::CreateSite => "Creating site",
            CommandKind::DownloadFile => "Downloading file",
            CommandKind::UploadFile => "Uploading file",
            CommandKind::PickFile => "Waiting for file selection",
        }
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::FetchSiteFiles { .. } => CommandKind::FetchSiteFiles,
            Command::CreateSite { .. } => CommandKind::CreateSite,
            Command::DownloadFile { .. } => CommandKind::DownloadFile,
            Command::UploadFile { .. } => CommandKind::UploadFile,
            Command::PickFile => CommandKind::PickFile,
        }
    }
}

/// Result of opening a site: a fresh token and the listing, plus the
/// credentials they were issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteAccess {
    pub site: SiteCredentials,
    pub auth_token: String,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub file_name: String,
    pub bytes: u64,
    /// Listing fetched after the upload, with the token it came with.
    pub refreshed: SiteAccess,
}

/// One completion per dispatched command.
#[derive(Debug)]
pub enum Completion {
    SiteFetched(Result<SiteAccess, CommandError>),
    /// Carries the issued token.
    SiteCreated(Result<String, CommandError>),
    /// Carries the local path the file was written to.
    FileDownloaded(Result<PathBuf, CommandError>),
    FileUploaded(Result<UploadOutcome, CommandError>),
    /// `Ok(None)` means the user cancelled the dialog.
    FilePicked(Result<Option<PathBuf>, CommandError>),
}

impl Completion {
    /// A failed completion of the given kind.
    pub fn failure(kind: CommandKind, err: CommandError) -> Self {
        match kind {
            CommandKind::FetchSiteFiles => Completion::SiteFetched(Err(err)),
            CommandKind::CreateSite => Completion::SiteCreated(Err(err)),
            CommandKind::DownloadFile => Completion::FileDownloaded(Err(err)),
            CommandKind::UploadFile => Completion::FileUploaded(Err(err)),
            CommandKind::PickFile => Completion::FilePicked(Err(err)),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Completion::SiteFetched(_) => CommandKind::FetchSiteFiles,
            Completion::SiteCreated(_) => CommandKind::CreateSite,
            Completion::FileDownloaded(_) => CommandKind::DownloadFile,
            Completion::FileUploaded(_) => CommandKind::UploadFile,
            Completion::FilePicked(_) => CommandKind::PickFile,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Completion::SiteFetched(r) => r.is_ok(),
            Completion::SiteCreated(r) => r.is_ok(),
            Completion::FileDownloaded(r) => r.is_ok(),
            Completion::FileUploaded(r) => r.is_ok(),
            Completion::FilePicked(r) => r.is_ok(),
        }
    }
}
