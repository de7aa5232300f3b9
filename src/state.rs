// Session state: the single, explicitly owned value that the transition
// function mutates and the renderer reads. No behavior beyond small
// field helpers lives here.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::command::CommandKind;

/// The seven screens of the client. Nothing else is ever displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    EnterSiteNameForAccess,
    EnterPasswordForAccess,
    EnterSiteNameForCreate,
    EnterPasswordForCreate,
    FileList,
    UploadPrompt,
}

/// Options of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    AccessSite,
    CreateSite,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 3] = [
        MenuOption::AccessSite,
        MenuOption::CreateSite,
        MenuOption::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::AccessSite => "Access Existing Site",
            MenuOption::CreateSite => "Create New Site",
            MenuOption::Exit => "Exit Application",
        }
    }
}

/// A file belonging to the active site, as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: i64,
    #[serde(rename = "file_name")]
    pub name: String,
}

/// Name and password of a site that was opened successfully. Kept apart
/// from the entry buffers, which the user may clear or retype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCredentials {
    pub site_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Success(String),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub screen: Screen,
    pub menu_cursor: usize,
    pub site_name: String,
    pub password: String,
    /// Server order is preserved.
    pub files: Vec<FileEntry>,
    pub selected_file: usize,
    pub pending_upload: Option<PathBuf>,
    pub status: Option<StatusMessage>,
    /// Empty until a site has been accessed or created in this run.
    pub auth_token: String,
    /// The site the file list belongs to.
    pub open_site: Option<SiteCredentials>,
    /// The command currently outstanding, if any.
    pub in_flight: Option<CommandKind>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            screen: Screen::MainMenu,
            menu_cursor: 0,
            site_name: String::new(),
            password: String::new(),
            files: Vec::new(),
            selected_file: 0,
            pending_upload: None,
            status: None,
            auth_token: String::new(),
            open_site: None,
            in_flight: None,
        }
    }

    /// Name of the open site, or the one being typed if none is open.
    pub fn site_label(&self) -> &str {
        self.open_site
            .as_ref()
            .map(|site| site.site_name.as_str())
            .unwrap_or(&self.site_name)
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.files.get(self.selected_file)
    }

    /// Replace the file list, keeping the selection in range.
    pub fn set_files(&mut self, files: Vec<FileEntry>) {
        self.files = files;
        self.clamp_selection();
    }

    pub fn clamp_selection(&mut self) {
        let last = self.files.len().saturating_sub(1);
        if self.selected_file > last {
            self.selected_file = last;
        }
    }

    /// Land on the main menu, leaving the file list behind.
    pub fn return_to_menu(&mut self) {
        self.screen = Screen::MainMenu;
        self.selected_file = 0;
    }

    pub fn succeed(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::Success(text.into()));
    }

    pub fn fail(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::Failure(text.into()));
    }
}
