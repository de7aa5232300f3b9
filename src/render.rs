// Renderer: a pure function from the session to a text frame. The frame
// is a list of lines of equal display width; the terminal driver only
// copies them to the screen.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::state::{MenuOption, Screen, Session, StatusMessage};

/// Display width of the frame, borders included.
pub const FRAME_WIDTH: usize = 64;
const INNER: usize = FRAME_WIDTH - 4;

const TITLE: &str = "FileShare CLI";
const POINTER: &str = "➜  ";
const NO_POINTER: &str = "   ";

pub fn render(session: &Session) -> Vec<String> {
    let mut body: Vec<String> = Vec::new();

    match &session.status {
        Some(StatusMessage::Success(text)) => body.push(format!("✔ {text}")),
        Some(StatusMessage::Failure(text)) => body.push(format!("✘ {text}")),
        None => {}
    }
    if let Some(kind) = session.in_flight {
        body.push(format!("… {}...", kind.describe()));
    }
    if !body.is_empty() {
        body.push(String::new());
    }

    body.extend(screen_lines(session));

    let mut frame = Vec::with_capacity(body.len() + 6);
    frame.push(format!("┌{}┐", "─".repeat(FRAME_WIDTH - 2)));
    frame.push(boxed(&center(TITLE, INNER)));
    frame.push(format!("├{}┤", "─".repeat(FRAME_WIDTH - 2)));
    frame.extend(body.iter().map(|line| boxed(line)));
    frame.push(format!("├{}┤", "─".repeat(FRAME_WIDTH - 2)));
    frame.push(boxed(&status_bar(session)));
    frame.push(format!("└{}┘", "─".repeat(FRAME_WIDTH - 2)));
    frame
}

fn screen_lines(session: &Session) -> Vec<String> {
    let masked = "•".repeat(session.password.chars().count());
    match session.screen {
        Screen::MainMenu => {
            let mut lines = vec!["Main Menu".to_string(), "─".repeat(40), String::new()];
            for (i, option) in MenuOption::ALL.iter().enumerate() {
                let pointer = if i == session.menu_cursor {
                    POINTER
                } else {
                    NO_POINTER
                };
                lines.push(format!("{pointer}{}", option.label()));
            }
            lines
        }
        Screen::EnterSiteNameForAccess => vec![
            "Enter Site Name".to_string(),
            format!("{}█", session.site_name),
            String::new(),
            "Enter - Continue • Esc - Back".to_string(),
        ],
        Screen::EnterPasswordForAccess => vec![
            format!("Site: {}", session.site_name),
            format!("Password: {masked}█"),
            String::new(),
            "Enter - Continue • Esc - Back".to_string(),
        ],
        Screen::EnterSiteNameForCreate => vec![
            "Create New Site".to_string(),
            format!("Enter Site Name: {}█", session.site_name),
            String::new(),
            "Enter - Continue • Esc - Back".to_string(),
        ],
        Screen::EnterPasswordForCreate => vec![
            format!("Create Site: {}", session.site_name),
            format!("Enter Password: {masked}█"),
            String::new(),
            "Enter - Create Site • Esc - Back".to_string(),
        ],
        Screen::FileList => {
            let mut lines = vec![format!("Site: {}", session.site_label()), "─".repeat(50)];
            if session.files.is_empty() {
                lines.push("No files found. Press U to upload a file.".to_string());
            }
            for (i, file) in session.files.iter().enumerate() {
                let pointer = if i == session.selected_file {
                    POINTER
                } else {
                    NO_POINTER
                };
                lines.push(format!("{pointer}{}", file.name));
            }
            lines.push(String::new());
            lines.push("U - Upload • Enter - Download • Esc - Back".to_string());
            lines
        }
        Screen::UploadPrompt => vec![
            format!("Upload to: {}", session.site_label()),
            String::new(),
            "Press F to select file".to_string(),
            session
                .pending_upload
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            String::new(),
            "Enter - Upload • Esc - Cancel".to_string(),
        ],
    }
}

fn status_bar(session: &Session) -> String {
    match session.screen {
        Screen::MainMenu => "Use ↑/↓ to navigate, Enter to select".to_string(),
        Screen::FileList => format!(
            "Files: {} | Site: {}",
            session.files.len(),
            session.site_label()
        ),
        _ => TITLE.to_string(),
    }
}

fn boxed(line: &str) -> String {
    format!("│ {} │", fit(line, INNER))
}

/// Truncate to `width` display columns, then pad with spaces.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width()) / 2;
    format!("{}{text}", " ".repeat(pad))
}
