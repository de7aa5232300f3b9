// Transition function: (session, event) -> effect.
//
// Key presses and command completions are the only inputs. The function
// mutates the session in place and may ask the caller to dispatch one
// command or to quit. It performs no I/O.

use indicatif::HumanBytes;

use crate::command::{Command, Completion};
use crate::state::{MenuOption, Screen, Session};

/// Keys the session reacts to; everything else is dropped by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Esc,
    Backspace,
    Char(char),
    /// Ctrl+C.
    Interrupt,
}

#[derive(Debug)]
pub enum Event {
    Key(Key),
    Completed(Completion),
    /// Terminal resized; only a redraw is needed.
    Resize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Dispatch(Command),
    Quit,
}

pub fn update(session: &mut Session, event: Event) -> Effect {
    match event {
        Event::Key(Key::Interrupt) => Effect::Quit,
        Event::Key(key) => {
            let effect = handle_key(session, key);
            if let Effect::Dispatch(command) = &effect {
                // One outstanding command at a time.
                if session.in_flight.is_some() {
                    return Effect::None;
                }
                session.in_flight = Some(command.kind());
                session.status = None;
            }
            effect
        }
        Event::Completed(completion) => {
            apply_completion(session, completion);
            Effect::None
        }
        Event::Resize => Effect::None,
    }
}

fn handle_key(session: &mut Session, key: Key) -> Effect {
    match session.screen {
        Screen::MainMenu => menu_key(session, key),
        Screen::EnterSiteNameForAccess => match key {
            Key::Enter => {
                session.screen = Screen::EnterPasswordForAccess;
                Effect::None
            }
            Key::Esc => {
                session.screen = Screen::MainMenu;
                session.site_name.clear();
                Effect::None
            }
            other => edit(&mut session.site_name, other),
        },
        Screen::EnterPasswordForAccess => match key {
            Key::Enter => Effect::Dispatch(Command::FetchSiteFiles {
                site_name: session.site_name.clone(),
                password: session.password.clone(),
            }),
            Key::Esc => {
                session.screen = Screen::MainMenu;
                session.password.clear();
                Effect::None
            }
            other => edit(&mut session.password, other),
        },
        Screen::EnterSiteNameForCreate => match key {
            Key::Enter => {
                if !session.site_name.is_empty() {
                    session.screen = Screen::EnterPasswordForCreate;
                }
                Effect::None
            }
            Key::Esc => {
                session.screen = Screen::MainMenu;
                session.site_name.clear();
                Effect::None
            }
            other => edit(&mut session.site_name, other),
        },
        Screen::EnterPasswordForCreate => match key {
            Key::Enter => {
                if session.site_name.is_empty() || session.password.is_empty() {
                    return Effect::None;
                }
                Effect::Dispatch(Command::CreateSite {
                    site_name: session.site_name.clone(),
                    password: session.password.clone(),
                })
            }
            Key::Esc => {
                session.screen = Screen::EnterSiteNameForCreate;
                session.password.clear();
                Effect::None
            }
            other => edit(&mut session.password, other),
        },
        Screen::FileList => file_list_key(session, key),
        Screen::UploadPrompt => upload_key(session, key),
    }
}

fn menu_key(session: &mut Session, key: Key) -> Effect {
    match key {
        Key::Up => {
            session.menu_cursor = session.menu_cursor.saturating_sub(1);
        }
        Key::Down => {
            if session.menu_cursor + 1 < MenuOption::ALL.len() {
                session.menu_cursor += 1;
            }
        }
        Key::Enter => match MenuOption::ALL.get(session.menu_cursor) {
            Some(MenuOption::AccessSite) => {
                start_entry(session, Screen::EnterSiteNameForAccess);
            }
            Some(MenuOption::CreateSite) => {
                start_entry(session, Screen::EnterSiteNameForCreate);
            }
            Some(MenuOption::Exit) => return Effect::Quit,
            None => {}
        },
        _ => {}
    }
    Effect::None
}

fn start_entry(session: &mut Session, screen: Screen) {
    session.screen = screen;
    session.site_name.clear();
    session.password.clear();
    session.status = None;
}

fn file_list_key(session: &mut Session, key: Key) -> Effect {
    match key {
        Key::Char('u') | Key::Char('U') => {
            session.screen = Screen::UploadPrompt;
            session.pending_upload = None;
            session.status = None;
        }
        Key::Up => {
            session.selected_file = session.selected_file.saturating_sub(1);
        }
        Key::Down => {
            session.selected_file += 1;
            session.clamp_selection();
        }
        Key::Enter => {
            if let Some(entry) = session.selected_entry() {
                return Effect::Dispatch(Command::DownloadFile {
                    file_id: entry.id,
                    file_name: entry.name.clone(),
                    auth_token: session.auth_token.clone(),
                });
            }
        }
        Key::Esc => session.return_to_menu(),
        _ => {}
    }
    Effect::None
}

fn upload_key(session: &mut Session, key: Key) -> Effect {
    match key {
        Key::Char('f') | Key::Char('F') => return Effect::Dispatch(Command::PickFile),
        Key::Enter => {
            // The open site, not the entry buffers, which may have been
            // cleared while the listing was still loading.
            if let (Some(path), Some(site)) = (&session.pending_upload, &session.open_site) {
                return Effect::Dispatch(Command::UploadFile {
                    local_path: path.clone(),
                    site_name: site.site_name.clone(),
                    password: site.password.clone(),
                    auth_token: session.auth_token.clone(),
                });
            }
        }
        Key::Esc => {
            session.screen = Screen::FileList;
            session.pending_upload = None;
        }
        _ => {}
    }
    Effect::None
}

/// Append/backspace handling shared by the four text-entry screens.
fn edit(buffer: &mut String, key: Key) -> Effect {
    match key {
        Key::Backspace => {
            buffer.pop();
        }
        Key::Char(c) if !c.is_control() => buffer.push(c),
        _ => {}
    }
    Effect::None
}

/// Completions may be stale (the user navigated away meanwhile); they are
/// applied to whatever state exists now.
fn apply_completion(session: &mut Session, completion: Completion) {
    if session.in_flight == Some(completion.kind()) {
        session.in_flight = None;
    }
    match completion {
        Completion::SiteFetched(Ok(access)) => {
            session.open_site = Some(access.site);
            session.auth_token = access.auth_token;
            session.selected_file = 0;
            session.set_files(access.files);
            session.screen = Screen::FileList;
        }
        Completion::SiteCreated(Ok(token)) => {
            session.auth_token = token;
            session.return_to_menu();
            session.succeed("Site created successfully!");
        }
        Completion::FileDownloaded(Ok(path)) => {
            // Returning to the menu after a download is long-standing behavior.
            session.return_to_menu();
            session.succeed(format!("File downloaded to {}", path.display()));
        }
        Completion::FileUploaded(Ok(outcome)) => {
            session.open_site = Some(outcome.refreshed.site);
            session.auth_token = outcome.refreshed.auth_token;
            session.set_files(outcome.refreshed.files);
            session.pending_upload = None;
            session.return_to_menu();
            session.succeed(format!(
                "File uploaded successfully! ({}, {})",
                outcome.file_name,
                HumanBytes(outcome.bytes)
            ));
        }
        Completion::FilePicked(Ok(Some(path))) => {
            session.pending_upload = Some(path);
            session.status = None;
        }
        Completion::FilePicked(Ok(None)) => {}
        Completion::FilePicked(Err(err)) => session.fail(err.to_string()),
        Completion::SiteFetched(Err(err))
        | Completion::SiteCreated(Err(err))
        | Completion::FileDownloaded(Err(err))
        | Completion::FileUploaded(Err(err)) => {
            session.return_to_menu();
            session.fail(err.to_string());
        }
    }
}
