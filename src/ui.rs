// UI layer: owns the terminal (crossterm raw mode + alternate screen) and
// runs the single event loop. Key presses from an input thread and
// command completions from executor threads share one channel, so the
// session has exactly one writer.

use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use crate::executor::Executor;
use crate::render::render;
use crate::state::Session;
use crate::transition::{update, Effect, Event, Key};

/// Restores the terminal when dropped, including on early returns.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut guard = TerminalGuard {
            stdout: io::stdout(),
        };
        execute!(guard.stdout, EnterAlternateScreen, Hide)
            .context("Failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

/// Put the terminal back before the default hook prints a panic.
fn install_panic_hook() {
    let original = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
        original(info);
    }));
}

/// Run the interactive session until the user exits.
pub fn run(executor: &Executor) -> Result<()> {
    install_panic_hook();
    let mut terminal = TerminalGuard::enter()?;

    let (tx, rx) = mpsc::channel();
    spawn_input_reader(tx.clone());

    let mut session = Session::new();
    tracing::info!("session started");
    loop {
        draw(&mut terminal.stdout, &render(&session)).context("Failed to draw frame")?;

        let event = rx.recv().context("Event channel closed")?;
        if let Event::Completed(completion) = &event {
            tracing::debug!(kind = ?completion.kind(), ok = completion.is_success(), "completion received");
        }
        let before = session.screen;
        let effect = update(&mut session, event);
        if session.screen != before {
            tracing::debug!(from = ?before, to = ?session.screen, "screen changed");
        }

        match effect {
            Effect::None => {}
            Effect::Dispatch(command) => {
                executor.dispatch(command, tx.clone());
            }
            Effect::Quit => break,
        }
    }
    tracing::info!("session ended");
    Ok(())
}

/// Forward terminal input into the event channel until it closes.
fn spawn_input_reader(tx: Sender<Event>) {
    thread::spawn(move || loop {
        let forwarded = match event::read() {
            Ok(TermEvent::Key(key)) => translate_key(key).map(Event::Key),
            Ok(TermEvent::Resize(..)) => Some(Event::Resize),
            Ok(_) => None,
            Err(e) => {
                // Without input the session cannot continue; ask it to quit.
                tracing::error!(error = %e, "reading terminal input failed");
                let _ = tx.send(Event::Key(Key::Interrupt));
                break;
            }
        };
        if let Some(event) = forwarded {
            if tx.send(event).is_err() {
                break;
            }
        }
    });
}

/// Map a crossterm key press to a session key. Releases, repeats of
/// modifier chords and unsupported keys are dropped.
pub fn translate_key(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let chord = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Key::Interrupt)
        }
        KeyCode::Char(_) if chord => None,
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

/// Raw mode does not return the carriage on `\n`, so every line is
/// positioned explicitly.
fn draw(out: &mut impl Write, frame: &[String]) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in frame.iter().enumerate() {
        let Ok(row) = u16::try_from(row) else { break };
        queue!(out, MoveTo(0, row), Print(line))?;
    }
    out.flush()
}
