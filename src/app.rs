use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::clock::Instant;
use crate::config::Settings;
use crate::input::Key;
use crate::render;
use crate::source::{FetchOutcome, VerseSource};
use crate::state::{Effect, Session};

/// Why the terminal session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Exit {
    Quit,
    /// The glossary command left the terminal for this location.
    Navigate(String),
}

type FetchDone = (String, Result<FetchOutcome>);

// Puts the terminal back the way we found it, including on early returns.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )
        .context("setting up the terminal")?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen,
            Show
        );
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Run the terminal until the user quits or navigates away.
pub async fn run(settings: Settings) -> Result<Exit> {
    let source = Arc::new(VerseSource::from_location(
        &settings.source,
        settings.fetch_timeout,
    )?);
    let mut guard = TerminalGuard::enter()?;
    let mut events = EventStream::new();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<FetchDone>();

    let mut session = Session::new(settings.session);
    let mut effect = session.boot(Instant::now());

    loop {
        match effect.take() {
            Some(Effect::Fetch(date)) => spawn_fetch(&source, date, done_tx.clone()),
            Some(Effect::Navigate(target)) => return Ok(Exit::Navigate(target)),
            None => {}
        }

        let (cols, rows) = terminal::size().context("reading terminal size")?;
        render::draw(&mut guard.stdout, &session, cols, rows)?;

        let wait = session.next_deadline().map(|at| {
            let now = Instant::now();
            if at > now {
                at.duration_since(now)
            } else {
                Duration::ZERO
            }
        });
        let deadline = async {
            match wait {
                Some(wait) => tokio::time::sleep(wait).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    info!("terminal event stream ended");
                    return Ok(Exit::Quit);
                };
                match event.context("reading terminal event")? {
                    Event::Key(key) if key.kind != KeyEventKind::Release && is_quit(&key) => {
                        info!("quit requested");
                        return Ok(Exit::Quit);
                    }
                    Event::Key(key) => {
                        if let Some(key) = Key::from_event(key) {
                            effect = session.handle_key(key, Instant::now());
                        }
                    }
                    Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                        session.pointer();
                    }
                    Event::FocusLost => session.blur(),
                    Event::FocusGained => session.focus(),
                    other => debug!("unhandled event {other:?}"),
                }
            }
            Some((date, result)) = done_rx.recv() => {
                effect = session.complete_fetch(&date, result, Instant::now());
            }
            _ = deadline => {
                effect = session.tick(Instant::now());
            }
        }
    }
}

fn spawn_fetch(source: &Arc<VerseSource>, date: String, done: mpsc::UnboundedSender<FetchDone>) {
    let source = Arc::clone(source);
    tokio::spawn(async move {
        let result = source.fetch(&date).await;
        if done.send((date, result)).is_err() {
            warn!("fetch finished after the session ended");
        }
    });
}

#[cfg(test)]
mod test {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use crate::app::is_quit;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit(&key(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
