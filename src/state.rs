/*
Session lifecycle:

    Idle --submit/boot--> Animating --queue drained--> Idle
    Idle --date command--> Loading --fetch completes--> Animating | Idle

Every external event enters through exactly one method (handle_key, pointer,
focus, blur, tick, complete_fetch) and the phase is recomputed before returning.
*/
use log::{debug, info, trace, warn};

use crate::animation::{Animator, Cue, Step, Target};
use crate::clock::Instant;
use crate::command::{local_today, Command, Verb};
use crate::config::{SessionSettings, VerseMode};
use crate::input::{History, InputLine, Key, Recall};
use crate::output::{Line, LineId, OutputLog, Tone};
use crate::sanitize::terminal_safe;
use crate::script;
use crate::source::FetchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Animating,
    /// A verse fetch is outstanding.
    Loading,
}

/// Work the session asks its host to do. The session never performs I/O itself.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Effect {
    /// Look the verse up and report back through [Session::complete_fetch].
    Fetch(String),
    /// Leave the terminal for the given location.
    Navigate(String),
}

#[derive(Debug)]
struct PendingFetch {
    date: String,
    indicator: LineId,
}

pub struct Session {
    settings: SessionSettings,
    header: Vec<Line>,
    log: OutputLog,
    input: InputLine,
    history: History,
    animator: Animator,
    phase: Phase,
    focused: bool,
    pending: Option<PendingFetch>,
    clear_input_when_idle: bool,
    today: fn() -> String,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            header: Vec::new(),
            log: OutputLog::new(),
            input: InputLine::default(),
            history: History::new(),
            animator: Animator::new(),
            phase: Phase::Idle,
            focused: true,
            pending: None,
            clear_input_when_idle: false,
            today: local_today,
        }
    }

    /// Replace the calendar used by `today`.
    pub fn with_today(mut self, today: fn() -> String) -> Self {
        self.today = today;
        self
    }

    /// Queue the start-up sequence. Ends by loading today's verse.
    pub fn boot(&mut self, now: Instant) -> Option<Effect> {
        info!("booting session");
        self.animator.enqueue(script::boot_steps(&self.settings));
        self.pump(now)
    }

    pub fn handle_key(&mut self, key: Key, now: Instant) -> Option<Effect> {
        if self.is_busy() {
            trace!("swallowed {key:?} while {:?}", self.phase);
            return None;
        }
        self.focused = true;
        match key {
            Key::Submit => return self.submit(now),
            Key::HistoryPrevious => {
                if let Some(entry) = self.history.previous() {
                    self.input.set(entry);
                }
            }
            Key::HistoryNext => match self.history.next() {
                Recall::Entry(entry) => self.input.set(entry),
                Recall::Fresh => self.input.clear(),
            },
            Key::Edit(edit) => self.input.apply(edit),
        }
        None
    }

    /// A click anywhere gives the prompt focus back, unless something is playing.
    pub fn pointer(&mut self) {
        if !self.is_busy() {
            self.focused = true;
        }
    }

    /// The terminal window got focus back. Applies even mid-playback.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Advance the animation to `now`.
    pub fn tick(&mut self, now: Instant) -> Option<Effect> {
        self.pump(now)
    }

    /// Deliver the answer for an outstanding fetch.
    pub fn complete_fetch(
        &mut self,
        date: &str,
        result: anyhow::Result<FetchOutcome>,
        now: Instant,
    ) -> Option<Effect> {
        let pending = match self.pending.take() {
            Some(pending) if pending.date == date => pending,
            other => {
                self.pending = other;
                warn!("ignoring fetch result for {date}, nothing is waiting for it");
                return None;
            }
        };
        self.log.remove(pending.indicator);

        match result {
            Ok(FetchOutcome::Found(body)) => {
                info!("verse for {date} loaded ({} bytes)", body.len());
                let safe = terminal_safe(&body);
                let text = safe.trim_end_matches('\n');
                match self.settings.verse_mode {
                    VerseMode::Instant => self.log.extend(text.split('\n').map(Line::plain)),
                    VerseMode::Typewriter => self.animator.enqueue([Step::TypeChars {
                        target: Target::Log,
                        text: text.to_string(),
                        tone: Tone::Normal,
                        delay: self.settings.char_delay,
                    }]),
                }
            }
            Ok(FetchOutcome::NotFound) => {
                info!("no verse for {date}");
                self.log.extend(script::verse_not_found(date));
            }
            Err(err) => {
                warn!("loading verse for {date} failed: {err:#}");
                self.log.push(script::verse_error(&err));
            }
        }
        self.pump(now)
    }

    fn submit(&mut self, now: Instant) -> Option<Effect> {
        let line = self.input.text().trim().to_string();
        if line.is_empty() {
            return None;
        }
        self.log.push(
            Line::toned(self.settings.prompt.as_str(), Tone::Prompt).with(line.as_str(), Tone::Normal),
        );
        self.history.push(line.clone());
        self.clear_input_when_idle = true;
        let effect = self.dispatch(&line);
        let queued = self.pump(now);
        effect.or(queued)
    }

    fn dispatch(&mut self, line: &str) -> Option<Effect> {
        let command = Command::parse(line)?;
        debug!("dispatching {command:?}");
        match command.verb() {
            Verb::Help => self.log.extend(script::help()),
            Verb::About => self.log.extend(script::about()),
            Verb::Clear => self.log.clear(),
            Verb::Unknown(name) => self.log.extend(script::unknown_command(&name)),
            Verb::Glossary => {
                info!("navigating to {}", self.settings.glossary);
                return Some(Effect::Navigate(self.settings.glossary.clone()));
            }
            Verb::Today => return Some(self.load_verse((self.today)())),
            Verb::Date(date) => return Some(self.load_verse(date)),
        }
        None
    }

    fn load_verse(&mut self, date: String) -> Effect {
        let indicator = self.log.push(Line::toned(script::LOADING, Tone::Loading));
        self.pending = Some(PendingFetch {
            date: date.clone(),
            indicator,
        });
        self.settle();
        Effect::Fetch(date)
    }

    // Run due animation steps, feeding dispatch cues back through the dispatcher.
    fn pump(&mut self, now: Instant) -> Option<Effect> {
        let mut effect = None;
        loop {
            let mut dispatched = false;
            for cue in self.animator.tick(now) {
                match cue {
                    Cue::Append { target, line } => self.lines_mut(target).push(line),
                    Cue::Open { target } => self.lines_mut(target).push(Line::blank()),
                    Cue::Reveal { target, ch, tone } => self.reveal(target, ch, tone),
                    Cue::Dispatch(line) => {
                        dispatched = true;
                        if let Some(next) = self.dispatch(&line) {
                            effect = Some(next);
                        }
                    }
                }
            }
            if !dispatched {
                break;
            }
        }
        self.settle();
        effect
    }

    fn reveal(&mut self, target: Target, ch: char, tone: Tone) {
        let mut lines = self.lines_mut(target);
        if ch == '\n' {
            lines.push(Line::blank());
            return;
        }
        match lines.last_mut() {
            Some(line) => line.push_char(ch, tone),
            None => lines.push(Line::toned(ch.to_string(), tone)),
        }
    }

    fn lines_mut(&mut self, target: Target) -> Lines<'_> {
        match target {
            Target::Header => Lines::Header(&mut self.header),
            Target::Log => Lines::Log(&mut self.log),
        }
    }

    fn settle(&mut self) {
        let phase = if self.pending.is_some() {
            Phase::Loading
        } else if !self.animator.is_idle() {
            Phase::Animating
        } else {
            Phase::Idle
        };
        if phase != self.phase {
            debug!("session {:?} -> {phase:?}", self.phase);
            self.phase = phase;
        }
        if phase == Phase::Idle && self.clear_input_when_idle {
            self.clear_input_when_idle = false;
            self.input.clear();
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.animator.next_deadline()
    }

    pub fn header(&self) -> &[Line] {
        &self.header
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn prompt(&self) -> &str {
        &self.settings.prompt
    }
}

// Header and log are both appendable line lists; the animator addresses either.
enum Lines<'a> {
    Header(&'a mut Vec<Line>),
    Log(&'a mut OutputLog),
}

impl Lines<'_> {
    fn push(&mut self, line: Line) {
        match self {
            Lines::Header(lines) => lines.push(line),
            Lines::Log(log) => {
                log.push(line);
            }
        }
    }

    fn last_mut(&mut self) -> Option<&mut Line> {
        match self {
            Lines::Header(lines) => lines.last_mut(),
            Lines::Log(log) => log.last_mut(),
        }
    }
}
