use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Keys the session reacts to, already stripped of terminal specifics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Submit,
    HistoryPrevious,
    HistoryNext,
    Edit(Edit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

impl Key {
    /// Map a crossterm key press. Releases, control chords and keys without a
    /// meaning for the prompt map to `None`.
    pub fn from_event(event: KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let key = match event.code {
            KeyCode::Enter => Key::Submit,
            KeyCode::Up => Key::HistoryPrevious,
            KeyCode::Down => Key::HistoryNext,
            KeyCode::Char(c)
                if !event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Key::Edit(Edit::Insert(c))
            }
            KeyCode::Backspace => Key::Edit(Edit::Backspace),
            KeyCode::Delete => Key::Edit(Edit::Delete),
            KeyCode::Left => Key::Edit(Edit::Left),
            KeyCode::Right => Key::Edit(Edit::Right),
            KeyCode::Home => Key::Edit(Edit::Home),
            KeyCode::End => Key::Edit(Edit::End),
            _ => return None,
        };
        Some(key)
    }
}

/// The editable prompt line. `caret` counts characters, not bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputLine {
    text: String,
    caret: usize,
}

impl InputLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Replace the contents and park the caret at the end.
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.caret = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.caret = 0;
    }

    pub fn apply(&mut self, edit: Edit) {
        let len = self.text.chars().count();
        match edit {
            Edit::Insert(c) => {
                let at = self.byte_offset(self.caret);
                self.text.insert(at, c);
                self.caret += 1;
            }
            Edit::Backspace if self.caret > 0 => {
                let at = self.byte_offset(self.caret - 1);
                self.text.remove(at);
                self.caret -= 1;
            }
            Edit::Delete if self.caret < len => {
                let at = self.byte_offset(self.caret);
                self.text.remove(at);
            }
            Edit::Left => self.caret = self.caret.saturating_sub(1),
            Edit::Right => self.caret = (self.caret + 1).min(len),
            Edit::Home => self.caret = 0,
            Edit::End => self.caret = len,
            Edit::Backspace | Edit::Delete => {}
        }
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}

/// What history-next recalled.
#[derive(Debug, PartialEq, Eq)]
pub enum Recall<'a> {
    Entry(&'a str),
    Fresh,
}

/// Submitted lines plus the recall cursor. `cursor == entries.len()` means the
/// user is typing a fresh line rather than browsing.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: String) {
        self.entries.push(entry);
        self.cursor = self.entries.len();
    }

    pub fn previous(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    pub fn next(&mut self) -> Recall<'_> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            Recall::Entry(&self.entries[self.cursor])
        } else {
            self.cursor = self.entries.len();
            Recall::Fresh
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
