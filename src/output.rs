/// How a piece of output text should be coloured when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Prompt,
    Subtitle,
    Boot,
    Success,
    Error,
    Header,
    Keyword,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

/// A single row of output before wrapping. Made of spans so that e.g. the prompt
/// echo can colour the label differently from the command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::toned(text, Tone::Normal)
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self::blank().with(text, tone)
    }

    pub fn with(mut self, text: impl Into<String>, tone: Tone) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.spans.push(Span { text, tone });
        }
        self
    }

    /// Append one character, extending the trailing span when the tone matches.
    pub fn push_char(&mut self, c: char, tone: Tone) {
        match self.spans.last_mut() {
            Some(span) if span.tone == tone => span.text.push(c),
            _ => self.spans.push(Span {
                text: c.to_string(),
                tone,
            }),
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Identifies a line in an [OutputLog] so it can be removed later (the loading
/// indicator) even after more lines were appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineId(u64);

/// The scrollback of the session. Only ever appended to, except for `clear` and
/// removal of transient lines.
#[derive(Debug, Default)]
pub struct OutputLog {
    lines: Vec<(LineId, Line)>,
    next_id: u64,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line) -> LineId {
        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.push((id, line));
        id
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = Line>) {
        for line in lines {
            self.push(line);
        }
    }

    pub fn remove(&mut self, id: LineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|(line_id, _)| *line_id != id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn last_mut(&mut self) -> Option<&mut Line> {
        self.lines.last_mut().map(|(_, line)| line)
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &Line> + ExactSizeIterator {
        self.lines.iter().map(|(_, line)| line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The log as plain text, one line per row, styling dropped.
    pub fn plain_text(&self) -> String {
        self.lines()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().any(|line| line.text().contains(needle))
    }
}

#[cfg(test)]
mod test {
    use crate::output::{Line, OutputLog, Tone};

    #[test]
    fn push_char_extends_matching_span() {
        let mut line = Line::toned("ab", Tone::Boot);
        line.push_char('c', Tone::Boot);
        line.push_char('d', Tone::Error);
        assert_eq!(line.spans().len(), 2);
        assert_eq!(line.text(), "abcd");
    }

    #[test]
    fn empty_spans_are_skipped() {
        let line = Line::plain("").with("x", Tone::Prompt);
        assert_eq!(line.spans().len(), 1);
    }

    #[test]
    fn removes_only_the_identified_line() {
        let mut log = OutputLog::new();
        log.push(Line::plain("first"));
        let loading = log.push(Line::toned("[COMPILING VERSE...]", Tone::Loading));
        log.push(Line::plain("last"));

        assert!(log.remove(loading));
        assert!(!log.remove(loading));
        assert_eq!(log.plain_text(), "first\nlast");
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = OutputLog::new();
        log.extend([Line::plain("a"), Line::blank()]);
        assert_eq!(log.len(), 2);
        log.clear();
        assert!(log.is_empty());
        assert!(!log.contains("a"));
    }
}
