use vte::{Params, Parser, Perform};

const TAB: &str = "    ";

/// Strip everything from `text` that would act on the terminal rather than be
/// shown by it: escape sequences, carriage returns and other C0 and C1
/// controls. Line feeds survive and tabs become spaces. Markup is left alone.
///
/// A sequence that is still open when the text ends does not eat the rest of
/// the fragment. Its introducer is dropped and whatever followed it is shown.
pub fn terminal_safe(text: &str) -> String {
    let mut performer = Printable::default();
    let mut parser = Parser::new();
    let mut settled = 0;
    for (i, byte) in text.bytes().enumerate() {
        parser.advance(&mut performer, byte);
        if std::mem::take(&mut performer.acted) {
            settled = i + 1;
        }
    }

    let mut rest = text[settled..].chars();
    if rest.next().is_some() {
        performer.text.push_str(&terminal_safe(rest.as_str()));
    }
    performer.text
}

// `acted` is raised by every callback that leaves the parser between sequences,
// so bytes after the last one belong to a sequence that never finished.
#[derive(Default)]
struct Printable {
    text: String,
    acted: bool,
}

impl Perform for Printable {
    fn print(&mut self, c: char) {
        self.acted = true;
        if !c.is_control() {
            self.text.push(c)
        }
    }

    fn execute(&mut self, byte: u8) {
        self.acted = true;
        match byte {
            b'\t' => self.text.push_str(TAB),
            b'\n' => self.text.push('\n'),
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _c: char) {
        self.acted = true;
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {
        self.acted = true;
    }

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {
        self.acted = true;
    }

    fn unhook(&mut self) {
        self.acted = true;
    }
}

#[cfg(test)]
mod test {
    use crate::sanitize::terminal_safe;

    #[test]
    fn keeps_markup_verbatim() {
        assert_eq!(terminal_safe("<p>Verse text</p>"), "<p>Verse text</p>");
    }

    #[test]
    fn drops_escape_sequences() {
        let text = "\x1b[31mred\x1b[0m \x1b[2J\x1b]0;title\x07done";
        assert_eq!(terminal_safe(text), "red done");
    }

    #[test]
    fn normalizes_line_endings_and_tabs() {
        assert_eq!(terminal_safe("a\r\n\tb\x08"), "a\n    b");
    }

    #[test]
    fn drops_c1_controls() {
        assert_eq!(terminal_safe("a\u{9b}2Jb"), "a2Jb");
        assert_eq!(terminal_safe("x\u{85}y\u{7f}z"), "xyz");
    }

    #[test]
    fn unterminated_sequence_keeps_the_rest() {
        assert_eq!(
            terminal_safe("<p>one\x1b]0;t</p><p>two</p>"),
            "<p>one]0;t</p><p>two</p>"
        );
        assert_eq!(terminal_safe("tail\x1b[31"), "tail[31");
        assert_eq!(terminal_safe("end\x1b"), "end");
    }

    #[test]
    fn passes_unicode_through() {
        assert_eq!(
            terminal_safe("धर्मक्षेत्रे कुरुक्षेत्रे"),
            "धर्मक्षेत्रे कुरुक्षेत्रे"
        );
    }
}
