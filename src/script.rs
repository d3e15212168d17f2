//! Fixed text the terminal prints: start-up animation, help and about blocks and
//! the status messages of the date path.

use crate::animation::{Step, Target};
use crate::config::SessionSettings;
use crate::output::{Line, Tone};

pub const SUBTITLE: [&str; 2] = [
    "VY4S4D4S T3RM1N4L v1.0",
    "Vedic Knowledge Compiler / Maya Exploitation Framework",
];

const BOOT_MESSAGES: [(&str, Tone); 8] = [
    ("[BOOTING VEDIC KERNEL...]", Tone::Boot),
    ("[LOADING SANKHYA.SYS...]", Tone::Boot),
    ("[MOUNTING /CONSCIOUSNESS...]", Tone::Boot),
    ("[STARTING VYASAD4S DAEMON...]", Tone::Boot),
    ("[OK] BHAKTI DAILY INITIALIZED", Tone::Success),
    ("", Tone::Normal),
    ("Type 'help' for available commands", Tone::Normal),
    ("", Tone::Normal),
];

const COMMANDS: [(&str, &str); 6] = [
    ("help", "Show this help message"),
    ("today", "Display today's verse"),
    ("YYYY-MM-DD", "Display verse for specific date"),
    ("glossary", "View Sanskrit glossary"),
    ("clear", "Clear terminal"),
    ("about", "About this terminal"),
];

const ABOUT: [&str; 9] = [
    "Daily verses from Bhagavad Gita As It Is and Srimad Bhagavatam,",
    "with connections to Patanjali's Yoga Sutras.",
    "",
    "Approaching yoga from first principles - Sankhya metaphysics.",
    "Vedic knowledge as source code. Yoga as the exploit.",
    "",
    "Compiled by: vyasad4s",
    "Sources: vedabase.io, Vyasa Bhashya",
    "",
];

pub const LOADING: &str = "[COMPILING VERSE...]";

/// The page-load sequence: subtitle, boot lines, then today's verse.
pub fn boot_steps(settings: &SessionSettings) -> Vec<Step> {
    let mut steps = Vec::new();
    for text in SUBTITLE {
        if settings.skip_subtitle {
            steps.push(Step::AppendLine {
                target: Target::Header,
                line: Line::toned(text, Tone::Subtitle),
                delay: Default::default(),
            });
        } else {
            steps.push(Step::TypeChars {
                target: Target::Header,
                text: text.to_string(),
                tone: Tone::Subtitle,
                delay: settings.char_delay,
            });
        }
    }
    if !settings.skip_subtitle {
        steps.push(Step::Pause(settings.subtitle_pause));
    }
    steps.extend(BOOT_MESSAGES.iter().map(|(text, tone)| Step::AppendLine {
        target: Target::Log,
        line: Line::toned(*text, *tone),
        delay: settings.line_delay,
    }));
    steps.push(Step::Pause(settings.boot_pause));
    steps.push(Step::AppendLine {
        target: Target::Log,
        line: Line::blank(),
        delay: Default::default(),
    });
    steps.push(Step::Dispatch("today".to_string()));
    steps
}

pub fn help() -> Vec<Line> {
    let mut lines = vec![
        Line::blank(),
        Line::toned("AVAILABLE COMMANDS:", Tone::Header),
        Line::blank(),
    ];
    lines.extend(COMMANDS.iter().map(|(name, description)| {
        let gap = " ".repeat(14 - name.len());
        Line::toned(*name, Tone::Keyword).with(format!("{gap}- {description}"), Tone::Normal)
    }));
    lines.push(Line::blank());
    lines
}

pub fn about() -> Vec<Line> {
    let mut lines = vec![
        Line::blank(),
        Line::toned("ABOUT VYASAD4S TERMINAL", Tone::Header),
        Line::blank(),
    ];
    lines.extend(ABOUT.iter().map(|text| Line::plain(*text)));
    lines
}

pub fn unknown_command(name: &str) -> Vec<Line> {
    vec![
        Line::toned(format!("Command not found: {name}"), Tone::Error),
        Line::plain("Type 'help' for available commands"),
    ]
}

pub fn verse_not_found(date: &str) -> Vec<Line> {
    vec![
        Line::toned(format!("No verse found for {date}"), Tone::Error),
        Line::plain("Vyasad4s hasn't compiled this date yet."),
    ]
}

pub fn verse_error(error: &anyhow::Error) -> Line {
    Line::toned(format!("Error loading verse: {error:#}"), Tone::Error)
}

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context};

    use crate::animation::{Step, Target};
    use crate::config::SessionSettings;
    use crate::script::{about, boot_steps, help, verse_error};

    fn text(lines: &[crate::output::Line]) -> String {
        lines
            .iter()
            .map(|line| line.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn help_lists_every_command() {
        insta::assert_snapshot!(text(&help()).trim(), @r###"
AVAILABLE COMMANDS:

help          - Show this help message
today         - Display today's verse
YYYY-MM-DD    - Display verse for specific date
glossary      - View Sanskrit glossary
clear         - Clear terminal
about         - About this terminal
"###);
    }

    #[test]
    fn about_block() {
        insta::assert_snapshot!(text(&about()).trim(), @r###"
ABOUT VYASAD4S TERMINAL

Daily verses from Bhagavad Gita As It Is and Srimad Bhagavatam,
with connections to Patanjali's Yoga Sutras.

Approaching yoga from first principles - Sankhya metaphysics.
Vedic knowledge as source code. Yoga as the exploit.

Compiled by: vyasad4s
Sources: vedabase.io, Vyasa Bhashya
"###);
    }

    #[test]
    fn boot_ends_with_today() {
        let steps = boot_steps(&SessionSettings::default());
        assert_eq!(steps.last(), Some(&Step::Dispatch("today".to_string())));
        let typed = steps
            .iter()
            .filter(|step| {
                matches!(
                    step,
                    Step::TypeChars {
                        target: Target::Header,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(typed, 2);
    }

    #[test]
    fn skipped_subtitle_is_shown_at_once() {
        let settings = SessionSettings {
            skip_subtitle: true,
            ..SessionSettings::default()
        };
        let steps = boot_steps(&settings);
        assert!(!steps
            .iter()
            .any(|step| matches!(step, Step::TypeChars { .. })));
        let pauses = steps
            .iter()
            .filter(|step| matches!(step, Step::Pause(_)))
            .count();
        assert_eq!(pauses, 1);
    }

    #[test]
    fn error_line_includes_the_cause_chain() {
        let error = Err::<(), _>(anyhow!("connection refused"))
            .context("GET verses/2024-01-01.html")
            .unwrap_err();
        assert_eq!(
            verse_error(&error).text(),
            "Error loading verse: GET verses/2024-01-01.html: connection refused"
        );
    }
}
