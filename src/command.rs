use std::sync::OnceLock;

use regex::Regex;

/// A submitted line, lowercased and split on whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

/// The fixed command surface. Only the command name picks the verb; arguments
/// are carried along but no verb reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Help,
    About,
    Today,
    Clear,
    Glossary,
    Date(String),
    Unknown(String),
}

impl Command {
    /// `None` for lines that are empty once trimmed.
    pub fn parse(line: &str) -> Option<Self> {
        let lowered = line.to_lowercase();
        let mut words = lowered.split_whitespace().map(str::to_string);
        let name = words.next()?;
        Some(Self {
            name,
            args: words.collect(),
        })
    }

    pub fn verb(&self) -> Verb {
        match self.name.as_str() {
            "help" => Verb::Help,
            "about" => Verb::About,
            "today" => Verb::Today,
            "clear" => Verb::Clear,
            "glossary" => Verb::Glossary,
            name if is_date(name) => Verb::Date(name.to_string()),
            name => Verb::Unknown(name.to_string()),
        }
    }
}

/// `YYYY-MM-DD` by shape only; `2024-13-45` passes and simply won't be found.
pub fn is_date(text: &str) -> bool {
    static DATE: OnceLock<Regex> = OnceLock::new();
    DATE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"))
        .is_match(text)
}

/// The current calendar date in local time, formatted the way verses are keyed.
pub fn local_today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
