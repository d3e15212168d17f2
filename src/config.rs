use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use serde::Deserialize;

/// How a fetched verse appears in the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VerseMode {
    /// The whole fragment in one step.
    #[default]
    Instant,
    /// Revealed character by character.
    Typewriter,
}

/// Everything the session itself needs. Kept apart from [Settings] so tests can
/// build a session without touching sources or logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub prompt: String,
    pub glossary: String,
    pub char_delay: Duration,
    pub line_delay: Duration,
    pub subtitle_pause: Duration,
    pub boot_pause: Duration,
    pub verse_mode: VerseMode,
    pub skip_subtitle: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            prompt: "vyasad4s@vedic-kernel:~$ ".into(),
            glossary: "glossary.html".into(),
            char_delay: Duration::from_millis(30),
            line_delay: Duration::from_millis(150),
            subtitle_pause: Duration::from_millis(300),
            boot_pause: Duration::from_millis(500),
            verse_mode: VerseMode::Instant,
            skip_subtitle: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL or directory holding `verses/` and the glossary page.
    pub source: String,
    pub fetch_timeout: Option<Duration>,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub session: SessionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: ".".into(),
            fetch_timeout: None,
            log_file: std::env::temp_dir().join("verse-terminal.log"),
            log_level: LevelFilter::Info,
            session: SessionSettings::default(),
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(version, about = "A terminal that types out the verse of the day")]
pub struct Cli {
    /// Base URL or local directory serving verses/<date>.html
    #[arg(long)]
    pub source: Option<String>,
    /// TOML file with the same keys as these flags
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Location printed by the `glossary` command
    #[arg(long)]
    pub glossary: Option<String>,
    #[arg(long)]
    pub char_delay_ms: Option<u64>,
    #[arg(long)]
    pub line_delay_ms: Option<u64>,
    #[arg(long, value_enum)]
    pub verse_mode: Option<VerseMode>,
    #[arg(long)]
    pub skip_subtitle: bool,
    #[arg(long)]
    pub fetch_timeout_secs: Option<u64>,
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// off, error, warn, info, debug or trace
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    source: Option<String>,
    glossary: Option<String>,
    prompt: Option<String>,
    char_delay_ms: Option<u64>,
    line_delay_ms: Option<u64>,
    verse_mode: Option<VerseMode>,
    skip_subtitle: Option<bool>,
    fetch_timeout_secs: Option<u64>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }
}

impl Settings {
    /// Defaults, overlaid by the config file if one was given, overlaid by flags.
    pub fn resolve(cli: Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let mut settings = Settings::default();

        if let Some(source) = cli.source.or(file.source) {
            settings.source = source;
        }
        settings.session.glossary = match cli.glossary.or(file.glossary) {
            Some(glossary) => glossary,
            None => glossary_beside(&settings.source),
        };
        if let Some(prompt) = file.prompt {
            settings.session.prompt = prompt;
        }
        if let Some(ms) = cli.char_delay_ms.or(file.char_delay_ms) {
            settings.session.char_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = cli.line_delay_ms.or(file.line_delay_ms) {
            settings.session.line_delay = Duration::from_millis(ms);
        }
        if let Some(mode) = cli.verse_mode.or(file.verse_mode) {
            settings.session.verse_mode = mode;
        }
        settings.session.skip_subtitle = cli.skip_subtitle || file.skip_subtitle.unwrap_or(false);
        settings.fetch_timeout = cli
            .fetch_timeout_secs
            .or(file.fetch_timeout_secs)
            .map(Duration::from_secs);
        if let Some(path) = cli.log_file.or(file.log_file) {
            settings.log_file = path;
        }
        if let Some(level) = cli.log_level.or(file.log_level) {
            settings.log_level = LevelFilter::from_str(&level)
                .map_err(|_| anyhow!("unknown log level {level:?}"))?;
        }
        Ok(settings)
    }
}

/// The glossary page lives next to the `verses/` directory.
fn glossary_beside(source: &str) -> String {
    if source.starts_with("http://") || source.starts_with("https://") {
        format!("{}/glossary.html", source.trim_end_matches('/'))
    } else {
        Path::new(source).join("glossary.html").display().to_string()
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;
    use std::time::Duration;

    use clap::Parser;
    use log::LevelFilter;

    use crate::config::{Cli, Settings, VerseMode};

    #[test]
    fn defaults_match_the_page_timings() {
        let settings = Settings::resolve(Cli::default()).unwrap();
        assert_eq!(settings.session.char_delay, Duration::from_millis(30));
        assert_eq!(settings.session.line_delay, Duration::from_millis(150));
        assert_eq!(settings.session.verse_mode, VerseMode::Instant);
        assert_eq!(settings.fetch_timeout, None);
        assert_eq!(settings.session.glossary, "./glossary.html");
    }

    #[test]
    fn glossary_follows_a_url_source() {
        let cli = Cli::parse_from(["verse-terminal", "--source", "https://example.org/site/"]);
        let settings = Settings::resolve(cli).unwrap();
        assert_eq!(
            settings.session.glossary,
            "https://example.org/site/glossary.html"
        );
    }

    #[test]
    fn flags_override_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
source = "https://verses.example"
char_delay_ms = 5
verse_mode = "typewriter"
log_level = "debug"
prompt = "guest$ "
"#
        )
        .unwrap();

        let cli = Cli::parse_from([
            "verse-terminal",
            "--config",
            file.path().to_str().unwrap(),
            "--char-delay-ms",
            "12",
            "--skip-subtitle",
        ]);
        let settings = Settings::resolve(cli).unwrap();
        assert_eq!(settings.source, "https://verses.example");
        assert_eq!(settings.session.char_delay, Duration::from_millis(12));
        assert_eq!(settings.session.verse_mode, VerseMode::Typewriter);
        assert_eq!(settings.session.prompt, "guest$ ");
        assert!(settings.session.skip_subtitle);
        assert_eq!(settings.log_level, LevelFilter::Debug);
    }

    #[test]
    fn rejects_unknown_file_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "colour = \"green\"").unwrap();
        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            ..Cli::default()
        };
        assert!(Settings::resolve(cli).is_err());
    }

    #[test]
    fn rejects_bad_log_level() {
        let cli = Cli {
            log_level: Some("loud".into()),
            ..Cli::default()
        };
        assert!(Settings::resolve(cli).is_err());
    }
}
