use std::fmt;
use std::path::PathBuf;

use study_core::model::{Manifest, TopicId};

pub const DEFAULT_SITE: &str = ".";
pub const DEFAULT_DB: &str = "progress.sqlite3";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    InvalidTopicId { raw: String },
    InvalidTopics { raw: String },
    InvalidDb { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTopicId { raw } => write!(f, "invalid --id value: {raw:?}"),
            ArgsError::InvalidTopics { raw } => write!(f, "invalid --topics value: {raw:?}"),
            ArgsError::InvalidDb { raw } => write!(f, "invalid --db value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Index,
    Topic,
    Complete,
    Review,
    Export,
    CheckLinks,
}

impl Command {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "index" => Some(Self::Index),
            "topic" => Some(Self::Topic),
            "complete" => Some(Self::Complete),
            "review" => Some(Self::Review),
            "export" => Some(Self::Export),
            "check-links" => Some(Self::CheckLinks),
            _ => None,
        }
    }
}

/// Where topics come from and where progress is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub site: String,
    pub manifest: Manifest,
    pub db: String,
}

impl Config {
    /// Read `STUDY_SITE`, `STUDY_TOPICS` and `STUDY_PROGRESS_DB`. Unset or
    /// unusable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let site = lookup("STUDY_SITE")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SITE.into());
        let manifest = lookup("STUDY_TOPICS")
            .and_then(|value| Manifest::parse_list(&value).ok())
            .unwrap_or_default();
        let db = lookup("STUDY_PROGRESS_DB")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB.into());
        Self { site, manifest, db }
    }
}

/// Parsed command line, after env defaults and flag overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub config: Config,
    pub id: Option<TopicId>,
    pub undo: bool,
    pub out: Option<PathBuf>,
    pub prune: bool,
}

impl Args {
    pub fn parse(
        cmd: Command,
        config: Config,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            config,
            id: None,
            undo: false,
            out: None,
            prune: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--site" => {
                    let value = require_value(args, "--site")?;
                    parsed.config.site = value;
                }
                "--topics" => {
                    let value = require_value(args, "--topics")?;
                    parsed.config.manifest = Manifest::parse_list(&value)
                        .map_err(|_| ArgsError::InvalidTopics { raw: value.clone() })?;
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDb { raw: value });
                    }
                    parsed.config.db = value;
                }
                "--id" if matches!(cmd, Command::Topic | Command::Complete | Command::Review) => {
                    let value = require_value(args, "--id")?;
                    let id = TopicId::new(value.trim())
                        .map_err(|_| ArgsError::InvalidTopicId { raw: value.clone() })?;
                    parsed.id = Some(id);
                }
                "--undo" if cmd == Command::Complete => parsed.undo = true,
                "--prune" if cmd == Command::CheckLinks => parsed.prune = true,
                "--out" if cmd == Command::Export => {
                    let value = require_value(args, "--out")?;
                    parsed.out = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    crate::print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        match cmd {
            Command::Complete | Command::Review if parsed.id.is_none() => {
                Err(ArgsError::MissingFlag { flag: "--id" })
            }
            Command::Export if parsed.out.is_none() => Err(ArgsError::MissingFlag { flag: "--out" }),
            _ => Ok(parsed),
        }
    }
}
