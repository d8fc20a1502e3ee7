#![forbid(unsafe_code)]

//! Command-line argument parsing for the list demo.
//!
//! Parses args manually to keep the binary lean. Every option can also be
//! set through a `VLIST_DEMO_*` environment variable; explicit flags win.

use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use vlist_core::{DEFAULT_ITEM_COUNT, FilterType, ShuffleSeed, ViewState};
use vlist_widgets::{DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT};

use crate::app::{AppConfig, RecomputePolicy};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound for `--items`.
pub const MAX_ITEMS: usize = 10_000_000;

/// Upper bound for `--row-height`.
pub const MAX_ROW_HEIGHT: u32 = 10_000;

pub const HELP_TEXT: &str = "\
vlist-demo: a windowed, filterable list of generated items

USAGE:
    vlist-demo [OPTIONS]

OPTIONS:
    --items=N            Number of generated items, up to 10000000 (default: 1000)
    --seed=N             Shuffle seed; random when omitted
    --row-height=N       Row height in layout units, 1 to 10000 (default: 60)
    --overscan=N         Rows rendered beyond each viewport edge (default: 10)
    --filter=F           Initial filter: all, odd, or even (default: all)
    --sorted             Start with the list sorted by id
    --recompute=P        Row-height recompute policy: row-count (default),
                         every-change, or clear-cache
    --no-mouse           Disable mouse wheel capture
    --exit-after-ms=N    Quit automatically after N milliseconds
    --log-file=PATH      Write tracing output to PATH (RUST_LOG filters it)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    s               Toggle sort
    c               Toggle clear cache
    a / o / e       Filter all / odd / even (also 1 / 2 / 3)
    Tab             Cycle filter
    Up/Down, PgUp/PgDn, Home/End, mouse wheel
                    Scroll
    q / Esc / Ctrl+C
                    Quit

ENVIRONMENT VARIABLES:
    VLIST_DEMO_ITEMS          Override --items
    VLIST_DEMO_SEED           Override --seed
    VLIST_DEMO_ROW_HEIGHT     Override --row-height
    VLIST_DEMO_OVERSCAN       Override --overscan
    VLIST_DEMO_FILTER         Override --filter
    VLIST_DEMO_SORTED         Override --sorted (1/true/yes or 0/false/no)
    VLIST_DEMO_RECOMPUTE      Override --recompute
    VLIST_DEMO_EXIT_AFTER_MS  Override --exit-after-ms
    VLIST_DEMO_LOG            Override --log-file";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Number of generated items.
    pub items: usize,
    /// Fixed shuffle seed, or `None` for entropy.
    pub seed: Option<u64>,
    /// Row height in layout units.
    pub row_height: u32,
    /// Overscan rows per side.
    pub overscan: usize,
    /// Initial filter.
    pub filter: FilterType,
    /// Start sorted.
    pub sorted: bool,
    /// When row heights are recomputed.
    pub recompute: RecomputePolicy,
    /// Whether mouse events are enabled.
    pub mouse: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
    /// Tracing output file.
    pub log_file: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            items: DEFAULT_ITEM_COUNT,
            seed: None,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            filter: FilterType::All,
            sorted: false,
            recompute: RecomputePolicy::default(),
            mouse: true,
            exit_after_ms: 0,
            log_file: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Command-line or environment error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptsError {
    /// A flag or variable had a value that does not parse.
    InvalidValue { flag: &'static str, value: String },
    /// An argument nobody recognizes.
    UnknownFlag(String),
}

impl fmt::Display for OptsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownFlag(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for OptsError {}

impl Opts {
    /// Parse the process arguments and environment.
    pub fn parse() -> Result<Command, OptsError> {
        Self::parse_from(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Parse `args` (without the program name), reading overrides via `env`.
    ///
    /// Environment values are applied first, then flags.
    pub fn parse_from<I, S, E>(args: I, env: E) -> Result<Command, OptsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = env("VLIST_DEMO_ITEMS") {
            opts.items = parse_in_range("VLIST_DEMO_ITEMS", &val, 0..=MAX_ITEMS)?;
        }
        if let Some(val) = env("VLIST_DEMO_SEED") {
            opts.seed = Some(parse_value("VLIST_DEMO_SEED", &val)?);
        }
        if let Some(val) = env("VLIST_DEMO_ROW_HEIGHT") {
            opts.row_height =
                parse_in_range("VLIST_DEMO_ROW_HEIGHT", &val, 1..=MAX_ROW_HEIGHT)?;
        }
        if let Some(val) = env("VLIST_DEMO_OVERSCAN") {
            opts.overscan = parse_value("VLIST_DEMO_OVERSCAN", &val)?;
        }
        if let Some(val) = env("VLIST_DEMO_FILTER") {
            opts.filter = parse_value("VLIST_DEMO_FILTER", &val)?;
        }
        if let Some(val) = env("VLIST_DEMO_SORTED") {
            opts.sorted = parse_bool("VLIST_DEMO_SORTED", &val)?;
        }
        if let Some(val) = env("VLIST_DEMO_RECOMPUTE") {
            opts.recompute = parse_value("VLIST_DEMO_RECOMPUTE", &val)?;
        }
        if let Some(val) = env("VLIST_DEMO_EXIT_AFTER_MS") {
            opts.exit_after_ms = parse_value("VLIST_DEMO_EXIT_AFTER_MS", &val)?;
        }
        if let Some(val) = env("VLIST_DEMO_LOG")
            && !val.is_empty()
        {
            opts.log_file = Some(PathBuf::from(val));
        }

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--sorted" => opts.sorted = true,
                "--no-mouse" => opts.mouse = false,
                other => {
                    let Some((flag, val)) = other.split_once('=') else {
                        return Err(OptsError::UnknownFlag(other.to_string()));
                    };
                    match flag {
                        "--items" => opts.items = parse_in_range("--items", val, 0..=MAX_ITEMS)?,
                        "--seed" => opts.seed = Some(parse_value("--seed", val)?),
                        "--row-height" => {
                            opts.row_height = parse_in_range("--row-height", val, 1..=MAX_ROW_HEIGHT)?;
                        }
                        "--overscan" => opts.overscan = parse_value("--overscan", val)?,
                        "--filter" => opts.filter = parse_value("--filter", val)?,
                        "--sorted" => opts.sorted = parse_bool("--sorted", val)?,
                        "--recompute" => opts.recompute = parse_value("--recompute", val)?,
                        "--exit-after-ms" => {
                            opts.exit_after_ms = parse_value("--exit-after-ms", val)?;
                        }
                        "--log-file" => opts.log_file = Some(PathBuf::from(val)),
                        _ => return Err(OptsError::UnknownFlag(other.to_string())),
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }

    /// Application settings these options describe.
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            item_count: self.items,
            seed: self.seed.map_or(ShuffleSeed::Entropy, ShuffleSeed::Fixed),
            row_height: self.row_height,
            overscan: self.overscan,
            initial: ViewState::new(self.filter, self.sorted),
            policy: self.recompute,
        }
    }
}

fn parse_value<T: FromStr>(flag: &'static str, value: &str) -> Result<T, OptsError> {
    value.trim().parse().map_err(|_| OptsError::InvalidValue {
        flag,
        value: value.to_string(),
    })
}

fn parse_in_range<T>(flag: &'static str, value: &str, range: RangeInclusive<T>) -> Result<T, OptsError>
where
    T: FromStr + PartialOrd,
{
    let parsed = parse_value(flag, value)?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(OptsError::InvalidValue {
            flag,
            value: value.to_string(),
        })
    }
}

fn parse_bool(flag: &'static str, value: &str) -> Result<bool, OptsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(OptsError::InvalidValue {
            flag,
            value: value.to_string(),
        }),
    }
}
