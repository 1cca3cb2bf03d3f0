//! Configuration types and CLI options.
//!
//! This module defines the library `Config` (no CLI dependencies) and the
//! `clap`-derived `Opt` that the binary parses and converts into it.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_THREADS, MASSDNS_PATH_ENV};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// What the process's standard input is connected to.
///
/// Only a pipe or a redirected regular file carries candidate input. A
/// terminal, `/dev/null`, a socket or anything else the runner cannot
/// classify is treated as no input, so an explicit subdomain list is not
/// displaced by an idle stdin under cron or CI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StdinSource {
    /// Interactive terminal
    Terminal,
    /// Pipe or FIFO (`cat subs.txt | massdns_runner`)
    Pipe,
    /// Regular file redirected with `<`
    File,
    /// Character device such as `/dev/null`, or an unknown kind
    Other,
}

impl StdinSource {
    /// Classifies the current process's standard input.
    pub fn detect() -> Self {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return StdinSource::Terminal;
        }
        Self::classify_fd(&stdin)
    }

    #[cfg(unix)]
    fn classify_fd(stdin: &std::io::Stdin) -> Self {
        use std::os::fd::AsFd;
        use std::os::unix::fs::FileTypeExt;

        let file_type = stdin
            .as_fd()
            .try_clone_to_owned()
            .map(std::fs::File::from)
            .and_then(|file| file.metadata())
            .map(|metadata| metadata.file_type());
        match file_type {
            Ok(kind) if kind.is_fifo() => StdinSource::Pipe,
            Ok(kind) if kind.is_file() => StdinSource::File,
            _ => StdinSource::Other,
        }
    }

    #[cfg(not(unix))]
    fn classify_fd(_stdin: &std::io::Stdin) -> Self {
        StdinSource::Pipe
    }

    /// True when this source carries candidate input worth capturing.
    pub fn carries_input(self) -> bool {
        matches!(self, StdinSource::Pipe | StdinSource::File)
    }
}

/// Run configuration for one enumeration.
///
/// Immutable for the duration of a run. Bruteforce is requested when
/// `wordlist` is set; a subdomain list is requested when `subdomain_list`
/// is set or when input arrives on stdin.
///
/// # Examples
///
/// ```no_run
/// use massdns_runner::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     wordlist: Some(PathBuf::from("words.txt")),
///     domain: Some("example.com".to_string()),
///     resolvers: Some(PathBuf::from("resolvers.txt")),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Candidate input arrives on the process's standard input
    pub stdin: bool,

    /// Wordlist used for brute-force generation
    pub wordlist: Option<PathBuf>,

    /// Pre-existing list of subdomains to resolve
    pub subdomain_list: Option<PathBuf>,

    /// Base domain appended to every wordlist entry
    pub domain: Option<String>,

    /// Explicit massdns binary path (skips discovery)
    pub massdns_path: Option<PathBuf>,

    /// Parent directory of the per-run workspace
    pub directory: PathBuf,

    /// Resolver list handed to massdns (`-r`)
    pub resolvers: Option<PathBuf>,

    /// File receiving massdns output (stdout when unset)
    pub output: Option<PathBuf>,

    /// Concurrent lookups for massdns (`-s`)
    pub threads: usize,

    /// Stage the inputs but do not launch massdns
    pub stage_only: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// True when a wordlist is configured.
    pub fn bruteforce_requested(&self) -> bool {
        self.wordlist.is_some()
    }

    /// True when a subdomain list file is configured.
    pub fn subdomain_list_requested(&self) -> bool {
        self.subdomain_list.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stdin: false,
            wordlist: None,
            subdomain_list: None,
            domain: None,
            massdns_path: None,
            directory: std::env::temp_dir(),
            resolvers: None,
            output: None,
            threads: DEFAULT_THREADS,
            stage_only: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Bruteforce a domain
/// massdns_runner -d example.com -w words.txt -r resolvers.txt
///
/// # Resolve a list of subdomains
/// massdns_runner -l subs.txt -r resolvers.txt -o resolved.txt
///
/// # Resolve subdomains piped on stdin
/// cat subs.txt | massdns_runner -r resolvers.txt
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "massdns_runner",
    about = "Stages brute-force or subdomain-list input and resolves it with massdns."
)]
pub struct Opt {
    /// Base domain to bruteforce
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Wordlist for bruteforce (one entry per line)
    #[arg(short, long, value_parser)]
    pub wordlist: Option<PathBuf>,

    /// File containing subdomains to resolve
    #[arg(short = 'l', long = "list", value_parser)]
    pub subdomain_list: Option<PathBuf>,

    /// Ignore standard input even when a pipe or file is attached
    #[arg(long)]
    pub no_stdin: bool,

    /// Parent directory for the temporary workspace
    #[arg(long, value_parser)]
    pub directory: Option<PathBuf>,

    /// Path to the massdns binary
    #[arg(short, long, env = MASSDNS_PATH_ENV, value_parser)]
    pub massdns: Option<PathBuf>,

    /// File containing the resolvers massdns should use
    #[arg(short, long, value_parser)]
    pub resolvers: Option<PathBuf>,

    /// Write massdns output to this file instead of stdout
    #[arg(short, long, value_parser)]
    pub output: Option<PathBuf>,

    /// Number of concurrent massdns lookups
    #[arg(short, long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Stage the input files and list them without running massdns
    #[arg(long)]
    pub stage_only: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Builds the library `Config`.
    ///
    /// `stdin` comes from the caller (normally [`StdinSource::detect`]) so the
    /// decision can be tested without the real process stream.
    pub fn into_config(self, stdin: StdinSource) -> Config {
        Config {
            stdin: !self.no_stdin && stdin.carries_input(),
            wordlist: self.wordlist,
            subdomain_list: self.subdomain_list,
            domain: self.domain,
            massdns_path: self.massdns,
            directory: self.directory.unwrap_or_else(std::env::temp_dir),
            resolvers: self.resolvers,
            output: self.output,
            threads: self.threads,
            stage_only: self.stage_only,
            log_level: self.log_level,
            log_format: self.log_format,
        }
    }
}
