use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use env_logger::{fmt::Formatter as LogFormatter, Builder as LogBuilder};
use log::{Level as LogLevel, LevelFilter as LogLevelFilter, Record as LogRecord};
use once_cell::sync::Lazy;
use std::{
    env,
    fs::File,
    io::{self, BufWriter, Write},
    ops::Deref,
    path::Path,
};

/// Log lines go to stderr with a one-letter coloured level. Stdout only ever
/// carries command output.
pub fn init_env_logger(verbose: bool) {
    let format = |formatter: &mut LogFormatter, record: &LogRecord<'_>| {
        writeln!(formatter, "{} {}", level_prefix(record.level()), record.args())
    };

    let mut builder = LogBuilder::new();
    builder.format(format).filter(
        None,
        if verbose {
            LogLevelFilter::Debug
        } else {
            LogLevelFilter::Info
        },
    );

    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.init();
}

fn level_prefix(level: LogLevel) -> &'static ColoredString {
    match level {
        LogLevel::Debug => LOG_PREFIX_DEBUG.deref(),
        LogLevel::Info => LOG_PREFIX_INFO.deref(),
        LogLevel::Warn => LOG_PREFIX_WARN.deref(),
        LogLevel::Error => LOG_PREFIX_ERROR.deref(),
        LogLevel::Trace => LOG_PREFIX_TRACE.deref(),
    }
}

/// Writes `contents` to `path`, or to stdout when no path is given.
pub fn write_to_file_or_stdout(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Could not create file `{}`", path.display()))?;
            let mut writer = BufWriter::new(file);
            writer
                .write_all(contents.as_bytes())
                .and_then(|_| writer.flush())
                .with_context(|| format!("Could not write to `{}`", path.display()))
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writer
                .write_all(contents.as_bytes())
                .and_then(|_| writer.flush())
                .context("Could not write to stdout")
        }
    }
}

static LOG_PREFIX_DEBUG: Lazy<ColoredString> = Lazy::new(|| "D".normal());
static LOG_PREFIX_INFO: Lazy<ColoredString> = Lazy::new(|| "I".green());
static LOG_PREFIX_WARN: Lazy<ColoredString> = Lazy::new(|| "W".yellow().bold());
static LOG_PREFIX_ERROR: Lazy<ColoredString> = Lazy::new(|| "E".red().bold());
static LOG_PREFIX_TRACE: Lazy<ColoredString> = Lazy::new(|| "T".normal());
