use epicchain_config::LoggingSection;
use std::io;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber described by `[logging]`.
///
/// Expects a section that passed [`LoggingSection::validate`]. `RUST_LOG`
/// takes precedence over the configured level. Installing twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init_tracing(logging: &LoggingSection) {
    if !logging.active {
        return;
    }

    let level = logging.level.trim().to_ascii_lowercase();
    let filter_spec = format!("{level},epicchain={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_spec));

    let writer = if logging.console_output {
        BoxMakeWriter::new(io::stderr)
    } else {
        BoxMakeWriter::new(io::sink)
    };

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(logging.console_output);

    let normalized = logging.format.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "json" => {
            let _ = builder.json().try_init();
        }
        "pretty" => {
            let _ = builder.pretty().try_init();
        }
        _ => {
            let _ = builder.try_init();
        }
    }
}
