use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter directives scoped to the bridge crates.
///
/// The channel and protocol layers trace every envelope they touch; scoping
/// the filter keeps dependency noise out of the stream even at trace level.
fn bridge_directives(level: LogLevel) -> String {
    let level = level.as_str();
    [
        "panebridge",
        "panebridge_wire",
        "panebridge_channel",
        "panebridge_protocol",
    ]
    .map(|target| format!("{target}={level}"))
    .join(",")
}

/// Initialize stderr logging. `RUST_LOG` overrides `--log-level` when set.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(bridge_directives(level)));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_bridge_crate() {
        let directives = bridge_directives(LogLevel::Trace);
        for target in [
            "panebridge=trace",
            "panebridge_wire=trace",
            "panebridge_channel=trace",
            "panebridge_protocol=trace",
        ] {
            assert!(directives.contains(target), "missing {target}");
        }
    }

    #[test]
    fn directives_parse_as_a_filter() {
        let directives = bridge_directives(LogLevel::Warn);
        assert!(directives.parse::<EnvFilter>().is_ok());
    }
}
