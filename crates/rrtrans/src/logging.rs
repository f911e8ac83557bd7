use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Overrides `--log-level` with a full filter directive when set.
pub const LOG_ENV: &str = "RRTRANS_LOG";

/// Crates whose events follow `--log-level`; everything else stays at `warn`.
const WORKSPACE_TARGETS: [&str; 5] = [
    "rrtrans",
    "rrtrans_format",
    "rrtrans_wire",
    "rrtrans_transport",
    "rrtrans_session",
];

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

/// Filter directive for `level`, e.g. `warn,rrtrans=debug,rrtrans_wire=debug,...`.
fn directive(level: LogLevel) -> String {
    let mut directive = String::from("warn");
    for target in WORKSPACE_TARGETS {
        directive.push(',');
        directive.push_str(target);
        directive.push('=');
        directive.push_str(level.as_str());
    }
    directive
}

fn filter(level: LogLevel) -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(directive(level)))
}

/// Install the stderr subscriber. Targets are shown so sender-thread and
/// session events can be told apart. A second call is a no-op.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter(level))
        .with_ansi(false)
        .with_thread_names(true);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
