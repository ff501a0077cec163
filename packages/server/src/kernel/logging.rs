//! Tracing setup.
//!
//! Console lines look like:
//!
//! ```text
//! [2025-05-01T10:00:00.000Z] [server] [INFO]: Scraping article url=https://...
//! ```
//!
//! `RUST_LOG` overrides the default filter. Debug output is on by default
//! outside production.

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::Config;

const PRODUCTION_FILTER: &str = "info,sqlx=warn,hyper=warn";
const DEVELOPMENT_FILTER: &str = "debug,control_center=debug,sqlx=warn,hyper=info,reqwest=info";

/// `[timestamp] [runtime] [LEVEL]: message fields`
pub struct ConsoleFormat {
    runtime: &'static str,
}

impl ConsoleFormat {
    pub fn new(runtime: &'static str) -> Self {
        Self { runtime }
    }
}

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "[{}] [{}] [{}]: ",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            self.runtime,
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

pub fn default_filter(config: &Config) -> &'static str {
    if config.is_production() {
        PRODUCTION_FILTER
    } else {
        DEVELOPMENT_FILTER
    }
}

/// Install the global subscriber. `runtime` tags every line (`server`, `maintenance`).
pub fn init_tracing(config: &Config, runtime: &'static str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(config))),
        )
        .with(tracing_subscriber::fmt::layer().event_format(ConsoleFormat::new(runtime)))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_console_format_layout() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .event_format(ConsoleFormat::new("server"))
            .with_writer(buffer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(table = "news_items", "Lookup failed");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.starts_with('['));
        assert!(output.contains("] [server] [WARN]: Lookup failed"));
        assert!(output.contains("table=\"news_items\""));
        assert!(output.ends_with('\n'));
    }
}
