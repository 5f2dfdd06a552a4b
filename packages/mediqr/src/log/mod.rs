pub mod subscriber;
mod targets;

pub use targets::{log_level_for, log_targets, API, CONFIG, DATABASE, DEVELOPMENT, QR, SESSION, STORE};

use crate::config::{LogConfig, LogFormat};
use std::sync::Once;
use tracing_subscriber::{
    fmt::{
        format::{DefaultFields, Format},
        writer::BoxMakeWriter,
        SubscriberBuilder,
    },
    EnvFilter,
};

static INIT: Once = Once::new();

type Subscriber = Box<dyn tracing::Subscriber + Send + Sync>;

pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let subscriber = subscriber::builder(&config);
        let subscriber = set_format(&config, subscriber);

        tracing::subscriber::set_global_default(subscriber)
            .expect("Could not set the tracing subscriber");
    });
}

pub fn set_format(
    config: &LogConfig,
    builder: SubscriberBuilder<DefaultFields, Format, EnvFilter, BoxMakeWriter>,
) -> Subscriber {
    match &config.format {
        LogFormat::Pretty => Box::new(builder.pretty().finish()),
        LogFormat::Structured => Box::new(builder.json().finish()),
        LogFormat::Text => Box::new(builder.finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use crate::test_helpers::MockMakeWriter;
    use tracing::dispatcher::set_default;
    use tracing::{debug, error, info, trace, warn};

    #[test]
    fn test_simple_log() {
        let make_writer = MockMakeWriter::default();

        let config = LogConfig::default();

        let subscriber =
            subscriber::builder(&config).with_writer(BoxMakeWriter::new(make_writer.clone()));

        let subscriber = set_format(&config, subscriber);

        let _default = set_default(&subscriber.into());

        error!("error message");

        let log_contents = make_writer.get_string();
        assert!(log_contents.contains("error message"));
    }

    #[test]
    fn test_log_levels() {
        let make_writer = MockMakeWriter::default();

        let config = LogConfig::with_level(LogLevel::Warn);

        let subscriber =
            subscriber::builder(&config).with_writer(BoxMakeWriter::new(make_writer.clone()));

        let subscriber = set_format(&config, subscriber);

        let _default = set_default(&subscriber.into());

        trace!("trace message");
        debug!("debug message");
        info!("info message");
        warn!("warn message");
        error!("error message");

        let log_contents = make_writer.get_string();
        assert!(!log_contents.contains("trace message"));
        assert!(!log_contents.contains("debug message"));
        assert!(!log_contents.contains("info message"));
        assert!(log_contents.contains("warn message"));
        assert!(log_contents.contains("error message"));
    }

    #[test]
    fn test_log_levels_with_targets() {
        let make_writer = MockMakeWriter::default();

        let config = LogConfig {
            store_level: LogLevel::Debug,
            session_level: LogLevel::Error,
            qr_level: LogLevel::Trace,
            ..LogConfig::with_level(LogLevel::Info)
        };

        let subscriber =
            subscriber::builder(&config).with_writer(BoxMakeWriter::new(make_writer.clone()));

        let subscriber = set_format(&config, subscriber);

        let _default = set_default(&subscriber.into());

        // with store level 'debug', debug should be logged but not trace
        trace!(target: STORE, "trace/store");
        debug!(target: STORE, "debug/store");
        let log_contents = make_writer.get_string();
        assert!(!log_contents.contains("trace/store"));
        assert!(log_contents.contains("debug/store"));

        // with session level 'error', error should be logged but not warn
        warn!(target: SESSION, "warn/session");
        error!(target: SESSION, "error/session");
        let log_contents = make_writer.get_string();
        assert!(!log_contents.contains("warn/session"));
        assert!(log_contents.contains("error/session"));

        // with qr level 'trace', trace should be logged
        trace!(target: QR, "trace/qr");
        let log_contents = make_writer.get_string();
        assert!(log_contents.contains("trace/qr"));

        // with database level 'info', info should be logged but not debug
        debug!(target: DATABASE, "debug/database");
        info!(target: DATABASE, "info/database");
        let log_contents = make_writer.get_string();
        assert!(!log_contents.contains("debug/database"));
        assert!(log_contents.contains("info/database"));
    }

    #[test]
    fn test_log_format_structured() {
        let make_writer = MockMakeWriter::default();

        let mut config = LogConfig::with_level(LogLevel::Info);
        config.format = LogFormat::Structured;

        let subscriber =
            subscriber::builder(&config).with_writer(BoxMakeWriter::new(make_writer.clone()));

        let subscriber = set_format(&config, subscriber);

        let _default = set_default(&subscriber.into());

        info!(msg = "message", value = 42);

        let log_contents = make_writer.get_string();

        assert!(log_contents.contains(r#"fields":{"msg":"message","value":42}"#));
    }

    #[test]
    fn every_target_has_a_level() {
        let config = LogConfig {
            api_level: LogLevel::Trace,
            ..LogConfig::with_level(LogLevel::Warn)
        };

        assert_eq!(log_targets().len(), 7);
        assert_eq!(log_level_for(&config, API), LogLevel::Trace);
        assert_eq!(log_level_for(&config, CONFIG), LogLevel::Warn);
        assert_eq!(log_level_for(&config, "unregistered"), LogLevel::Warn);
    }
}
