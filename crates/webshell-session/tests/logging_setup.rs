//! Native subscriber installation. Kept in its own test binary because the
//! global subscriber can be set only once per process.

use webshell_core::logging::{LogFormat, init_subscriber};

#[test]
fn json_subscriber_installs_once() {
    assert!(init_subscriber(Some("webshell_session=debug"), LogFormat::Json));
    assert!(!init_subscriber(None, LogFormat::Text));

    #[cfg(feature = "tracing-json")]
    {
        let config = webshell_session::ShellConfig::default().with_log_filter("warn");
        assert!(!config.init_logging(LogFormat::Json));
    }

    tracing::info!(target: "webshell_session", "subscriber live");
}
