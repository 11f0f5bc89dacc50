// Logging tests
//
// A global subscriber can only be installed once per process, so the second
// call must report an error instead of silently replacing the first.

use imgix_url::logging::{init_subscriber, LogFormat};

#[test]
fn test_subscriber_installs_once() {
    let first = init_subscriber(LogFormat::Json);
    let second = init_subscriber(LogFormat::Text);

    assert!(first.is_ok());
    assert!(second.is_err());

    tracing::info!(component = "logging_tests", "subscriber ready");
}
