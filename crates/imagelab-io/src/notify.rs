//! Blocking user notifications.

/// Show `message` in a modal `window.alert`.
///
/// Falls back to a log line when no window is available.
pub fn alert(message: &str) {
    let shown = web_sys::window().is_some_and(|w| w.alert_with_message(message).is_ok());
    if !shown {
        tracing::error!("{message}");
    }
}
