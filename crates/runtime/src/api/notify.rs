//! Outbound messaging abstraction.
//!
//! The game never depends on anything a notification returns; delivery is
//! fire and forget. Implementations map [`Severity`] onto whatever their
//! transport offers (colors, log levels, nothing at all).
use async_trait::async_trait;

use game_core::PlayerId;

/// Who a notification is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Audience {
    /// Every participant. Never carries secret information.
    Everyone,
    /// One player's private channel. Role briefings go only here.
    Player(PlayerId),
}

/// Tone of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warn,
    Error,
    Success,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }
}

/// Sink for game announcements and private messages.
///
/// Implementations should return promptly; the session awaits delivery
/// in-line between phases.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, audience: Audience, text: &str, severity: Severity);
}

/// Discards every notification. Useful for tests and headless runs.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _audience: Audience, _text: &str, _severity: Severity) {}
}
