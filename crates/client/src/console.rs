//! Console transcript output.
use async_trait::async_trait;

use runtime::{Audience, Notifier, Severity};

/// Prints every notification to stdout, tagged with severity and audience.
///
/// Private traffic is printed too. This is a spectator transcript for
/// self-play runs, not a transport that keeps secrets.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, audience: Audience, text: &str, severity: Severity) {
        match audience {
            Audience::Everyone => println!("[{}] {text}", severity.as_str()),
            Audience::Player(player) => {
                println!("[{}] (to {player}) {text}", severity.as_str());
            }
        }
    }
}
