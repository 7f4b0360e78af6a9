//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the session can stay focused on orchestration.

pub mod errors;
pub mod events;
pub mod input;
pub mod notify;

pub use errors::{GameError, RegistryError, Result};
pub use events::GameEvent;
pub use input::{InputError, InputSource};
pub use notify::{Audience, Notifier, NullNotifier, Severity};
