//! Content-script side of Draft AI: finds the webmail toolbar, mounts the
//! "AI Reply" control and runs the reply lifecycle behind it.

pub mod control;
pub mod dom;
pub mod geometry;
#[cfg(any(test, not(target_arch = "wasm32")))]
pub mod memory;
pub mod menu;
pub mod page;
pub mod poll;
pub mod reply;
pub mod script;
pub mod selectors;

#[cfg(target_arch = "wasm32")]
mod web;

pub use control::{BusyGuard, ControlHandle, ControlId, ControlView, ReplyControl};
pub use dom::{ControlElements, DomError, HostDocument};
#[cfg(any(test, not(target_arch = "wasm32")))]
pub use memory::MemoryDocument;
pub use page::Delivery;
pub use reply::{run_reply, Notice, Notifier, ReplyError};
pub use script::{ContentScript, TickOutcome};
