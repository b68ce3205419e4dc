//! Views owned by the UI context and the events that drive them.
//!
//! All mutation of the chrome and the screen stacks happens on the thread
//! that owns the [`Runtime`](crate::runtime::Runtime). Other threads talk to
//! it through the [`Hub`], the sending half of the runtime's event channel.
//!
//! ```
//! use navstack_core::runtime::Command;
//! use navstack_core::view::Event;
//!
//! let (hub, receiver) = std::sync::mpsc::channel();
//! hub.send(Event::Command(Command::Pop { navigator_id: "main".to_string() })).ok();
//! assert!(receiver.try_recv().is_ok());
//! ```

pub mod chrome;
pub mod menu;
pub mod navigation;
pub mod top_bar;

use crate::runtime::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

pub use self::chrome::ChromeEvent;

pub type Id = u64;
pub type Hub = Sender<Event>;

/// Hands out process-unique view and task identifiers.
pub struct IdFeeder(AtomicU64);

impl IdFeeder {
    pub const fn new(initial: Id) -> Self {
        IdFeeder(AtomicU64::new(initial))
    }

    pub fn next(&self) -> Id {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

pub static ID_FEEDER: IdFeeder = IdFeeder::new(1);

/// Events processed on the UI context.
#[derive(Debug)]
pub enum Event {
    /// A navigation request from the embedding application.
    Command(Command),
    /// Completion of background chrome work.
    Chrome(ChromeEvent),
}
