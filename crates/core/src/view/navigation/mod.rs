//! Per-navigator screen stacks and the operations exposed to hosts.
//!
//! A [`Navigator`] pairs a [`ScreenStack`] with the
//! [`ChromeController`](crate::view::chrome::ChromeController) of the bar it
//! drives. Every stack change restyles the bar and asks for the new screen's
//! buttons.

mod navigator;
mod screen_stack;

pub use self::navigator::Navigator;
pub use self::screen_stack::ScreenStack;

use crate::screen::ScreenDescriptor;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("can't pop the root screen of navigator {navigator_id}")]
    PopRoot { navigator_id: String },
    #[error("screen stack is empty")]
    EmptyStack,
    #[error("unknown navigator: {0}")]
    UnknownNavigator(String),
    #[error("navigator {0} is already registered")]
    DuplicateNavigator(String),
}

/// Navigation surface of a host owning a screen stack.
pub trait NavigationHost {
    fn push_screen(&mut self, screen: ScreenDescriptor);

    /// Removes the top screen and returns it.
    ///
    /// Fails without touching the stack when the root is the only screen left.
    fn pop_screen(&mut self) -> Result<ScreenDescriptor, NavigationError>;

    fn current_screen(&self) -> Option<&ScreenDescriptor>;

    fn stack_size(&self) -> usize;

    fn navigator_id(&self) -> &str;
}
