//! Navigation-state core for a mobile UI-composition layer.
//!
//! A navigator pairs an ordered stack of screens with a single top bar (the
//! "chrome"). Every push or pop restyles the chrome synchronously and then
//! reconciles its action buttons asynchronously: icons are resolved on a
//! worker thread and the result is applied back on the UI context.
//!
//! The crate is organised as:
//! - [`screen`]: immutable screen and button descriptors
//! - [`icon`]: icon references, the resolution backend trait and pixmaps
//! - [`view`]: the hub, the top bar widget, its menu, the chrome controller
//!   and the navigation stack
//! - [`runtime`]: the UI-owning execution context that routes commands
//! - [`settings`] and [`logging`]: configuration and structured logs

#[macro_use]
extern crate lazy_static;

pub mod color;
pub mod icon;
pub mod logging;
pub mod runtime;
pub mod screen;
pub mod settings;
pub mod view;

pub use crate::runtime::{Command, CommandOutcome, Runtime};
pub use crate::screen::{ButtonDescriptor, ScreenDescriptor};
pub use crate::view::navigation::{NavigationError, NavigationHost, Navigator};
