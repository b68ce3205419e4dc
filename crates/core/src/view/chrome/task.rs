//! Background resolution of button icons.
//!
//! An [`IconResolutionTask`] is split in two phases:
//!
//! 1. **Resolution** runs on a worker thread. It only reads its own inputs and
//!    the [`IconResolver`], and produces a map from button id to pixmap.
//! 2. **Apply** runs on the UI context, in
//!    [`ChromeController::apply_resolution`](super::ChromeController::apply_resolution),
//!    once the runtime receives the [`ResolvedButtons`] handoff.
//!
//! The task never holds the controller itself. It carries a [`Weak`] reference
//! to the controller's [`ChromeToken`]; if the controller is gone by the time
//! the result arrives, the upgrade fails and the result is dropped.

use super::ChromeEvent;
use crate::color::Color;
use crate::icon::{IconRequest, IconResolver, Pixmap};
use crate::screen::ButtonDescriptor;
use crate::view::{Event, Hub, Id, ID_FEEDER};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use tracing::{debug, debug_span, warn};

const WORKER_NAME: &str = "icon-resolver";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Id);

impl TaskId {
    fn next() -> TaskId {
        TaskId(ID_FEEDER.next())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Liveness marker owned by a chrome controller.
#[derive(Debug)]
pub struct ChromeToken {
    id: Id,
}

impl ChromeToken {
    pub(crate) fn new() -> Arc<ChromeToken> {
        Arc::new(ChromeToken {
            id: ID_FEEDER.next(),
        })
    }

    pub fn id(&self) -> Id {
        self.id
    }
}

/// Outcome of a button update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRequest {
    /// A resolution task was started.
    Spawned(TaskId),
    /// Another task was already in flight; the request was discarded.
    Dropped,
}

#[derive(Debug)]
pub(crate) struct PendingTask {
    pub(crate) id: TaskId,
    // Dropping the handle detaches the worker, which has already posted its result.
    pub(crate) _handle: JoinHandle<()>,
}

/// Single-flight latch of a chrome controller.
#[derive(Debug, Default)]
pub(crate) enum TaskState {
    #[default]
    Idle,
    InFlight(PendingTask),
}

/// Immutable handoff from the resolution phase to the apply phase.
#[derive(Debug)]
pub struct ResolvedButtons {
    pub task: TaskId,
    pub owner: Weak<ChromeToken>,
    pub old_buttons: Option<Vec<ButtonDescriptor>>,
    pub new_buttons: Vec<ButtonDescriptor>,
    pub tint: Option<Color>,
    pub icons: HashMap<String, Pixmap>,
}

#[derive(Debug)]
pub struct IconResolutionTask {
    id: TaskId,
    owner: Weak<ChromeToken>,
    old_buttons: Option<Vec<ButtonDescriptor>>,
    new_buttons: Vec<ButtonDescriptor>,
    tint: Option<Color>,
    icon_size: u32,
}

impl IconResolutionTask {
    pub fn new(
        owner: Weak<ChromeToken>,
        old_buttons: Option<Vec<ButtonDescriptor>>,
        new_buttons: Vec<ButtonDescriptor>,
        tint: Option<Color>,
        icon_size: u32,
    ) -> Self {
        IconResolutionTask {
            id: TaskId::next(),
            owner,
            old_buttons,
            new_buttons,
            tint,
            icon_size,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn icon_size(&self) -> u32 {
        self.icon_size
    }

    /// Resolves every declared icon of the new buttons.
    ///
    /// Each icon succeeds or is left out on its own; a failing or panicking
    /// backend call never prevents the remaining icons from resolving.
    pub fn resolve(&self, resolver: &dyn IconResolver) -> HashMap<String, Pixmap> {
        let mut icons = HashMap::new();

        for button in &self.new_buttons {
            let Some(icon) = button.icon.as_ref() else {
                continue;
            };

            let request = IconRequest {
                icon,
                size: self.icon_size,
                tint: self.tint,
            };

            match panic::catch_unwind(AssertUnwindSafe(|| resolver.resolve(&request))) {
                Ok(Ok(pixmap)) => {
                    icons.insert(button.id.clone(), pixmap);
                }
                Ok(Err(e)) => {
                    warn!(task = %self.id, button = %button.id, icon = %icon, error = %e, "icon resolution failed");
                }
                Err(_) => {
                    warn!(task = %self.id, button = %button.id, icon = %icon, "icon resolver panicked");
                }
            }
        }

        icons
    }

    /// Completes the resolution phase and produces the apply-phase handoff.
    pub fn run(self, resolver: &dyn IconResolver) -> ResolvedButtons {
        let icons = self.resolve(resolver);

        ResolvedButtons {
            task: self.id,
            owner: self.owner,
            old_buttons: self.old_buttons,
            new_buttons: self.new_buttons,
            tint: self.tint,
            icons,
        }
    }

    /// Runs the resolution phase on a worker thread and posts the result to the hub.
    pub fn spawn(self, resolver: Arc<dyn IconResolver>, hub: Hub) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                let id = self.id;
                let _span = debug_span!("icon_resolution", task = %id).entered();
                let resolved = self.run(resolver.as_ref());
                debug!(task = %id, icons = resolved.icons.len(), "icon resolution finished");

                if hub
                    .send(Event::Chrome(ChromeEvent::ButtonsResolved(resolved)))
                    .is_err()
                {
                    debug!(task = %id, "runtime gone, discarding resolved icons");
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;
    use crate::icon::IconError;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    fn buttons() -> Vec<ButtonDescriptor> {
        vec![
            ButtonDescriptor::new("plain", "Plain"),
            ButtonDescriptor::new("broken", "Broken").icon("broken.png"),
            ButtonDescriptor::new("panics", "Panics").icon("panic.png"),
            ButtonDescriptor::new("good", "Good").icon("good.png"),
        ]
    }

    fn resolver(request: &IconRequest<'_>) -> Result<Pixmap, IconError> {
        match request.icon.as_str() {
            "good.png" => Ok(Pixmap::filled(request.size, request.size, BLACK)),
            "panic.png" => panic!("backend exploded"),
            other => Err(IconError::Unavailable(other.to_string())),
        }
    }

    #[test]
    fn test_resolve_skips_failures_and_buttons_without_icons() {
        let token = ChromeToken::new();
        let task = IconResolutionTask::new(Arc::downgrade(&token), None, buttons(), None, 8);

        let icons = task.resolve(&resolver);

        assert_eq!(icons.len(), 1);
        assert_eq!(icons.get("good").map(|p| p.width), Some(8));
    }

    #[test]
    fn test_run_carries_inputs_into_handoff() {
        let token = ChromeToken::new();
        let old = vec![ButtonDescriptor::new("old", "Old")];
        let task = IconResolutionTask::new(
            Arc::downgrade(&token),
            Some(old.clone()),
            buttons(),
            Some(BLACK),
            4,
        );
        let id = task.id();

        let resolved = task.run(&resolver);

        assert_eq!(resolved.task, id);
        assert_eq!(resolved.old_buttons, Some(old));
        assert_eq!(resolved.new_buttons.len(), 4);
        assert_eq!(resolved.tint, Some(BLACK));
        assert!(resolved.owner.upgrade().is_some());
    }

    #[test]
    fn test_spawn_posts_result_to_hub() {
        let token = ChromeToken::new();
        let (hub, receiver) = channel();
        let task = IconResolutionTask::new(Arc::downgrade(&token), None, buttons(), None, 2);
        let id = task.id();

        let handle = task.spawn(Arc::new(resolver), hub);
        assert!(handle.is_ok());

        match receiver.recv_timeout(Duration::from_secs(5)) {
            Ok(Event::Chrome(ChromeEvent::ButtonsResolved(resolved))) => {
                assert_eq!(resolved.task, id);
                assert!(resolved.icons.contains_key("good"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_owner_reference_does_not_keep_token_alive() {
        let token = ChromeToken::new();
        let task = IconResolutionTask::new(Arc::downgrade(&token), None, Vec::new(), None, 2);
        drop(token);

        let resolved = task.run(&resolver);
        assert!(resolved.owner.upgrade().is_none());
    }
}
