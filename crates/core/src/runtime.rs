//! The UI-owning execution context.
//!
//! The [`Runtime`] holds every navigator and the receiving end of the hub.
//! Navigation commands and the results of background icon resolution are all
//! processed here, one event at a time, which is what serializes every chrome
//! mutation.

use crate::icon::IconResolver;
use crate::screen::ScreenDescriptor;
use crate::settings::ChromeSettings;
use crate::view::chrome::{ButtonRequest, ChromeController, ChromeEvent, ChromeHost, ResolvedButtons};
use crate::view::navigation::{NavigationError, Navigator};
use crate::view::top_bar::TopBar;
use crate::view::{Event, Hub};
use indexmap::IndexMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info_span};

/// Navigation request addressed to a navigator by id.
#[derive(Debug, Clone)]
pub enum Command {
    Push {
        navigator_id: String,
        screen: ScreenDescriptor,
    },
    Pop {
        navigator_id: String,
    },
    /// The navigator's host has created its action menu.
    MenuCreated {
        navigator_id: String,
    },
}

impl Command {
    pub fn navigator_id(&self) -> &str {
        match self {
            Command::Push { navigator_id, .. }
            | Command::Pop { navigator_id }
            | Command::MenuCreated { navigator_id } => navigator_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Pushed(ButtonRequest),
    Popped(ScreenDescriptor, ButtonRequest),
    MenuCreated(ButtonRequest),
}

pub struct Runtime {
    navigators: IndexMap<String, Navigator>,
    hub: Hub,
    receiver: Receiver<Event>,
    // Resolutions whose chrome is alive but not registered, waiting for it to come back.
    parked: Vec<ResolvedButtons>,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new()
    }
}

impl Runtime {
    pub fn new() -> Runtime {
        let (hub, receiver) = mpsc::channel();
        Runtime {
            navigators: IndexMap::new(),
            hub,
            receiver,
            parked: Vec::new(),
        }
    }

    /// Sending half of the event channel, for other threads.
    pub fn hub(&self) -> Hub {
        self.hub.clone()
    }

    /// Builds a chrome controller that reports to this runtime.
    pub fn chrome(
        &self,
        top_bar: TopBar,
        settings: &ChromeSettings,
        resolver: Arc<dyn IconResolver>,
        host: Box<dyn ChromeHost>,
    ) -> ChromeController {
        ChromeController::new(top_bar, settings, resolver, host, self.hub())
    }

    /// Registers a navigator.
    ///
    /// A navigator coming back after [`Runtime::remove_navigator`] first
    /// receives the resolution it missed while detached, which releases its
    /// single-flight latch.
    pub fn add_navigator(&mut self, mut navigator: Navigator) -> Result<&mut Navigator, NavigationError> {
        let id = navigator.id().to_string();
        if self.navigators.contains_key(&id) {
            return Err(NavigationError::DuplicateNavigator(id));
        }

        self.parked.retain(|resolved| resolved.owner.strong_count() > 0);
        let (missed, parked): (Vec<_>, Vec<_>) = self.parked.drain(..).partition(|resolved| {
            resolved
                .owner
                .upgrade()
                .is_some_and(|owner| navigator.chrome().is_owned_by(&owner))
        });
        self.parked = parked;

        for resolved in missed {
            debug!(navigator = %id, task = %resolved.task, "delivering resolution missed while detached");
            navigator.chrome_mut().apply_resolution(resolved);
        }

        debug!(navigator = %id, "navigator added");
        Ok(self.navigators.entry(id).or_insert(navigator))
    }

    /// Tears a navigator down.
    ///
    /// Resolutions still in flight for it are discarded on arrival once the
    /// navigator is dropped, or kept for it until it is added back.
    pub fn remove_navigator(&mut self, navigator_id: &str) -> Option<Navigator> {
        let navigator = self.navigators.shift_remove(navigator_id);
        if navigator.is_some() {
            debug!(navigator = navigator_id, "navigator removed");
        }
        navigator
    }

    pub fn navigator(&self, navigator_id: &str) -> Option<&Navigator> {
        self.navigators.get(navigator_id)
    }

    pub fn navigator_mut(&mut self, navigator_id: &str) -> Option<&mut Navigator> {
        self.navigators.get_mut(navigator_id)
    }

    /// Navigator ids in registration order.
    pub fn navigator_ids(&self) -> impl Iterator<Item = &str> {
        self.navigators.keys().map(String::as_str)
    }

    /// Routes `command` to its navigator.
    pub fn dispatch(&mut self, command: Command) -> Result<CommandOutcome, NavigationError> {
        let _span = info_span!("dispatch", navigator = command.navigator_id()).entered();
        let navigator = self
            .navigators
            .get_mut(command.navigator_id())
            .ok_or_else(|| NavigationError::UnknownNavigator(command.navigator_id().to_string()))?;

        match command {
            Command::Push { screen, .. } => Ok(CommandOutcome::Pushed(navigator.push(screen))),
            Command::Pop { .. } => navigator
                .pop()
                .map(|(removed, request)| CommandOutcome::Popped(removed, request)),
            Command::MenuCreated { .. } => Ok(CommandOutcome::MenuCreated(navigator.on_menu_created())),
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Command(command) => {
                if let Err(e) = self.dispatch(command) {
                    error!(error = %e, "navigation command failed");
                }
            }
            Event::Chrome(ChromeEvent::ButtonsResolved(resolved)) => self.apply_resolution(resolved),
        }
    }

    fn apply_resolution(&mut self, resolved: ResolvedButtons) {
        let Some(owner) = resolved.owner.upgrade() else {
            debug!(task = %resolved.task, "chrome torn down, discarding resolved buttons");
            return;
        };

        match self
            .navigators
            .values_mut()
            .find(|navigator| navigator.chrome().is_owned_by(&owner))
        {
            Some(navigator) => navigator.chrome_mut().apply_resolution(resolved),
            None => {
                debug!(
                    task = %resolved.task,
                    token = owner.id(),
                    "chrome detached from the runtime, parking resolved buttons"
                );
                self.parked.push(resolved);
            }
        }
    }

    /// Handles every event already queued, without blocking.
    pub fn process_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.handle_event(event);
            count += 1;
        }
        count
    }

    /// Waits up to `timeout` for one event and handles it.
    ///
    /// Returns `false` on timeout.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(event);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            // The runtime holds a sender itself, so the channel can't disconnect.
            Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}
