//! Keeps the top bar consistent with the screen currently on top of the stack.
//!
//! Styling (background, title, title color, visibility) is applied
//! synchronously. Action buttons are reconciled asynchronously because their
//! icons have to be resolved first:
//!
//! ```text
//!  UI context                          worker thread
//!  ──────────                          ─────────────
//!  apply_buttons(old, new)
//!    ├─ latch in flight? ── yes ──▶ Dropped
//!    └─ no: latch = InFlight ───────▶ resolve icons (no chrome access)
//!                                         │
//!  Runtime receives ButtonsResolved ◀─────┘ hub.send(..)
//!    └─ apply_resolution
//!         ├─ host unavailable ─▶ release latch, stop
//!         ├─ remove old actions (all of them when `old` is None)
//!         ├─ insert new actions in order, icons tinted, disabled greyed
//!         ├─ tint overflow indicator
//!         └─ release latch
//! ```
//!
//! At most one resolution is in flight per controller. Requests made while one
//! is pending are dropped, not queued.

mod task;

pub use self::task::{ButtonRequest, ChromeToken, IconResolutionTask, ResolvedButtons, TaskId};

use self::task::{PendingTask, TaskState};
use super::top_bar::{BackButton, TopBar};
use super::Hub;
use crate::color::{Color, PRIMARY_TEXT_LIGHT};
use crate::icon::{Icon, IconResolver};
use crate::screen::{ButtonDescriptor, ScreenDescriptor};
use crate::settings::ChromeSettings;
use crate::view::menu::ShowAsAction;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Completion events of background chrome work.
#[derive(Debug)]
pub enum ChromeEvent {
    ButtonsResolved(ResolvedButtons),
}

/// Answers whether the chrome's host can currently take menu mutations.
///
/// Hosts report `false` before their action menu exists and after teardown.
pub trait ChromeHost {
    fn is_available(&self) -> bool;
}

/// Shared availability flag, flipped by the host as its menu comes and goes.
#[derive(Debug, Clone, Default)]
pub struct HostLink(Arc<AtomicBool>);

impl HostLink {
    /// A link whose host is not available yet.
    pub fn detached() -> Self {
        HostLink::default()
    }

    pub fn attached() -> Self {
        let link = HostLink::default();
        link.attach();
        link
    }

    pub fn attach(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn detach(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChromeHost for HostLink {
    fn is_available(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct ChromeController {
    top_bar: TopBar,
    original_background: Color,
    icon_scale: f32,
    resolver: Arc<dyn IconResolver>,
    host: Box<dyn ChromeHost>,
    hub: Hub,
    token: Arc<ChromeToken>,
    state: TaskState,
    current_tint: Option<Color>,
    last_applied: Vec<ButtonDescriptor>,
}

impl ChromeController {
    /// Creates a controller for `top_bar`.
    ///
    /// The bar's background at this point becomes the default every unstyled
    /// screen resets to.
    pub fn new(
        top_bar: TopBar,
        settings: &ChromeSettings,
        resolver: Arc<dyn IconResolver>,
        host: Box<dyn ChromeHost>,
        hub: Hub,
    ) -> ChromeController {
        ChromeController {
            original_background: top_bar.background(),
            top_bar,
            icon_scale: settings.icon_scale,
            resolver,
            host,
            hub,
            token: ChromeToken::new(),
            state: TaskState::Idle,
            current_tint: None,
            last_applied: Vec::new(),
        }
    }

    pub fn top_bar(&self) -> &TopBar {
        &self.top_bar
    }

    /// Host-side layout access, e.g. to report the bar's measured height.
    pub fn top_bar_mut(&mut self) -> &mut TopBar {
        &mut self.top_bar
    }

    pub fn original_background(&self) -> Color {
        self.original_background
    }

    pub fn current_tint(&self) -> Option<Color> {
        self.current_tint
    }

    pub fn last_applied_buttons(&self) -> &[ButtonDescriptor] {
        &self.last_applied
    }

    /// Whether `token` is this controller's liveness token.
    pub fn is_owned_by(&self, token: &Arc<ChromeToken>) -> bool {
        Arc::ptr_eq(&self.token, token)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, TaskState::InFlight(_))
    }

    pub fn pending_task(&self) -> Option<TaskId> {
        match &self.state {
            TaskState::InFlight(pending) => Some(pending.id),
            TaskState::Idle => None,
        }
    }

    /// Target edge length of button icons, derived from the bar's height.
    pub fn icon_target_size(&self) -> u32 {
        (self.top_bar.height() as f32 * self.icon_scale) as u32
    }

    /// Applies the screen's title and styling to the bar.
    ///
    /// Unset colors reset to the construction-time defaults, never to the
    /// previous screen's values, so the result only depends on `screen`.
    pub fn apply_style(&mut self, screen: &ScreenDescriptor) {
        match screen.tool_bar_color() {
            Some(color) => self.top_bar.set_background(color),
            None => self.top_bar.set_background(self.original_background),
        }

        self.top_bar
            .set_title_text_color(screen.title_color().unwrap_or(PRIMARY_TEXT_LIGHT));

        if screen.tool_bar_hidden() == Some(true) {
            self.top_bar.hide();
        } else {
            self.top_bar.show();
        }

        self.top_bar.set_title(screen.title());
    }

    /// Restyles the bar for `screen` and populates its buttons from scratch.
    pub fn update_and_set_buttons(&mut self, screen: &ScreenDescriptor) -> ButtonRequest {
        self.apply_style(screen);
        self.apply_buttons(None, screen)
    }

    pub fn show_back_button(&mut self, screen: &ScreenDescriptor) {
        self.top_bar.set_back_button(Some(BackButton {
            tint: screen.buttons_tint_color(),
        }));
    }

    pub fn hide_back_button(&mut self) {
        self.top_bar.set_back_button(None);
    }

    /// Starts reconciling the bar's actions from `old` to `new`.
    ///
    /// Returns immediately. If a resolution is already in flight the request
    /// is dropped; otherwise a task is spawned and its result is applied when
    /// the runtime delivers it to [`ChromeController::apply_resolution`].
    pub fn apply_buttons(
        &mut self,
        old: Option<&ScreenDescriptor>,
        new: &ScreenDescriptor,
    ) -> ButtonRequest {
        if let TaskState::InFlight(pending) = &self.state {
            debug!(
                task = %pending.id,
                screen = new.id(),
                "button update already in flight, dropping request"
            );
            return ButtonRequest::Dropped;
        }

        let task = IconResolutionTask::new(
            Arc::downgrade(&self.token),
            old.map(|screen| screen.buttons().to_vec()),
            new.buttons().to_vec(),
            new.buttons_tint_color(),
            self.icon_target_size(),
        );
        let id = task.id();

        match task.spawn(Arc::clone(&self.resolver), self.hub.clone()) {
            Ok(handle) => {
                debug!(task = %id, screen = new.id(), "spawned icon resolution");
                self.state = TaskState::InFlight(PendingTask {
                    id,
                    _handle: handle,
                });
                ButtonRequest::Spawned(id)
            }
            Err(e) => {
                error!(task = %id, error = %e, "can't spawn icon resolution worker");
                self.state = TaskState::Idle;
                ButtonRequest::Dropped
            }
        }
    }

    /// Apply phase of a button update; must run on the UI context.
    pub fn apply_resolution(&mut self, resolved: ResolvedButtons) {
        match self.pending_task() {
            Some(id) if id == resolved.task => {}
            pending => {
                warn!(task = %resolved.task, ?pending, "ignoring resolution of a task this chrome isn't waiting for");
                return;
            }
        }

        if !self.host.is_available() {
            debug!(task = %resolved.task, "chrome host unavailable, abandoning button update");
            self.state = TaskState::Idle;
            return;
        }

        let ResolvedButtons {
            old_buttons,
            new_buttons,
            tint,
            mut icons,
            ..
        } = resolved;

        let menu = self.top_bar.menu_mut();

        match &old_buttons {
            None => menu.clear(),
            Some(buttons) => {
                for button in buttons {
                    menu.remove_item(button.item_id());
                }
            }
        }

        for (order, button) in new_buttons.iter().enumerate() {
            let item = menu.add(button.item_id(), order, button.title.as_str());
            item.set_show_as_action(ShowAsAction::IfRoom);

            if let Some(pixmap) = icons.remove(&button.id) {
                let mut icon = Icon::new(pixmap);
                if let Some(tint) = tint {
                    icon.set_tint(tint);
                }
                item.set_icon(icon);
            }

            if button.disabled {
                item.set_enabled(false);
            }
        }

        if let Some(tint) = tint {
            self.top_bar.set_overflow_tint(tint);
        }

        debug!(
            task = %resolved.task,
            actions = self.top_bar.menu().len(),
            "applied button update"
        );

        self.current_tint = tint;
        self.last_applied = new_buttons;
        self.state = TaskState::Idle;
    }
}
