use super::{NavigationError, NavigationHost, ScreenStack};
use crate::screen::ScreenDescriptor;
use crate::view::chrome::{ButtonRequest, ChromeController};
use tracing::{debug, info};

/// A screen stack bound to the chrome of its container.
pub struct Navigator {
    stack: ScreenStack,
    chrome: ChromeController,
}

impl Navigator {
    /// Places `root` and styles the chrome for it.
    ///
    /// Buttons are populated once the host's action menu exists, see
    /// [`Navigator::on_menu_created`].
    pub fn new(root: ScreenDescriptor, mut chrome: ChromeController) -> Navigator {
        chrome.apply_style(&root);
        chrome.hide_back_button();

        Navigator {
            stack: ScreenStack::with_root(root),
            chrome,
        }
    }

    pub fn id(&self) -> &str {
        self.stack.navigator_id()
    }

    pub fn stack(&self) -> &ScreenStack {
        &self.stack
    }

    pub fn chrome(&self) -> &ChromeController {
        &self.chrome
    }

    pub fn chrome_mut(&mut self) -> &mut ChromeController {
        &mut self.chrome
    }

    /// Pushes `screen` and reconciles the chrome from the previous top.
    pub fn push(&mut self, screen: ScreenDescriptor) -> ButtonRequest {
        let previous = self.stack.peek().cloned();
        info!(navigator = self.id(), screen = screen.id(), "push");

        self.stack.push(screen);
        let Navigator { stack, chrome } = self;
        let Some(top) = stack.peek() else {
            return ButtonRequest::Dropped;
        };

        chrome.apply_style(top);
        chrome.show_back_button(top);
        chrome.apply_buttons(previous.as_ref(), top)
    }

    /// Pops the top screen and reconciles the chrome from it to the new top.
    pub fn pop(&mut self) -> Result<(ScreenDescriptor, ButtonRequest), NavigationError> {
        let removed = self.stack.pop()?;
        info!(navigator = self.id(), screen = removed.id(), "pop");

        let Navigator { stack, chrome } = self;
        let top = stack.peek().ok_or(NavigationError::EmptyStack)?;

        chrome.apply_style(top);
        if stack.size() > 1 {
            chrome.show_back_button(top);
        } else {
            chrome.hide_back_button();
        }
        let request = chrome.apply_buttons(Some(&removed), top);

        Ok((removed, request))
    }

    /// Populates the buttons of the current screen from scratch.
    ///
    /// Hosts call this once their action menu exists, after attaching the
    /// chrome's [`HostLink`](crate::view::chrome::HostLink).
    pub fn on_menu_created(&mut self) -> ButtonRequest {
        let Navigator { stack, chrome } = self;
        match stack.peek() {
            Some(top) => chrome.update_and_set_buttons(top),
            None => {
                debug!(navigator = stack.navigator_id(), "menu created before any screen");
                ButtonRequest::Dropped
            }
        }
    }
}

impl NavigationHost for Navigator {
    fn push_screen(&mut self, screen: ScreenDescriptor) {
        self.push(screen);
    }

    fn pop_screen(&mut self) -> Result<ScreenDescriptor, NavigationError> {
        self.pop().map(|(removed, _)| removed)
    }

    fn current_screen(&self) -> Option<&ScreenDescriptor> {
        self.stack.peek()
    }

    fn stack_size(&self) -> usize {
        self.stack.size()
    }

    fn navigator_id(&self) -> &str {
        self.stack.navigator_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, BLACK, MATERIAL_GREY};
    use crate::icon::{IconError, IconRequest, Pixmap};
    use crate::screen::ButtonDescriptor;
    use crate::settings::ChromeSettings;
    use crate::view::chrome::{ChromeEvent, HostLink};
    use crate::view::top_bar::{BackButton, TopBar};
    use crate::view::Event;
    use std::sync::mpsc::{channel, Receiver};
    use std::sync::Arc;
    use std::time::Duration;

    const TEAL: Color = Color::from_rgb(0x00, 0x96, 0x88);

    fn solid_icons(request: &IconRequest<'_>) -> Result<Pixmap, IconError> {
        Ok(Pixmap::filled(request.size, request.size, BLACK))
    }

    fn navigator(root: ScreenDescriptor) -> (Navigator, Receiver<Event>) {
        let (hub, receiver) = channel();
        let chrome = ChromeController::new(
            TopBar::new(56, MATERIAL_GREY),
            &ChromeSettings::default(),
            Arc::new(solid_icons),
            Box::new(HostLink::attached()),
            hub,
        );
        (Navigator::new(root, chrome), receiver)
    }

    fn settle(navigator: &mut Navigator, receiver: &Receiver<Event>) {
        match receiver.recv_timeout(Duration::from_secs(5)) {
            Ok(Event::Chrome(ChromeEvent::ButtonsResolved(resolved))) => {
                navigator.chrome_mut().apply_resolution(resolved)
            }
            other => panic!("expected resolved buttons, got {:?}", other),
        }
    }

    fn action_titles(navigator: &Navigator) -> Vec<String> {
        navigator
            .chrome()
            .top_bar()
            .menu()
            .items()
            .iter()
            .map(|item| item.title().to_string())
            .collect()
    }

    fn root() -> ScreenDescriptor {
        ScreenDescriptor::builder("inbox", "main", "Inbox")
            .button(ButtonDescriptor::new("search", "Search").icon("search.png"))
            .build()
            .expect("valid screen")
    }

    fn detail() -> ScreenDescriptor {
        ScreenDescriptor::builder("message", "main", "Message")
            .tool_bar_color(TEAL)
            .buttons_tint_color(BLACK)
            .button(ButtonDescriptor::new("reply", "Reply"))
            .button(ButtonDescriptor::new("archive", "Archive"))
            .build()
            .expect("valid screen")
    }

    #[test]
    fn test_new_styles_root_without_buttons() {
        let (navigator, receiver) = navigator(root());

        assert_eq!(navigator.id(), "main");
        assert_eq!(navigator.chrome().top_bar().title(), "Inbox");
        assert_eq!(navigator.chrome().top_bar().back_button(), None);
        assert!(navigator.chrome().top_bar().menu().is_empty());
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_menu_created_populates_root_buttons() {
        let (mut navigator, receiver) = navigator(root());

        assert!(matches!(navigator.on_menu_created(), ButtonRequest::Spawned(_)));
        settle(&mut navigator, &receiver);

        assert_eq!(action_titles(&navigator), vec!["Search"]);
    }

    #[test]
    fn test_push_then_pop_round_trips_chrome() {
        let (mut navigator, receiver) = navigator(root());
        navigator.on_menu_created();
        settle(&mut navigator, &receiver);

        assert!(matches!(navigator.push(detail()), ButtonRequest::Spawned(_)));
        assert_eq!(navigator.chrome().top_bar().background(), TEAL);
        assert_eq!(
            navigator.chrome().top_bar().back_button(),
            Some(BackButton { tint: Some(BLACK) })
        );
        settle(&mut navigator, &receiver);
        assert_eq!(action_titles(&navigator), vec!["Reply", "Archive"]);

        let (removed, request) = navigator.pop().expect("pop detail");
        assert_eq!(removed.id(), "message");
        assert!(matches!(request, ButtonRequest::Spawned(_)));
        assert_eq!(navigator.chrome().top_bar().background(), MATERIAL_GREY);
        assert_eq!(navigator.chrome().top_bar().title(), "Inbox");
        assert_eq!(navigator.chrome().top_bar().back_button(), None);
        settle(&mut navigator, &receiver);
        assert_eq!(action_titles(&navigator), vec!["Search"]);
    }

    #[test]
    fn test_pop_root_leaves_chrome_alone() {
        let (mut navigator, receiver) = navigator(root());
        let before = navigator.chrome().top_bar().clone();

        assert_eq!(
            navigator.pop_screen(),
            Err(NavigationError::PopRoot {
                navigator_id: "main".to_string()
            })
        );
        assert_eq!(navigator.stack_size(), 1);
        assert_eq!(navigator.chrome().top_bar(), &before);
        assert!(!navigator.chrome().is_in_flight());
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_navigation_host_reports_current_screen() {
        let (mut navigator, _receiver) = navigator(root());

        navigator.push_screen(detail());

        assert_eq!(navigator.stack_size(), 2);
        assert_eq!(navigator.navigator_id(), "main");
        assert_eq!(navigator.current_screen().map(ScreenDescriptor::id), Some("message"));
    }
}
