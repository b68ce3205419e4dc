use super::NavigationError;
use crate::screen::ScreenDescriptor;

/// Ordered screens of one navigator, the last one being visible.
///
/// The stack doesn't touch the chrome. Callers reconcile it after each
/// mutation, see [`Navigator`](super::Navigator).
#[derive(Debug, Clone)]
pub struct ScreenStack {
    navigator_id: String,
    screens: Vec<ScreenDescriptor>,
}

impl ScreenStack {
    /// An unpopulated stack, as found before the container places its root.
    pub fn new(navigator_id: impl Into<String>) -> ScreenStack {
        ScreenStack {
            navigator_id: navigator_id.into(),
            screens: Vec::new(),
        }
    }

    pub fn with_root(root: ScreenDescriptor) -> ScreenStack {
        ScreenStack {
            navigator_id: root.navigator_id().to_string(),
            screens: vec![root],
        }
    }

    pub fn navigator_id(&self) -> &str {
        &self.navigator_id
    }

    pub fn push(&mut self, screen: ScreenDescriptor) {
        self.screens.push(screen);
    }

    /// Removes and returns the top screen.
    ///
    /// The root is the container's permanent base: popping it is rejected and
    /// the stack is left as it was.
    pub fn pop(&mut self) -> Result<ScreenDescriptor, NavigationError> {
        match self.screens.len() {
            0 => Err(NavigationError::EmptyStack),
            1 => Err(NavigationError::PopRoot {
                navigator_id: self.navigator_id.clone(),
            }),
            _ => self.screens.pop().ok_or(NavigationError::EmptyStack),
        }
    }

    pub fn peek(&self) -> Option<&ScreenDescriptor> {
        self.screens.last()
    }

    pub fn size(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}
