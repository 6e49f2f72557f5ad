//! Deferred cleanup run when a cursor closes.

/// Single-slot holder for a cleanup action that runs at most once.
///
/// Setting a new action replaces the previous one. [`run`](Self::run) takes
/// the action out of the slot before calling it.
#[derive(Default)]
pub struct Teardown<'a> {
    action: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> Teardown<'a> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self { action: None }
    }

    /// Store `action`, dropping any action stored before.
    pub fn set<F: FnOnce() + 'a>(&mut self, action: F) {
        self.action = Some(Box::new(action));
    }

    /// Run and clear the stored action. Returns false if the slot was empty.
    pub fn run(&mut self) -> bool {
        match self.action.take() {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }

    /// Check if an action is stored.
    pub fn is_set(&self) -> bool {
        self.action.is_some()
    }
}

impl std::fmt::Debug for Teardown<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("is_set", &self.is_set())
            .finish()
    }
}
