//! The option model: what can be chosen, decoupled from how it is stored.
//!
//! Items do not carry callbacks. Each one holds a plain command value with
//! the record identity captured at menu-build time; a [`Dispatcher`]
//! evaluates commands against the store when the user commits. A running
//! menu therefore works on a snapshot — store mutations made elsewhere
//! between build and keypress are not observed.

/// A renderable, selectable, optionally deletable menu entry.
#[derive(Debug, Clone)]
pub struct MenuItem<C> {
    pub name: String,
    pub description: Option<String>,
    pub action: ItemAction<C>,
    /// Command to run when the user deletes this entry. Absent means
    /// delete keypresses on it are no-ops.
    pub delete: Option<C>,
}

#[derive(Debug, Clone)]
pub enum ItemAction<C> {
    /// Evaluate a command; its output ends the whole menu run.
    Command(C),
    /// Open a nested screen.
    Screen(Frame<C>),
}

/// One screen of options with its header description.
#[derive(Debug, Clone)]
pub struct Frame<C> {
    pub description: String,
    pub items: Vec<MenuItem<C>>,
}

impl<C> Frame<C> {
    pub fn new(description: impl Into<String>, items: Vec<MenuItem<C>>) -> Self {
        Self {
            description: description.into(),
            items,
        }
    }
}

impl<C> MenuItem<C> {
    pub fn command(name: impl Into<String>, description: Option<String>, command: C) -> Self {
        Self {
            name: name.into(),
            description,
            action: ItemAction::Command(command),
            delete: None,
        }
    }

    /// An option that pushes a nested screen when selected.
    pub fn screen(name: impl Into<String>, frame: Frame<C>) -> Self {
        Self {
            name: name.into(),
            description: None,
            action: ItemAction::Screen(frame),
            delete: None,
        }
    }

    pub fn with_delete(mut self, command: C) -> Self {
        self.delete = Some(command);
        self
    }
}

/// Evaluates the commands captured in menu items.
pub trait Dispatcher {
    type Command;
    type Output;

    fn dispatch(&mut self, command: Self::Command) -> crate::store::Result<Self::Output>;
}
