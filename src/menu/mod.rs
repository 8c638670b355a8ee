//! Interactive full-screen menu: a vertically scrolling highlighted list
//! driven by arrow keys, with in-place deletion and nested screens.
//!
//! Screens are an explicit frame stack inside a single engine run. One
//! terminal acquisition covers the whole run: selecting a screen option
//! pushes a frame, a frame's synthetic Exit pops back to its parent, and
//! the root Exit ends the run. The raw-terminal session is a guard value,
//! so the terminal is restored on every exit path, including panics.

mod item;

pub use item::{Dispatcher, Frame, ItemAction, MenuItem};

use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Print, Stylize},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::error::KeyrackError;
use crate::store::Result;

const EXIT_LABEL: &str = "Exit";
const EXIT_DESCRIPTION: &str = "Return to the terminal";

#[derive(Debug)]
pub struct Menu<C> {
    root: Frame<C>,
}

impl<C: Clone> Menu<C> {
    /// A menu over the given options. An empty option list is a caller
    /// error — callers message the user instead of showing a blank screen.
    pub fn new(items: Vec<MenuItem<C>>, description: impl Into<String>) -> Result<Self> {
        if items.is_empty() {
            return Err(KeyrackError::EmptyMenu);
        }
        Ok(Self {
            root: Frame::new(description, items),
        })
    }

    /// Run until the user commits a command, exits, or deletes the last
    /// real option. The terminal is released before the committed command
    /// is evaluated, and its output becomes the run's result.
    pub fn run<D>(self, dispatcher: &mut D) -> Result<Option<D::Output>>
    where
        D: Dispatcher<Command = C>,
    {
        let mut screens = ScreenStack::new(self.root);
        let selected = {
            let mut session = TerminalSession::acquire()?;
            event_loop(&mut session, &mut screens, dispatcher)?
        };
        match selected {
            Some(command) => dispatcher.dispatch(command).map(Some),
            None => Ok(None),
        }
    }
}

fn event_loop<C, D>(
    session: &mut TerminalSession,
    screens: &mut ScreenStack<C>,
    dispatcher: &mut D,
) -> Result<Option<C>>
where
    C: Clone,
    D: Dispatcher<Command = C>,
{
    loop {
        session.render(&screens.view())?;
        match next_key()? {
            Key::Up => screens.move_up(),
            Key::Down => screens.move_down(),
            Key::Delete => {
                if let Some(command) = screens.delete_command() {
                    dispatcher.dispatch(command)?;
                    if screens.remove_selected() == Removal::Closed {
                        return Ok(None);
                    }
                }
            }
            Key::Enter => match screens.select()? {
                Selection::Redraw => {}
                Selection::Closed => return Ok(None),
                Selection::Command(command) => return Ok(Some(command)),
            },
            Key::Cancel => return Ok(None),
            Key::Other => {}
        }
    }
}

// --- screen state -----------------------------------------------------

/// Cursor position within one pushed frame, addressed by the item-index
/// path from the root.
struct Level {
    path: Vec<usize>,
    cursor: usize,
}

/// The frame stack. Invariant: at least one level while the engine runs;
/// paths only ever point at `ItemAction::Screen` items.
struct ScreenStack<C> {
    root: Frame<C>,
    levels: Vec<Level>,
}

/// What the renderer needs for one screen: header, rows and cursor. The
/// synthetic Exit row is always last.
struct ScreenView {
    description: String,
    rows: Vec<(String, Option<String>)>,
    cursor: usize,
}

#[derive(Debug, PartialEq)]
enum Removal {
    Kept,
    Closed,
}

enum Selection<C> {
    Redraw,
    Closed,
    Command(C),
}

impl<C: Clone> ScreenStack<C> {
    fn new(root: Frame<C>) -> Self {
        Self {
            root,
            levels: vec![Level {
                path: Vec::new(),
                cursor: 0,
            }],
        }
    }

    fn level(&self) -> &Level {
        &self.levels[self.levels.len() - 1]
    }

    fn level_mut(&mut self) -> &mut Level {
        let last = self.levels.len() - 1;
        &mut self.levels[last]
    }

    fn frame(&self) -> &Frame<C> {
        let mut frame = &self.root;
        for &idx in &self.level().path {
            frame = match &frame.items[idx].action {
                ItemAction::Screen(child) => child,
                ItemAction::Command(_) => break,
            };
        }
        frame
    }

    fn frame_mut(&mut self) -> &mut Frame<C> {
        let path = self.level().path.clone();
        let mut frame = &mut self.root;
        for idx in path {
            if !matches!(frame.items[idx].action, ItemAction::Screen(_)) {
                break;
            }
            frame = match &mut frame.items[idx].action {
                ItemAction::Screen(child) => child,
                ItemAction::Command(_) => unreachable!(),
            };
        }
        frame
    }

    /// Index of the synthetic Exit row.
    fn last_index(&self) -> usize {
        self.frame().items.len()
    }

    fn move_up(&mut self) {
        let last = self.last_index();
        let level = self.level_mut();
        level.cursor = if level.cursor == 0 {
            last
        } else {
            level.cursor - 1
        };
    }

    fn move_down(&mut self) {
        let last = self.last_index();
        let level = self.level_mut();
        level.cursor = if level.cursor == last {
            0
        } else {
            level.cursor + 1
        };
    }

    /// The delete command for the highlighted option, if it has one.
    fn delete_command(&self) -> Option<C> {
        let items = &self.frame().items;
        items.get(self.level().cursor)?.delete.clone()
    }

    /// Remove the highlighted option after its delete command ran. A frame
    /// left with no real options closes; for a nested frame that also
    /// removes the screen option it was entered through from its parent
    /// (the screen fronts nothing anymore), cascading upward. Emptying the
    /// root frame ends the run.
    fn remove_selected(&mut self) -> Removal {
        loop {
            let cursor = self.level().cursor;
            self.frame_mut().items.remove(cursor);

            if !self.frame().items.is_empty() {
                if cursor > 0 {
                    self.level_mut().cursor = cursor - 1;
                }
                return Removal::Kept;
            }
            if self.pop_level() {
                return Removal::Closed;
            }
            // The parent cursor still rests on the entered screen option.
        }
    }

    fn select(&mut self) -> Result<Selection<C>> {
        let cursor = self.level().cursor;
        if cursor == self.last_index() {
            return Ok(if self.pop_level() {
                Selection::Closed
            } else {
                Selection::Redraw
            });
        }
        match &self.frame().items[cursor].action {
            ItemAction::Command(command) => Ok(Selection::Command(command.clone())),
            ItemAction::Screen(child) => {
                if child.items.is_empty() {
                    return Err(KeyrackError::EmptyMenu);
                }
                let mut path = self.level().path.clone();
                path.push(cursor);
                self.levels.push(Level { path, cursor: 0 });
                Ok(Selection::Redraw)
            }
        }
    }

    /// Pop one frame; returns true when the root frame was popped, i.e.
    /// the run is over.
    fn pop_level(&mut self) -> bool {
        if self.levels.len() == 1 {
            return true;
        }
        self.levels.pop();
        false
    }

    fn view(&self) -> ScreenView {
        let frame = self.frame();
        let mut rows: Vec<(String, Option<String>)> = frame
            .items
            .iter()
            .map(|item| (item.name.clone(), item.description.clone()))
            .collect();
        rows.push((EXIT_LABEL.to_string(), Some(EXIT_DESCRIPTION.to_string())));
        ScreenView {
            description: frame.description.clone(),
            rows,
            cursor: self.level().cursor,
        }
    }
}

// --- terminal session -------------------------------------------------

/// Raw-mode session: alternate screen, hidden cursor, raw input. The
/// `Drop` impl restores the terminal unconditionally.
struct TerminalSession {
    out: Stdout,
}

impl TerminalSession {
    fn acquire() -> Result<Self> {
        if !io::stdout().is_terminal() {
            return Err(KeyrackError::NoTty);
        }
        enable_raw_mode().map_err(KeyrackError::Terminal)?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(KeyrackError::Terminal(e));
        }
        Ok(Self { out })
    }

    fn render(&mut self, view: &ScreenView) -> Result<()> {
        self.try_render(view).map_err(KeyrackError::Terminal)
    }

    fn try_render(&mut self, view: &ScreenView) -> io::Result<()> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;

        if !view.description.is_empty() {
            queue!(
                self.out,
                Print(view.description.clone().bold().green()),
                Print("\r\n\r\n")
            )?;
        }

        let name_width = column_width(view.rows.iter().map(|(name, _)| name.as_str()));
        let show_descriptions = descriptions_enabled(&view.rows);
        let description_width =
            column_width(view.rows.iter().filter_map(|(_, d)| d.as_deref()));

        for (i, (name, description)) in view.rows.iter().enumerate() {
            let mut text = format!("{name:<name_width$}");
            if show_descriptions {
                let description = description.as_deref().unwrap_or_default();
                text.push_str(&format!("| {description:<description_width$}"));
            }
            if i == view.cursor {
                queue!(self.out, Print(format!("> {text}").green().reverse()))?;
            } else {
                queue!(self.out, Print(format!("  {text}")))?;
            }
            queue!(self.out, Print("\r\n"))?;
        }

        self.out.flush()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.out, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

/// Columns are padded to the widest entry in the current list, so the
/// layout stays aligned as deletions shrink it.
fn column_width<'a>(texts: impl Iterator<Item = &'a str>) -> usize {
    texts.map(|t| t.chars().count()).max().unwrap_or(0) + 2
}

/// Descriptions render all-or-nothing per screen: one option without a
/// description suppresses the column for the whole screen.
fn descriptions_enabled(rows: &[(String, Option<String>)]) -> bool {
    rows.iter().all(|(_, description)| description.is_some())
}

enum Key {
    Up,
    Down,
    Delete,
    Enter,
    Cancel,
    Other,
}

fn next_key() -> Result<Key> {
    Ok(match event::read().map_err(KeyrackError::Terminal)? {
        Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Backspace | KeyCode::Delete => Key::Delete,
            KeyCode::Enter => Key::Enter,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Cancel,
            _ => Key::Other,
        },
        // Resize and other terminal events just trigger a redraw.
        _ => Key::Other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        Pick(&'static str),
        Drop(&'static str),
    }

    fn item(name: &'static str) -> MenuItem<Cmd> {
        MenuItem::command(name, Some(format!("{name} description")), Cmd::Pick(name))
            .with_delete(Cmd::Drop(name))
    }

    fn stack(names: &[&'static str]) -> ScreenStack<Cmd> {
        let items = names.iter().map(|&n| item(n)).collect();
        ScreenStack::new(Frame::new("Pick one", items))
    }

    #[test]
    fn test_menu_rejects_empty_option_list() {
        let err = Menu::<Cmd>::new(Vec::new(), "Nothing").unwrap_err();
        assert!(matches!(err, KeyrackError::EmptyMenu));
    }

    #[test]
    fn test_cursor_wraps_upward_from_first_row() {
        let mut screens = stack(&["a", "b"]);
        screens.move_up();
        // Exit row sits after the two real options.
        assert_eq!(screens.level().cursor, 2);
    }

    #[test]
    fn test_cursor_wraps_downward_from_last_row() {
        let mut screens = stack(&["a", "b"]);
        screens.move_up();
        screens.move_down();
        assert_eq!(screens.level().cursor, 0);
    }

    #[test]
    fn test_select_returns_captured_command() {
        let mut screens = stack(&["a", "b"]);
        screens.move_down();
        match screens.select().unwrap() {
            Selection::Command(command) => assert_eq!(command, Cmd::Pick("b")),
            _ => panic!("expected a command selection"),
        }
    }

    #[test]
    fn test_select_exit_closes_root() {
        let mut screens = stack(&["a"]);
        screens.move_up();
        assert!(matches!(screens.select().unwrap(), Selection::Closed));
    }

    #[test]
    fn test_delete_command_absent_on_exit_row() {
        let mut screens = stack(&["a"]);
        screens.move_up();
        assert!(screens.delete_command().is_none());
    }

    #[test]
    fn test_delete_command_absent_without_delete_action() {
        let items = vec![MenuItem::command("a", None, Cmd::Pick("a"))];
        let screens = ScreenStack::new(Frame::new("Pick", items));
        assert!(screens.delete_command().is_none());
    }

    #[test]
    fn test_remove_clamps_cursor_back_by_one() {
        let mut screens = stack(&["a", "b", "c"]);
        screens.move_down();
        screens.move_down(); // on "c"
        assert_eq!(screens.remove_selected(), Removal::Kept);
        assert_eq!(screens.level().cursor, 1);
        assert_eq!(screens.frame().items.len(), 2);
    }

    #[test]
    fn test_remove_at_top_keeps_cursor_at_zero() {
        let mut screens = stack(&["a", "b"]);
        assert_eq!(screens.remove_selected(), Removal::Kept);
        assert_eq!(screens.level().cursor, 0);
        assert_eq!(screens.frame().items[0].name, "b");
    }

    #[test]
    fn test_removing_last_real_option_closes_root() {
        let mut screens = stack(&["only"]);
        assert_eq!(screens.remove_selected(), Removal::Closed);
    }

    #[test]
    fn test_screen_option_pushes_and_exit_pops_to_parent() {
        let child = Frame::new("Inner", vec![item("x"), item("y")]);
        let items = vec![MenuItem::screen("group", child), item("other")];
        let mut screens = ScreenStack::new(Frame::new("Outer", items));

        assert!(matches!(screens.select().unwrap(), Selection::Redraw));
        assert_eq!(screens.frame().description, "Inner");
        assert_eq!(screens.level().cursor, 0);

        // Inner Exit row is at index 2.
        screens.move_up();
        assert!(matches!(screens.select().unwrap(), Selection::Redraw));
        assert_eq!(screens.frame().description, "Outer");
        assert_eq!(screens.level().cursor, 0);
    }

    #[test]
    fn test_emptying_nested_frame_cascades_into_parent() {
        let child = Frame::new("Inner", vec![item("x")]);
        let items = vec![MenuItem::screen("group", child), item("other")];
        let mut screens = ScreenStack::new(Frame::new("Outer", items));

        screens.select().unwrap();
        assert_eq!(screens.remove_selected(), Removal::Kept);
        // Back in the parent, and the emptied screen option is gone too.
        assert_eq!(screens.frame().description, "Outer");
        assert_eq!(screens.frame().items.len(), 1);
        assert_eq!(screens.frame().items[0].name, "other");
        assert_eq!(screens.level().cursor, 0);
    }

    #[test]
    fn test_emptying_sole_nested_frame_closes_the_run() {
        let child = Frame::new("Inner", vec![item("x")]);
        let items = vec![MenuItem::screen("group", child)];
        let mut screens = ScreenStack::new(Frame::new("Outer", items));

        screens.select().unwrap();
        assert_eq!(screens.remove_selected(), Removal::Closed);
    }

    #[test]
    fn test_deletions_inside_nested_frame_persist_on_reentry() {
        let child = Frame::new("Inner", vec![item("x"), item("y")]);
        let items = vec![MenuItem::screen("group", child)];
        let mut screens = ScreenStack::new(Frame::new("Outer", items));

        screens.select().unwrap();
        screens.remove_selected();
        // back out, then re-enter the same screen
        screens.move_up();
        screens.select().unwrap();
        screens.select().unwrap();

        assert_eq!(screens.frame().description, "Inner");
        assert_eq!(screens.frame().items.len(), 1);
        assert_eq!(screens.frame().items[0].name, "y");
    }

    #[test]
    fn test_entering_empty_screen_is_rejected() {
        let child: Frame<Cmd> = Frame::new("Inner", Vec::new());
        let items = vec![MenuItem::screen("group", child)];
        let mut screens = ScreenStack::new(Frame::new("Outer", items));

        assert!(matches!(screens.select(), Err(KeyrackError::EmptyMenu)));
    }

    #[test]
    fn test_view_appends_exit_row_last() {
        let screens = stack(&["a", "b"]);
        let view = screens.view();
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.rows[2].0, EXIT_LABEL);
    }

    #[test]
    fn test_descriptions_are_all_or_nothing() {
        let with = vec![
            ("a".to_string(), Some("d1".to_string())),
            ("b".to_string(), Some("d2".to_string())),
        ];
        assert!(descriptions_enabled(&with));

        let without = vec![
            ("a".to_string(), Some("d1".to_string())),
            ("b".to_string(), None),
        ];
        assert!(!descriptions_enabled(&without));
    }

    #[test]
    fn test_column_width_tracks_widest_entry() {
        assert_eq!(column_width(["ab", "abcd"].into_iter()), 6);
        assert_eq!(column_width(std::iter::empty::<&str>()), 2);
    }
}
