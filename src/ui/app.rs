use crate::model::window::extent;
use crate::session::{Direction, EditorSession, Field};
use crate::ui::viewport::Viewport;
use color_eyre::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::{DefaultTerminal, Frame};
use std::path::PathBuf;

/// Save target when the session has no file yet.
pub const DEFAULT_FILE_NAME: &str = "window.xml";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Elements,
    Canvas,
    Properties,
}

impl FocusPanel {
    fn next(self) -> Self {
        match self {
            FocusPanel::Elements => FocusPanel::Canvas,
            FocusPanel::Canvas => FocusPanel::Properties,
            FocusPanel::Properties => FocusPanel::Elements,
        }
    }

    fn previous(self) -> Self {
        match self {
            FocusPanel::Elements => FocusPanel::Properties,
            FocusPanel::Canvas => FocusPanel::Elements,
            FocusPanel::Properties => FocusPanel::Canvas,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    /// A property field is being typed into.
    Editing { field: Field, buffer: String },
    ConfirmDelete,
}

pub struct App {
    pub session: EditorSession,
    pub focus_panel: FocusPanel,
    pub mode: Mode,
    pub selected_field: usize,
    pub status: Option<String>,
    /// Inner area of the canvas as last drawn.
    pub canvas_area: Rect,
    /// Viewport fixed at the start of a mouse drag, held until release.
    drag_viewport: Option<Viewport>,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(session: EditorSession) -> Self {
        Self {
            session,
            focus_panel: FocusPanel::Elements,
            mode: Mode::Normal,
            selected_field: 0,
            status: None,
            canvas_area: Rect::default(),
            drag_viewport: None,
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            let mut canvas_area = self.canvas_area;
            terminal.draw(|frame| canvas_area = self.draw(frame))?;
            self.canvas_area = canvas_area;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) -> Rect {
        super::screen::draw_editor(frame, self)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.canvas_area,
            extent(self.session.entries().iter().map(|e| &e.element)),
        )
    }

    #[must_use]
    pub fn current_field(&self) -> Field {
        Field::ALL[self.selected_field.min(Field::ALL.len() - 1)]
    }

    fn handle_events(&mut self) -> Result<()> {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Normal => self.handle_normal_keys(key),
            Mode::Editing { .. } => self.handle_editing_keys(key.code),
            Mode::ConfirmDelete => self.handle_confirm_keys(key.code),
        }
    }

    fn handle_normal_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus_panel = self.focus_panel.next(),
            KeyCode::BackTab => self.focus_panel = self.focus_panel.previous(),
            KeyCode::Char('a') => {
                self.session.add_rectangle();
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.session.selected().is_some() {
                    self.mode = Mode::ConfirmDelete;
                }
            }
            KeyCode::Char('g') => {
                let snap = !self.session.settings().snap_to_grid;
                self.session.set_snap_to_grid(snap);
            }
            KeyCode::Char('+') => {
                let size = self.session.settings().grid_size + 1.0;
                self.session.set_grid_size(size);
            }
            KeyCode::Char('-') => {
                let size = self.session.settings().grid_size - 1.0;
                self.session.set_grid_size(size);
            }
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('r') => self.reload(),
            _ => match self.focus_panel {
                FocusPanel::Elements => self.handle_list_keys(key.code),
                FocusPanel::Canvas => self.handle_canvas_keys(key),
                FocusPanel::Properties => self.handle_property_keys(key.code),
            },
        }
    }

    fn handle_list_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.previous_element(),
            KeyCode::Down | KeyCode::Char('j') => self.next_element(),
            KeyCode::Enter => self.focus_panel = FocusPanel::Properties,
            _ => {}
        }
    }

    fn handle_canvas_keys(&mut self, key: KeyEvent) {
        let direction = match key.code {
            KeyCode::Left => Direction::Left,
            KeyCode::Right => Direction::Right,
            KeyCode::Up => Direction::Up,
            KeyCode::Down => Direction::Down,
            _ => return,
        };
        let coarse = key.modifiers.contains(KeyModifiers::SHIFT);

        if self.session.nudge(direction, coarse).is_err() {
            self.status = Some("Select an element first".to_string());
        }
    }

    fn handle_property_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_field < Field::ALL.len() - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Enter => self.begin_editing(),
            _ => {}
        }
    }

    fn handle_editing_keys(&mut self, code: KeyCode) {
        let Mode::Editing { field, buffer } = &mut self.mode else {
            return;
        };

        match code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Enter => {
                let field = *field;
                let text = std::mem::take(buffer);
                self.mode = Mode::Normal;
                self.commit_field(field, &text);
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            _ => {}
        }
    }

    fn handle_confirm_keys(&mut self, code: KeyCode) {
        self.mode = Mode::Normal;
        if !matches!(code, KeyCode::Char('y' | 'Y') | KeyCode::Enter) {
            return;
        }

        match self.session.remove_selected() {
            Ok(element) => self.status = Some(format!("Deleted \"{}\"", element.name)),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let viewport = self.drag_viewport.unwrap_or_else(|| self.viewport());
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(point) = viewport.to_layout(mouse.column, mouse.row) else {
                    return;
                };
                self.focus_panel = FocusPanel::Canvas;
                match self.session.hit_test(point) {
                    Some(id) => {
                        match self.session.begin_drag(id, point) {
                            Ok(()) => self.drag_viewport = Some(viewport),
                            Err(e) => self.status = Some(e.to_string()),
                        }
                    }
                    None => self.session.clear_selection(),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(point) = viewport.to_layout(mouse.column, mouse.row) {
                    self.session.drag_to(point);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_viewport = None;
                self.session.end_drag();
            }
            _ => {}
        }
    }

    fn previous_element(&mut self) {
        let index = match self.session.selected_index() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.session.select_index(index);
    }

    fn next_element(&mut self) {
        let index = match self.session.selected_index() {
            Some(i) => (i + 1).min(self.session.len().saturating_sub(1)),
            None => 0,
        };
        self.session.select_index(index);
    }

    fn begin_editing(&mut self) {
        let Some(id) = self.session.selected() else {
            self.status = Some("Select an element first".to_string());
            return;
        };
        let field = self.current_field();
        let buffer = self.session.field_text(id, field).unwrap_or_default();
        self.mode = Mode::Editing { field, buffer };
    }

    fn commit_field(&mut self, field: Field, text: &str) {
        let Some(id) = self.session.selected() else {
            return;
        };

        match self.session.apply_field_text(id, field, text) {
            Ok(true) => self.status = None,
            Ok(false) if field.is_numeric() => {
                self.status = Some(format!("\"{text}\" is not a valid {}", field.label()));
            }
            Ok(false) => self.status = Some(format!("{} cannot be empty", field.label())),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn save(&mut self) {
        if self.session.file_path().is_none() {
            self.session.set_file_path(PathBuf::from(DEFAULT_FILE_NAME));
        }

        self.status = Some(match self.session.save() {
            Ok(path) => format!("XUI exported to {}", path.display()),
            Err(e) => format!("Save failed: {e}"),
        });
    }

    fn reload(&mut self) {
        let Some(path) = self.session.file_path().map(PathBuf::from) else {
            self.status = Some("Nothing to reload".to_string());
            return;
        };

        self.status = Some(match self.session.load(&path) {
            Ok(()) => format!(
                "Loaded {} elements from {}",
                self.session.len(),
                path.display()
            ),
            Err(e) => format!("Load failed: {e}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_add_and_delete_with_confirmation() {
        let mut app = App::new(EditorSession::default());
        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.session.len(), 1);

        app.handle_key(press(KeyCode::Char('d')));
        assert_eq!(app.mode, Mode::ConfirmDelete);
        app.handle_key(press(KeyCode::Char('n')));
        assert_eq!(app.session.len(), 1);

        app.handle_key(press(KeyCode::Char('d')));
        app.handle_key(press(KeyCode::Char('y')));
        assert!(app.session.is_empty());
        assert_eq!(app.status.as_deref(), Some("Deleted \"Rectangle 1\""));
    }

    #[test]
    fn test_edit_property_field() {
        let mut app = App::new(EditorSession::default());
        let id = app.session.add_rectangle();
        app.focus_panel = FocusPanel::Properties;

        // Name is the first field; select X.
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.current_field(), Field::X);

        app.handle_key(press(KeyCode::Enter));
        for _ in 0..5 {
            app.handle_key(press(KeyCode::Backspace));
        }
        type_text(&mut app, "75");
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.session.get(id).unwrap().position, Point::new(75.0, 50.0));
    }

    #[test]
    fn test_invalid_number_sets_status() {
        let mut app = App::new(EditorSession::default());
        let id = app.session.add_rectangle();
        app.focus_panel = FocusPanel::Properties;
        app.selected_field = 4;

        app.handle_key(press(KeyCode::Enter));
        type_text(&mut app, "px");
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.session.get(id).unwrap().size.width, 120.0);
        assert_eq!(
            app.status.as_deref(),
            Some("\"120px\" is not a valid Width")
        );
    }

    #[test]
    fn test_list_navigation() {
        let mut app = App::new(EditorSession::default());
        let first = app.session.add_rectangle();
        let second = app.session.add_rectangle();

        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.session.selected(), Some(first));
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.session.selected(), Some(first));
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.session.selected(), Some(second));
    }

    #[test]
    fn test_mouse_drag_moves_element() {
        let mut app = App::new(EditorSession::default());
        let id = app.session.add_rectangle();
        app.session.clear_selection();
        app.canvas_area = Rect::new(0, 0, 80, 60);

        // 80x60 cells over 800x600 layout units: one cell is 10x10.
        let at = |kind, column, row| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(at(MouseEventKind::Down(MouseButton::Left), 6, 6));
        assert_eq!(app.session.selected(), Some(id));

        app.handle_mouse(at(MouseEventKind::Drag(MouseButton::Left), 10, 8));
        app.handle_mouse(at(MouseEventKind::Up(MouseButton::Left), 10, 8));
        assert_eq!(app.session.get(id).unwrap().position, Point::new(90.0, 70.0));
        assert!(!app.session.is_dragging());

        app.handle_mouse(at(MouseEventKind::Down(MouseButton::Left), 70, 50));
        assert_eq!(app.session.selected(), None);
    }

    #[test]
    fn test_drag_keeps_scale_when_extent_grows() {
        let mut app = App::new(EditorSession::default());
        let id = app.session.add_rectangle();
        app.canvas_area = Rect::new(0, 0, 80, 60);

        let at = |kind, column, row| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(at(MouseEventKind::Down(MouseButton::Left), 6, 6));
        // Past the right edge of the 800-wide minimum extent.
        app.handle_mouse(at(MouseEventKind::Drag(MouseButton::Left), 79, 6));
        assert_eq!(app.session.get(id).unwrap().position, Point::new(780.0, 50.0));

        app.handle_mouse(at(MouseEventKind::Drag(MouseButton::Left), 79, 6));
        assert_eq!(app.session.get(id).unwrap().position, Point::new(780.0, 50.0));

        app.handle_mouse(at(MouseEventKind::Up(MouseButton::Left), 79, 6));
        assert_eq!(app.drag_viewport, None);
        assert_eq!(app.viewport().width, 900.0);
    }

    #[test]
    fn test_empty_type_sets_status() {
        let mut app = App::new(EditorSession::default());
        let id = app.session.add_rectangle();
        app.focus_panel = FocusPanel::Properties;
        app.selected_field = 1;

        app.handle_key(press(KeyCode::Enter));
        for _ in 0..4 {
            app.handle_key(press(KeyCode::Backspace));
        }
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.session.get(id).unwrap().kind, "rect");
        assert_eq!(app.status.as_deref(), Some("Type cannot be empty"));
    }
}
