use crate::error::SessionError;
use crate::export::{export_window, save_window};
use crate::model::geometry::parse_number;
use crate::model::{is_reserved, Element, Point, Window};
use crate::parser::import_layout_file;
use crate::parser::xml::XmlDocument;
use crate::session::edit::{Direction, ElementEdit, Field};
use crate::session::EditorSettings;
use std::fmt;
use std::path::{Path, PathBuf};

/// Stable handle for an element in a session. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: ElementId,
    pub element: Element,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    id: ElementId,
    pointer_start: Point,
    element_start: Point,
}

/// The live document being edited: an ordered collection of elements, the
/// current selection, an in-progress drag and the file it belongs to.
///
/// The session exclusively owns its elements. Callers read them through
/// [`entries`](Self::entries) and change them through [`apply`](Self::apply)
/// or the helpers built on it.
#[derive(Debug)]
pub struct EditorSession {
    settings: EditorSettings,
    window_name: String,
    entries: Vec<Entry>,
    next_id: u64,
    selected: Option<ElementId>,
    drag: Option<DragState>,
    file_path: Option<PathBuf>,
    dirty: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorSession {
    #[must_use]
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            window_name: settings.window_name.clone(),
            settings,
            entries: Vec::new(),
            next_id: 1,
            selected: None,
            drag: None,
            file_path: None,
            dirty: false,
        }
    }

    #[must_use]
    pub fn from_window(window: Window, settings: EditorSettings) -> Self {
        let mut session = Self::new(settings);
        session.replace(window);
        session
    }

    #[must_use]
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    #[must_use]
    pub fn window_name(&self) -> &str {
        &self.window_name
    }

    pub fn set_window_name(&mut self, name: impl Into<String>) {
        self.window_name = name.into();
        self.dirty = true;
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.element)
    }

    #[must_use]
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
    }

    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, element });
        self.dirty = true;
        id
    }

    /// Adds a `rect` at the configured spot and size, named after the new
    /// element count, and selects it.
    pub fn add_rectangle(&mut self) -> ElementId {
        let name = format!("Rectangle {}", self.entries.len() + 1);
        let element = Element::new(
            name,
            self.settings.new_element_position,
            self.settings.new_element_size,
        );
        let id = self.add_element(element);
        self.selected = Some(id);

        log::debug!("added {id}");
        id
    }

    pub fn remove(&mut self, id: ElementId) -> Result<Element, SessionError> {
        let index = self
            .index_of(id)
            .ok_or(SessionError::UnknownElement(id))?;
        let entry = self.entries.remove(index);

        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        self.dirty = true;

        log::debug!("removed {id} '{}'", entry.element.name);
        Ok(entry.element)
    }

    pub fn remove_selected(&mut self) -> Result<Element, SessionError> {
        let id = self.selected.ok_or(SessionError::NoSelection)?;
        self.remove(id)
    }

    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.index_of(id))
    }

    pub fn select(&mut self, id: ElementId) -> Result<(), SessionError> {
        if self.index_of(id).is_none() {
            return Err(SessionError::UnknownElement(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Selects by list position. Out-of-range indices leave the selection
    /// unchanged and return `None`.
    pub fn select_index(&mut self, index: usize) -> Option<ElementId> {
        let id = self.entries.get(index)?.id;
        self.selected = Some(id);
        Some(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Topmost element under `point`; later elements draw above earlier ones.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.element.contains(point))
            .map(|e| e.id)
    }

    /// Applies one edit to one element.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownElement`] if `id` is not in the session,
    /// [`SessionError::ReservedAttribute`] for a custom attribute named like
    /// a first-class field.
    pub fn apply(&mut self, id: ElementId, edit: ElementEdit) -> Result<(), SessionError> {
        let element = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.element)
            .ok_or(SessionError::UnknownElement(id))?;

        match edit {
            ElementEdit::Rename(name) => element.name = name,
            ElementEdit::SetType(kind) => element.kind = kind,
            ElementEdit::MoveTo(position) => element.position = position,
            ElementEdit::SetX(x) => element.position.x = x,
            ElementEdit::SetY(y) => element.position.y = y,
            ElementEdit::Resize(size) => element.size = size,
            ElementEdit::SetWidth(width) => element.size.width = width,
            ElementEdit::SetHeight(height) => element.size.height = height,
            ElementEdit::SetTexture(texture) => {
                element.texture = texture.filter(|t| !t.is_empty());
            }
            ElementEdit::SetText(text) => element.text = text.filter(|t| !t.is_empty()),
            ElementEdit::SetCustom { key, value } => {
                if is_reserved(&key) {
                    return Err(SessionError::ReservedAttribute(key));
                }
                element.custom_attributes.insert(key, value);
            }
            ElementEdit::RemoveCustom(key) => {
                element.custom_attributes.remove(&key);
            }
        }

        self.dirty = true;
        Ok(())
    }

    /// Applies the contents of a property text field.
    ///
    /// Numeric fields change only when the text is a number; otherwise
    /// nothing happens and `Ok(false)` is returned. An empty type is
    /// ignored the same way. Empty texture or text unsets the value.
    pub fn apply_field_text(
        &mut self,
        id: ElementId,
        field: Field,
        text: &str,
    ) -> Result<bool, SessionError> {
        let edit = match field {
            Field::Name => ElementEdit::Rename(text.to_string()),
            Field::Type => {
                let kind = text.trim();
                if kind.is_empty() {
                    return Ok(false);
                }
                ElementEdit::SetType(kind.to_string())
            }
            Field::Texture => ElementEdit::SetTexture(Some(text.to_string())),
            Field::Text => ElementEdit::SetText(Some(text.to_string())),
            Field::X | Field::Y | Field::Width | Field::Height => {
                let Some(value) = parse_number(text) else {
                    return Ok(false);
                };
                match field {
                    Field::X => ElementEdit::SetX(value),
                    Field::Y => ElementEdit::SetY(value),
                    Field::Width => ElementEdit::SetWidth(value),
                    _ => ElementEdit::SetHeight(value),
                }
            }
        };

        self.apply(id, edit)?;
        Ok(true)
    }

    /// Current value of a property field as shown in a text box.
    #[must_use]
    pub fn field_text(&self, id: ElementId, field: Field) -> Option<String> {
        let element = self.get(id)?;
        Some(match field {
            Field::Name => element.name.clone(),
            Field::Type => element.kind.clone(),
            Field::X => element.position.x.to_string(),
            Field::Y => element.position.y.to_string(),
            Field::Width => element.size.width.to_string(),
            Field::Height => element.size.height.to_string(),
            Field::Texture => element.texture.clone().unwrap_or_default(),
            Field::Text => element.text.clone().unwrap_or_default(),
        })
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.settings.snap_to_grid = snap;
    }

    /// Sets the grid size. Values that are not strictly positive are
    /// rejected and `false` is returned.
    pub fn set_grid_size(&mut self, size: f64) -> bool {
        if size > 0.0 && size.is_finite() {
            self.settings.grid_size = size;
            true
        } else {
            false
        }
    }

    /// Moves the selection by one unit, or by one grid step when `coarse`,
    /// then snaps if enabled.
    pub fn nudge(&mut self, direction: Direction, coarse: bool) -> Result<Point, SessionError> {
        let id = self.selected.ok_or(SessionError::NoSelection)?;
        let current = self
            .get(id)
            .ok_or(SessionError::UnknownElement(id))?
            .position;

        let step = if coarse { self.settings.grid_size } else { 1.0 };
        let (dx, dy) = direction.offset();
        let target = self
            .settings
            .snap_point(Point::new(current.x + dx * step, current.y + dy * step));

        self.apply(id, ElementEdit::MoveTo(target))?;
        Ok(target)
    }

    /// Starts dragging `id` from `pointer` and selects it.
    pub fn begin_drag(&mut self, id: ElementId, pointer: Point) -> Result<(), SessionError> {
        let element_start = self
            .get(id)
            .ok_or(SessionError::UnknownElement(id))?
            .position;

        self.selected = Some(id);
        self.drag = Some(DragState {
            id,
            pointer_start: pointer,
            element_start,
        });
        Ok(())
    }

    /// Moves the dragged element by the pointer's travel since the drag
    /// began. Returns the new position, or `None` when no drag is active.
    pub fn drag_to(&mut self, pointer: Point) -> Option<Point> {
        let drag = self.drag?;
        let target = self.settings.snap_point(Point::new(
            drag.element_start.x + (pointer.x - drag.pointer_start.x),
            drag.element_start.y + (pointer.y - drag.pointer_start.y),
        ));

        match self.apply(drag.id, ElementEdit::MoveTo(target)) {
            Ok(()) => Some(target),
            Err(_) => {
                self.drag = None;
                None
            }
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[must_use]
    pub fn to_window(&self) -> Window {
        Window::with_elements(
            self.window_name.clone(),
            self.entries.iter().map(|e| e.element.clone()).collect(),
        )
    }

    #[must_use]
    pub fn export_document(&self) -> XmlDocument {
        let elements: Vec<Element> = self.entries.iter().map(|e| e.element.clone()).collect();
        export_window(&self.window_name, &elements)
    }

    /// Saves to the session's file.
    pub fn save(&mut self) -> Result<PathBuf, SessionError> {
        let path = self.file_path.clone().ok_or(SessionError::NoTarget)?;
        self.save_as(&path)?;
        Ok(path)
    }

    /// Saves to `path` and makes it the session's file.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        let path = path.as_ref();
        let elements: Vec<Element> = self.entries.iter().map(|e| e.element.clone()).collect();
        save_window(path, &self.window_name, &elements)?;

        self.file_path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    /// Replaces everything with the contents of `path`. On failure the
    /// session is left as it was.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        let path = path.as_ref();
        let window = import_layout_file(path)?;

        self.replace(window);
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Replaces all elements, clearing selection and any drag. Every element
    /// gets a fresh id.
    pub fn replace(&mut self, window: Window) {
        self.entries.clear();
        self.selected = None;
        self.drag = None;
        self.window_name = window.name;

        for element in window.elements {
            self.add_element(element);
        }
        self.dirty = false;
    }
}
