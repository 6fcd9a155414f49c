pub mod edit;
pub mod editor;
pub mod settings;

pub use crate::error::SessionError;
pub use edit::{Direction, ElementEdit, Field};
pub use editor::{EditorSession, ElementId, Entry};
pub use settings::{EditorSettings, DEFAULT_GRID_SIZE};
