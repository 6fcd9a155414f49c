pub mod element;
pub mod geometry;
pub mod window;

pub use element::{is_reserved, Element, DEFAULT_ELEMENT_TYPE, RESERVED_ATTRIBUTES};
pub use geometry::{Point, Size};
pub use window::{Window, DEFAULT_WINDOW_NAME};
