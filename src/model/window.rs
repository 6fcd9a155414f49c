use super::{Element, Point, Size};
use serde::{Deserialize, Serialize};

/// Window name used when none is supplied.
pub const DEFAULT_WINDOW_NAME: &str = "myWindow";

/// A named window and its elements. Element order is child-node order in
/// the XUI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub name: String,
    pub elements: Vec<Element>,
}

impl Default for Window {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_NAME)
    }
}

impl Window {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_elements(name: impl Into<String>, elements: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }

    #[must_use]
    pub fn total_elements(&self) -> usize {
        self.elements.len()
    }

    /// Bottom-right corner of the smallest box holding every element,
    /// measured from the origin. `None` for an empty window.
    #[must_use]
    pub fn extent(&self) -> Option<Size> {
        extent(&self.elements)
    }
}

/// See [`Window::extent`].
#[must_use]
pub fn extent<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Size> {
    elements
        .into_iter()
        .map(|e| {
            Point::new(
                e.position.x + e.size.width,
                e.position.y + e.size.height,
            )
        })
        .reduce(|a, b| Point::new(a.x.max(b.x), a.y.max(b.y)))
        .map(|p| Size::new(p.x, p.y))
}
