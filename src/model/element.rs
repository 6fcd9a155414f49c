use super::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Element type used when none is given.
pub const DEFAULT_ELEMENT_TYPE: &str = "rect";

/// Attributes with first-class fields on [`Element`]. Never stored in
/// `custom_attributes`.
pub const RESERVED_ATTRIBUTES: [&str; 5] = ["name", "pos", "size", "texture", "text"];

#[must_use]
pub fn is_reserved(attribute: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(&attribute)
}

/// One placed UI widget.
///
/// `kind` doubles as the XML node name. `texture` and `text` are `None` when
/// unset, which is distinct from an empty value. Any attribute outside
/// [`RESERVED_ATTRIBUTES`] lives in `custom_attributes` verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Point,
    pub size: Size,
    pub texture: Option<String>,
    pub text: Option<String>,
    pub custom_attributes: BTreeMap<String, String>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: DEFAULT_ELEMENT_TYPE.to_string(),
            position: Point::default(),
            size: Size::default(),
            texture: None,
            text: None,
            custom_attributes: BTreeMap::new(),
        }
    }
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>, position: Point, size: Size) -> Self {
        Self {
            name: name.into(),
            position,
            size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Adds a custom attribute. Reserved keys are ignored; set the
    /// first-class field instead.
    #[must_use]
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if !is_reserved(&key) {
            self.custom_attributes.insert(key, value.into());
        }
        self
    }

    /// True if `point` lies inside the element's rectangle (edges included).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (self.position.x..=self.position.x + self.size.width).contains(&point.x)
            && (self.position.y..=self.position.y + self.size.height).contains(&point.y)
    }
}
