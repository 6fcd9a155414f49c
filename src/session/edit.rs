use crate::model::{Point, Size};

/// A single change to one element. Every field update made by the editor
/// goes through [`EditorSession::apply`](super::EditorSession::apply).
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEdit {
    Rename(String),
    SetType(String),
    MoveTo(Point),
    SetX(f64),
    SetY(f64),
    Resize(Size),
    SetWidth(f64),
    SetHeight(f64),
    /// `None` or an empty string unsets the texture.
    SetTexture(Option<String>),
    /// `None` or an empty string unsets the text.
    SetText(Option<String>),
    SetCustom { key: String, value: String },
    RemoveCustom(String),
}

/// Editable property fields, in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Type,
    X,
    Y,
    Width,
    Height,
    Texture,
    Text,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Type,
        Field::X,
        Field::Y,
        Field::Width,
        Field::Height,
        Field::Texture,
        Field::Text,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Type => "Type",
            Field::X => "X",
            Field::Y => "Y",
            Field::Width => "Width",
            Field::Height => "Height",
            Field::Texture => "Texture",
            Field::Text => "Text",
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Field::X | Field::Y | Field::Width | Field::Height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit offset in canvas coordinates (y grows downwards).
    #[must_use]
    pub const fn offset(self) -> (f64, f64) {
        match self {
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
        }
    }
}
