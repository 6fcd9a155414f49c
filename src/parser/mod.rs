pub mod xml;
pub mod xui;

pub use crate::error::ImportError;
pub use xml::{XmlDocument, XmlNode};
pub use xui::{
    import_layout, import_layout_file, import_layout_str, import_window, import_window_file,
    import_window_str,
};
