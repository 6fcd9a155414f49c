pub mod csv;
pub mod json;
pub mod xui;

pub use crate::error::ExportError;
pub use csv::export_csv;
pub use json::export_json;
pub use xui::{export_window, save_window};
