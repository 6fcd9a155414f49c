//! # XUI Editor
//!
//! A terminal editor for XUI window layouts: place, move, resize and name
//! rectangular UI elements and round-trip them through XUI XML.
//!
//! ## Features
//!
//! - Import and export XUI documents (`<window>` root, one child per element)
//! - Keep unknown attributes from extended schemas through a load/save cycle
//! - Edit elements on a canvas with grid snapping, or through property fields
//! - Export a layout report to CSV and JSON
//!
//! ## Example
//!
//! ```no_run
//! use xui_editor::export::export_window;
//! use xui_editor::parser::import_window_file;
//!
//! let elements = import_window_file("window.xml").expect("Failed to import");
//! let document = export_window("myWindow", &elements);
//! println!("{}", document.to_xml_string().expect("Failed to write"));
//! ```

pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod session;
pub mod ui;
