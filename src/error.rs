//! Error types for XUI Editor.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::ElementId;

/// Errors that can occur when importing XUI documents.
///
/// A document whose root is missing or not named `window` is not an error;
/// the importer returns an empty element list for it.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Failed to read the XUI file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The input is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: usize, message: String },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to emit XML.
    #[error("XML write failed: {source}")]
    Xml {
        #[from]
        source: quick_xml::Error,
    },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}

/// Errors raised by the editor session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no element with id {0}")]
    UnknownElement(ElementId),

    /// `name`, `pos`, `size`, `texture` and `text` are first-class fields
    /// and cannot be stored as custom attributes.
    #[error("'{0}' is a reserved attribute")]
    ReservedAttribute(String),

    #[error("no element selected")]
    NoSelection,

    #[error("no file to save to")]
    NoTarget,

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
