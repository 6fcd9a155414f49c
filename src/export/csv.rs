use crate::error::ExportError;
use crate::model::{Element, Window};
use std::fs::File;
use std::path::Path;

pub fn export_csv<P: AsRef<Path>>(window: &Window, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record([
        "Name",
        "Type",
        "X",
        "Y",
        "Width",
        "Height",
        "Texture",
        "Text",
        "Custom Attributes",
    ])?;

    for element in &window.elements {
        writer.write_record([
            element.name.clone(),
            element.kind.clone(),
            element.position.x.to_string(),
            element.position.y.to_string(),
            element.size.width.to_string(),
            element.size.height.to_string(),
            element.texture.clone().unwrap_or_default(),
            element.text.clone().unwrap_or_default(),
            format_custom(element),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

fn format_custom(element: &Element) -> String {
    element
        .custom_attributes
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}
