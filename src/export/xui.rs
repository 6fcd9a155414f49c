use crate::error::ExportError;
use crate::model::{is_reserved, Element};
use crate::parser::xml::{XmlDocument, XmlNode};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Builds the XUI document for a window.
///
/// The root `<window name="...">` gets one child per element, in order,
/// tagged with the element type and carrying `name`, `pos`, `size`, then
/// `texture` and `text` when set and non-empty, then the custom
/// attributes. Field values are written as they are, without validation.
///
/// Numbers use the shortest decimal form that reads back to the same
/// value (`50`, `12.5`), independent of locale.
#[must_use]
pub fn export_window(window_name: &str, elements: &[Element]) -> XmlDocument {
    let mut root = XmlNode::new("window");
    root.push_attribute("name", window_name);
    root.children = elements.iter().map(element_node).collect();

    XmlDocument::new(root)
}

/// Exports a window and writes it to `path`.
///
/// # Example
///
/// ```no_run
/// use xui_editor::export::save_window;
/// use xui_editor::model::{Element, Point, Size};
///
/// let button = Element::new("ok", Point::new(10.0, 10.0), Size::new(80.0, 24.0));
/// save_window("window.xml", "myWindow", &[button])?;
/// # Ok::<(), xui_editor::error::ExportError>(())
/// ```
pub fn save_window<P: AsRef<Path>>(
    path: P,
    window_name: &str,
    elements: &[Element],
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    export_window(window_name, elements).write_to(&mut writer)?;

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    log::info!(
        "exported {} elements to '{}'",
        elements.len(),
        path_ref.display()
    );

    Ok(())
}

fn element_node(element: &Element) -> XmlNode {
    let mut node = XmlNode::new(element.kind.as_str());
    node.push_attribute("name", element.name.as_str());
    node.push_attribute("pos", element.position.to_string());
    node.push_attribute("size", element.size.to_string());

    if let Some(texture) = element.texture.as_deref().filter(|t| !t.is_empty()) {
        node.push_attribute("texture", texture);
    }
    if let Some(text) = element.text.as_deref().filter(|t| !t.is_empty()) {
        node.push_attribute("text", text);
    }

    for (key, value) in &element.custom_attributes {
        // A reserved key here would repeat an attribute already written.
        if is_reserved(key) {
            log::warn!(
                "'{}': dropping custom attribute '{key}', it is reserved",
                element.name
            );
            continue;
        }
        node.push_attribute(key.as_str(), value.as_str());
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, Size};
    use pretty_assertions::assert_eq;

    fn attrs(node: &XmlNode) -> Vec<(&str, &str)> {
        node.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_root_node() {
        let doc = export_window("myWindow", &[]);
        let root = doc.root.unwrap();
        assert_eq!(root.tag, "window");
        assert_eq!(attrs(&root), vec![("name", "myWindow")]);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_element_attributes_in_order() {
        let element = Element::new("ok", Point::new(50.0, 12.5), Size::new(120.0, 80.0))
            .with_kind("button")
            .with_texture("btn.png")
            .with_text("OK")
            .with_custom("anchor", "left")
            .with_custom("Z", "1");

        let doc = export_window("w", &[element]);
        let node = &doc.root.unwrap().children[0];

        assert_eq!(node.tag, "button");
        assert_eq!(
            attrs(node),
            vec![
                ("name", "ok"),
                ("pos", "50,12.5"),
                ("size", "120,80"),
                ("texture", "btn.png"),
                ("text", "OK"),
                ("Z", "1"),
                ("anchor", "left"),
            ]
        );
    }

    #[test]
    fn test_unset_and_empty_optionals_are_omitted() {
        let mut element = Element::new("a", Point::default(), Size::default());
        element.texture = Some(String::new());

        let doc = export_window("w", &[element]);
        let node = &doc.root.unwrap().children[0];
        assert_eq!(node.attribute("texture"), None);
        assert_eq!(node.attribute("text"), None);
    }

    #[test]
    fn test_reserved_custom_key_is_not_duplicated() {
        let mut element = Element::new("a", Point::default(), Size::default());
        element
            .custom_attributes
            .insert("pos".to_string(), "9,9".to_string());

        let doc = export_window("w", &[element]);
        let node = &doc.root.unwrap().children[0];
        let pos_count = node.attributes.iter().filter(|(k, _)| k == "pos").count();
        assert_eq!(pos_count, 1);
        assert_eq!(node.attribute("pos"), Some("0,0"));
    }

    #[test]
    fn test_values_written_as_is() {
        let element = Element::new("", Point::new(-1.0, 0.25), Size::new(-5.0, 0.0));
        let doc = export_window("", &[element]);
        let node = &doc.root.unwrap().children[0];
        assert_eq!(node.attribute("name"), Some(""));
        assert_eq!(node.attribute("pos"), Some("-1,0.25"));
        assert_eq!(node.attribute("size"), Some("-5,0"));
    }

    #[test]
    fn test_export_does_not_touch_input() {
        let elements = vec![Element::new("a", Point::new(1.0, 2.0), Size::new(3.0, 4.0))];
        let before = elements.clone();
        let _ = export_window("w", &elements);
        assert_eq!(elements, before);
    }
}
