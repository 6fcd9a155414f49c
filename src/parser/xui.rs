use crate::error::ImportError;
use crate::model::{is_reserved, Element, Point, Size, Window, DEFAULT_WINDOW_NAME};
use crate::parser::xml::{XmlDocument, XmlNode};
use std::path::Path;

/// Name given to elements whose node has no `name` attribute.
pub const UNNAMED_ELEMENT: &str = "Unnamed";

const ROOT_TAG: &str = "window";

/// Converts the children of a `window` root into elements.
///
/// Returns an empty list if the document has no root or the root is not
/// named `window`. Each direct child becomes one element, in document
/// order:
/// - the node's tag becomes the element type
/// - `name` defaults to `"Unnamed"`
/// - `pos` and `size` are read as two comma-separated numbers; a missing
///   value or wrong part count leaves both components at zero, and a part
///   that is not a number becomes zero
/// - `texture` and `text` stay unset when absent
/// - every other attribute is copied verbatim into `custom_attributes`
#[must_use]
pub fn import_window(document: &XmlDocument) -> Vec<Element> {
    match window_root(document) {
        Some(root) => root.children.iter().map(element_from_node).collect(),
        None => Vec::new(),
    }
}

/// Like [`import_window`], keeping the root's `name` as the window name.
///
/// The name falls back to `"myWindow"` when the attribute is absent or the
/// root is not a `window`.
#[must_use]
pub fn import_layout(document: &XmlDocument) -> Window {
    let name = window_root(document)
        .and_then(|root| root.attribute("name"))
        .unwrap_or(DEFAULT_WINDOW_NAME)
        .to_string();

    Window::with_elements(name, import_window(document))
}

/// Parses XUI text and imports its elements.
///
/// # Errors
///
/// Returns [`ImportError::Malformed`] if the text is not well-formed XML.
/// No elements are returned in that case.
pub fn import_window_str(content: &str) -> Result<Vec<Element>, ImportError> {
    let document = XmlDocument::parse(content)?;
    Ok(import_window(&document))
}

pub fn import_layout_str(content: &str) -> Result<Window, ImportError> {
    let document = XmlDocument::parse(content)?;
    Ok(import_layout(&document))
}

/// Reads and imports an XUI file.
///
/// # Errors
///
/// Returns [`ImportError::FileRead`] if the file cannot be read.
/// Returns [`ImportError::Malformed`] if it is not well-formed XML.
///
/// # Example
///
/// ```no_run
/// use xui_editor::parser::import_window_file;
///
/// let elements = import_window_file("window.xml")?;
/// for element in &elements {
///     println!("{} at {}", element.name, element.position);
/// }
/// # Ok::<(), xui_editor::error::ImportError>(())
/// ```
pub fn import_window_file<P: AsRef<Path>>(path: P) -> Result<Vec<Element>, ImportError> {
    let content = read_source(path.as_ref())?;
    import_window_str(&content)
}

pub fn import_layout_file<P: AsRef<Path>>(path: P) -> Result<Window, ImportError> {
    let path = path.as_ref();
    let window = import_layout_str(&read_source(path)?)?;

    log::info!(
        "imported {} elements from '{}'",
        window.total_elements(),
        path.display()
    );

    Ok(window)
}

fn read_source(path: &Path) -> Result<String, ImportError> {
    let bytes = std::fs::read(path).map_err(|source| ImportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| ImportError::Malformed {
        position: e.utf8_error().valid_up_to(),
        message: format!("invalid UTF-8: {e}"),
    })
}

fn window_root(document: &XmlDocument) -> Option<&XmlNode> {
    match &document.root {
        Some(root) if root.tag == ROOT_TAG => Some(root),
        Some(root) => {
            log::debug!("root is <{}>, not <{ROOT_TAG}>; nothing to import", root.tag);
            None
        }
        None => None,
    }
}

fn element_from_node(node: &XmlNode) -> Element {
    let name = node.attribute("name").map_or_else(
        || {
            log::debug!("<{}> has no name, using '{UNNAMED_ELEMENT}'", node.tag);
            UNNAMED_ELEMENT.to_string()
        },
        str::to_string,
    );

    let custom_attributes = node
        .attributes
        .iter()
        .filter(|(key, _)| !is_reserved(key))
        .cloned()
        .collect();

    Element {
        name,
        kind: node.tag.clone(),
        position: Point::from_attr(node.attribute("pos")),
        size: Size::from_attr(node.attribute("size")),
        texture: node.attribute("texture").map(str::to_string),
        text: node.attribute("text").map(str::to_string),
        custom_attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_import_full_element() {
        let elements = import_window_str(
            r#"<window name="hud">
                <button name="ok" pos="10,20.5" size="120,80" texture="btn.png" text="OK" anchor="bottom" zIndex="3"/>
            </window>"#,
        )
        .unwrap();

        assert_eq!(elements.len(), 1);
        let ok = &elements[0];
        assert_eq!(ok.kind, "button");
        assert_eq!(ok.name, "ok");
        assert_eq!(ok.position, Point::new(10.0, 20.5));
        assert_eq!(ok.size, Size::new(120.0, 80.0));
        assert_eq!(ok.texture.as_deref(), Some("btn.png"));
        assert_eq!(ok.text.as_deref(), Some("OK"));
        assert_eq!(ok.custom_attributes.len(), 2);
        assert_eq!(ok.custom_attributes["anchor"], "bottom");
        assert_eq!(ok.custom_attributes["zIndex"], "3");
    }

    #[test]
    fn test_import_preserves_document_order() {
        let elements = import_window_str(
            r#"<window><c name="3"/><a name="1"/><b name="2"/></window>"#,
        )
        .unwrap();
        let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_missing_name_defaults_to_unnamed() {
        let elements = import_window_str(r#"<window><rect pos="1,1"/></window>"#).unwrap();
        assert_eq!(elements[0].name, "Unnamed");
    }

    #[test]
    fn test_empty_name_is_kept() {
        let elements = import_window_str(r#"<window><rect name=""/></window>"#).unwrap();
        assert_eq!(elements[0].name, "");
    }

    #[test]
    fn test_malformed_position_and_size_default_to_zero() {
        let elements = import_window_str(
            r#"<window>
                <rect name="a" pos="abc" size="1,2,3"/>
                <rect name="b" pos="5,x" size="7"/>
            </window>"#,
        )
        .unwrap();

        assert_eq!(elements[0].position, Point::new(0.0, 0.0));
        assert_eq!(elements[0].size, Size::new(0.0, 0.0));
        assert_eq!(elements[1].position, Point::new(5.0, 0.0));
        assert_eq!(elements[1].size, Size::new(0.0, 0.0));
    }

    #[test]
    fn test_absent_optional_attributes_stay_unset() {
        let elements = import_window_str(r#"<window><rect name="a"/></window>"#).unwrap();
        assert_eq!(elements[0].texture, None);
        assert_eq!(elements[0].text, None);
    }

    #[test]
    fn test_empty_optional_attributes_are_kept_as_empty() {
        let elements =
            import_window_str(r#"<window><rect name="a" texture="" text=""/></window>"#).unwrap();
        assert_eq!(elements[0].texture.as_deref(), Some(""));
        assert_eq!(elements[0].text.as_deref(), Some(""));
    }

    #[test]
    fn test_custom_attributes_keep_casing_and_raw_values() {
        let elements = import_window_str(
            r#"<window><rect name="a" OnClick="Open()" Weight="" ratio="n/a"/></window>"#,
        )
        .unwrap();
        let custom = &elements[0].custom_attributes;
        assert_eq!(custom["OnClick"], "Open()");
        assert_eq!(custom["Weight"], "");
        assert_eq!(custom["ratio"], "n/a");
        assert!(custom.keys().all(|k| !is_reserved(k)));
    }

    #[test]
    fn test_wrong_root_yields_nothing() {
        assert!(import_window_str(r#"<foo><rect name="a"/></foo>"#)
            .unwrap()
            .is_empty());
        assert!(import_window_str("<foo/>").unwrap().is_empty());
        assert!(import_window_str("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = import_window_str(r#"<window name="w"><rect name="a""#);
        assert!(matches!(result, Err(ImportError::Malformed { .. })));
    }

    #[test]
    fn test_import_layout_keeps_window_name() {
        let window = import_layout_str(r#"<window name="inventory"><rect/></window>"#).unwrap();
        assert_eq!(window.name, "inventory");
        assert_eq!(window.total_elements(), 1);

        let unnamed = import_layout_str("<window/>").unwrap();
        assert_eq!(unnamed.name, DEFAULT_WINDOW_NAME);
    }

    #[test]
    fn test_missing_file() {
        let result = import_window_file("/nonexistent/dir/window.xml");
        assert!(matches!(result, Err(ImportError::FileRead { .. })));
    }

    #[test]
    fn test_invalid_utf8_file_is_malformed() {
        let path = std::env::temp_dir().join("xui_editor_invalid_utf8.xml");
        std::fs::write(&path, b"<window name=\"\xff\xfe\"/>").unwrap();

        let result = import_window_file(&path);
        assert!(matches!(
            result,
            Err(ImportError::Malformed { position: 14, .. })
        ));

        let _ = std::fs::remove_file(&path);
    }
}
