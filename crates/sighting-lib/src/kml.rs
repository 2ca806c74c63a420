//! KML element names and small tree helpers
//!
//! Elements are matched on their local name, so documents using the default KML namespace,
//! a `kml:` prefix, or no namespace at all are handled the same way.

use roxmltree::Node;

pub(crate) const FOLDER: &str = "Folder";
pub(crate) const PLACEMARK: &str = "Placemark";
pub(crate) const POINT: &str = "Point";
pub(crate) const NAME: &str = "name";
pub(crate) const STYLE_URL: &str = "styleUrl";
pub(crate) const COORDINATES: &str = "coordinates";

/// True if `node` is an element with the given local name
#[inline]
pub(crate) fn is_element(node: Node<'_, '_>, local_name: &str) -> bool {
    node.is_element() && node.tag_name().name() == local_name
}

/// First direct child element with the given local name
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, local_name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_element(*child, local_name))
}

/// Trimmed text of the first direct child element with the given local name
///
/// Returns `None` when the child is absent or its text is empty.
pub(crate) fn child_text<'a>(node: Node<'a, '_>, local_name: &str) -> Option<&'a str> {
    child(node, local_name)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
