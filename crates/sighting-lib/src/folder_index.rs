//! Placemark-to-folder membership index
//!
//! Built once per document from the document-order list of placemarks. Membership is
//! shallow: only a placemark whose *direct* parent element is a `Folder` is attributed to
//! it. Placemarks wrapped in an intermediate non-folder element fall back to
//! [`ROOT_FOLDER`], even when a folder encloses the wrapper.

use crate::kml;
use roxmltree::Node;
use std::collections::HashMap;

/// Folder reported for placemarks with no direct parent folder
pub const ROOT_FOLDER: &str = "Root";

/// Folder reported when the parent folder has no `<name>`
pub const UNKNOWN_FOLDER: &str = "Unknown";

/// Mapping from placemark enumeration index to the name of its direct parent folder
#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    folders: HashMap<usize, String>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FolderIndex {
    /// Build the index for placemarks listed in document order
    ///
    /// The position of each placemark in `placemarks` is its stable index.
    pub fn build(placemarks: &[Node<'_, '_>]) -> Self {
        let folders = placemarks
            .iter()
            .enumerate()
            .filter_map(|(index, placemark)| {
                let parent = placemark.parent_element()?;
                kml::is_element(parent, kml::FOLDER).then(|| (index, Self::folder_name(parent)))
            })
            .collect();

        Self { folders }
    }

    /// Folder name for the placemark at `index`, [`ROOT_FOLDER`] if it has none
    #[inline]
    pub fn folder_of(&self, index: usize) -> &str {
        self.folders
            .get(&index)
            .map(String::as_str)
            .unwrap_or(ROOT_FOLDER)
    }

    /// Number of placemarks attributed to a folder
    #[inline]
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// True if no placemark sits directly inside a folder
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    fn folder_name(folder: Node<'_, '_>) -> String {
        kml::child_text(folder, kml::NAME)
            .unwrap_or(UNKNOWN_FOLDER)
            .to_string()
    }
}
