pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

use crate::results::ImageInfo;
use std::collections::BTreeSet;

/// Structural SEO features pulled out of a page's HTML
///
/// Absent elements leave their field empty (or zero); extraction never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFeatures {
    /// Canonical site path the HTML was served for
    pub path: String,
    /// Absolute URL of the page
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub canonical: String,
    pub h1: String,
    /// `<h2>` texts in document order
    pub h2s: Vec<String>,
    /// `<h3>` texts in document order
    pub h3s: Vec<String>,
    /// Visible-text tokens longer than two characters
    pub word_count: usize,
    pub internal_links: BTreeSet<String>,
    pub external_links: BTreeSet<String>,
    pub images: Vec<ImageInfo>,
    pub has_schema: bool,
    pub schema_types: BTreeSet<String>,
}

impl PageFeatures {
    /// Number of images with no usable alt text
    pub fn images_missing_alt(&self) -> usize {
        self.images.iter().filter(|img| !img.has_alt).count()
    }
}
