//! Positioned text fragments and the pages that own them.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in top-down page coordinates.
///
/// `y0` is the upper edge and grows toward the bottom of the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its edges.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// One span of text with font and geometry metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Trimmed text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Whether the font is bold
    pub bold: bool,
    /// Font family identifier, if the decoder reported one
    pub font: Option<String>,
    /// Position on the page
    pub bbox: BoundingBox,
    /// Owning page number (1-indexed)
    pub page: u32,
    /// Width of the owning page
    pub page_width: f32,
    /// Height of the owning page
    pub page_height: f32,
}

impl Fragment {
    /// Create a fragment. The text is trimmed.
    ///
    /// Page number and geometry are filled in by [`PageContent::add_fragment`].
    pub fn new(text: impl AsRef<str>, size: f32, bbox: BoundingBox) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            size,
            bold: false,
            font: None,
            bbox,
            page: 1,
            page_width: 612.0,
            page_height: 792.0,
        }
    }

    /// Set the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Mark the fragment as bold.
    pub fn bold(self) -> Self {
        self.with_bold(true)
    }

    /// Set the font family identifier.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Upper edge.
    pub fn y0(&self) -> f32 {
        self.bbox.y0
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// One decoded page: geometry plus fragments in decoder order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Fragments in the order the decoder emitted them
    pub fragments: Vec<Fragment>,
}

impl PageContent {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            fragments: Vec::new(),
        }
    }

    /// Create an empty page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a fragment, stamping this page's number and geometry onto it.
    ///
    /// Fragments with empty text are dropped.
    pub fn add_fragment(&mut self, mut fragment: Fragment) {
        if fragment.text.is_empty() {
            return;
        }
        fragment.page = self.number;
        fragment.page_width = self.width;
        fragment.page_height = self.height;
        self.fragments.push(fragment);
    }

    /// Builder-style variant of [`add_fragment`](Self::add_fragment).
    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.add_fragment(fragment);
        self
    }

    /// Largest font size on the page, if it has any text.
    pub fn max_font_size(&self) -> Option<f32> {
        self.fragments.iter().map(|f| f.size).reduce(f32::max)
    }

    /// Smallest font size on the page, if it has any text.
    pub fn min_font_size(&self) -> Option<f32> {
        self.fragments.iter().map(|f| f.size).reduce(f32::min)
    }

    /// Check if the page has no text.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_trims_text() {
        let frag = Fragment::new("  Introduction \n", 14.0, BoundingBox::default());
        assert_eq!(frag.text, "Introduction");
        assert!(!frag.bold);
        assert!(frag.font.is_none());
    }

    #[test]
    fn test_add_fragment_stamps_page() {
        let mut page = PageContent::new(3, 595.0, 842.0);
        page.add_fragment(Fragment::new("Scope", 12.0, BoundingBox::new(72.0, 90.0, 120.0, 102.0)));
        page.add_fragment(Fragment::new("   ", 12.0, BoundingBox::default()));

        assert_eq!(page.fragments.len(), 1);
        let frag = &page.fragments[0];
        assert_eq!(frag.page, 3);
        assert_eq!(frag.page_width, 595.0);
        assert_eq!(frag.page_height, 842.0);
    }

    #[test]
    fn test_page_font_extremes() {
        let page = PageContent::letter(1)
            .with_fragment(Fragment::new("Title", 24.0, BoundingBox::default()))
            .with_fragment(Fragment::new("Body", 11.0, BoundingBox::default()));

        assert_eq!(page.max_font_size(), Some(24.0));
        assert_eq!(page.min_font_size(), Some(11.0));
        assert_eq!(PageContent::letter(2).max_font_size(), None);
    }

    #[test]
    fn test_bounding_box_geometry() {
        let bbox = BoundingBox::new(100.0, 50.0, 300.0, 70.0);
        assert_eq!(bbox.center_x(), 200.0);
        assert_eq!(bbox.width(), 200.0);
        assert_eq!(bbox.height(), 20.0);
    }
}
