//! Rendering options.

/// Output flavor of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Indented text with inline bracketed annotations
    #[default]
    Plain,
    /// `<p>` lines with `<span>` annotations and move connectors
    Html,
}

/// Companion resources linked from a full HTML page.
///
/// The stylesheets give CREATE/DELETE/MOVE/MODIFY spans their look; the
/// script draws `<connection>` elements between move anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResources {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

impl Default for PageResources {
    fn default() -> Self {
        Self {
            stylesheets: vec![
                "proof_html_stylesheet.css".to_string(),
                "domarrow.css".to_string(),
            ],
            scripts: vec!["domarrow.js".to_string()],
        }
    }
}

/// Options for rendering a diff tree.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output flavor (default: plain text)
    pub mode: OutputMode,
    /// Indentation string per level in plain text (default: four spaces)
    pub indent: String,
    /// Left indent per level in HTML, in pixels (default: 50)
    pub indent_px: u32,
    /// Attribute lists whose text is at least this many characters long are
    /// broken onto their own lines (default: 40)
    pub attribute_wrap_threshold: usize,
    /// Resources linked from [`crate::render_page`] output
    pub page: PageResources,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::Plain,
            indent: "    ".to_string(),
            indent_px: 50,
            attribute_wrap_threshold: 40,
            page: PageResources::default(),
        }
    }
}

impl RenderOptions {
    /// Create new default options (plain text).
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain-text output.
    pub fn plain() -> Self {
        Self::default()
    }

    /// HTML output.
    pub fn html() -> Self {
        Self {
            mode: OutputMode::Html,
            ..Self::default()
        }
    }

    /// Set the plain-text indentation string.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Set the HTML indent per level, in pixels.
    pub fn with_indent_px(mut self, indent_px: u32) -> Self {
        self.indent_px = indent_px;
        self
    }

    /// Set the attribute line-breaking threshold.
    pub fn with_attribute_wrap_threshold(mut self, threshold: usize) -> Self {
        self.attribute_wrap_threshold = threshold;
        self
    }

    /// Set the resources linked from full HTML pages.
    pub fn with_page_resources(mut self, page: PageResources) -> Self {
        self.page = page;
        self
    }
}
