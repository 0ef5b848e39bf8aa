//! Render structural diffs between markup documents.
//!
//! annodiff takes the annotated tree a diff service produces for two
//! documents and renders it as indented plain text or HTML:
//! - **Model**: canonical and annotated trees with one variant per node kind
//! - **Wire**: the JSON shape exchanged with the diff service, via facet-json
//! - **Unparsing**: diff tree to a stream of layout and annotation directives
//! - **Interpretation**: directives to indented lines with balanced regions and
//!   move connectors
//! - **Assembly**: lines to plain text, an HTML body, or a full HTML page
//!
//! # Example
//!
//! ```rust
//! use annodiff::{Annotation, Attribute, DiffNode, Node, RenderOptions, render};
//!
//! let tree: DiffNode =
//!     Node::element("a", vec![Attribute::new("b", "\"1\"")], vec![]).annotated(Annotation::Create);
//! assert_eq!(render(&tree, &RenderOptions::plain()).unwrap(), "[(+) <a b=\"1\"/>]");
//! ```

mod tracing_macros;

pub mod assemble;
pub mod directive;
pub mod dump;
mod error;
pub mod interpret;
pub mod model;
mod options;
pub mod unparse;
pub mod wire;

pub use assemble::{assemble, assemble_page};
pub use directive::{Directive, Fragment, StyleKind};
pub use dump::{CanonicalDump, DiffDump};
pub use error::RenderError;
pub use interpret::{Anchor, Connector, RenderedLine, RenderedOutput, Segment, interpret};
pub use model::{
    Annotation, Attribute, AttributeValue, CanonicalNode, DiffNode, Element, Label, Node,
    NodeKind, ReferenceType,
};
pub use options::{OutputMode, PageResources, RenderOptions};
pub use unparse::unparse_document;
pub use wire::{decode_canonical_tree, decode_diff_tree, encode_canonical_tree, encode_diff_tree};

/// Unparse and interpret a diff tree, without assembling it.
///
/// # Errors
///
/// See [`interpret`].
pub fn render_lines(tree: &DiffNode, options: &RenderOptions) -> Result<RenderedOutput, RenderError> {
    let directives = unparse_document(tree, options);
    let output = interpret(&directives, options.mode)?;
    debug!(
        lines = output.lines.len(),
        connectors = output.connectors.len(),
        "rendered diff tree"
    );
    Ok(output)
}

/// Render a diff tree to plain text or an HTML body, per `options.mode`.
///
/// # Errors
///
/// Fails when the tree breaks a pairing or nesting invariant; see
/// [`RenderError`].
pub fn render(tree: &DiffNode, options: &RenderOptions) -> Result<String, RenderError> {
    Ok(assemble(&render_lines(tree, options)?, options))
}

/// Render a diff tree to a full HTML page, whatever `options.mode` says.
///
/// # Errors
///
/// Same as [`render`].
pub fn render_page(tree: &DiffNode, options: &RenderOptions) -> Result<String, RenderError> {
    let options = RenderOptions {
        mode: OutputMode::Html,
        ..options.clone()
    };
    Ok(assemble_page(&render_lines(tree, &options)?, &options))
}

/// Decode a diff service response and render it.
///
/// # Errors
///
/// Fails on undecodable JSON, on a tree that breaks its shape invariants, or
/// as [`render`] does.
pub fn render_json(json: &str, options: &RenderOptions) -> Result<String, RenderError> {
    let tree = decode_diff_tree(json)?;
    trace!("decoded diff tree:\n{}", DiffDump(&tree));
    render(&tree, options)
}
