//! Errors raised while decoding or rendering a diff tree.

use facet::Facet;

/// Errors that can occur while decoding, unparsing, or interpreting a diff tree.
///
/// Every variant is fatal for the current render: a malformed tree means the
/// diff service broke its contract, so no partial output is produced.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum RenderError {
    /// malformed diff tree at {label} node "{value}": {reason}
    MalformedTree {
        label: String,
        value: String,
        reason: String,
    },

    /// unbalanced style markers on line {line}
    UnbalancedStyleMarkers { line: usize },

    /// outdent below column zero on line {line}
    IndentUnderflow { line: usize },

    /// move {move_id} has only one of its two anchors
    UnresolvedMoveAnchor { move_id: u32 },

    /// move {move_id} has more than one origin or end anchor
    DuplicateMoveAnchor { move_id: u32 },

    /// failed to decode tree payload: {message}
    Decode { message: String },
}

impl RenderError {
    pub(crate) fn malformed(
        label: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RenderError::MalformedTree {
            label: label.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
