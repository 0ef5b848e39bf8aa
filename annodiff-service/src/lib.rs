//! Diff service boundary for annodiff.
//!
//! The structural differencing itself runs in an external service that takes
//! two canonical trees and answers with one annotated diff tree. This crate
//! encodes the request, hands it to a [`DiffService`], decodes the answer and
//! renders it.
//!
//! Transport-agnostic: a [`DiffService`] is anything that turns a request
//! JSON string into a response JSON string (an HTTP client, a subprocess, an
//! in-process implementation). Closures implement it directly.

use std::fmt;

use annodiff::wire::WireCanonicalNode;
use annodiff::{CanonicalNode, DiffNode, RenderError, RenderOptions, decode_diff_tree};
use facet::Facet;
use facet_error as error;

#[cfg(feature = "tracing")]
use tracing::debug;

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

/// Request sent to the diff service: the two documents to compare, as
/// canonical trees.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct DiffRequest {
    pub original: WireCanonicalNode,
    pub modified: WireCanonicalNode,
}

impl DiffRequest {
    pub fn new(original: &CanonicalNode, modified: &CanonicalNode) -> Self {
        Self {
            original: original.into(),
            modified: modified.into(),
        }
    }

    /// Serialize this request to JSON.
    pub fn to_json(&self) -> String {
        facet_json::to_string(self).expect("DiffRequest serialization should not fail")
    }

    /// Deserialize a request from JSON, as a service implementation would.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        facet_json::from_str(json).map_err(|e| RenderError::Decode {
            message: e.to_string(),
        })
    }
}

/// The external structural differencing service.
///
/// Takes a [`DiffRequest`] as JSON and returns the diff tree as JSON.
/// Timeouts and retries are the transport's business.
pub trait DiffService {
    type Error: fmt::Display;

    fn diff(&self, request_json: &str) -> Result<String, Self::Error>;
}

impl<F, E> DiffService for F
where
    F: Fn(&str) -> Result<String, E>,
    E: fmt::Display,
{
    type Error = E;

    fn diff(&self, request_json: &str) -> Result<String, E> {
        self(request_json)
    }
}

/// Errors that can occur while comparing two documents.
#[derive(Facet, Debug)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum CompareError {
    /// diff service failed: {message}
    Service { message: String },

    /// {0}
    Render(#[facet(error::from)] RenderError),
}

/// Runs the full pipeline: encode, call the service, decode, render.
pub struct Comparer<S> {
    service: S,
    options: RenderOptions,
}

impl<S: DiffService> Comparer<S> {
    /// Create a comparer that renders plain text.
    pub fn new(service: S) -> Self {
        Self {
            service,
            options: RenderOptions::default(),
        }
    }

    /// Set the rendering options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Ask the service for the diff tree of two documents.
    pub fn diff_tree(
        &self,
        original: &CanonicalNode,
        modified: &CanonicalNode,
    ) -> Result<DiffNode, CompareError> {
        let request = DiffRequest::new(original, modified).to_json();
        debug!(request_len = request.len(), "sending diff request");

        let response = self
            .service
            .diff(&request)
            .map_err(|e| CompareError::Service {
                message: e.to_string(),
            })?;
        debug!(response_len = response.len(), "received diff response");

        let tree = decode_diff_tree(&response)?;
        debug!("decoded diff tree");
        Ok(tree)
    }

    /// Compare two documents and render the diff per the configured mode.
    pub fn compare(
        &self,
        original: &CanonicalNode,
        modified: &CanonicalNode,
    ) -> Result<String, CompareError> {
        let tree = self.diff_tree(original, modified)?;
        let rendered = annodiff::render(&tree, &self.options)?;
        debug!(
            mode = ?self.options.mode,
            output_len = rendered.len(),
            "rendered comparison"
        );
        Ok(rendered)
    }

    /// Compare two documents and render the diff as a full HTML page.
    pub fn compare_page(
        &self,
        original: &CanonicalNode,
        modified: &CanonicalNode,
    ) -> Result<String, CompareError> {
        let tree = self.diff_tree(original, modified)?;
        let page = annodiff::render_page(&tree, &self.options)?;
        debug!(output_len = page.len(), "rendered comparison page");
        Ok(page)
    }
}
