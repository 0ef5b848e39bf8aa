//! Line interpreter: directive stream to indented, balanced lines.
//!
//! The stream is split at [`Directive::LineBreak`]. Each line is resolved
//! against state owned by a single [`interpret`] call:
//!
//! - the indent level, raised and lowered by `Indent`/`Outdent` on the line
//!   that carries them, and lowered by `DeferredOutdent` only after that line
//!   has been emitted;
//! - the style stack, so a region opened on one line stays open on the
//!   following lines until its close;
//! - a ledger of move anchors, checked for pairing once the stream ends.
//!
//! Every line is emitted as an independent unit: styles still open when it
//! starts are re-opened in front of it, and styles still open when it ends
//! are closed behind it.

use crate::directive::{Directive, StyleKind};
use crate::error::RenderError;
use crate::options::OutputMode;
use crate::trace;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

/// One end of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Placed on the MOVE_TO node, where the moved content used to be.
    Origin(u32),
    /// Placed on the MOVE_FROM node, where the moved content is now.
    End(u32),
}

impl Anchor {
    pub fn move_id(&self) -> u32 {
        match self {
            Anchor::Origin(id) | Anchor::End(id) => *id,
        }
    }
}

impl fmt::Display for Anchor {
    /// The element id this anchor gets in HTML output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Origin(id) => write!(f, "move_from_{id}"),
            Anchor::End(id) => write!(f, "move_to_{id}"),
        }
    }
}

/// A resolved piece of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, already escaped for HTML output.
    Text(String),
    Open(StyleKind),
    Close(StyleKind),
    Anchor(Anchor),
}

/// One output line with its resolved indent and balanced style segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub indent: usize,
    pub segments: Vec<Segment>,
}

impl RenderedLine {
    /// The line's literal text, without any annotation.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Visual link between the two anchors of one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    pub move_id: u32,
}

impl Connector {
    pub fn origin(&self) -> Anchor {
        Anchor::Origin(self.move_id)
    }

    pub fn end(&self) -> Anchor {
        Anchor::End(self.move_id)
    }
}

/// Result of interpreting a directive stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub mode: OutputMode,
    pub lines: Vec<RenderedLine>,
    /// One per move id, ordered by id. Empty in plain mode.
    pub connectors: Vec<Connector>,
}

/// Interpret a directive stream into lines (and connectors, in HTML mode).
///
/// # Errors
///
/// Fails when a style is closed on an empty stack or left open at the end of
/// the stream, when an outdent would go below column zero, or when a move id
/// does not have exactly one origin and one end anchor.
pub fn interpret(directives: &[Directive], mode: OutputMode) -> Result<RenderedOutput, RenderError> {
    let mut interpreter = LineInterpreter::new(mode);
    for (index, line) in directives
        .split(|directive| matches!(directive, Directive::LineBreak))
        .enumerate()
    {
        interpreter.line(index + 1, line)?;
    }
    interpreter.finish()
}

#[derive(Debug, Default, Clone, Copy)]
struct AnchorCount {
    origins: usize,
    ends: usize,
}

struct LineInterpreter {
    mode: OutputMode,
    indent: usize,
    styles: SmallVec<[StyleKind; 8]>,
    anchors: BTreeMap<u32, AnchorCount>,
    lines: Vec<RenderedLine>,
}

impl LineInterpreter {
    fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            indent: 0,
            styles: SmallVec::new(),
            anchors: BTreeMap::new(),
            lines: Vec::new(),
        }
    }

    fn line(&mut self, number: usize, directives: &[Directive]) -> Result<(), RenderError> {
        let mut raise = 0;
        let mut lower = 0;
        let mut deferred = 0;
        for directive in directives {
            match directive {
                Directive::Indent => raise += 1,
                Directive::Outdent => lower += 1,
                Directive::DeferredOutdent => deferred += 1,
                _ => {}
            }
        }
        self.indent = (self.indent + raise)
            .checked_sub(lower)
            .ok_or(RenderError::IndentUnderflow { line: number })?;

        let mut segments: Vec<Segment> = self.styles.iter().copied().map(Segment::Open).collect();
        for directive in directives {
            match directive {
                Directive::Literal(text) => segments.push(Segment::Text(self.escape(text))),
                Directive::StyleOpen(kind) => {
                    self.styles.push(*kind);
                    segments.push(Segment::Open(*kind));
                }
                Directive::StyleClose => {
                    let kind = self
                        .styles
                        .pop()
                        .ok_or(RenderError::UnbalancedStyleMarkers { line: number })?;
                    segments.push(Segment::Close(kind));
                }
                Directive::MoveAnchorOrigin(id) => {
                    self.anchors.entry(*id).or_default().origins += 1;
                    segments.push(Segment::Anchor(Anchor::Origin(*id)));
                }
                Directive::MoveAnchorEnd(id) => {
                    self.anchors.entry(*id).or_default().ends += 1;
                    segments.push(Segment::Anchor(Anchor::End(*id)));
                }
                Directive::LineBreak
                | Directive::Indent
                | Directive::Outdent
                | Directive::DeferredOutdent => {}
            }
        }
        segments.extend(self.styles.iter().rev().copied().map(Segment::Close));

        trace!(
            line = number,
            indent = self.indent,
            open = self.styles.len(),
            "interpreted line"
        );
        self.lines.push(RenderedLine {
            indent: self.indent,
            segments,
        });

        self.indent = self
            .indent
            .checked_sub(deferred)
            .ok_or(RenderError::IndentUnderflow { line: number })?;
        Ok(())
    }

    fn escape(&self, text: &str) -> String {
        match self.mode {
            OutputMode::Plain => text.to_owned(),
            OutputMode::Html => escape_html(text),
        }
    }

    fn finish(self) -> Result<RenderedOutput, RenderError> {
        if !self.styles.is_empty() {
            return Err(RenderError::UnbalancedStyleMarkers {
                line: self.lines.len(),
            });
        }

        for (&move_id, count) in &self.anchors {
            if count.origins > 1 || count.ends > 1 {
                return Err(RenderError::DuplicateMoveAnchor { move_id });
            }
            if count.origins == 0 || count.ends == 0 {
                return Err(RenderError::UnresolvedMoveAnchor { move_id });
            }
        }

        let connectors = match self.mode {
            OutputMode::Plain => Vec::new(),
            OutputMode::Html => self
                .anchors
                .keys()
                .map(|&move_id| Connector { move_id })
                .collect(),
        };

        Ok(RenderedOutput {
            mode: self.mode,
            lines: self.lines,
            connectors,
        })
    }
}

/// Escape `&`, `<` and `>` for HTML text content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
