//! The directive stream between the unparser and the line interpreter.
//!
//! The unparser never decides where a line ends up on screen; it emits
//! literal text interleaved with layout and annotation directives, and the
//! interpreter resolves them. This stream is the only channel between the two.

use std::fmt;

/// Kind of a highlighted region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Create,
    Delete,
    MoveTo,
    MoveFrom,
    Modify,
    /// The struck-through previous value inside a [`StyleKind::Modify`] region.
    Strike,
}

impl StyleKind {
    /// CSS class used for this region in HTML output.
    pub fn css_class(&self) -> &'static str {
        match self {
            StyleKind::Create => "create",
            StyleKind::Delete => "delete",
            StyleKind::MoveTo => "move_to",
            StyleKind::MoveFrom => "move_from",
            StyleKind::Modify => "modify",
            StyleKind::Strike => "strike",
        }
    }

    /// Opening bracket used for this region in plain-text output.
    pub fn plain_open(&self) -> &'static str {
        match self {
            StyleKind::Create => "[(+) ",
            StyleKind::Delete => "[(-) ",
            StyleKind::MoveTo => "[(MOVE_TO) ",
            StyleKind::MoveFrom => "[(MOVE_FROM) ",
            StyleKind::Modify => "[(MODIFY) ",
            StyleKind::Strike => "",
        }
    }

    /// Closing bracket used for this region in plain-text output.
    pub fn plain_close(&self) -> &'static str {
        match self {
            StyleKind::Strike => " => ",
            _ => "]",
        }
    }
}

/// One element of the directive stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Output text, unescaped.
    Literal(String),
    /// Ends the current logical line.
    LineBreak,
    /// Raises the indent level, starting with the line that carries it.
    Indent,
    /// Lowers the indent level, starting with the line that carries it.
    Outdent,
    /// Lowers the indent level once the current line has been emitted.
    DeferredOutdent,
    StyleOpen(StyleKind),
    /// Closes the innermost open style.
    StyleClose,
    /// Where a move starts (the MOVE_TO node).
    MoveAnchorOrigin(u32),
    /// Where a move lands (the MOVE_FROM node).
    MoveAnchorEnd(u32),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Literal(text) => write!(f, "{text}"),
            Directive::LineBreak => write!(f, "⏎"),
            Directive::Indent => write!(f, "→"),
            Directive::Outdent => write!(f, "←"),
            Directive::DeferredOutdent => write!(f, "↤"),
            Directive::StyleOpen(kind) => write!(f, "{{{}", kind.css_class()),
            Directive::StyleClose => write!(f, "}}"),
            Directive::MoveAnchorOrigin(id) => write!(f, "@{id}>"),
            Directive::MoveAnchorEnd(id) => write!(f, ">@{id}"),
        }
    }
}

/// A piece of directive stream under construction.
///
/// Adjacent literals are merged as they are pushed, so the interpreter sees
/// one `Literal` per run of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment(Vec<Directive>);

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) {
        if let Directive::Literal(text) = directive {
            self.push_str(&text);
        } else {
            self.0.push(directive);
        }
    }

    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Directive::Literal(last)) = self.0.last_mut() {
            last.push_str(text);
        } else {
            self.0.push(Directive::Literal(text.to_owned()));
        }
    }

    pub fn append(&mut self, other: Fragment) {
        for directive in other.0 {
            self.push(directive);
        }
    }

    /// Concatenate `parts`, putting `separator` between consecutive parts.
    pub fn join(parts: Vec<Fragment>, separator: &[Directive]) -> Fragment {
        let mut joined = Fragment::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                for directive in separator {
                    joined.push(directive.clone());
                }
            }
            joined.append(part);
        }
        joined
    }

    /// Length in characters of the literal text, ignoring every directive.
    pub fn text_len(&self) -> usize {
        self.0
            .iter()
            .map(|d| match d {
                Directive::Literal(text) => text.chars().count(),
                _ => 0,
            })
            .sum()
    }

    pub fn as_slice(&self) -> &[Directive] {
        &self.0
    }

    pub fn into_directives(self) -> Vec<Directive> {
        self.0
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for directive in &self.0 {
            write!(f, "{directive}")?;
        }
        Ok(())
    }
}
