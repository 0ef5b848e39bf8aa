//! Canonical and annotated tree model.
//!
//! Both documents are simplified into the same node shape before diffing, and
//! the diff service answers with that shape again, annotated per node. The
//! shape is generic over the annotation so the two trees share one definition:
//!
//! - [`CanonicalNode`] = `Node<()>`: one document, pre-diff
//! - [`DiffNode`] = `Node<Annotation>`: the merged, annotated diff tree
//!
//! Attributes and their values carry an annotation of their own, since the
//! diff service classifies them like any other node.

use facet::Facet;
use std::fmt;

/// A node of a canonical tree (no annotations).
pub type CanonicalNode = Node<()>;

/// A node of a diff tree (annotated with its change classification).
pub type DiffNode = Node<Annotation>;

/// Change classification attached to every diff tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Facet)]
#[repr(u8)]
pub enum ReferenceType {
    /// Unchanged
    #[default]
    #[facet(rename = "NONE")]
    None,
    /// Present only in the modified document
    #[facet(rename = "CREATE")]
    Create,
    /// Present only in the original document
    #[facet(rename = "DELETE")]
    Delete,
    /// Old location of a moved node
    #[facet(rename = "MOVE_TO")]
    MoveTo,
    /// New location of a moved node
    #[facet(rename = "MOVE_FROM")]
    MoveFrom,
    /// Matched node whose value changed
    #[facet(rename = "MODIFY")]
    Modify,
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceType::None => "NONE",
            ReferenceType::Create => "CREATE",
            ReferenceType::Delete => "DELETE",
            ReferenceType::MoveTo => "MOVE_TO",
            ReferenceType::MoveFrom => "MOVE_FROM",
            ReferenceType::Modify => "MODIFY",
        };
        f.write_str(name)
    }
}

/// Per-node diff metadata.
///
/// Only the variants that need extra data carry it: the pairing id for moves
/// and the previous value for modifications.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Annotation {
    #[default]
    None,
    Create,
    Delete,
    /// Origin of a move; pairs with exactly one [`Annotation::MoveFrom`].
    MoveTo {
        move_id: u32,
    },
    /// Destination of a move; pairs with exactly one [`Annotation::MoveTo`].
    MoveFrom {
        move_id: u32,
    },
    Modify {
        old_value: String,
    },
}

impl Annotation {
    /// The wire-level classification of this annotation.
    pub fn reference_type(&self) -> ReferenceType {
        match self {
            Annotation::None => ReferenceType::None,
            Annotation::Create => ReferenceType::Create,
            Annotation::Delete => ReferenceType::Delete,
            Annotation::MoveTo { .. } => ReferenceType::MoveTo,
            Annotation::MoveFrom { .. } => ReferenceType::MoveFrom,
            Annotation::Modify { .. } => ReferenceType::Modify,
        }
    }

    /// The pairing id, for move annotations.
    pub fn move_id(&self) -> Option<u32> {
        match self {
            Annotation::MoveTo { move_id } | Annotation::MoveFrom { move_id } => Some(*move_id),
            _ => None,
        }
    }
}

/// Wire label of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Document,
    Prolog,
    Element,
    Attribute,
    AttributeValue,
    CharData,
    Comment,
}

impl Label {
    /// The label as spelled on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Document => "DOCUMENT",
            Label::Prolog => "PROLOG",
            Label::Element => "ELEMENT",
            Label::Attribute => "ATTRIBUTE",
            Label::AttributeValue => "ATTRIBUTE_VALUE",
            Label::CharData => "CHARDATA",
            Label::Comment => "COMMENT",
        }
    }

    /// Parse a wire label. Returns `None` for labels this crate doesn't know.
    pub fn parse(label: &str) -> Option<Self> {
        Some(match label {
            "DOCUMENT" => Label::Document,
            "PROLOG" => Label::Prolog,
            "ELEMENT" => Label::Element,
            "ATTRIBUTE" => Label::Attribute,
            "ATTRIBUTE_VALUE" => Label::AttributeValue,
            "CHARDATA" => Label::CharData,
            "COMMENT" => Label::Comment,
            _ => return None,
        })
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tree node: its kind plus an annotation `A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<A> {
    pub kind: NodeKind<A>,
    pub annotation: A,
}

/// The shape of a node, one variant per label.
///
/// Attributes never appear here directly; they live on [`Element`] and on
/// [`NodeKind::Prolog`], which keeps the "attributes first, then content"
/// ordering of the wire format true by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind<A> {
    /// Document root; children are prolog, elements, comments, or text.
    Document(Vec<Node<A>>),
    /// `<?xml ...?>` declaration and its pseudo-attributes.
    Prolog(Vec<Attribute<A>>),
    Element(Element<A>),
    /// Literal text, unescaped.
    CharData(String),
    /// Comment body, without the `<!--` / `-->` delimiters.
    Comment(String),
}

/// An element with its attributes and content, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<A> {
    pub tag: String,
    pub attributes: Vec<Attribute<A>>,
    /// Elements, text, and comments.
    pub content: Vec<Node<A>>,
}

/// A `name=value` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<A> {
    pub name: String,
    pub value: AttributeValue<A>,
    pub annotation: A,
}

/// Attribute value, quotes included as written in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue<A> {
    pub text: String,
    pub annotation: A,
}

impl<A: Default> Node<A> {
    pub fn document(children: Vec<Node<A>>) -> Self {
        Self::unannotated(NodeKind::Document(children))
    }

    pub fn prolog(attributes: Vec<Attribute<A>>) -> Self {
        Self::unannotated(NodeKind::Prolog(attributes))
    }

    pub fn element(
        tag: impl Into<String>,
        attributes: Vec<Attribute<A>>,
        content: Vec<Node<A>>,
    ) -> Self {
        Self::unannotated(NodeKind::Element(Element {
            tag: tag.into(),
            attributes,
            content,
        }))
    }

    pub fn chardata(text: impl Into<String>) -> Self {
        Self::unannotated(NodeKind::CharData(text.into()))
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::unannotated(NodeKind::Comment(text.into()))
    }

    fn unannotated(kind: NodeKind<A>) -> Self {
        Self {
            kind,
            annotation: A::default(),
        }
    }
}

impl<A> Node<A> {
    /// Replace this node's annotation.
    pub fn annotated(mut self, annotation: A) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn label(&self) -> Label {
        match &self.kind {
            NodeKind::Document(_) => Label::Document,
            NodeKind::Prolog(_) => Label::Prolog,
            NodeKind::Element(_) => Label::Element,
            NodeKind::CharData(_) => Label::CharData,
            NodeKind::Comment(_) => Label::Comment,
        }
    }

    /// The primary textual payload: tag name or literal text, empty for
    /// container-only labels.
    pub fn value(&self) -> &str {
        match &self.kind {
            NodeKind::Document(_) | NodeKind::Prolog(_) => "",
            NodeKind::Element(element) => &element.tag,
            NodeKind::CharData(text) | NodeKind::Comment(text) => text,
        }
    }

    /// Map every annotation in the tree, attributes included.
    pub fn map_annotations<B>(self, f: &mut impl FnMut(A) -> B) -> Node<B> {
        let kind = match self.kind {
            NodeKind::Document(children) => NodeKind::Document(
                children
                    .into_iter()
                    .map(|child| child.map_annotations(f))
                    .collect(),
            ),
            NodeKind::Prolog(attributes) => NodeKind::Prolog(
                attributes
                    .into_iter()
                    .map(|attr| attr.map_annotations(f))
                    .collect(),
            ),
            NodeKind::Element(element) => NodeKind::Element(Element {
                tag: element.tag,
                attributes: element
                    .attributes
                    .into_iter()
                    .map(|attr| attr.map_annotations(f))
                    .collect(),
                content: element
                    .content
                    .into_iter()
                    .map(|child| child.map_annotations(f))
                    .collect(),
            }),
            NodeKind::CharData(text) => NodeKind::CharData(text),
            NodeKind::Comment(text) => NodeKind::Comment(text),
        };
        Node {
            kind,
            annotation: f(self.annotation),
        }
    }
}

impl<A: Default> Attribute<A> {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue {
                text: value.into(),
                annotation: A::default(),
            },
            annotation: A::default(),
        }
    }
}

impl<A> Attribute<A> {
    /// Replace the attribute's own annotation (not its value's).
    pub fn annotated(mut self, annotation: A) -> Self {
        self.annotation = annotation;
        self
    }

    /// Replace the annotation of the attribute's value.
    pub fn value_annotated(mut self, annotation: A) -> Self {
        self.value.annotation = annotation;
        self
    }

    fn map_annotations<B>(self, f: &mut impl FnMut(A) -> B) -> Attribute<B> {
        let annotation = f(self.annotation);
        Attribute {
            name: self.name,
            value: AttributeValue {
                text: self.value.text,
                annotation: f(self.value.annotation),
            },
            annotation,
        }
    }
}

impl CanonicalNode {
    /// Lift a canonical tree into a diff tree where nothing changed.
    pub fn into_unchanged(self) -> DiffNode {
        self.map_annotations(&mut |()| Annotation::None)
    }
}

impl DiffNode {
    /// Drop every annotation, keeping the shape and current values.
    pub fn into_canonical(self) -> CanonicalNode {
        self.map_annotations(&mut |_| ())
    }
}
