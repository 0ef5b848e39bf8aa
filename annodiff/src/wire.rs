//! JSON wire format exchanged with the diff service.
//!
//! On the wire every node is a flat `{label, value, children}` object, with
//! `referenceType`, `oldValue`, and `moveId` added on diff trees. Conversion
//! into the typed model checks the shape invariants the flat format cannot
//! express (attribute arity, leaf labels, annotation payloads) and reports
//! the offending node.

use crate::error::RenderError;
use crate::model::{
    Annotation, Attribute, AttributeValue, CanonicalNode, DiffNode, Element, Label, Node,
    NodeKind, ReferenceType,
};
use facet::Facet;

/// Canonical tree node as serialized on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
#[facet(rename_all = "camelCase")]
pub struct WireCanonicalNode {
    pub label: String,
    #[facet(default)]
    pub value: String,
    #[facet(default)]
    pub children: Vec<WireCanonicalNode>,
}

/// Diff tree node as returned by the diff service.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
#[facet(rename_all = "camelCase")]
pub struct WireDiffNode {
    pub label: String,
    #[facet(default)]
    pub value: String,
    #[facet(default)]
    pub children: Vec<WireDiffNode>,
    #[facet(default)]
    pub reference_type: ReferenceType,
    #[facet(default)]
    pub old_value: Option<String>,
    #[facet(default)]
    pub move_id: Option<u32>,
}

/// Decode a diff tree from the diff service's JSON response.
pub fn decode_diff_tree(json: &str) -> Result<DiffNode, RenderError> {
    let wire: WireDiffNode = facet_json::from_str(json).map_err(|e| RenderError::Decode {
        message: e.to_string(),
    })?;
    DiffNode::try_from(&wire)
}

/// Decode a canonical tree from JSON.
pub fn decode_canonical_tree(json: &str) -> Result<CanonicalNode, RenderError> {
    let wire: WireCanonicalNode = facet_json::from_str(json).map_err(|e| RenderError::Decode {
        message: e.to_string(),
    })?;
    CanonicalNode::try_from(&wire)
}

/// Encode a canonical tree as JSON.
pub fn encode_canonical_tree(tree: &CanonicalNode) -> String {
    facet_json::to_string(&WireCanonicalNode::from(tree))
        .expect("WireCanonicalNode serialization should not fail")
}

/// Encode a diff tree as JSON, in the shape the diff service produces.
pub fn encode_diff_tree(tree: &DiffNode) -> String {
    facet_json::to_string(&WireDiffNode::from(tree))
        .expect("WireDiffNode serialization should not fail")
}

/// Flat view over both wire shapes, so one builder handles either.
trait WireNode: Sized {
    type Annotation;

    fn label(&self) -> &str;
    fn value(&self) -> &str;
    fn children(&self) -> &[Self];
    fn annotation(&self) -> Result<Self::Annotation, RenderError>;

    fn malformed(&self, reason: impl Into<String>) -> RenderError {
        RenderError::malformed(self.label(), self.value(), reason)
    }
}

impl WireNode for WireCanonicalNode {
    type Annotation = ();

    fn label(&self) -> &str {
        &self.label
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn annotation(&self) -> Result<(), RenderError> {
        Ok(())
    }
}

impl WireNode for WireDiffNode {
    type Annotation = Annotation;

    fn label(&self) -> &str {
        &self.label
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn annotation(&self) -> Result<Annotation, RenderError> {
        // The service sends `moveId` and `oldValue` on every node; they only
        // mean something for the reference types that use them.
        Ok(match self.reference_type {
            ReferenceType::None => Annotation::None,
            ReferenceType::Create => Annotation::Create,
            ReferenceType::Delete => Annotation::Delete,
            ReferenceType::MoveTo => Annotation::MoveTo {
                move_id: self
                    .move_id
                    .ok_or_else(|| self.malformed("MOVE_TO without moveId"))?,
            },
            ReferenceType::MoveFrom => Annotation::MoveFrom {
                move_id: self
                    .move_id
                    .ok_or_else(|| self.malformed("MOVE_FROM without moveId"))?,
            },
            ReferenceType::Modify => Annotation::Modify {
                old_value: self
                    .old_value
                    .clone()
                    .ok_or_else(|| self.malformed("MODIFY without oldValue"))?,
            },
        })
    }
}

fn parse_label<W: WireNode>(wire: &W) -> Result<Label, RenderError> {
    Label::parse(wire.label()).ok_or_else(|| wire.malformed("unknown label"))
}

fn expect_leaf<W: WireNode>(wire: &W) -> Result<(), RenderError> {
    if wire.children().is_empty() {
        Ok(())
    } else {
        Err(wire.malformed(format!(
            "leaf node has {} children",
            wire.children().len()
        )))
    }
}

/// Build a node that may appear as element content or at document level.
fn build_node<W: WireNode>(wire: &W) -> Result<Node<W::Annotation>, RenderError> {
    let kind = match parse_label(wire)? {
        Label::Document => {
            return Err(wire.malformed("DOCUMENT is only valid at the root"));
        }
        Label::Prolog => {
            return Err(wire.malformed("PROLOG is only valid directly under DOCUMENT"));
        }
        Label::Attribute | Label::AttributeValue => {
            return Err(wire.malformed("attribute outside of an element or prolog"));
        }
        Label::Element => {
            let mut attributes = Vec::new();
            let mut content = Vec::new();
            for child in wire.children() {
                if parse_label(child)? == Label::Attribute {
                    attributes.push(build_attribute(child)?);
                } else {
                    content.push(build_node(child)?);
                }
            }
            NodeKind::Element(Element {
                tag: wire.value().to_owned(),
                attributes,
                content,
            })
        }
        Label::CharData => {
            expect_leaf(wire)?;
            NodeKind::CharData(wire.value().to_owned())
        }
        Label::Comment => {
            expect_leaf(wire)?;
            NodeKind::Comment(wire.value().to_owned())
        }
    };
    Ok(Node {
        kind,
        annotation: wire.annotation()?,
    })
}

fn build_root<W: WireNode>(wire: &W) -> Result<Node<W::Annotation>, RenderError> {
    match parse_label(wire)? {
        Label::Document => {
            let mut children = Vec::with_capacity(wire.children().len());
            for child in wire.children() {
                children.push(build_document_child(child)?);
            }
            Ok(Node {
                kind: NodeKind::Document(children),
                annotation: wire.annotation()?,
            })
        }
        _ => build_node(wire),
    }
}

fn build_document_child<W: WireNode>(wire: &W) -> Result<Node<W::Annotation>, RenderError> {
    if parse_label(wire)? != Label::Prolog {
        return build_node(wire);
    }
    let attributes = wire
        .children()
        .iter()
        .map(|child| match parse_label(child)? {
            Label::Attribute => build_attribute(child),
            _ => Err(child.malformed("PROLOG children must be ATTRIBUTE nodes")),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node {
        kind: NodeKind::Prolog(attributes),
        annotation: wire.annotation()?,
    })
}

fn build_attribute<W: WireNode>(wire: &W) -> Result<Attribute<W::Annotation>, RenderError> {
    let [value] = wire.children() else {
        return Err(wire.malformed(format!(
            "ATTRIBUTE must have exactly one child, found {}",
            wire.children().len()
        )));
    };
    if parse_label(value)? != Label::AttributeValue {
        return Err(value.malformed("ATTRIBUTE child must be ATTRIBUTE_VALUE"));
    }
    expect_leaf(value)?;
    Ok(Attribute {
        name: wire.value().to_owned(),
        value: AttributeValue {
            text: value.value().to_owned(),
            annotation: value.annotation()?,
        },
        annotation: wire.annotation()?,
    })
}

impl TryFrom<&WireCanonicalNode> for CanonicalNode {
    type Error = RenderError;

    fn try_from(wire: &WireCanonicalNode) -> Result<Self, Self::Error> {
        build_root(wire)
    }
}

impl TryFrom<&WireDiffNode> for DiffNode {
    type Error = RenderError;

    fn try_from(wire: &WireDiffNode) -> Result<Self, Self::Error> {
        build_root(wire)
    }
}

/// Flatten a typed node back into `(label, value, children)` wire pieces.
///
/// `wrap` turns one flattened node plus its annotation into a wire node.
fn flatten<A, W>(node: &Node<A>, wrap: &impl Fn(&str, &str, Vec<W>, &A) -> W) -> W {
    let children = match &node.kind {
        NodeKind::Document(children) => children.iter().map(|c| flatten(c, wrap)).collect(),
        NodeKind::Prolog(attributes) => attributes
            .iter()
            .map(|attr| flatten_attribute(attr, wrap))
            .collect(),
        NodeKind::Element(element) => element
            .attributes
            .iter()
            .map(|attr| flatten_attribute(attr, wrap))
            .chain(element.content.iter().map(|c| flatten(c, wrap)))
            .collect(),
        NodeKind::CharData(_) | NodeKind::Comment(_) => Vec::new(),
    };
    wrap(
        node.label().as_str(),
        node.value(),
        children,
        &node.annotation,
    )
}

fn flatten_attribute<A, W>(
    attr: &Attribute<A>,
    wrap: &impl Fn(&str, &str, Vec<W>, &A) -> W,
) -> W {
    let value = wrap(
        Label::AttributeValue.as_str(),
        &attr.value.text,
        Vec::new(),
        &attr.value.annotation,
    );
    wrap(
        Label::Attribute.as_str(),
        &attr.name,
        vec![value],
        &attr.annotation,
    )
}

impl From<&CanonicalNode> for WireCanonicalNode {
    fn from(node: &CanonicalNode) -> Self {
        flatten(node, &|label, value, children, _: &()| WireCanonicalNode {
            label: label.to_owned(),
            value: value.to_owned(),
            children,
        })
    }
}

impl From<&DiffNode> for WireDiffNode {
    fn from(node: &DiffNode) -> Self {
        flatten(node, &|label, value, children, annotation: &Annotation| {
            WireDiffNode {
                label: label.to_owned(),
                value: value.to_owned(),
                children,
                reference_type: annotation.reference_type(),
                old_value: match annotation {
                    Annotation::Modify { old_value } => Some(old_value.clone()),
                    _ => None,
                },
                move_id: annotation.move_id(),
            }
        })
    }
}
