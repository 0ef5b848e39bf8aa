//! Tree pretty-printing for debugging.
//!
//! One node per line, tab-indented by depth, attributes and their values
//! listed as children the way they travel on the wire.

use crate::model::{Annotation, Attribute, CanonicalNode, DiffNode, Label, Node, NodeKind};
use std::fmt;

/// Displays a canonical tree as `LABEL:value` lines.
pub struct CanonicalDump<'a>(pub &'a CanonicalNode);

/// Displays a diff tree as `[REFERENCE_TYPE] LABEL: value` lines.
///
/// Modified nodes show `old => new`, moved nodes their pairing id.
pub struct DiffDump<'a>(pub &'a DiffNode);

impl fmt::Display for CanonicalDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        walk(f, self.0, 0, &|f, label, value, _: &()| writeln!(f, "{label}:{value}"))
    }
}

impl fmt::Display for DiffDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        walk(f, self.0, 0, &|f, label, value, annotation: &Annotation| {
            write!(f, "[{}] {label}", annotation.reference_type())?;
            match annotation {
                Annotation::Modify { old_value } => write!(f, ": {old_value} => {value}")?,
                _ if !value.is_empty() => write!(f, ": {value}")?,
                _ => {}
            }
            if let Some(move_id) = annotation.move_id() {
                write!(f, " #{move_id}")?;
            }
            writeln!(f)
        })
    }
}

type WriteNode<A> = dyn Fn(&mut fmt::Formatter<'_>, Label, &str, &A) -> fmt::Result;

fn walk<A>(
    f: &mut fmt::Formatter<'_>,
    node: &Node<A>,
    depth: usize,
    write_node: &WriteNode<A>,
) -> fmt::Result {
    indent(f, depth)?;
    write_node(f, node.label(), node.value(), &node.annotation)?;
    match &node.kind {
        NodeKind::Document(children) => {
            for child in children {
                walk(f, child, depth + 1, write_node)?;
            }
        }
        NodeKind::Prolog(attributes) => {
            for attr in attributes {
                walk_attribute(f, attr, depth + 1, write_node)?;
            }
        }
        NodeKind::Element(element) => {
            for attr in &element.attributes {
                walk_attribute(f, attr, depth + 1, write_node)?;
            }
            for child in &element.content {
                walk(f, child, depth + 1, write_node)?;
            }
        }
        NodeKind::CharData(_) | NodeKind::Comment(_) => {}
    }
    Ok(())
}

fn walk_attribute<A>(
    f: &mut fmt::Formatter<'_>,
    attr: &Attribute<A>,
    depth: usize,
    write_node: &WriteNode<A>,
) -> fmt::Result {
    indent(f, depth)?;
    write_node(f, Label::Attribute, &attr.name, &attr.annotation)?;
    indent(f, depth + 1)?;
    write_node(
        f,
        Label::AttributeValue,
        &attr.value.text,
        &attr.value.annotation,
    )
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("\t")?;
    }
    Ok(())
}
