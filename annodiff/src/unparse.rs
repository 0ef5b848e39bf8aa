//! Unparser: diff tree to directive stream.
//!
//! Walks a [`DiffNode`] and serializes it back into markup-like text,
//! interleaving layout directives (line breaks, indents) and annotation
//! wrappers. The interpreter in [`crate::interpret`] turns the result into
//! lines.

use crate::directive::{Directive, Fragment, StyleKind};
use crate::model::{
    Annotation, Attribute, AttributeValue, DiffNode, Element, NodeKind, ReferenceType,
};
use crate::options::RenderOptions;
use crate::trace;

/// Unparse a whole diff tree into a directive stream.
pub fn unparse_document(root: &DiffNode, options: &RenderOptions) -> Vec<Directive> {
    let fragment = unparse(root, ReferenceType::None, options);
    trace!(%fragment, "unparsed diff tree");
    fragment.into_directives()
}

/// Unparse one node, given the reference type of its parent's wrap context.
pub fn unparse(node: &DiffNode, inherited: ReferenceType, options: &RenderOptions) -> Fragment {
    let own = node.annotation.reference_type();
    let mut fragment = Fragment::new();

    match &node.kind {
        NodeKind::Document(children) => {
            let parts = children
                .iter()
                .map(|child| unparse(child, own, options))
                .collect();
            fragment.append(Fragment::join(parts, &[Directive::LineBreak]));
        }
        NodeKind::Prolog(attributes) => {
            fragment.push_str("<?xml");
            if !attributes.is_empty() {
                fragment.push_str(" ");
                fragment.append(space_joined(attributes, own));
            }
            fragment.push_str("?>");
        }
        NodeKind::Element(element) => unparse_element(&mut fragment, element, own, options),
        NodeKind::CharData(text) => fragment.push_str(text),
        NodeKind::Comment(text) => {
            fragment.push_str("<!--");
            fragment.push_str(text);
            fragment.push_str("-->");
        }
    }

    wrap(fragment, &node.annotation, inherited)
}

fn unparse_element(
    fragment: &mut Fragment,
    element: &Element<Annotation>,
    own: ReferenceType,
    options: &RenderOptions,
) {
    fragment.push_str("<");
    fragment.push_str(&element.tag);

    if !element.attributes.is_empty() {
        let parts: Vec<_> = element
            .attributes
            .iter()
            .map(|attr| unparse_attribute(attr, own))
            .collect();
        let joined = Fragment::join(parts.clone(), &[Directive::Literal(" ".to_owned())]);
        if joined.text_len() < options.attribute_wrap_threshold {
            fragment.push_str(" ");
            fragment.append(joined);
        } else {
            fragment.push(Directive::LineBreak);
            fragment.push(Directive::Indent);
            fragment.push(Directive::Indent);
            fragment.append(Fragment::join(parts, &[Directive::LineBreak]));
            fragment.push(Directive::DeferredOutdent);
            fragment.push(Directive::DeferredOutdent);
        }
    }

    if element.content.is_empty() {
        fragment.push_str("/>");
        return;
    }

    fragment.push_str(">");
    let parts: Vec<_> = element
        .content
        .iter()
        .map(|child| unparse(child, own, options))
        .collect();
    if parts.len() > 1 {
        fragment.push(Directive::LineBreak);
        fragment.push(Directive::Indent);
        fragment.append(Fragment::join(parts, &[Directive::LineBreak]));
        fragment.push(Directive::LineBreak);
        fragment.push(Directive::Outdent);
    } else {
        fragment.append(Fragment::join(parts, &[]));
    }
    fragment.push_str("</");
    fragment.push_str(&element.tag);
    fragment.push_str(">");
}

fn space_joined(attributes: &[Attribute<Annotation>], own: ReferenceType) -> Fragment {
    let parts = attributes
        .iter()
        .map(|attr| unparse_attribute(attr, own))
        .collect();
    Fragment::join(parts, &[Directive::Literal(" ".to_owned())])
}

/// Unparse a `name=value` attribute.
pub fn unparse_attribute(attr: &Attribute<Annotation>, inherited: ReferenceType) -> Fragment {
    let own = attr.annotation.reference_type();
    let mut fragment = Fragment::new();
    fragment.push_str(&attr.name);
    fragment.push_str("=");
    fragment.append(unparse_attribute_value(&attr.value, own));
    wrap(fragment, &attr.annotation, inherited)
}

fn unparse_attribute_value(
    value: &AttributeValue<Annotation>,
    inherited: ReferenceType,
) -> Fragment {
    let mut fragment = Fragment::new();
    fragment.push_str(&value.text);
    wrap(fragment, &value.annotation, inherited)
}

/// Wrap an unparsed fragment in the markers for its annotation.
///
/// A node classified the same way as its parent is not wrapped again; the
/// parent's region already covers it. Move anchors are kept even then, so the
/// pairing of every move id survives.
fn wrap(fragment: Fragment, annotation: &Annotation, inherited: ReferenceType) -> Fragment {
    let mut wrapped = Fragment::new();
    let style = match annotation {
        Annotation::None => return fragment,
        Annotation::Create => StyleKind::Create,
        Annotation::Delete => StyleKind::Delete,
        Annotation::MoveTo { move_id } => {
            wrapped.push(Directive::MoveAnchorOrigin(*move_id));
            StyleKind::MoveTo
        }
        Annotation::MoveFrom { move_id } => {
            wrapped.push(Directive::MoveAnchorEnd(*move_id));
            StyleKind::MoveFrom
        }
        Annotation::Modify { .. } => StyleKind::Modify,
    };

    if annotation.reference_type() == inherited {
        wrapped.append(fragment);
        return wrapped;
    }

    wrapped.push(Directive::StyleOpen(style));
    if let Annotation::Modify { old_value } = annotation {
        wrapped.push(Directive::StyleOpen(StyleKind::Strike));
        wrapped.push_str(old_value);
        wrapped.push(Directive::StyleClose);
    }
    wrapped.append(fragment);
    wrapped.push(Directive::StyleClose);
    wrapped
}
