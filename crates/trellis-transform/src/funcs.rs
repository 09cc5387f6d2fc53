//! Builders for common [`TransformFn`]s.
//!
//! Functions that insert nodes take a fragment [`DomTree`] and import a fresh
//! copy of its top-level nodes every time they run, so one transform can be
//! applied to many targets.

use owo_colors::OwoColorize;
use trellis_css::Chain;
use trellis_dom::{DomTree, NodeId};

use crate::{TransformError, TransformFn, apply_chain, parse_chain};

const TRACE_PREFIX: &str = "[Trellis Trace]";

/// Copy the top-level nodes of `fragment` into `tree`, detached.
fn import_fragment(tree: &mut DomTree, fragment: &DomTree) -> Vec<NodeId> {
    fragment
        .children(NodeId::ROOT)
        .iter()
        .map(|&id| tree.import_subtree(fragment, id))
        .collect()
}

/// Append the fragment's nodes after the target's children.
#[must_use]
pub fn append_children(fragment: DomTree) -> TransformFn {
    Box::new(move |tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        for child in import_fragment(tree, &fragment) {
            tree.append_child(id, child);
        }
        Ok(())
    })
}

/// Insert the fragment's nodes, in order, before the target's first child.
#[must_use]
pub fn prepend_children(fragment: DomTree) -> TransformFn {
    Box::new(move |tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        let first = tree.first_child(id);
        for child in import_fragment(tree, &fragment) {
            tree.insert_before(id, child, first);
        }
        Ok(())
    })
}

/// Detach every child of the target.
#[must_use]
pub fn remove_children() -> TransformFn {
    Box::new(|tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        tree.remove_children(id);
        Ok(())
    })
}

/// Swap the target's children for the fragment's nodes.
#[must_use]
pub fn replace_children(fragment: DomTree) -> TransformFn {
    Box::new(move |tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        tree.remove_children(id);
        for child in import_fragment(tree, &fragment) {
            tree.append_child(id, child);
        }
        Ok(())
    })
}

/// Put the fragment's nodes where the target is and detach the target.
///
/// Fails with [`TransformError::ReplaceRoot`] on a node without a parent.
#[must_use]
pub fn replace(fragment: DomTree) -> TransformFn {
    Box::new(move |tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        if tree.parent(id).is_none() {
            return Err(TransformError::ReplaceRoot);
        }
        let replacements = import_fragment(tree, &fragment);
        if tree.replace_node(id, &replacements) {
            Ok(())
        } else {
            Err(TransformError::ReplaceRoot)
        }
    })
}

/// Set `name` to `value` on the target element, adding the attribute if it
/// is missing. Non-elements are left alone.
#[must_use]
pub fn modify_attrib(name: &str, value: &str) -> TransformFn {
    let name = name.to_string();
    let value = value.to_string();
    Box::new(move |tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        if let Some(element) = tree.as_element_mut(id) {
            element.set_attribute(&name, &value);
        }
        Ok(())
    })
}

/// Rewrite the value of `name` with `f`, only where the attribute exists.
#[must_use]
pub fn transform_attrib<F>(name: &str, f: F) -> TransformFn
where
    F: Fn(&str) -> String + 'static,
{
    let name = name.to_string();
    Box::new(move |tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        let Some(element) = tree.as_element_mut(id) else {
            return Ok(());
        };
        for attr in &mut element.attrs {
            if attr.name.eq_ignore_ascii_case(&name) {
                attr.value = f(&attr.value);
            }
        }
        Ok(())
    })
}

/// Run each function on the target in order.
#[must_use]
pub fn do_all(fs: Vec<TransformFn>) -> TransformFn {
    Box::new(move |tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        for f in &fs {
            f(tree, id)?;
        }
        Ok(())
    })
}

/// For each function, insert a copy of the target before it and run the
/// function on the copy; then detach the target.
///
/// Fails with [`TransformError::ReplaceRoot`] on a node without a parent.
#[must_use]
pub fn copy_and(fs: Vec<TransformFn>) -> TransformFn {
    Box::new(move |tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        let Some(parent) = tree.parent(id) else {
            return Err(TransformError::ReplaceRoot);
        };
        for f in &fs {
            let copy = tree.clone_subtree(id);
            tree.insert_before(parent, copy, Some(id));
            f(tree, copy)?;
        }
        tree.detach(id);
        Ok(())
    })
}

/// Run `f` on the nodes `selector` finds inside the target's subtree
/// (the target included).
///
/// # Errors
///
/// Returns [`TransformError::Query`] if the selector does not parse.
pub fn sub_transform(f: TransformFn, selector: &str) -> Result<TransformFn, TransformError> {
    let chain: Chain = parse_chain(selector)?;
    Ok(Box::new(move |tree: &mut DomTree, id: NodeId| apply_chain(tree, id, &f, &chain)))
}

/// Wrap `f` for debugging: each run prints `msg`, then the target's parent
/// subtree before and after `f` runs, to stderr. A target without a parent is
/// printed itself. The result of `f` is passed through.
#[must_use]
pub fn trace(f: TransformFn, msg: &str) -> TransformFn {
    let msg = msg.to_string();
    Box::new(move |tree: &mut DomTree, id: NodeId| -> Result<(), TransformError> {
        let scope = tree.parent(id).unwrap_or(id);
        eprintln!("{} {msg}", TRACE_PREFIX.cyan());
        eprintln!("{} before: {}", TRACE_PREFIX.cyan(), tree.display(scope));
        let result = f(tree, id);
        eprintln!("{} after: {}", TRACE_PREFIX.cyan(), tree.display(scope));
        result
    })
}
