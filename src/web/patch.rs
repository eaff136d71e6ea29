//! In-place DOM update. Freshly rendered markup is parsed into a detached
//! `<template>` and the live container is morphed toward it, so nodes that
//! survive a re-render keep their identity: running CSS transitions, loaded
//! images, focus and listener-set classes are left alone.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlTemplateElement, Node};

/// Classes added by event listeners rather than by markup.
const TRANSIENT_CLASSES: &[&str] = &["drag-over"];

/// Set on an image whose placeholder was swapped in; holds the failed `src`.
pub(crate) const FALLBACK_ATTR: &str = "data-fallback-applied";

/// Make `container`'s children match `html`, reusing nodes where the tag
/// (or node type) lines up position by position.
pub fn patch_html(container: &Element, html: &str) {
    let template = container
        .owner_document()
        .and_then(|doc| doc.create_element("template").ok())
        .and_then(|el| el.dyn_into::<HtmlTemplateElement>().ok());
    let Some(template) = template else {
        log::warn!("no template element; replacing content wholesale");
        container.set_inner_html(html);
        return;
    };
    template.set_inner_html(html);
    morph_children(container, &template.content());
}

fn children(node: &Node) -> Vec<Node> {
    let mut out = Vec::new();
    let mut next = node.first_child();
    while let Some(child) = next {
        next = child.next_sibling();
        out.push(child);
    }
    out
}

fn morph_children(live: &Node, fresh: &Node) {
    let fresh_kids = children(fresh);
    let live_kids = children(live);
    for extra in live_kids.iter().skip(fresh_kids.len()) {
        if let Err(e) = live.remove_child(extra) {
            log::warn!("patch: remove failed: {e:?}");
        }
    }
    for (i, f) in fresh_kids.iter().enumerate() {
        let res = match live_kids.get(i) {
            Some(l) if l.node_type() == f.node_type() && l.node_name() == f.node_name() => {
                morph_node(l, f);
                Ok(())
            }
            Some(l) => live.replace_child(f, l).map(drop),
            None => live.append_child(f).map(drop),
        };
        if let Err(e) = res {
            log::warn!("patch: insert failed: {e:?}");
        }
    }
}

fn morph_node(live: &Node, fresh: &Node) {
    match (live.dyn_ref::<Element>(), fresh.dyn_ref::<Element>()) {
        (Some(l), Some(f)) => {
            sync_attributes(l, f);
            morph_children(live, fresh);
        }
        _ => {
            let value = fresh.node_value();
            if live.node_value() != value {
                live.set_node_value(value.as_deref());
            }
        }
    }
}

fn sync_attributes(live: &Element, fresh: &Element) {
    // An image already showing its placeholder keeps it while the markup
    // still asks for the source that failed.
    let fell_back = live
        .get_attribute(FALLBACK_ATTR)
        .is_some_and(|failed| fresh.get_attribute("src").as_deref() == Some(failed.as_str()));
    let keep = |name: &str| fell_back && (name == "src" || name == FALLBACK_ATTR);

    let transient: Vec<&str> = TRANSIENT_CLASSES
        .iter()
        .copied()
        .filter(|c| live.class_list().contains(c))
        .collect();

    for name in attribute_names(live) {
        if !fresh.has_attribute(&name) && !keep(&name) {
            if let Err(e) = live.remove_attribute(&name) {
                log::warn!("patch: remove {name} failed: {e:?}");
            }
        }
    }
    for name in attribute_names(fresh) {
        if keep(&name) {
            continue;
        }
        let value = fresh.get_attribute(&name).unwrap_or_default();
        if live.get_attribute(&name).as_deref() != Some(value.as_str()) {
            if let Err(e) = live.set_attribute(&name, &value) {
                log::warn!("patch: set {name} failed: {e:?}");
            }
        }
    }
    for class in transient {
        if let Err(e) = live.class_list().add_1(class) {
            log::warn!("patch: restore {class} failed: {e:?}");
        }
    }
}

fn attribute_names(el: &Element) -> Vec<String> {
    el.get_attribute_names()
        .iter()
        .filter_map(|name| name.as_string())
        .collect()
}
