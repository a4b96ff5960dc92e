//! Read-only lookups over the menu forest.
//!
//! Best-effort semantics throughout: a miss is `None`, never an error.
//! Exact slug matches are always preferred over URL-equivalence matches,
//! so a forest containing both `foo` and `admin.php?page=foo` (transient
//! during a merge) resolves deterministically.

use crate::url_match::urls_match;
use menugate_types::node::MenuNode;

/// Find a node anywhere in the forest by slug: direct match first over
/// the whole forest, then a URL-equivalence pass
pub fn find_menu_item_by_slug<'a>(forest: &'a [MenuNode], slug: &str) -> Option<&'a MenuNode> {
	for node in forest {
		if node.menu_slug == slug {
			return Some(node);
		}
		if let Some(child) = node.children.iter().find(|child| child.menu_slug == slug) {
			return Some(child);
		}
	}
	for node in forest {
		if urls_match(&node.menu_slug, slug) {
			return Some(node);
		}
		if let Some(child) = node.children.iter().find(|child| urls_match(&child.menu_slug, slug))
		{
			return Some(child);
		}
	}
	None
}

/// Find a node only within children lists
pub fn find_submenu_item_by_slug<'a>(forest: &'a [MenuNode], slug: &str) -> Option<&'a MenuNode> {
	find_parent_of_submenu_item(forest, slug)
		.and_then(|parent| {
			parent.children.iter().find(|child| child.menu_slug == slug || urls_match(&child.menu_slug, slug))
		})
}

/// Find the top-level node owning the child with `slug`
pub fn find_parent_of_submenu_item<'a>(
	forest: &'a [MenuNode],
	slug: &str,
) -> Option<&'a MenuNode> {
	forest
		.iter()
		.find(|node| node.children.iter().any(|child| child.menu_slug == slug))
		.or_else(|| {
			forest.iter().find(|node| {
				node.children.iter().any(|child| urls_match(&child.menu_slug, slug))
			})
		})
}

/// Last-resort stable-identity lookup: match by slug or, when given, by
/// the host default title - one survives when the other changed between
/// sessions
pub fn find_menu_item_anywhere<'a>(
	forest: &'a [MenuNode],
	slug: &str,
	default_title: Option<&str>,
) -> Option<&'a MenuNode> {
	if let Some(node) = find_menu_item_by_slug(forest, slug) {
		return Some(node);
	}
	let title = default_title.filter(|t| !t.is_empty())?;
	for node in forest {
		if node.default_title == title {
			return Some(node);
		}
		if let Some(child) = node.children.iter().find(|child| child.default_title == title) {
			return Some(child);
		}
	}
	None
}


// vim: ts=4
