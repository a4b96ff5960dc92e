//! Direct-navigation guard.
//!
//! Hiding a menu entry is not access control by itself: the page is still
//! reachable by URL. This guard resolves what page the current request
//! targets, looks it up in the reconciled forest, and raises the hard stop
//! when the resolved node is not visible to the current user. Pages the
//! forest knows nothing about are unmanaged and fall through to normal
//! host behavior.

use crate::access::AccessManager;
use crate::finder;
use crate::prelude::*;
use crate::url_match::{make_relative, urls_match};

pub struct PageAccessManager<'a> {
	access: AccessManager<'a>,
}

impl<'a> PageAccessManager<'a> {
	pub fn new(authorizer: &'a dyn Authorizer) -> Self {
		PageAccessManager { access: AccessManager::new(authorizer) }
	}

	/// Deny-and-halt guard for the current request.
	///
	/// On `Err(Error::AccessDenied { .. })` the host must abort the request
	/// with a 403-equivalent response rather than render a page the user
	/// cannot see.
	pub fn check_page_access(
		&self,
		forest: &[MenuNode],
		target: &RequestTarget,
		user: &UserCtx,
	) -> Result<()> {
		let Some(slug) = resolve_target(target) else {
			return Ok(());
		};

		let (node, parent) = match lookup(forest, &slug) {
			Some(found) => found,
			// Unmanaged page: not an error, default host behavior applies
			None => return Ok(()),
		};

		if self.access.can_user_access_item(node, user, parent) {
			Ok(())
		} else {
			warn!(slug = %slug, user = user.id, "Blocking direct access to restricted page");
			Err(Error::access_denied(slug))
		}
	}
}

/// Resolve the requested page slug, in priority order: explicit page
/// parameter, post-type/taxonomy edit context, the requesting screen file,
/// the symbolic current screen
fn resolve_target(target: &RequestTarget) -> Option<String> {
	if let Some(page) = target.param("page") {
		let script = make_relative(&target.script);
		// A page parameter on a real screen file keeps that file as its
		// base; anything else is the generic admin.php form
		let base = match script.as_str() {
			"" | "index.php" | "admin.php" => "admin.php".to_string(),
			other => other.to_string(),
		};
		return Some(format!("{}?page={}", base, page));
	}
	if let Some(post_type) = target.param("post_type") {
		return Some(format!("edit.php?post_type={}", post_type));
	}
	if let Some(taxonomy) = target.param("taxonomy") {
		return Some(format!("edit-tags.php?taxonomy={}", taxonomy));
	}
	let script = make_relative(&target.script);
	if !script.is_empty() {
		return Some(script);
	}
	target.current_screen.as_ref().map(|screen| make_relative(screen))
}

/// Top-level nodes first, then submenu nodes with their owning parent
/// captured for the capability override
fn lookup<'f>(forest: &'f [MenuNode], slug: &str) -> Option<(&'f MenuNode, Option<&'f MenuNode>)> {
	if let Some(node) = forest
		.iter()
		.find(|node| node.menu_slug == slug)
		.or_else(|| forest.iter().find(|node| urls_match(&node.menu_slug, slug)))
	{
		return Some((node, None));
	}
	let parent = finder::find_parent_of_submenu_item(forest, slug)?;
	let child = parent
		.children
		.iter()
		.find(|child| child.menu_slug == slug || urls_match(&child.menu_slug, slug))?;
	Some((child, Some(parent)))
}


// vim: ts=4
