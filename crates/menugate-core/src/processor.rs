//! Render-path application of the reconciled forest.
//!
//! Once per admin request the reconciled forest is applied onto the live
//! registry: nodes the current user may not see are removed, custom titles
//! applied, the top level reordered to the forest order, and submenus
//! rebuilt where the operator configured children. The dashboard and the
//! profile entries are never removable, whatever the configuration says.

use crate::access::AccessManager;
use crate::finder;
use crate::prelude::*;
use crate::structure::{BLOG_MENU_SLUGS, BLOG_SUBMENU_SLUGS, StructureConfig};
use crate::url_match::{canonical_child_slug, urls_match, urls_match_for_request};

pub const DASHBOARD_SLUG: &str = "index.php";
pub const PROFILE_SLUG: &str = "profile.php";
pub const TOOLS_SLUG: &str = "tools.php";

pub struct MenuProcessor<'a> {
	authorizer: &'a dyn Authorizer,
	access: AccessManager<'a>,
	config: StructureConfig,
}

impl<'a> MenuProcessor<'a> {
	pub fn new(authorizer: &'a dyn Authorizer, config: StructureConfig) -> Self {
		MenuProcessor { authorizer, access: AccessManager::new(authorizer), config }
	}

	/// Apply the reconciled forest onto the live registry for this
	/// request. `requested_page` is the current request's `page` query
	/// parameter, needed for the dashboard URL-equivalence rule.
	pub fn apply_menu_changes(
		&self,
		registry: &mut MenuRegistry,
		forest: &[MenuNode],
		user: &UserCtx,
		requested_page: Option<&str>,
	) {
		self.ensure_dashboard(registry);
		let manages_users = self.authorizer.user_can(user, "list_users");
		if !manages_users {
			self.ensure_profile(registry, forest);
		}
		if forest.is_empty() {
			return;
		}

		let forest = self.prune_blog(registry, forest);
		self.filter_top_level(registry, &forest, user, requested_page);
		self.rebuild_submenus(registry, &forest, user, requested_page);
		self.reorder_top_level(registry, &forest, requested_page);
		if !manages_users {
			self.place_profile(registry);
		}
	}

	/// The dashboard must exist even if other code removed it
	fn ensure_dashboard(&self, registry: &mut MenuRegistry) {
		if registry.top_level_item(DASHBOARD_SLUG).is_none() {
			registry
				.top_level
				.insert(0, LiveMenuItem::new("Dashboard", "read", DASHBOARD_SLUG));
		}
	}

	/// Users who cannot list other users get a top-level profile entry,
	/// with a persisted custom title when one exists
	fn ensure_profile(&self, registry: &mut MenuRegistry, forest: &[MenuNode]) {
		if registry.top_level_item(PROFILE_SLUG).is_some() {
			return;
		}
		let title = finder::find_menu_item_by_slug(forest, PROFILE_SLUG)
			.filter(|node| node.has_custom_title())
			.map(|node| node.title.clone())
			.unwrap_or_else(|| "Profile".to_string());
		registry.top_level.push(LiveMenuItem::new(title, "read", PROFILE_SLUG));
	}

	/// Blog pruning also runs on the live registry: the build/merge
	/// filter does not see items registered after reconciliation
	fn prune_blog(&self, registry: &mut MenuRegistry, forest: &[MenuNode]) -> Vec<MenuNode> {
		if !self.config.hide_blog_menus {
			return forest.to_vec();
		}
		registry
			.top_level
			.retain(|item| !BLOG_MENU_SLUGS.iter().any(|blog| urls_match(blog, &item.slug)));
		registry
			.submenus
			.retain(|parent, _| !BLOG_MENU_SLUGS.iter().any(|blog| urls_match(blog, parent)));
		for items in registry.submenus.values_mut() {
			items.retain(|item| {
				!BLOG_SUBMENU_SLUGS.iter().any(|blog| urls_match(blog, &item.slug))
			});
		}
		forest
			.iter()
			.filter(|node| !self.config.is_blog_menu(&node.menu_slug))
			.cloned()
			.collect()
	}

	fn filter_top_level(
		&self,
		registry: &mut MenuRegistry,
		forest: &[MenuNode],
		user: &UserCtx,
		requested_page: Option<&str>,
	) {
		let mut removals: Vec<String> = Vec::new();
		let mut renames: Vec<(String, String)> = Vec::new();

		for item in &registry.top_level {
			// Misconfiguration must never lock a user out of their
			// dashboard or profile
			let hard_visible = item.slug == DASHBOARD_SLUG || item.slug == PROFILE_SLUG;
			match find_forest_node(forest, &item.slug, requested_page) {
				Some(node) => {
					let node_check = with_live_capability(node, &item.capability);
					if !hard_visible && !self.access.can_user_access_item(&node_check, user, None)
					{
						removals.push(item.slug.clone());
						continue;
					}
					if node.has_custom_title() {
						renames.push((item.slug.clone(), node.title.clone()));
					}
				}
				None => {
					if hard_visible || item.is_separator() {
						continue;
					}
					// Unconfigured live item: synthesize a default node
					// with no role list so the capability fallback applies
					let synthesized = MenuNode {
						menu_slug: item.slug.clone(),
						capability: item.capability.clone(),
						access: RoleAccess::Unset,
						..MenuNode::default()
					};
					if !self.access.can_user_access_item(&synthesized, user, None) {
						removals.push(item.slug.clone());
					}
				}
			}
		}

		for slug in &removals {
			debug!(slug = %slug, user = user.id, "Removing menu item for this request");
			registry.remove_top_level(slug);
			registry.submenus.remove(slug);
		}
		for (slug, title) in renames {
			if let Some(item) = registry.top_level.iter_mut().find(|item| item.slug == slug) {
				item.title = title;
			}
		}
	}

	/// Opt-in submenu replacement: a forest node with configured children
	/// replaces the live submenu entirely; a node without any children
	/// configuration leaves the live submenu untouched
	fn rebuild_submenus(
		&self,
		registry: &mut MenuRegistry,
		forest: &[MenuNode],
		user: &UserCtx,
		requested_page: Option<&str>,
	) {
		let mut rebuilds: Vec<(String, Vec<LiveMenuItem>)> = Vec::new();

		for item in &registry.top_level {
			let Some(node) = find_forest_node(forest, &item.slug, requested_page) else {
				continue;
			};
			if node.children.is_empty() {
				continue;
			}
			let parent_check = with_live_capability(node, &item.capability);
			let live_children = registry.submenu(&item.slug);
			let mut rebuilt = Vec::new();
			for child in &node.children {
				if child.is_separator() {
					rebuilt.push(LiveMenuItem::separator(&child.menu_slug));
					continue;
				}
				// Keep the host's original slug encoding where the live
				// entry still exists, so links keep resolving
				let live = live_children.iter().find(|live| {
					live.slug == child.menu_slug
						|| urls_match_for_request(
							&canonical_child_slug(&item.slug, &live.slug),
							&child.menu_slug,
							requested_page,
						)
				});
				let live_capability =
					live.map(|live| live.capability.as_str()).unwrap_or(&child.capability);
				let child_check = with_live_capability(child, live_capability);
				if !self.access.can_user_access_item(&child_check, user, Some(&parent_check)) {
					continue;
				}
				let (slug, capability) = match live {
					Some(live) => (live.slug.clone(), live.capability.clone()),
					None => (child.menu_slug.clone(), child.capability.clone()),
				};
				rebuilt.push(LiveMenuItem::new(child.effective_title(), capability, slug));
			}
			rebuilds.push((item.slug.clone(), rebuilt));
		}

		for (parent, items) in rebuilds {
			registry.submenus.insert(parent, items);
		}
	}

	/// Forest order first, leftover live items after in their original
	/// relative order, deduplicated by canonical URL equivalence
	fn reorder_top_level(
		&self,
		registry: &mut MenuRegistry,
		forest: &[MenuNode],
		requested_page: Option<&str>,
	) {
		let mut remaining = std::mem::take(&mut registry.top_level);
		let mut ordered: Vec<LiveMenuItem> = Vec::new();

		for node in forest {
			if node.is_separator() {
				remaining.retain(|item| item.slug != node.menu_slug);
				if !ordered.iter().any(|item| item.slug == node.menu_slug) {
					ordered.push(LiveMenuItem::separator(&node.menu_slug));
				}
				continue;
			}
			let found = remaining.iter().position(|item| {
				item.slug == node.menu_slug
					|| urls_match_for_request(&item.slug, &node.menu_slug, requested_page)
			});
			if let Some(pos) = found {
				ordered.push(remaining.remove(pos));
			}
		}

		for item in remaining {
			let duplicate = ordered.iter().any(|placed| {
				urls_match_for_request(&placed.slug, &item.slug, requested_page)
			});
			if !duplicate {
				ordered.push(item);
			}
		}

		registry.top_level = ordered;
	}

	/// Profile sits immediately before Tools for users who do not manage
	/// other users; at the end of the list when Tools is absent
	fn place_profile(&self, registry: &mut MenuRegistry) {
		let Some(pos) = registry.top_level.iter().position(|item| item.slug == PROFILE_SLUG)
		else {
			return;
		};
		let profile = registry.top_level.remove(pos);
		let target = registry
			.top_level
			.iter()
			.position(|item| item.slug == TOOLS_SLUG)
			.unwrap_or(registry.top_level.len());
		registry.top_level.insert(target, profile);
	}
}

/// Forest nodes normally carry the live capability (the merge refreshes
/// it), but a hand-edited configuration may leave it empty; fall back to
/// the live item's capability so the `Unset` role state still means
/// "capability check", not "deny"
fn with_live_capability(node: &MenuNode, live_capability: &str) -> MenuNode {
	let mut node = node.clone();
	if node.capability.is_empty() {
		node.capability = live_capability.to_string();
	}
	node
}

fn find_forest_node<'f>(
	forest: &'f [MenuNode],
	slug: &str,
	requested_page: Option<&str>,
) -> Option<&'f MenuNode> {
	forest.iter().find(|node| node.menu_slug == slug).or_else(|| {
		forest.iter().find(|node| {
			!node.is_separator() && urls_match_for_request(&node.menu_slug, slug, requested_page)
		})
	})
}


// vim: ts=4
