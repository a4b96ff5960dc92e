//! Forest construction and reconciliation.
//!
//! The canonical menu forest has two sources of truth: the live registry the
//! host populated for this request and the operator's persisted
//! configuration. `build_fresh` handles the first run (no configuration),
//! `merge` reconciles a saved forest against the live registry: persisted
//! edits win where the live item still exists, stale entries are dropped,
//! new live items are appended with derived defaults. Running a merge twice
//! over its own output yields the same forest.

use serde_json::Value;

use crate::access::AccessManager;
use crate::item::{create_menu_item, is_valid_menu_item, normalize_menu_item};
use crate::prelude::*;
use crate::url_match::{canonical_child_slug, canonical_slug, urls_match};

/// Top-level blog-content slugs hidden when the disable-blog sibling
/// module is active
pub const BLOG_MENU_SLUGS: &[&str] = &["edit.php"];

/// Submenu blog-content slugs hidden likewise
pub const BLOG_SUBMENU_SLUGS: &[&str] = &[
	"edit.php",
	"post-new.php",
	"edit-tags.php?taxonomy=category",
	"edit-tags.php?taxonomy=post_tag",
];

/// Engine configuration shared by the structure manager, the processor and
/// the settings schema
#[derive(Debug, Clone, Default)]
pub struct StructureConfig {
	/// Slugs of this plugin's own generated pages, skipped during
	/// discovery so the editor cannot lock the operator out of it
	pub own_page_slugs: Vec<String>,

	/// The one own page that stays manageable (the plugin settings root)
	pub manageable_page: Option<String>,

	/// Whether the sibling "disable-blog" module is active
	pub hide_blog_menus: bool,
}

impl StructureConfig {
	/// Own pages are skipped except the explicitly manageable one
	pub fn is_hidden_own_page(&self, slug: &str) -> bool {
		if let Some(manageable) = &self.manageable_page {
			if urls_match(manageable, slug) {
				return false;
			}
		}
		self.own_page_slugs.iter().any(|own| urls_match(own, slug))
	}

	pub fn is_blog_menu(&self, slug: &str) -> bool {
		self.hide_blog_menus && BLOG_MENU_SLUGS.iter().any(|blog| urls_match(blog, slug))
	}

	pub fn is_blog_submenu(&self, slug: &str) -> bool {
		self.hide_blog_menus && BLOG_SUBMENU_SLUGS.iter().any(|blog| urls_match(blog, slug))
	}
}

fn slug_seen(processed: &[String], slug: &str) -> bool {
	processed.iter().any(|seen| urls_match(seen, slug))
}

pub struct MenuStructureManager<'a> {
	access: AccessManager<'a>,
	config: StructureConfig,
}

impl<'a> MenuStructureManager<'a> {
	pub fn new(authorizer: &'a dyn Authorizer, config: StructureConfig) -> Self {
		MenuStructureManager { access: AccessManager::new(authorizer), config }
	}

	pub fn config(&self) -> &StructureConfig {
		&self.config
	}

	/// Load the persisted blob and reconcile: merge when a configuration
	/// exists, build from live data otherwise
	pub fn reconcile(&self, store: &dyn ConfigStore, registry: &MenuRegistry) -> Vec<MenuNode> {
		match store.load() {
			Some(Value::Array(raw)) => {
				let persisted: Vec<MenuNode> = raw
					.iter()
					.map(normalize_menu_item)
					.filter(is_valid_menu_item)
					.collect();
				self.merge(&persisted, registry)
			}
			Some(other) => {
				warn!(kind = other_kind(&other), "Persisted menu configuration is not a list, rebuilding");
				self.build_fresh(registry)
			}
			None => self.build_fresh(registry),
		}
	}

	/// Build the forest from the live registry alone, with
	/// capability-derived default grants
	pub fn build_fresh(&self, registry: &MenuRegistry) -> Vec<MenuNode> {
		let mut forest = Vec::new();
		let mut processed: Vec<String> = Vec::new();

		for item in &registry.top_level {
			if item.is_separator() {
				forest.push(self.separator_from_live(item));
				continue;
			}
			if self.config.is_hidden_own_page(&item.slug) || self.config.is_blog_menu(&item.slug)
			{
				continue;
			}
			let slug = canonical_slug(&item.slug);
			if slug_seen(&processed, &slug) {
				continue;
			}
			let mut node = self.node_from_live(item, slug.clone(), None);
			node.children = self.children_from_live(&item.slug, registry);
			processed.push(slug);
			forest.push(node);
		}

		self.promote_orphans(registry, &mut forest, &mut processed);
		self.ensure_profile(&mut forest);
		forest
	}

	/// Merge a persisted forest with the live registry
	pub fn merge(&self, persisted: &[MenuNode], registry: &MenuRegistry) -> Vec<MenuNode> {
		let mut forest = Vec::new();
		let mut processed: Vec<String> = Vec::new();

		for node in persisted.iter().filter(|node| is_valid_menu_item(node)) {
			if slug_seen(&processed, &node.menu_slug) {
				continue;
			}
			if self.config.is_blog_menu(&node.menu_slug)
				|| self.config.is_hidden_own_page(&node.menu_slug)
			{
				continue;
			}

			// Separators never have a live counterpart; persisted ones
			// survive as-is
			if node.is_separator() {
				let mut separator = node.clone();
				separator.children.clear();
				processed.push(separator.menu_slug.clone());
				forest.push(separator);
				continue;
			}

			if let Some(live) = find_live_top_level(registry, &node.menu_slug) {
				let live_slug = live.slug.clone();
				let mut merged = self.refresh_from_live(node, live);
				merged.children = self.merge_children(&node.children, &live_slug, registry);
				processed.push(merged.menu_slug.clone());
				forest.push(merged);
			} else if let Some((_, live)) = find_live_submenu(registry, &node.menu_slug) {
				// The item was moved out of a submenu; adopt it as a
				// top-level leaf
				let mut merged = self.refresh_from_live(node, live);
				merged.children.clear();
				processed.push(merged.menu_slug.clone());
				forest.push(merged);
			} else if urls_match(&node.menu_slug, "profile.php") {
				// profile.php has no live entry for users who manage
				// others; the persisted node still carries the operator's
				// title and grants
				let mut merged = node.clone();
				merged.children.clear();
				processed.push(merged.menu_slug.clone());
				forest.push(merged);
			} else {
				debug!(slug = %node.menu_slug, "Dropping stale persisted menu entry");
			}
		}

		// New live items since the last save, with fresh defaults
		for item in &registry.top_level {
			if item.is_separator()
				|| self.config.is_hidden_own_page(&item.slug)
				|| self.config.is_blog_menu(&item.slug)
			{
				continue;
			}
			let slug = canonical_slug(&item.slug);
			if slug_seen(&processed, &slug) {
				continue;
			}
			let mut node = self.node_from_live(item, slug.clone(), None);
			node.children = self.children_from_live(&item.slug, registry);
			processed.push(slug);
			forest.push(node);
		}

		self.promote_orphans(registry, &mut forest, &mut processed);
		self.ensure_profile(&mut forest);
		forest
	}

	/// Persisted edits survive, host-owned fields refresh from the live item
	fn refresh_from_live(&self, node: &MenuNode, live: &LiveMenuItem) -> MenuNode {
		let mut merged = node.clone();
		merged.capability = live.capability.clone();
		merged.default_title = live.title.clone();
		if merged.access.is_unset() {
			merged.access = self.default_access(&live.capability);
		}
		merged
	}

	/// Merge persisted children against the live submenu of `live_parent`.
	/// Children deduplicate within their own level; a child may legally
	/// share its slug with its parent (the host submenu convention for
	/// "All ..." entries).
	fn merge_children(
		&self,
		persisted: &[MenuNode],
		live_parent: &str,
		registry: &MenuRegistry,
	) -> Vec<MenuNode> {
		if persisted.is_empty() {
			// No custom children configuration: keep it that way so the
			// render path leaves the live submenu untouched
			return Vec::new();
		}

		let live_items = registry.submenu(live_parent);
		let mut children = Vec::new();
		let mut seen: Vec<String> = Vec::new();

		for child in persisted.iter().filter(|child| is_valid_menu_item(child)) {
			if slug_seen(&seen, &child.menu_slug) {
				continue;
			}
			if self.config.is_blog_submenu(&child.menu_slug)
				|| self.config.is_hidden_own_page(&child.menu_slug)
			{
				continue;
			}
			if child.is_separator() {
				let mut separator = child.clone();
				separator.children.clear();
				seen.push(separator.menu_slug.clone());
				children.push(separator);
				continue;
			}
			if let Some(live) =
				find_live_submenu_of(live_items, live_parent, &child.menu_slug)
			{
				let mut merged = self.refresh_from_live(child, live);
				merged.children.clear();
				seen.push(merged.menu_slug.clone());
				children.push(merged);
			} else {
				debug!(slug = %child.menu_slug, parent = %live_parent, "Dropping stale persisted submenu entry");
			}
		}

		// New live submenu items since the last save
		for item in live_items {
			let slug = canonical_child_slug(live_parent, &item.slug);
			if slug_seen(&seen, &slug)
				|| self.config.is_blog_submenu(&slug)
				|| self.config.is_hidden_own_page(&slug)
			{
				continue;
			}
			seen.push(slug.clone());
			children.push(self.node_from_live(item, slug, None));
		}

		children
	}

	/// Default children straight from the live submenu of `parent`
	fn children_from_live(&self, parent: &str, registry: &MenuRegistry) -> Vec<MenuNode> {
		let mut children = Vec::new();
		let mut seen: Vec<String> = Vec::new();
		for item in registry.submenu(parent) {
			let slug = canonical_child_slug(parent, &item.slug);
			if slug_seen(&seen, &slug)
				|| self.config.is_blog_submenu(&slug)
				|| self.config.is_hidden_own_page(&slug)
			{
				continue;
			}
			seen.push(slug.clone());
			children.push(self.node_from_live(item, slug, None));
		}
		children
	}

	/// Submenu items whose nominal parent is not a live top-level item are
	/// promoted to top level, tagged with their original parent
	fn promote_orphans(
		&self,
		registry: &MenuRegistry,
		forest: &mut Vec<MenuNode>,
		processed: &mut Vec<String>,
	) {
		for (parent, items) in &registry.submenus {
			if registry.top_level.iter().any(|item| urls_match(&item.slug, parent)) {
				continue;
			}
			for item in items {
				let slug = canonical_child_slug(parent, &item.slug);
				if slug_seen(processed, &slug)
					|| self.config.is_blog_submenu(&slug)
					|| self.config.is_hidden_own_page(&slug)
				{
					continue;
				}
				debug!(slug = %slug, parent = %parent, "Promoting orphaned submenu item to top level");
				processed.push(slug.clone());
				forest.push(self.node_from_live(item, slug, Some(parent.clone())));
			}
		}
	}

	/// The host renders the profile page differently depending on whether
	/// the user manages other users; the forest must carry a profile node
	/// either way so access rules always have a place to live
	fn ensure_profile(&self, forest: &mut Vec<MenuNode>) {
		if crate::finder::find_menu_item_anywhere(forest, "profile.php", None).is_some() {
			return;
		}
		forest.push(create_menu_item(
			NodeKind::Item,
			"Profile",
			"profile.php",
			"Profile",
			"read",
			self.default_access("read"),
		));
	}

	fn node_from_live(
		&self,
		item: &LiveMenuItem,
		slug: String,
		promoted_from: Option<String>,
	) -> MenuNode {
		if item.is_separator() {
			return self.separator_from_live(item);
		}
		let mut node = create_menu_item(
			NodeKind::Item,
			&item.title,
			&slug,
			&item.title,
			&item.capability,
			self.default_access(&item.capability),
		);
		node.promoted_from = promoted_from;
		node
	}

	fn separator_from_live(&self, item: &LiveMenuItem) -> MenuNode {
		// Separator slugs pass through untouched; canonicalizing them
		// would invent a bogus admin.php target
		create_menu_item(
			NodeKind::Separator,
			"",
			&item.slug,
			"",
			&item.capability,
			RoleAccess::Unset,
		)
	}

	fn default_access(&self, capability: &str) -> RoleAccess {
		RoleAccess::from(self.access.default_roles_for_capability(capability))
	}
}

fn find_live_top_level<'r>(registry: &'r MenuRegistry, slug: &str) -> Option<&'r LiveMenuItem> {
	registry
		.top_level
		.iter()
		.find(|item| item.slug == slug)
		.or_else(|| {
			registry
				.top_level
				.iter()
				.filter(|item| !item.is_separator())
				.find(|item| urls_match(&item.slug, slug))
		})
}

fn find_live_submenu<'r>(
	registry: &'r MenuRegistry,
	slug: &str,
) -> Option<(&'r str, &'r LiveMenuItem)> {
	for (parent, items) in &registry.submenus {
		if let Some(item) = find_live_submenu_of(items, parent, slug) {
			return Some((parent.as_str(), item));
		}
	}
	None
}

fn find_live_submenu_of<'r>(
	items: &'r [LiveMenuItem],
	parent: &str,
	slug: &str,
) -> Option<&'r LiveMenuItem> {
	items.iter().find(|item| item.slug == slug).or_else(|| {
		items
			.iter()
			.find(|item| urls_match(&canonical_child_slug(parent, &item.slug), slug))
	})
}

fn other_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use menugate_host_adapter_mem::MemHost;

	fn registry() -> MenuRegistry {
		let mut registry = MenuRegistry::new();
		registry
			.add_menu_page("Dashboard", "read", "index.php")
			.add_menu_page("Posts", "edit_posts", "edit.php")
			.add_submenu_page("edit.php", "All Posts", "edit_posts", "edit.php")
			.add_submenu_page("edit.php", "Add New", "edit_posts", "post-new.php");
		registry
	}

	fn manager(host: &MemHost) -> MenuStructureManager<'_> {
		MenuStructureManager::new(host, StructureConfig::default())
	}

	#[test]
	fn test_build_fresh_structure() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);
		let forest = manager.build_fresh(&registry());

		// Dashboard, Posts, and the guaranteed profile node
		assert_eq!(forest.len(), 3);
		assert_eq!(forest[0].menu_slug, "index.php");
		assert_eq!(forest[1].menu_slug, "edit.php");
		assert_eq!(forest[2].menu_slug, "profile.php");

		// "All Posts" shares the parent slug and stays; children carry
		// capability-derived defaults
		assert_eq!(forest[1].children.len(), 2);
		assert_eq!(forest[1].children[0].menu_slug, "edit.php");
		assert_eq!(forest[1].children[1].menu_slug, "post-new.php");
		assert!(!forest[1].access.is_unset());
	}

	#[test]
	fn test_build_fresh_promotes_orphans() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);
		let mut registry = registry();
		registry.add_submenu_page("ghost-parent", "Lost Page", "manage_options", "lost-page");

		let forest = manager.build_fresh(&registry);
		let promoted = forest
			.iter()
			.find(|node| node.menu_slug == "admin.php?page=lost-page")
			.unwrap();
		assert_eq!(promoted.promoted_from.as_deref(), Some("ghost-parent"));
	}

	#[test]
	fn test_build_fresh_skips_own_and_blog_pages() {
		let host = MemHost::with_default_roles();
		let config = StructureConfig {
			own_page_slugs: vec!["menugate".into(), "menugate-settings".into()],
			manageable_page: Some("menugate-settings".into()),
			hide_blog_menus: true,
		};
		let manager = MenuStructureManager::new(&host, config);
		let mut registry = registry();
		registry.add_menu_page("Menugate", "manage_options", "menugate");
		registry.add_menu_page("Menugate Settings", "manage_options", "menugate-settings");

		let forest = manager.build_fresh(&registry);
		let slugs: Vec<&str> = forest.iter().map(|n| n.menu_slug.as_str()).collect();
		assert!(!slugs.contains(&"edit.php"), "blog menu must be filtered");
		assert!(!slugs.contains(&"admin.php?page=menugate"));
		assert!(slugs.contains(&"admin.php?page=menugate-settings"));
	}

	#[test]
	fn test_merge_preserves_edits_and_refreshes_host_fields() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);
		let registry = registry();

		let persisted = vec![MenuNode {
			menu_slug: "edit.php".into(),
			title: "Articles".into(),
			default_title: "Old Posts".into(),
			capability: "stale_cap".into(),
			access: RoleAccess::Roles(vec!["editor".into()]),
			..MenuNode::default()
		}];
		let forest = manager.merge(&persisted, &registry);

		let posts = forest.iter().find(|n| n.menu_slug == "edit.php").unwrap();
		assert_eq!(posts.title, "Articles");
		assert_eq!(posts.default_title, "Posts");
		assert_eq!(posts.capability, "edit_posts");
		assert_eq!(posts.access, RoleAccess::Roles(vec!["editor".into()]));
	}

	#[test]
	fn test_merge_respects_explicit_empty_roles() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);

		let persisted = vec![MenuNode {
			menu_slug: "edit.php".into(),
			access: RoleAccess::ExplicitEmpty,
			..MenuNode::default()
		}];
		let forest = manager.merge(&persisted, &registry());
		let posts = forest.iter().find(|n| n.menu_slug == "edit.php").unwrap();
		// Present-but-empty stays an explicit hide; only an absent key
		// earns a capability-derived default
		assert_eq!(posts.access, RoleAccess::ExplicitEmpty);
	}

	#[test]
	fn test_merge_drops_stale_and_appends_new() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);
		let registry = registry();

		let persisted = vec![
			MenuNode { menu_slug: "removed-plugin".into(), ..MenuNode::default() },
			MenuNode { menu_slug: "index.php".into(), ..MenuNode::default() },
		];
		let forest = manager.merge(&persisted, &registry);
		let slugs: Vec<&str> = forest.iter().map(|n| n.menu_slug.as_str()).collect();

		assert!(!slugs.contains(&"removed-plugin"));
		// Persisted order first, new live items appended after
		assert_eq!(slugs, vec!["index.php", "edit.php", "profile.php"]);
	}

	#[test]
	fn test_merge_adopts_moved_submenu_item_as_leaf() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);
		let registry = registry();

		let persisted = vec![MenuNode {
			menu_slug: "post-new.php".into(),
			title: "Write".into(),
			children: vec![MenuNode { menu_slug: "bogus".into(), ..MenuNode::default() }],
			..MenuNode::default()
		}];
		let forest = manager.merge(&persisted, &registry);

		let moved = forest.iter().find(|n| n.menu_slug == "post-new.php").unwrap();
		assert_eq!(moved.title, "Write");
		assert_eq!(moved.capability, "edit_posts");
		assert!(moved.children.is_empty(), "moved leaves carry no children");
	}

	#[test]
	fn test_merge_is_idempotent() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);
		let registry = registry();

		let persisted = vec![MenuNode {
			menu_slug: "edit.php".into(),
			title: "Articles".into(),
			access: RoleAccess::Roles(vec!["editor".into()]),
			children: vec![MenuNode {
				menu_slug: "post-new.php".into(),
				access: RoleAccess::ExplicitEmpty,
				..MenuNode::default()
			}],
			..MenuNode::default()
		}];
		let once = manager.merge(&persisted, &registry);
		let twice = manager.merge(&once, &registry);
		assert_eq!(once, twice);
	}

	#[test]
	fn test_merge_never_duplicates_canonically_equal_slugs() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);
		let mut registry = registry();
		registry.add_menu_page("My Plugin", "manage_options", "my-plugin");

		// Adversarial: the same destination persisted twice in different
		// encodings
		let persisted = vec![
			MenuNode { menu_slug: "admin.php?page=my-plugin".into(), ..MenuNode::default() },
			MenuNode { menu_slug: "my-plugin".into(), ..MenuNode::default() },
		];
		let forest = manager.merge(&persisted, &registry);
		let matches = forest
			.iter()
			.filter(|n| urls_match(&n.menu_slug, "my-plugin"))
			.count();
		assert_eq!(matches, 1);
	}

	#[test]
	fn test_stale_posts_entry_not_matched_to_bare_post_page() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);
		let mut registry = MenuRegistry::new();
		registry
			.add_menu_page("Dashboard", "read", "index.php")
			.add_menu_page("Post Manager", "manage_options", "post");

		// The blog screen was removed from the live menu; an unrelated
		// plugin page registered under the bare slug "post" must not
		// inherit the stale node's edits
		let persisted = vec![MenuNode {
			menu_slug: "edit.php".into(),
			title: "Articles".into(),
			..MenuNode::default()
		}];
		let forest = manager.merge(&persisted, &registry);

		assert!(forest.iter().all(|n| n.menu_slug != "edit.php"));
		let page = forest.iter().find(|n| urls_match(&n.menu_slug, "post")).unwrap();
		assert_eq!(page.menu_slug, "admin.php?page=post");
		assert_eq!(page.title, "Post Manager");
	}

	#[test]
	fn test_profile_guarantee() {
		let host = MemHost::with_default_roles();
		let manager = manager(&host);
		let forest = manager.build_fresh(&registry());
		let profile = forest.iter().find(|n| n.menu_slug == "profile.php").unwrap();
		assert_eq!(profile.capability, "read");
		assert!(profile.access.contains("subscriber"));
	}
}

// vim: ts=4
