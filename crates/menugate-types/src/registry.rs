//! Live menu registry - the injected model of the host's menu globals.
//!
//! The host populates a top-level menu list and a parent-slug keyed submenu
//! map through arbitrary registration calls before the engine runs. The
//! engine never reaches into host globals directly; it receives a mutable
//! `MenuRegistry` value, which keeps the reconciliation logic testable
//! without a running host.

use std::collections::BTreeMap;

/// CSS class the host puts on separator rows
pub const SEPARATOR_CLASS: &str = "wp-menu-separator";

/// One live menu entry as registered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveMenuItem {
	pub title: String,
	pub capability: String,
	pub slug: String,
	/// Host CSS classes; carries the separator marker for spacer rows
	pub classes: String,
}

impl LiveMenuItem {
	pub fn new(
		title: impl Into<String>,
		capability: impl Into<String>,
		slug: impl Into<String>,
	) -> Self {
		LiveMenuItem {
			title: title.into(),
			capability: capability.into(),
			slug: slug.into(),
			classes: String::new(),
		}
	}

	/// A synthetic non-navigable spacer row
	pub fn separator(slug: impl Into<String>) -> Self {
		LiveMenuItem {
			title: String::new(),
			capability: "read".to_string(),
			slug: slug.into(),
			classes: SEPARATOR_CLASS.to_string(),
		}
	}

	pub fn is_separator(&self) -> bool {
		self.classes.split_whitespace().any(|c| c == SEPARATOR_CLASS)
	}
}

/// Request-scoped snapshot of the host's menu globals.
///
/// `submenus` is ordered by parent slug so traversal (and in particular
/// orphan promotion) is deterministic between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuRegistry {
	pub top_level: Vec<LiveMenuItem>,
	pub submenus: BTreeMap<String, Vec<LiveMenuItem>>,
}

impl MenuRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a top-level item, mirroring the host's registration call
	pub fn add_menu_page(
		&mut self,
		title: impl Into<String>,
		capability: impl Into<String>,
		slug: impl Into<String>,
	) -> &mut Self {
		self.top_level.push(LiveMenuItem::new(title, capability, slug));
		self
	}

	/// Register a submenu item under `parent`
	pub fn add_submenu_page(
		&mut self,
		parent: impl Into<String>,
		title: impl Into<String>,
		capability: impl Into<String>,
		slug: impl Into<String>,
	) -> &mut Self {
		self.submenus
			.entry(parent.into())
			.or_default()
			.push(LiveMenuItem::new(title, capability, slug));
		self
	}

	pub fn top_level_item(&self, slug: &str) -> Option<&LiveMenuItem> {
		self.top_level.iter().find(|item| item.slug == slug)
	}

	pub fn submenu(&self, parent: &str) -> &[LiveMenuItem] {
		self.submenus.get(parent).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Search every submenu list for `slug`, returning the owning parent
	/// slug and the item
	pub fn find_submenu_item(&self, slug: &str) -> Option<(&str, &LiveMenuItem)> {
		for (parent, items) in &self.submenus {
			if let Some(item) = items.iter().find(|item| item.slug == slug) {
				return Some((parent.as_str(), item));
			}
		}
		None
	}

	pub fn remove_top_level(&mut self, slug: &str) {
		self.top_level.retain(|item| item.slug != slug);
	}
}


// vim: ts=4
