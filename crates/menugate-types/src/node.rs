//! Menu node data model.
//!
//! A `MenuNode` is one entry of the reconciled admin menu forest: either a
//! navigable item or a separator. Nesting is one level deep: top-level nodes
//! own children, children own nothing (the structure manager never populates
//! `children` on a child node).

use serde::{Deserialize, Serialize};

/// Kind of a menu node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
	#[serde(rename = "item")]
	Item,
	#[serde(rename = "separator")]
	Separator,
}

impl Default for NodeKind {
	fn default() -> Self {
		NodeKind::Item
	}
}

/// Whether user overrides force-show or force-hide the listed users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAccessMode {
	#[serde(rename = "grant")]
	Grant,
	#[serde(rename = "deny")]
	Deny,
}

impl Default for UserAccessMode {
	fn default() -> Self {
		UserAccessMode::Grant
	}
}

/// Role-based access state of a node.
///
/// The three states are deliberately distinct and must survive a
/// save/load round trip unchanged:
/// - `Unset`: no explicit role list, fall back to a capability check
///   (serialized by omitting the `access_roles` key entirely)
/// - `ExplicitEmpty`: operator hid the node from every role
///   (serialized as `[]`)
/// - `Roles`: exactly these roles may see the node (non-empty list)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleAccess {
	#[default]
	Unset,
	ExplicitEmpty,
	Roles(Vec<String>),
}

impl RoleAccess {
	pub fn is_unset(&self) -> bool {
		matches!(self, RoleAccess::Unset)
	}

	/// Roles as a slice; `Unset` and `ExplicitEmpty` are both empty
	pub fn roles(&self) -> &[String] {
		match self {
			RoleAccess::Roles(roles) => roles,
			_ => &[],
		}
	}

	pub fn contains(&self, role: &str) -> bool {
		self.roles().iter().any(|r| r == role)
	}
}

impl From<Vec<String>> for RoleAccess {
	/// A present-but-empty list is an explicit hide, not "unset"
	fn from(roles: Vec<String>) -> Self {
		if roles.is_empty() { RoleAccess::ExplicitEmpty } else { RoleAccess::Roles(roles) }
	}
}

/// Serde helpers keeping the absent / `[]` / non-empty distinction on the
/// wire. The field uses `#[serde(default, skip_serializing_if = "RoleAccess::is_unset")]`
/// so `Unset` never writes a key, and an absent key deserializes to `Unset`.
pub(crate) mod role_access_serde {
	use super::RoleAccess;
	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	pub fn serialize<S: Serializer>(value: &RoleAccess, serializer: S) -> Result<S::Ok, S::Error> {
		// `Unset` is skipped by the field attribute; anything reaching here
		// serializes as a plain list
		value.roles().serialize(serializer)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RoleAccess, D::Error> {
		// A literal `null` is treated like an absent key
		let roles = Option::<Vec<String>>::deserialize(deserializer)?;
		Ok(roles.map(RoleAccess::from).unwrap_or(RoleAccess::Unset))
	}
}

/// One entry of the admin menu forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
	#[serde(rename = "type", default)]
	pub kind: NodeKind,

	/// Operator-set display title; empty string means "use the host default"
	#[serde(default)]
	pub title: String,

	/// Host-provided title at discovery time, used as a stable match key
	/// when slugs change between sessions
	#[serde(default)]
	pub default_title: String,

	/// Identity and (for items) target location. Bare key or full
	/// path-with-query; unique within its tree level after reconciliation.
	#[serde(default)]
	pub menu_slug: String,

	/// Required capability inherited from host registration (read-only in
	/// the editor, shown for operator visibility)
	#[serde(default)]
	pub capability: String,

	#[serde(
		rename = "access_roles",
		default,
		skip_serializing_if = "RoleAccess::is_unset",
		with = "role_access_serde"
	)]
	pub access: RoleAccess,

	/// Stringified user ids with a per-user override
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub access_users: Vec<String>,

	#[serde(default)]
	pub user_access_mode: UserAccessMode,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<MenuNode>,

	/// Original parent slug for nodes promoted from an orphaned submenu.
	/// Advisory provenance only; nothing consumes it yet.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub promoted_from: Option<String>,
}

impl Default for MenuNode {
	fn default() -> Self {
		MenuNode {
			kind: NodeKind::Item,
			title: String::new(),
			default_title: String::new(),
			menu_slug: String::new(),
			capability: String::new(),
			access: RoleAccess::Unset,
			access_users: Vec::new(),
			user_access_mode: UserAccessMode::Grant,
			children: Vec::new(),
			promoted_from: None,
		}
	}
}

impl MenuNode {
	pub fn is_separator(&self) -> bool {
		self.kind == NodeKind::Separator
	}

	/// Title to render: the operator's custom title, or the host default
	/// when no custom title is set
	pub fn effective_title(&self) -> &str {
		if self.title.is_empty() { &self.default_title } else { &self.title }
	}

	/// Whether the operator set a custom title differing from the host's
	pub fn has_custom_title(&self) -> bool {
		!self.title.is_empty() && self.title != self.default_title
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_role_access_round_trip() {
		let mut node = MenuNode { menu_slug: "tools.php".into(), ..MenuNode::default() };

		// Unset: key absent
		let json = serde_json::to_value(&node).unwrap();
		assert!(json.get("access_roles").is_none());
		let back: MenuNode = serde_json::from_value(json).unwrap();
		assert_eq!(back.access, RoleAccess::Unset);

		// ExplicitEmpty: key present, empty array
		node.access = RoleAccess::ExplicitEmpty;
		let json = serde_json::to_value(&node).unwrap();
		assert_eq!(json["access_roles"], serde_json::json!([]));
		let back: MenuNode = serde_json::from_value(json).unwrap();
		assert_eq!(back.access, RoleAccess::ExplicitEmpty);

		// Roles: key present, non-empty
		node.access = RoleAccess::Roles(vec!["editor".into()]);
		let json = serde_json::to_value(&node).unwrap();
		assert_eq!(json["access_roles"], serde_json::json!(["editor"]));
		let back: MenuNode = serde_json::from_value(json).unwrap();
		assert_eq!(back.access, RoleAccess::Roles(vec!["editor".into()]));
	}

	#[test]
	fn test_role_access_null_is_unset() {
		let json = serde_json::json!({
			"type": "item",
			"menu_slug": "index.php",
			"access_roles": null,
		});
		let node: MenuNode = serde_json::from_value(json).unwrap();
		assert!(node.access.is_unset());
	}

	#[test]
	fn test_effective_title() {
		let node = MenuNode {
			title: String::new(),
			default_title: "Posts".into(),
			..MenuNode::default()
		};
		assert_eq!(node.effective_title(), "Posts");
		assert!(!node.has_custom_title());

		let node = MenuNode { title: "Articles".into(), ..node };
		assert_eq!(node.effective_title(), "Articles");
		assert!(node.has_custom_title());
	}
}

// vim: ts=4
