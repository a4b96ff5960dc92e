//! Menu node construction and normalization.
//!
//! Persisted and operator-submitted configuration arrives as loose JSON and
//! must never brick the admin UI, so normalization is total: wrong-typed
//! fields coerce to safe defaults, lists that are not lists coerce to empty,
//! and nothing here returns an error.

use serde_json::Value;

use crate::prelude::*;

/// Fixed display label for separator rows
pub const SEPARATOR_LABEL: &str = "-- Separator --";

/// Construct a node from already-resolved parts.
///
/// Separators (and items with no title at all) get the fixed separator
/// label as both title and default title.
pub fn create_menu_item(
	kind: NodeKind,
	title: &str,
	slug: &str,
	default_title: &str,
	capability: &str,
	access: RoleAccess,
) -> MenuNode {
	let (title, default_title) = if kind == NodeKind::Separator || title.is_empty() {
		(SEPARATOR_LABEL.to_string(), SEPARATOR_LABEL.to_string())
	} else {
		(title.to_string(), default_title.to_string())
	};
	MenuNode {
		kind,
		title,
		default_title,
		menu_slug: slug.to_string(),
		capability: capability.to_string(),
		access,
		..MenuNode::default()
	}
}

fn string_field(raw: &Value, key: &str) -> String {
	match raw.get(key) {
		Some(Value::String(s)) => s.clone(),
		Some(Value::Number(n)) => n.to_string(),
		_ => String::new(),
	}
}

/// Coerce a loose JSON list to stringified entries; anything that is not
/// an array becomes empty
fn string_list(raw: &Value, key: &str) -> Vec<String> {
	match raw.get(key) {
		Some(Value::Array(items)) => items
			.iter()
			.filter_map(|v| match v {
				Value::String(s) => Some(s.clone()),
				Value::Number(n) => Some(n.to_string()),
				_ => None,
			})
			.collect(),
		_ => Vec::new(),
	}
}

/// Role access with the three-state distinction preserved: an absent or
/// null key is `Unset`, a present array keeps its emptiness. A present
/// non-array value is malformed and falls back to `Unset` (capability
/// check) rather than an accidental explicit hide.
fn role_access_field(raw: &Value) -> RoleAccess {
	match raw.get("access_roles") {
		None | Some(Value::Null) => RoleAccess::Unset,
		Some(Value::Array(_)) => RoleAccess::from(string_list(raw, "access_roles")),
		Some(other) => {
			debug!(value = %other, "Malformed access_roles, falling back to capability check");
			RoleAccess::Unset
		}
	}
}

/// Normalize one raw record into a `MenuNode`, filling every missing field
/// with its default without overwriting present values.
///
/// Children are normalized one level deep; anything nested further is
/// discarded, which is what keeps the depth-1 invariant true no matter
/// what the submission contained.
pub fn normalize_menu_item(raw: &Value) -> MenuNode {
	normalize_at_depth(raw, 0)
}

fn normalize_at_depth(raw: &Value, depth: usize) -> MenuNode {
	let kind = match raw.get("type").and_then(Value::as_str) {
		Some("separator") => NodeKind::Separator,
		_ => NodeKind::Item,
	};
	let children = if depth == 0 {
		match raw.get("children") {
			Some(Value::Array(items)) => {
				items.iter().map(|child| normalize_at_depth(child, 1)).collect()
			}
			_ => Vec::new(),
		}
	} else {
		Vec::new()
	};
	MenuNode {
		kind,
		title: string_field(raw, "title"),
		default_title: string_field(raw, "default_title"),
		menu_slug: string_field(raw, "menu_slug"),
		capability: string_field(raw, "capability"),
		access: role_access_field(raw),
		access_users: string_list(raw, "access_users"),
		user_access_mode: match raw.get("user_access_mode").and_then(Value::as_str) {
			Some("deny") => UserAccessMode::Deny,
			_ => UserAccessMode::Grant,
		},
		children,
		promoted_from: raw.get("promoted_from").and_then(Value::as_str).map(str::to_string),
	}
}

/// A node is usable once it has a slug; the title may be empty (meaning
/// "use the host default")
pub fn is_valid_menu_item(node: &MenuNode) -> bool {
	!node.menu_slug.is_empty()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_create_separator_gets_label() {
		let node = create_menu_item(
			NodeKind::Separator,
			"ignored",
			"separator_1",
			"",
			"read",
			RoleAccess::Unset,
		);
		assert_eq!(node.title, SEPARATOR_LABEL);
		assert_eq!(node.default_title, SEPARATOR_LABEL);
	}

	#[test]
	fn test_create_item_with_empty_title_gets_label() {
		let node =
			create_menu_item(NodeKind::Item, "", "edit.php", "", "edit_posts", RoleAccess::Unset);
		assert_eq!(node.title, SEPARATOR_LABEL);
	}

	#[test]
	fn test_normalize_fills_defaults() {
		let node = normalize_menu_item(&json!({ "menu_slug": "tools.php" }));
		assert_eq!(node.kind, NodeKind::Item);
		assert_eq!(node.title, "");
		assert_eq!(node.capability, "");
		assert!(node.access.is_unset());
		assert!(node.access_users.is_empty());
		assert_eq!(node.user_access_mode, UserAccessMode::Grant);
		assert!(node.children.is_empty());
		assert!(is_valid_menu_item(&node));
	}

	#[test]
	fn test_normalize_three_state_roles() {
		let unset = normalize_menu_item(&json!({ "menu_slug": "a" }));
		assert_eq!(unset.access, RoleAccess::Unset);

		let empty = normalize_menu_item(&json!({ "menu_slug": "a", "access_roles": [] }));
		assert_eq!(empty.access, RoleAccess::ExplicitEmpty);

		let roles = normalize_menu_item(&json!({ "menu_slug": "a", "access_roles": ["editor"] }));
		assert_eq!(roles.access, RoleAccess::Roles(vec!["editor".into()]));

		// Malformed: not an array -> capability fallback, not explicit hide
		let malformed =
			normalize_menu_item(&json!({ "menu_slug": "a", "access_roles": "editor" }));
		assert_eq!(malformed.access, RoleAccess::Unset);
	}

	#[test]
	fn test_normalize_coerces_user_ids() {
		let node = normalize_menu_item(&json!({ "menu_slug": "a", "access_users": [42, "7"] }));
		assert_eq!(node.access_users, vec!["42".to_string(), "7".to_string()]);
	}

	#[test]
	fn test_normalize_caps_depth_at_one() {
		let node = normalize_menu_item(&json!({
			"menu_slug": "parent",
			"children": [{
				"menu_slug": "child",
				"children": [{ "menu_slug": "grandchild" }],
			}],
		}));
		assert_eq!(node.children.len(), 1);
		assert!(node.children[0].children.is_empty());
	}

	#[test]
	fn test_invalid_without_slug() {
		assert!(!is_valid_menu_item(&normalize_menu_item(&json!({ "title": "No slug" }))));
	}
}

// vim: ts=4
