//! Editor schema and save-time cleanup.
//!
//! The generic settings renderer consumes a field schema describing one
//! repeatable "menu item" record; the persistence layer calls
//! [`SettingsManager::before_save`] with whatever the form submitted before
//! the configuration blob is written. The cleanup is where correctness
//! lives: generated separator slugs, slugless-node drops, per-level
//! deduplication and the role-preservation rule all happen here.

use std::collections::HashMap;

use rand::RngExt;
use serde_json::Value;

use crate::access::AccessManager;
use crate::item::normalize_menu_item;
use crate::prelude::*;
use crate::structure::StructureConfig;

const SEPARATOR_SLUG_PREFIX: &str = "separator_";
const SLUG_ID_LENGTH: usize = 8;
const SAFE: [char; 62] = [
	'0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
	'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
	'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
	'V', 'W', 'X', 'Y', 'Z',
];

/// How the generic renderer draws a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	Text,
	Hidden,
	Readonly,
	Checkboxes,
	MultiSelect,
	Radio,
}

/// One editable field of a menu item record
#[derive(Debug, Clone)]
pub struct FieldDefinition {
	pub key: String,
	pub label: String,
	pub kind: FieldKind,
	/// `(value, label)` pairs for choice-type fields; dynamic choices are
	/// injected by [`SettingsManager::field_args`]
	pub choices: Vec<(String, String)>,
}

impl FieldDefinition {
	pub fn builder(key: impl Into<String>) -> FieldDefinitionBuilder {
		FieldDefinitionBuilder::new(key)
	}
}

pub struct FieldDefinitionBuilder {
	key: String,
	label: Option<String>,
	kind: FieldKind,
	choices: Vec<(String, String)>,
}

impl FieldDefinitionBuilder {
	pub fn new(key: impl Into<String>) -> Self {
		FieldDefinitionBuilder { key: key.into(), label: None, kind: FieldKind::Text, choices: Vec::new() }
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn kind(mut self, kind: FieldKind) -> Self {
		self.kind = kind;
		self
	}

	pub fn choices(mut self, choices: Vec<(String, String)>) -> Self {
		self.choices = choices;
		self
	}

	pub fn build(self) -> Result<FieldDefinition> {
		let label = self
			.label
			.ok_or_else(|| Error::ValidationError(format!("Field '{}' has no label", self.key)))?;
		Ok(FieldDefinition { key: self.key, label, kind: self.kind, choices: self.choices })
	}
}

/// The repeatable menu-item group consumed by the settings renderer
#[derive(Debug, Clone)]
pub struct GroupDefinition {
	pub key: String,
	pub repeatable: bool,
	pub fields: Vec<FieldDefinition>,
	/// Live default value for the group: the current reconciled forest
	pub default: Option<Value>,
}

pub struct SettingsManager<'a> {
	access: AccessManager<'a>,
	config: StructureConfig,
}

impl<'a> SettingsManager<'a> {
	pub fn new(authorizer: &'a dyn Authorizer, config: StructureConfig) -> Self {
		SettingsManager { access: AccessManager::new(authorizer), config }
	}

	/// The static schema: one repeatable record with the menu item fields
	pub fn schema(&self) -> Result<GroupDefinition> {
		Ok(GroupDefinition {
			key: "menu_items".to_string(),
			repeatable: true,
			default: None,
			fields: vec![
				FieldDefinition::builder("type")
					.label("Type")
					.kind(FieldKind::Hidden)
					.build()?,
				FieldDefinition::builder("title").label("Menu title").build()?,
				FieldDefinition::builder("default_title")
					.label("Default title")
					.kind(FieldKind::Hidden)
					.build()?,
				FieldDefinition::builder("menu_slug")
					.label("Menu slug")
					.kind(FieldKind::Hidden)
					.build()?,
				FieldDefinition::builder("capability")
					.label("Required capability")
					.kind(FieldKind::Readonly)
					.build()?,
				FieldDefinition::builder("access_roles")
					.label("Visible to roles")
					.kind(FieldKind::Checkboxes)
					.build()?,
				FieldDefinition::builder("access_users")
					.label("User overrides")
					.kind(FieldKind::MultiSelect)
					.build()?,
				FieldDefinition::builder("user_access_mode")
					.label("Listed users are")
					.kind(FieldKind::Radio)
					.choices(vec![
						("grant".to_string(), "Granted access".to_string()),
						("deny".to_string(), "Denied access".to_string()),
					])
					.build()?,
			],
		})
	}

	/// Schema enriched with live data before rendering: the current
	/// reconciled forest as the default value (minus this plugin's own
	/// duplicate root entries and blog nodes while the sibling module is
	/// active) and the dynamic role/user choice lists
	pub fn field_args(&self, forest: &[MenuNode]) -> Result<GroupDefinition> {
		let visible: Vec<&MenuNode> = forest
			.iter()
			.filter(|node| !self.config.is_hidden_own_page(&node.menu_slug))
			.filter(|node| !self.config.is_blog_menu(&node.menu_slug))
			.collect();

		let mut group = self.schema()?;
		group.default = Some(serde_json::to_value(&visible).map_err(|_| Error::Parse)?);
		for field in &mut group.fields {
			match field.key.as_str() {
				"access_roles" => field.choices = self.access.role_choices(),
				"access_users" => field.choices = self.access.user_choices(),
				_ => {}
			}
		}
		Ok(group)
	}

	/// Save-time cleanup, returning the value to persist. Never fails:
	/// malformed submissions degrade to an empty list rather than brick
	/// the admin UI.
	pub fn before_save(&self, submitted: &Value, previous: Option<&Value>) -> Value {
		let cleaned = self.clean_submission(submitted, previous);
		serde_json::to_value(&cleaned).unwrap_or_else(|_| Value::Array(Vec::new()))
	}

	/// Typed cleanup pass over the submitted forest
	pub fn clean_submission(&self, submitted: &Value, previous: Option<&Value>) -> Vec<MenuNode> {
		let Some(raw) = submitted.as_array() else {
			warn!("Submitted menu configuration is not a list, discarding");
			return Vec::new();
		};
		let prior = prior_roles(previous);

		let mut out: Vec<MenuNode> = Vec::new();
		let mut seen: Vec<String> = Vec::new();
		for value in raw {
			let node = normalize_menu_item(value);
			out.extend(self.clean_node(node, &prior, &mut seen));
		}
		out
	}

	/// Clean one top-level node. Returns zero nodes (dropped), one, or -
	/// for a separator that arrived owning children - the separator
	/// followed by its children promoted to siblings.
	fn clean_node(
		&self,
		mut node: MenuNode,
		prior: &HashMap<String, Vec<String>>,
		seen: &mut Vec<String>,
	) -> Vec<MenuNode> {
		if !self.prepare_slug(&mut node, seen) {
			return Vec::new();
		}
		seen.push(node.menu_slug.clone());
		self.preserve_roles(&mut node, prior);

		let children = std::mem::take(&mut node.children);
		if node.is_separator() {
			// Separators may not own children in the persisted structure;
			// promote them to siblings right after the separator
			let mut result = vec![node];
			for child in children {
				result.extend(self.clean_node(child, prior, seen));
			}
			return result;
		}

		let mut child_seen: Vec<String> = Vec::new();
		for mut child in children {
			if !self.prepare_slug(&mut child, &mut child_seen) {
				continue;
			}
			child_seen.push(child.menu_slug.clone());
			self.preserve_roles(&mut child, prior);
			child.children.clear();
			node.children.push(child);
		}
		vec![node]
	}

	/// Give slugless separators a generated slug; drop slugless items
	fn prepare_slug(&self, node: &mut MenuNode, seen: &[String]) -> bool {
		if node.menu_slug.is_empty() {
			if node.is_separator() {
				node.menu_slug = generate_separator_slug(seen);
			} else {
				warn!(title = %node.title, "Dropping submitted menu item without a slug");
				return false;
			}
		} else if seen.iter().any(|s| s == &node.menu_slug) {
			debug!(slug = %node.menu_slug, "Skipping duplicate submitted menu item");
			return false;
		}
		true
	}

	/// The role-preservation rule: an empty role submission restores the
	/// previously persisted non-empty roles (the editor round-trip can
	/// submit empty for untouched fields); with no prior value the key is
	/// saved absent, re-enabling the capability fallback
	fn preserve_roles(&self, node: &mut MenuNode, prior: &HashMap<String, Vec<String>>) {
		if matches!(node.access, RoleAccess::Roles(_)) {
			return;
		}
		node.access = match prior.get(&node.menu_slug) {
			Some(roles) => RoleAccess::Roles(roles.clone()),
			None => RoleAccess::Unset,
		};
	}
}

/// Lookup of previously persisted non-empty role grants by slug, parents
/// and children flattened together
fn prior_roles(previous: Option<&Value>) -> HashMap<String, Vec<String>> {
	let mut prior = HashMap::new();
	let Some(Value::Array(raw)) = previous else {
		return prior;
	};
	for value in raw {
		let node = normalize_menu_item(value);
		if let RoleAccess::Roles(roles) = &node.access {
			prior.insert(node.menu_slug.clone(), roles.clone());
		}
		for child in &node.children {
			if let RoleAccess::Roles(roles) = &child.access {
				prior.insert(child.menu_slug.clone(), roles.clone());
			}
		}
	}
	prior
}

/// Unique opaque slug for a separator missing one
fn generate_separator_slug(seen: &[String]) -> String {
	let mut rng = rand::rng();
	loop {
		let mut slug = String::with_capacity(SEPARATOR_SLUG_PREFIX.len() + SLUG_ID_LENGTH);
		slug.push_str(SEPARATOR_SLUG_PREFIX);
		for _ in 0..SLUG_ID_LENGTH {
			slug.push(SAFE[rng.random_range(0..SAFE.len())]);
		}
		if !seen.iter().any(|s| s == &slug) {
			return slug;
		}
	}
}


// vim: ts=4
