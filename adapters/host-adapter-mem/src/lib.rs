//! In-memory host adapter.
//!
//! Implements the engine's host traits against plain in-process data: a
//! fixed role/capability table, a user list, and a volatile configuration
//! blob behind a lock. Used by the integration tests and by embedders that
//! drive the engine without a live host.

use parking_lot::RwLock;

use menugate_types::error::Result;
use menugate_types::host::{Authorizer, ConfigStore, RoleInfo, UserCtx, UserInfo};

pub struct MemHost {
	roles: Vec<RoleInfo>,
	users: Vec<UserInfo>,
	config: RwLock<Option<serde_json::Value>>,
}

impl MemHost {
	pub fn new(roles: Vec<RoleInfo>, users: Vec<UserInfo>) -> Self {
		MemHost { roles, users, config: RwLock::new(None) }
	}

	/// A host with the stock role/capability table: administrator,
	/// editor, author, subscriber with their usual capability sets
	pub fn with_default_roles() -> Self {
		let role = |slug: &str, name: &str, caps: &[&str]| RoleInfo {
			slug: slug.to_string(),
			name: name.to_string(),
			capabilities: caps.iter().map(|c| (*c).to_string()).collect(),
		};
		MemHost::new(
			vec![
				role(
					"administrator",
					"Administrator",
					&[
						"read",
						"edit_posts",
						"manage_options",
						"manage_categories",
						"list_users",
						"activate_plugins",
						"import",
						"upload_files",
					],
				),
				role(
					"editor",
					"Editor",
					&["read", "edit_posts", "manage_categories", "upload_files"],
				),
				role("author", "Author", &["read", "edit_posts", "upload_files"]),
				role("subscriber", "Subscriber", &["read"]),
			],
			vec![
				UserInfo {
					id: 1,
					display_name: "Site Admin".to_string(),
					email: "admin@example.com".to_string(),
				},
				UserInfo {
					id: 3,
					display_name: "Erin Editor".to_string(),
					email: "erin@example.com".to_string(),
				},
				UserInfo {
					id: 5,
					display_name: "Sam Subscriber".to_string(),
					email: "sam@example.com".to_string(),
				},
			],
		)
	}

	/// Seed the stored configuration, as if an operator had saved it
	pub fn seed_config(&self, value: serde_json::Value) {
		*self.config.write() = Some(value);
	}
}

impl Authorizer for MemHost {
	fn roles(&self) -> Vec<RoleInfo> {
		self.roles.clone()
	}

	fn users(&self) -> Vec<UserInfo> {
		self.users.clone()
	}

	fn user_can(&self, user: &UserCtx, capability: &str) -> bool {
		if capability.is_empty() {
			return false;
		}
		self.roles
			.iter()
			.filter(|role| user.has_role(&role.slug))
			.any(|role| role.has_capability(capability))
	}
}

impl ConfigStore for MemHost {
	fn load(&self) -> Option<serde_json::Value> {
		self.config.read().clone()
	}

	fn store(&self, value: serde_json::Value) -> Result<()> {
		*self.config.write() = Some(value);
		Ok(())
	}
}


// vim: ts=4
