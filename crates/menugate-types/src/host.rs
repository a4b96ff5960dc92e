//! Host environment traits.
//!
//! The engine consumes the host's authorization primitive and its
//! key-value configuration store through these traits. Both are
//! synchronous: every operation is request-scoped in-memory computation,
//! so there is nothing to await.

use std::collections::BTreeMap;

use crate::error::Result;

/// A registered role and its capability set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
	pub slug: String,
	pub name: String,
	pub capabilities: Vec<String>,
}

impl RoleInfo {
	pub fn has_capability(&self, capability: &str) -> bool {
		self.capabilities.iter().any(|c| c == capability)
	}
}

/// A registered user, as offered in the editor's user-override picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
	pub id: u64,
	pub display_name: String,
	pub email: String,
}

/// The current actor: the authenticated user a request runs as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCtx {
	pub id: u64,
	pub roles: Vec<String>,
}

impl UserCtx {
	pub fn new(id: u64, roles: Vec<String>) -> Self {
		UserCtx { id, roles }
	}

	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|r| r == role)
	}
}

/// Per-user capability/role authorization primitive
pub trait Authorizer: Send + Sync {
	/// All registered roles
	fn roles(&self) -> Vec<RoleInfo>;

	/// All registered users
	fn users(&self) -> Vec<UserInfo>;

	/// Whether `user` holds `capability`
	fn user_can(&self, user: &UserCtx, capability: &str) -> bool;
}

/// Key-value persisted-configuration store scoped to this module.
///
/// Get-all/replace-all semantics only; no partial update is required.
/// `load` returning `None` signals first run (build the forest from live
/// host data with default permissions).
pub trait ConfigStore: Send + Sync {
	fn load(&self) -> Option<serde_json::Value>;

	fn store(&self, value: serde_json::Value) -> Result<()>;
}

/// The current request's navigation target, as seen by the page guard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTarget {
	/// Admin screen file handling the request (e.g. "admin.php"),
	/// relative to the admin root
	pub script: String,
	pub query: BTreeMap<String, String>,
	/// Symbolic current-screen identifier, the last-resort fallback when
	/// neither a page parameter nor an edit context resolves the target
	pub current_screen: Option<String>,
}

impl RequestTarget {
	pub fn new(script: impl Into<String>) -> Self {
		RequestTarget { script: script.into(), query: BTreeMap::new(), current_screen: None }
	}

	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());
		self
	}

	pub fn with_screen(mut self, screen: impl Into<String>) -> Self {
		self.current_screen = Some(screen.into());
		self
	}

	pub fn param(&self, key: &str) -> Option<&str> {
		self.query.get(key).map(String::as_str)
	}
}

// vim: ts=4
