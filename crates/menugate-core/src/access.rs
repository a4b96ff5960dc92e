//! Per-node access decisions.
//!
//! Decisions are computed fresh for every request and every node; nothing
//! here is cached, because role and user state can change between requests.

use crate::prelude::*;

pub struct AccessManager<'a> {
	authorizer: &'a dyn Authorizer,
}

impl<'a> AccessManager<'a> {
	pub fn new(authorizer: &'a dyn Authorizer) -> Self {
		AccessManager { authorizer }
	}

	/// Decide whether `user` may see `node`.
	///
	/// Order matters: a gated parent hides its children, listed users
	/// short-circuit every role rule, an explicit role list wins over the
	/// capability fallback. Parent gating goes exactly one level; callers
	/// supply the immediate parent, deeper chains are not walked here.
	pub fn can_user_access_item(
		&self,
		node: &MenuNode,
		user: &UserCtx,
		parent: Option<&MenuNode>,
	) -> bool {
		if let Some(parent) = parent {
			if !self.can_user_access_item(parent, user, None) {
				return false;
			}
		}

		let user_id = user.id.to_string();
		if !node.access_users.is_empty() && node.access_users.iter().any(|id| *id == user_id) {
			return node.user_access_mode == UserAccessMode::Grant;
		}

		match &node.access {
			RoleAccess::Unset => self.authorizer.user_can(user, &node.capability),
			RoleAccess::ExplicitEmpty => false,
			RoleAccess::Roles(roles) => roles.iter().any(|role| user.has_role(role)),
		}
	}

	/// All registered roles as `(slug, display name)` pairs for the
	/// editor's role checkboxes
	pub fn role_choices(&self) -> Vec<(String, String)> {
		self.authorizer.roles().into_iter().map(|role| (role.slug, role.name)).collect()
	}

	/// All registered users as `(stringified id, label)` pairs for the
	/// editor's user picker
	pub fn user_choices(&self) -> Vec<(String, String)> {
		self.authorizer
			.users()
			.into_iter()
			.map(|user| {
				(user.id.to_string(), format!("{} ({})", user.display_name, user.email))
			})
			.collect()
	}

	/// Slugs of every role whose capability set includes `capability`;
	/// the default grant for freshly discovered nodes
	pub fn default_roles_for_capability(&self, capability: &str) -> Vec<String> {
		self.authorizer
			.roles()
			.into_iter()
			.filter(|role| role.has_capability(capability))
			.map(|role| role.slug)
			.collect()
	}

}


// vim: ts=4
