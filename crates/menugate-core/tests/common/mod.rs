//! Reusable fixtures for the integration tests: a realistic live admin
//! menu and the usual cast of users.

use menugate_types::host::UserCtx;
use menugate_types::registry::MenuRegistry;

/// A registry resembling a stock admin menu right after host boot
pub fn stock_registry() -> MenuRegistry {
	let mut registry = MenuRegistry::new();
	registry
		.add_menu_page("Dashboard", "read", "index.php")
		.add_menu_page("Posts", "edit_posts", "edit.php")
		.add_menu_page("Media", "upload_files", "upload.php")
		.add_menu_page("Settings", "manage_options", "options-general.php")
		.add_menu_page("Tools", "edit_posts", "tools.php")
		.add_submenu_page("index.php", "Home", "read", "index.php")
		.add_submenu_page("edit.php", "All Posts", "edit_posts", "edit.php")
		.add_submenu_page("edit.php", "Add New", "edit_posts", "post-new.php")
		.add_submenu_page("edit.php", "Categories", "manage_categories", "edit-tags.php?taxonomy=category")
		.add_submenu_page("options-general.php", "General", "manage_options", "options-general.php")
		.add_submenu_page("options-general.php", "Permalinks", "manage_options", "options-permalink.php");
	registry
}

/// The minimal two-entry registry used by the build-fresh scenario
pub fn minimal_registry() -> MenuRegistry {
	let mut registry = MenuRegistry::new();
	registry
		.add_menu_page("Dashboard", "read", "index.php")
		.add_menu_page("Posts", "edit_posts", "edit.php")
		.add_submenu_page("edit.php", "Add New", "edit_posts", "post-new.php");
	registry
}

pub fn admin() -> UserCtx {
	UserCtx::new(1, vec!["administrator".to_string()])
}

pub fn editor() -> UserCtx {
	UserCtx::new(3, vec!["editor".to_string()])
}

pub fn subscriber() -> UserCtx {
	UserCtx::new(5, vec!["subscriber".to_string()])
}

// vim: ts=4
