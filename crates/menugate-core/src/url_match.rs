//! Admin URL equivalence.
//!
//! The host encodes "the same logical destination" in several inconsistent
//! slug conventions: a bare page key, `admin.php?page=<key>`, screen files
//! with an identifying query parameter (`edit.php?post_type=`, ...), and
//! absolute URLs under the admin root. This module is the single place that
//! knows those conventions; the merge and render paths only call
//! [`urls_match`] / [`urls_match_for_request`]. Any gap here shows up as
//! duplicate or orphaned nodes after a merge, so the known patterns live in
//! one declarative table and everything is unit tested.

use std::collections::BTreeMap;

/// Path prefix of the host admin root, stripped when making URLs relative
pub const ADMIN_ROOT: &str = "/wp-admin/";

/// Screen files whose target page is identified by a single query
/// parameter. A bare slug `X` is equivalent to `<screen>?<param>=X`.
const SCREEN_PARAMS: &[(&str, &str)] = &[
	("admin.php", "page"),
	("edit.php", "post_type"),
	("edit-tags.php", "taxonomy"),
	("options-general.php", "page"),
	("tools.php", "page"),
];

/// A parsed relative admin URL: screen file plus query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
struct MenuUrl {
	base: String,
	params: BTreeMap<String, String>,
}

fn identifying_param(base: &str) -> Option<&'static str> {
	SCREEN_PARAMS.iter().find(|(screen, _)| *screen == base).map(|(_, param)| *param)
}

/// Strip scheme/host and the admin root so absolute and relative forms of
/// the same destination compare equal
pub fn make_relative(url: &str) -> String {
	let mut url = url.trim();
	if url.starts_with("http://") || url.starts_with("https://") {
		// Keep everything after the admin root; a URL outside the admin
		// root keeps its full path
		if let Some(pos) = url.find(ADMIN_ROOT) {
			url = &url[pos + ADMIN_ROOT.len()..];
		} else if let Some(pos) = url.find("//") {
			let after_scheme = &url[pos + 2..];
			url = after_scheme.find('/').map(|p| &after_scheme[p..]).unwrap_or("");
		}
	}
	let url = url.strip_prefix(ADMIN_ROOT).unwrap_or(url);
	let url = url.trim_start_matches('/');
	let url = url.strip_prefix("wp-admin/").unwrap_or(url);
	// Trailing slash only matters on the path part
	match url.split_once('?') {
		Some((path, query)) => format!("{}?{}", path.trim_end_matches('/'), query),
		None => url.trim_end_matches('/').to_string(),
	}
}

fn parse(url: &str) -> MenuUrl {
	let (base, query) = url.split_once('?').unwrap_or((url, ""));
	let mut params = BTreeMap::new();
	for pair in query.split('&').filter(|p| !p.is_empty()) {
		let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
		params.insert(key.to_string(), value.to_string());
	}
	MenuUrl { base: base.to_string(), params }
}

/// The host renders the posts screen for `edit.php` without a `post_type`
/// parameter, so `edit.php` == `edit.php?post_type=post` when comparing
/// two full URLs. Only there: a defaulted parameter must not make
/// `edit.php` claim the unrelated bare slug `post`.
fn with_default_params(mut url: MenuUrl) -> MenuUrl {
	if url.base == "edit.php" && !url.params.contains_key("post_type") {
		url.params.insert("post_type".to_string(), "post".to_string());
	}
	url
}

/// A plain page key with no screen file and no query string
fn is_bare_slug(url: &str) -> bool {
	!url.contains('?') && !url.contains('/') && !url.ends_with(".php")
}

fn matches_bare(full: &MenuUrl, bare: &str) -> bool {
	identifying_param(&full.base)
		.and_then(|param| full.params.get(param))
		.is_some_and(|value| value == bare)
}

/// Whether two slugs/URLs refer to the same logical admin destination
pub fn urls_match(a: &str, b: &str) -> bool {
	if a == b {
		return true;
	}
	let na = make_relative(a);
	let nb = make_relative(b);
	if na == nb {
		return true;
	}
	match (is_bare_slug(&na), is_bare_slug(&nb)) {
		(true, true) => false,
		(true, false) => matches_bare(&parse(&nb), &na),
		(false, true) => matches_bare(&parse(&na), &nb),
		// Two full URLs only match component-wise: same screen file and
		// identical parameters
		(false, false) => with_default_params(parse(&na)) == with_default_params(parse(&nb)),
	}
}

/// [`urls_match`] extended with the dashboard rule: a live `index.php`
/// entry reached with a `page` query parameter in the current request is
/// the same destination as `admin.php?page=<that parameter>`
pub fn urls_match_for_request(a: &str, b: &str, requested_page: Option<&str>) -> bool {
	if urls_match(a, b) {
		return true;
	}
	let Some(page) = requested_page else {
		return false;
	};
	let expand = |url: &str| {
		let relative = make_relative(url);
		if relative == "index.php" { format!("admin.php?page={}", page) } else { relative }
	};
	urls_match(&expand(a), &expand(b))
}

/// Canonical form of a top-level slug: bare page keys become
/// `admin.php?page=<key>`, anything already carrying a screen file or a
/// query string passes through relative-normalized
pub fn canonical_slug(slug: &str) -> String {
	let relative = make_relative(slug);
	if is_bare_slug(&relative) {
		format!("admin.php?page={}", relative)
	} else {
		relative
	}
}

/// Canonical form of a submenu slug under `parent`: a bare key under a
/// real screen file (e.g. `options-general.php`) resolves through that
/// file's `page` parameter, otherwise through `admin.php`
pub fn canonical_child_slug(parent: &str, slug: &str) -> String {
	let relative = make_relative(slug);
	if !is_bare_slug(&relative) {
		return relative;
	}
	let parent = make_relative(parent);
	if parent.ends_with(".php") && !parent.contains('?') {
		format!("{}?page={}", parent, relative)
	} else {
		format!("admin.php?page={}", relative)
	}
}


// vim: ts=4
