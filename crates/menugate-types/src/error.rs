//! Error types shared across the engine and its adapters.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// A lookup target does not exist. Internal traversal helpers prefer
	/// returning `Option`; this variant is for callers that need an error.
	NotFound,

	/// The current user may not view the resolved page. This is the hard
	/// stop raised by the page guard; the host is expected to abort the
	/// request with a 403-equivalent response carrying `message`.
	AccessDenied { slug: String, message: String },

	/// Structurally unreadable data (persisted blob that is not an array, ...)
	Parse,

	ValidationError(String),
}

impl Error {
	pub fn access_denied(slug: impl Into<String>) -> Self {
		Error::AccessDenied {
			slug: slug.into(),
			message: "You do not have permission to access this page.".to_string(),
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::AccessDenied { slug, message } => {
				write!(f, "access denied for '{}': {}", slug, message)
			}
			Error::Parse => write!(f, "parse error"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

// vim: ts=4
