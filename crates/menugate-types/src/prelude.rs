pub use crate::error::{Error, Result};
pub use crate::host::{Authorizer, ConfigStore, RequestTarget, RoleInfo, UserCtx, UserInfo};
pub use crate::node::{MenuNode, NodeKind, RoleAccess, UserAccessMode};
pub use crate::registry::{LiveMenuItem, MenuRegistry};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
