pub use menugate_types::error::{Error, Result};
pub use menugate_types::host::{Authorizer, ConfigStore, RequestTarget, RoleInfo, UserCtx, UserInfo};
pub use menugate_types::node::{MenuNode, NodeKind, RoleAccess, UserAccessMode};
pub use menugate_types::registry::{LiveMenuItem, MenuRegistry};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
