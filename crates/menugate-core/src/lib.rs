//! Admin menu virtualization and access-control engine.
//!
//! On every admin request the host populates a live menu registry in
//! arbitrary registration order; the operator's saved edits (ordering,
//! titles, per-role/per-user visibility) live in a persisted configuration
//! blob. This crate reconciles the two into one coherent forest
//! ([`structure::MenuStructureManager`]), applies it onto the live registry
//! for rendering ([`processor::MenuProcessor`]), guards direct navigation
//! ([`page_access::PageAccessManager`]), and describes the editor schema
//! plus the save-time cleanup ([`settings::SettingsManager`]).
//!
//! The engine is synchronous and request-scoped: every operation is an
//! in-memory tree walk over injected values, so correctness rests on the
//! merge being idempotent, not on locking.

pub mod access;
pub mod finder;
pub mod item;
pub mod page_access;
pub mod prelude;
pub mod processor;
pub mod settings;
pub mod structure;
pub mod url_match;

// vim: ts=4
