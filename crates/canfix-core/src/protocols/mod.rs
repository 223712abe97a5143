//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets and sentinel values (source of truth)
//! - `reader`: safe byte access and protocol conventions
//! - `parser`: domain-level decoding and dispatch
//! - `error`: explicit, actionable errors
//!
//! Codecs are pure and contain no I/O; sources and analysis layers handle
//! file access and aggregation.

pub mod nsm;
