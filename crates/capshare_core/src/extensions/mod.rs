//! Extension store shared with independently loaded plugins.
//!
//! Plugins declare which components implement which extension points; the
//! store keeps those declarations and answers "who extends this point".
//! Component loading and rendering stay with the host UI.

pub mod manifest;
pub mod store;
