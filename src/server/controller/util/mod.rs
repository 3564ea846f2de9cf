//! Helpers shared by the controllers.
//!
//! Session based authorization by role policy, resolution of the caller's
//! company, provider or admin profile, and multipart upload and file download
//! plumbing.

pub mod authorize;
pub mod get_user;
pub mod upload;
