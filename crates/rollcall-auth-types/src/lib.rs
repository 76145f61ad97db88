//! Auth types shared across Rollcall services.
//!
//! Provides the check-in pass codec and the `CallerIdentity` extractor.

pub mod identity;
pub mod pass;
