//! Domain types shared across all Rollcall crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod approval;
pub mod attendance;
pub mod role;
