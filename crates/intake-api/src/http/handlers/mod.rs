//! HTTP handler modules for the API surface.
//!
//! # Design
//! - Keep handlers scoped to a single route group.
//! - Remote failures surface as 502; attachment failures ride inside the
//!   success body.

pub mod applications;
pub mod guarantee;
pub mod health;
pub mod lifecycle;
