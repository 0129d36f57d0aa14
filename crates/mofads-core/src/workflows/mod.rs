//! # Workflows Module
//!
//! High-level entry points that tie the [`engine`](crate::engine) and
//! [`core`](crate::core) together.
//!
//! - **Placement Workflow** ([`place`]) - One structure, one or several requests, with logging
//! - **Batch Workflow** ([`batch`]) - Many independent jobs, optionally in parallel, with
//!   successes and failures collected separately

pub mod batch;
pub mod place;
