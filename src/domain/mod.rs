//! Document data model
//!
//! - `node`: the document tree (typed nodes, text leaves, attributes)
//! - `mark`: style annotations and the synthetic diff tag
//! - `error`: the fatal error taxonomy shared by every diff stage

pub mod error;
pub mod mark;
pub mod node;
