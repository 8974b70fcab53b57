//! Presentation of diff results
//!
//! - `html`: annotated documents as HTML with styled diff spans
//! - `terminal`: annotated documents and edit scripts as colored text

pub mod html;
pub mod terminal;
