//! Document Model - WordprocessingML node tree
//!
//! This crate provides the tree substrate the template engine works on: an
//! arena of XML nodes addressed by stable [`NodeId`] indices, typed queries,
//! structural mutation, deep cloning, WordprocessingML element helpers and a
//! structural validator.

mod node;
mod node_id;
mod tree;
mod error;
mod properties;
mod paragraph;
mod run;
pub mod table;
mod image;
pub mod content_control;
pub mod protection;
pub mod validation;

pub use node::*;
pub use node_id::*;
pub use tree::*;
pub use error::*;
pub use properties::*;
pub use paragraph::*;
pub use run::*;
pub use table::*;
pub use image::*;
pub use content_control::*;
pub use protection::*;
pub use validation::{validate, ValidationError};
