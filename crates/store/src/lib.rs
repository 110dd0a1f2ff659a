//! Store - Word package I/O
//!
//! This crate opens DOCX packages into the shared node tree, tracks their
//! parts and relationships, and writes them back out.

pub mod docx;

pub use docx::{DocxError, DocxPackage, DocxResult, PartKind};
