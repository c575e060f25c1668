//! Diff context — splits a pull request's unified diff into per-file
//! segments, drops non-essential files, and fits the rest to a token budget.
//!
//! # Modules
//!
//! - [`splitter`] — `diff --git` header detection and per-file segments
//! - [`relevance`] — suffix deny-list for opaque or generated files
//! - [`assembler`] — fetch → split → filter → allocate

pub mod assembler;
pub mod relevance;
pub mod splitter;

pub use assembler::{assemble_diff, DiffAssembler, DiffContext, DiffSource};
pub use relevance::{is_essential_file, NON_ESSENTIAL_SUFFIXES};
pub use splitter::{split_diff, FileDiffSegment};
