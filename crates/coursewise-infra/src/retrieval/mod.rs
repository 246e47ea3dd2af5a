//! Course retrieval over an in-memory vector index.

pub mod index;

pub use index::CourseIndex;
