//! Course catalog loading.

pub mod loader;

pub use loader::load_courses;
