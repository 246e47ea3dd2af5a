//! Course retrieval collaborator contract.
//!
//! The recommendation path depends on this narrow interface only; the
//! index build, embedding math, and similarity search live behind it in
//! coursewise-infra.

use coursewise_types::course::RetrievedCourse;
use coursewise_types::error::RetrievalError;

/// Trait for ranked course retrieval.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait CourseRetriever: Send + Sync {
    /// Return up to `top_k` course excerpts ranked by relevance to `query`.
    ///
    /// An empty result is a valid "no match" outcome, not an error.
    fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<RetrievedCourse>, RetrievalError>> + Send;
}
