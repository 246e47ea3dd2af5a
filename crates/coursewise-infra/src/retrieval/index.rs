//! In-memory cosine-similarity index over course documents.
//!
//! Each course is embedded once at startup from [`Course::document`]; a
//! query embeds on demand and ranks all courses by cosine similarity.
//! The catalog is small (hundreds of entries), so a linear scan beats the
//! complexity of an ANN structure here.

use coursewise_core::embedding::Embedder;
use coursewise_core::retrieval::CourseRetriever;
use coursewise_types::course::{Course, RetrievedCourse};
use coursewise_types::error::RetrievalError;

/// Vector index over the course catalog.
#[derive(Debug)]
pub struct CourseIndex<E: Embedder> {
    embedder: E,
    courses: Vec<Course>,
    vectors: Vec<Vec<f32>>,
}

impl<E: Embedder> CourseIndex<E> {
    /// Build the index by embedding every course document.
    ///
    /// Fails if the embedder returns the wrong number of vectors or a
    /// vector of unexpected dimension.
    pub async fn build(embedder: E, courses: Vec<Course>) -> Result<Self, RetrievalError> {
        let documents: Vec<String> = courses.iter().map(Course::document).collect();
        let vectors = embedder.embed(&documents).await?;

        if vectors.len() != courses.len() {
            return Err(RetrievalError::Index(format!(
                "embedder returned {} vectors for {} courses",
                vectors.len(),
                courses.len()
            )));
        }
        let expected = embedder.dimension();
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(RetrievalError::Index(format!(
                "embedding dimension {} does not match expected {expected}",
                bad.len()
            )));
        }

        tracing::info!(
            courses = courses.len(),
            model = embedder.model_name(),
            "course index built"
        );

        Ok(Self {
            embedder,
            courses,
            vectors,
        })
    }

    /// Number of indexed courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl<E: Embedder> CourseRetriever for CourseIndex<E> {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedCourse>, RetrievalError> {
        if top_k == 0 || self.courses.is_empty() {
            return Ok(Vec::new());
        }

        let query_vectors = self.embedder.embed(&[query.to_string()]).await?;
        let query_vector = query_vectors
            .first()
            .ok_or_else(|| RetrievalError::Embedding("embedder returned no vector".to_string()))?;

        let mut scored: Vec<RetrievedCourse> = self
            .courses
            .iter()
            .zip(&self.vectors)
            .filter_map(|(course, vector)| {
                cosine_similarity(query_vector, vector).map(|score| RetrievedCourse {
                    course: course.clone(),
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// Cosine similarity of two vectors, or None when either has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return None;
    }
    Some(dot / (mag_a * mag_b))
}
