//! Course catalog types for Coursewise.
//!
//! A [`Course`] is one entry in the JSON catalog. [`Course::document`]
//! renders the plain-text block that gets embedded into the vector index
//! and injected into the recommendation prompt as course context.

use serde::{Deserialize, Deserializer, Serialize};

/// One course from the catalog.
///
/// `subjects` and `grades` tolerate both a JSON array and a single
/// comma-separated string; catalogs in the wild ship both shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "courseId")]
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub grades: Vec<String>,
    #[serde(rename = "isDualCredit", default)]
    pub is_dual_credit: bool,
    #[serde(rename = "isCreditRecovery", default)]
    pub is_credit_recovery: bool,
    #[serde(rename = "higherEdCredits", default)]
    pub higher_ed_credits: u32,
}

impl Course {
    /// Render the canonical plain-text block for embedding and prompt context.
    pub fn document(&self) -> String {
        format!(
            "courseId: {}\n\
             Title: {}\n\
             Description: {}\n\
             Subjects: {}\n\
             Grade: {}\n\
             isDualCredit: {}\n\
             isCreditRecovery: {}\n\
             HigherEdCredits: {}",
            self.course_id,
            self.title,
            self.description.trim(),
            self.subjects.join(", "),
            self.grades.join(", "),
            self.is_dual_credit,
            self.is_credit_recovery,
            self.higher_ed_credits,
        )
    }
}

/// One ranked hit from the course retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedCourse {
    pub course: Course,
    /// Cosine similarity against the query, higher is more relevant.
    pub score: f32,
}

/// Accept either `["a", "b"]` or `"a, b"` for a list-valued field.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        List(Vec<String>),
        Single(String),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::List(list) => list,
        StringOrList::Single(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
    })
}
