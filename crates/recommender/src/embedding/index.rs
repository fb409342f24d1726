use super::{EmbedError, Embedder, cosine_similarity};
use crate::reference::ReferenceData;
use models::catalog::{Course, CourseId};
use std::collections::{HashMap, HashSet};

/// One embedded course
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub course_id: CourseId,
    /// `"{area} - {title}"`
    pub text: String,
    pub vector: Vec<f32>,
}

/// A course returned by a nearest-neighbour search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub course_id: CourseId,
    /// Cosine similarity in (0, 1]
    pub score: f32,
}

/// Read-only set of course vectors searched by cosine similarity
#[derive(Debug, Clone, Default)]
pub struct EmbeddingIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<CourseId, usize>,
}

impl EmbeddingIndex {
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        let positions = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.course_id, position))
            .collect();

        Self { entries, positions }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// The stored vector of a course, if the course is part of this index
    pub fn vector_for(&self, course_id: CourseId) -> Option<&[f32]> {
        self.positions
            .get(&course_id)
            .map(|&position| self.entries[position].vector.as_slice())
    }

    /// Returns up to `top_n` courses closest to `query`, best first.
    ///
    /// `exclude` is the query course itself. Other courses that happen to share
    /// its text are kept and resolve to their own ids. Non-positive scores are
    /// never returned; ties are broken by course id.
    pub fn nearest(&self, query: &[f32], exclude: CourseId, top_n: usize) -> Vec<Neighbor> {
        let mut neighbors: Vec<Neighbor> = self
            .entries
            .iter()
            .filter(|entry| entry.course_id != exclude)
            .map(|entry| Neighbor {
                course_id: entry.course_id,
                score: cosine_similarity(query, &entry.vector).min(1.0),
            })
            .filter(|neighbor| neighbor.score > 0.0)
            .collect();

        neighbors.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.course_id.cmp(&b.course_id))
        });
        neighbors.truncate(top_n);
        neighbors
    }

    fn subset(&self, keep: impl Fn(&IndexEntry) -> bool) -> Self {
        Self::from_entries(self.entries.iter().filter(|e| keep(e)).cloned().collect())
    }
}

/// The full active-course index and its distance-learning subset
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    full: EmbeddingIndex,
    distance_learning: EmbeddingIndex,
}

impl CorpusIndex {
    /// Embeds every course whose status admits it to the corpus
    pub fn build(reference: &ReferenceData, embedder: &dyn Embedder) -> Result<Self, EmbedError> {
        let mut courses: Vec<&Course> = reference
            .courses()
            .filter(|course| course.status.is_embeddable())
            .collect();
        courses.sort_by_key(|course| course.id);

        let texts: Vec<String> = courses.iter().map(|course| course.area_title()).collect();
        let vectors = embedder.embed_batch(&texts)?;

        if vectors.len() != texts.len() {
            return Err(EmbedError::Unavailable(format!(
                "backend returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }

        let expected = embedder.dimension();
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(EmbedError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        let entries = courses
            .iter()
            .zip(texts)
            .zip(vectors)
            .map(|((course, text), vector)| IndexEntry {
                course_id: course.id,
                text,
                vector,
            })
            .collect();
        let full = EmbeddingIndex::from_entries(entries);

        let distance_learning_ids: HashSet<CourseId> = courses
            .iter()
            .filter(|course| course.is_distance_learning())
            .map(|course| course.id)
            .collect();
        let distance_learning = full.subset(|entry| distance_learning_ids.contains(&entry.course_id));

        Ok(Self {
            full,
            distance_learning,
        })
    }

    /// Wraps indices that were built elsewhere, e.g. from precomputed vectors
    pub fn from_parts(full: EmbeddingIndex, distance_learning: EmbeddingIndex) -> Self {
        Self {
            full,
            distance_learning,
        }
    }

    pub fn full(&self) -> &EmbeddingIndex {
        &self.full
    }

    /// Courses whose modality contains "EAD"
    pub fn distance_learning(&self) -> &EmbeddingIndex {
        &self.distance_learning
    }
}
