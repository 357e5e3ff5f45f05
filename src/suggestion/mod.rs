#![warn(clippy::all, clippy::pedantic)]

/// Ordered candidates produced for one failed lookup.
///
/// Lives only as long as the dialogue for that lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationList {
    candidates: Vec<String>,
}

impl RecommendationList {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, candidate: impl Into<String>) {
        self.candidates.push(candidate.into());
    }

    /// Drop repeated candidates, keeping the first occurrence of each
    #[must_use]
    pub fn deduplicated(self) -> Self {
        Self {
            candidates: remove_duplicates(self.candidates),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&str> {
        self.candidates.get(position).map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.candidates
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.candidates
    }
}

impl<S: Into<String>> FromIterator<S> for RecommendationList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            candidates: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Order-preserving removal of exact duplicates.
///
/// Quadratic; the lists passed in here are short.
#[must_use]
pub fn remove_duplicates<T: PartialEq>(candidates: Vec<T>) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !kept.contains(&candidate) {
            kept.push(candidate);
        }
    }
    kept
}
