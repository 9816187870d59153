use serde::Serialize;
use std::fmt;

/// Transformation applied to raw input before it becomes a search term
///
/// Each transformation is composable and testable in isolation.
pub trait TermTransformation: Send + Sync {
    fn transform(&self, input: &str) -> String;
    fn name(&self) -> &'static str;
}

/// Converts input to lowercase
#[derive(Debug, Clone)]
pub struct LowercaseTransform;

impl TermTransformation for LowercaseTransform {
    fn transform(&self, input: &str) -> String {
        input.to_lowercase()
    }

    fn name(&self) -> &'static str {
        "Lowercase"
    }
}

/// Trims both ends and collapses every internal whitespace run to one space
#[derive(Debug, Clone)]
pub struct CollapseWhitespaceTransform;

impl TermTransformation for CollapseWhitespaceTransform {
    fn transform(&self, input: &str) -> String {
        input.split_whitespace().collect::<Vec<&str>>().join(" ")
    }

    fn name(&self) -> &'static str {
        "CollapseWhitespace"
    }
}

/// A settled-ready search term.
///
/// Never empty, lowercased, no leading/trailing whitespace and no internal
/// whitespace run longer than one space. Only [`TermNormalizer`] builds one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedTerm(String);

impl NormalizedTerm {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for NormalizedTerm {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Applies a pipeline of transformations and drops empty results
pub struct TermNormalizer {
    transformations: Vec<Box<dyn TermTransformation>>,
}

impl TermNormalizer {
    /// Whitespace is collapsed last so no transformation can reintroduce runs
    pub fn new() -> Self {
        Self {
            transformations: vec![
                Box::new(LowercaseTransform),
                Box::new(CollapseWhitespaceTransform),
            ],
        }
    }

    pub fn normalize(&self, raw: &str) -> Option<NormalizedTerm> {
        let mut result = raw.to_string();

        for transformation in &self.transformations {
            result = transformation.transform(&result);
            log::trace!("After {}: '{}'", transformation.name(), result);
        }

        if result.is_empty() {
            None
        } else {
            Some(NormalizedTerm(result))
        }
    }
}

impl Default for TermNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes a raw keystroke value with the default pipeline
pub fn normalize(raw: &str) -> Option<NormalizedTerm> {
    TermNormalizer::new().normalize(raw)
}
