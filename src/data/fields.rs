use crate::error::{Result, TradegeneError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Index of a column inside a [`LegalFields`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(pub usize);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered set of indicator and candle-value names a clause may reference.
///
/// Fixed for the duration of a run. Clauses store a [`FieldId`] rather than
/// the name so that the evaluator can index straight into column arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalFields {
    names: Vec<String>,
}

impl LegalFields {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(TradegeneError::Configuration(
                "Legal field set must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(TradegeneError::Configuration(format!(
                    "Duplicate field name in legal field set: {}",
                    name
                )));
            }
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: FieldId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    pub fn id(&self, name: &str) -> Option<FieldId> {
        self.names.iter().position(|n| n == name).map(FieldId)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        id.0 < self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        (0..self.names.len()).map(FieldId)
    }

    /// Uniformly random member of the set.
    pub fn random<R: Rng>(&self, rng: &mut R) -> FieldId {
        FieldId(rng.gen_range(0..self.names.len()))
    }
}
