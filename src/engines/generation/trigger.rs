use crate::data::{FieldId, LegalFields, Row};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const CLAUSES_PER_TRIGGER: usize = 4;

/// One weighted term of a comparison: `row[field] * coefficient`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub field: FieldId,
    pub coefficient: f64,
}

impl Clause {
    pub fn new(field: FieldId, coefficient: f64) -> Self {
        Self { field, coefficient }
    }

    #[inline]
    pub fn value(&self, row: &Row<'_>) -> f64 {
        row.value(self.field) * self.coefficient
    }
}

/// Conjunction of two greater-than comparisons over four clauses:
/// fires when `c1 > c2 && c3 > c4`.
///
/// The operator and the conjunction are fixed; only the clauses evolve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub clauses: [Clause; CLAUSES_PER_TRIGGER],
}

impl Trigger {
    pub fn new(clauses: [Clause; CLAUSES_PER_TRIGGER]) -> Self {
        Self { clauses }
    }

    #[inline]
    pub fn fires(&self, row: &Row<'_>) -> bool {
        let [c1, c2, c3, c4] = &self.clauses;
        c1.value(row) > c2.value(row) && c3.value(row) > c4.value(row)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.clauses.iter().map(|c| c.field)
    }
}

/// Random trigger: every clause gets a uniform field from `fields` and a
/// uniform coefficient from `coefficients`.
pub fn rand_trigger<R: Rng>(
    fields: &LegalFields,
    coefficients: &Range<f64>,
    rng: &mut R,
) -> Trigger {
    let mut clauses = [Clause::new(FieldId(0), 0.0); CLAUSES_PER_TRIGGER];
    for clause in clauses.iter_mut() {
        let field = fields.random(rng);
        *clause = Clause::new(field, rng.gen_range(coefficients.clone()));
    }
    Trigger::new(clauses)
}

pub fn evaluate_trigger(trigger: &Trigger, row: &Row<'_>) -> bool {
    trigger.fires(row)
}
