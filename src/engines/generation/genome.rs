/// Gene representation for the trigger search
///
/// A gene is a fixed pair of triggers: one that opens a position and one
/// that closes it. Each trigger holds exactly four clauses, so a gene is
/// always eight `(field, coefficient)` pairs:
///
/// ```text
/// buy:  c1 > c2 & c3 > c4
/// sell: c5 > c6 & c7 > c8
/// ```
///
/// Genes are plain `Copy` values. Building the next generation copies them
/// into a fresh `Vec`, so a child can never alias a clause of its parent.
use super::trigger::{rand_trigger, Clause, Trigger, CLAUSES_PER_TRIGGER};
use crate::data::{FieldId, LegalFields};
use crate::engines::evaluation::expression::{format_trigger, get_expression};
use crate::error::{Result, TradegeneError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const CLAUSES_PER_GENE: usize = 2 * CLAUSES_PER_TRIGGER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerRole {
    Buy,
    Sell,
}

impl TriggerRole {
    pub const ALL: [TriggerRole; 2] = [TriggerRole::Buy, TriggerRole::Sell];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub buy: Trigger,
    pub sell: Trigger,
}

pub type Population = Vec<Gene>;

impl Gene {
    pub fn new(buy: Trigger, sell: Trigger) -> Self {
        Self { buy, sell }
    }

    pub fn trigger(&self, role: TriggerRole) -> &Trigger {
        match role {
            TriggerRole::Buy => &self.buy,
            TriggerRole::Sell => &self.sell,
        }
    }

    pub fn trigger_mut(&mut self, role: TriggerRole) -> &mut Trigger {
        match role {
            TriggerRole::Buy => &mut self.buy,
            TriggerRole::Sell => &mut self.sell,
        }
    }

    /// Buy clauses followed by sell clauses.
    pub fn clauses(&self) -> [Clause; CLAUSES_PER_GENE] {
        let mut clauses = [self.buy.clauses[0]; CLAUSES_PER_GENE];
        clauses[..CLAUSES_PER_TRIGGER].copy_from_slice(&self.buy.clauses);
        clauses[CLAUSES_PER_TRIGGER..].copy_from_slice(&self.sell.clauses);
        clauses
    }

    /// Inverse of [`Gene::clauses`].
    pub fn from_clauses(clauses: [Clause; CLAUSES_PER_GENE]) -> Self {
        let mut buy = [clauses[0]; CLAUSES_PER_TRIGGER];
        let mut sell = [clauses[CLAUSES_PER_TRIGGER]; CLAUSES_PER_TRIGGER];
        buy.copy_from_slice(&clauses[..CLAUSES_PER_TRIGGER]);
        sell.copy_from_slice(&clauses[CLAUSES_PER_TRIGGER..]);
        Self::new(Trigger::new(buy), Trigger::new(sell))
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.buy.fields().chain(self.sell.fields())
    }

    /// Fails with `MissingField` on the first clause whose field is not in
    /// `fields`.
    pub fn validate(&self, fields: &LegalFields) -> Result<()> {
        match self.fields().find(|id| !fields.contains(*id)) {
            Some(id) => Err(TradegeneError::MissingField {
                field: id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Human readable `(buy, sell)` triggers.
    pub fn describe(&self, fields: &LegalFields) -> (String, String) {
        let render = |trigger: &Trigger| {
            let expressions: Vec<String> = trigger
                .clauses
                .iter()
                .map(|clause| get_expression(clause, fields))
                .collect();
            format_trigger(&expressions)
        };
        (render(&self.buy), render(&self.sell))
    }
}

pub fn random_gene<R: Rng>(fields: &LegalFields, coefficients: &Range<f64>, rng: &mut R) -> Gene {
    let buy = rand_trigger(fields, coefficients, rng);
    let sell = rand_trigger(fields, coefficients, rng);
    Gene::new(buy, sell)
}

pub fn random_population<R: Rng>(
    size: usize,
    fields: &LegalFields,
    coefficients: &Range<f64>,
    rng: &mut R,
) -> Population {
    let mut population = Vec::with_capacity(size);
    for _ in 0..size {
        population.push(random_gene(fields, coefficients, rng));
    }
    population
}

/// The eight `(field, coefficient)` pairs of a gene, buy clauses first.
pub fn get_indicator_and_candle_values_from_gene(
    gene: &Gene,
) -> [(FieldId, f64); CLAUSES_PER_GENE] {
    gene.clauses().map(|clause| (clause.field, clause.coefficient))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fields() -> LegalFields {
        LegalFields::new(["open", "close", "rsi_14"]).unwrap()
    }

    fn gene() -> Gene {
        let clause = |f: usize, k: f64| Clause::new(FieldId(f), k);
        Gene::new(
            Trigger::new([clause(0, 1.0), clause(1, 1.5), clause(2, 0.5), clause(1, 1.25)]),
            Trigger::new([clause(1, 1.0), clause(0, 1.0), clause(2, 2.0), clause(2, 1.0)]),
        )
    }

    #[test]
    fn test_clauses_round_trip() {
        let gene = gene();
        let flat = gene.clauses();
        assert_eq!(flat[0], gene.buy.clauses[0]);
        assert_eq!(flat[4], gene.sell.clauses[0]);
        assert_eq!(Gene::from_clauses(flat), gene);
    }

    #[test]
    fn test_values_from_gene_keep_order() {
        let values = get_indicator_and_candle_values_from_gene(&gene());
        assert_eq!(values[1], (FieldId(1), 1.5));
        assert_eq!(values[6], (FieldId(2), 2.0));
    }

    #[test]
    fn test_describe_formats_both_triggers() {
        let (buy, sell) = gene().describe(&fields());
        assert_eq!(buy, "1.00000*open > 1.50000*close & 0.50000*rsi_14 > 1.25000*close");
        assert_eq!(sell, "1.00000*close > 1.00000*open & 2.00000*rsi_14 > 1.00000*rsi_14");
    }

    #[test]
    fn test_validate_rejects_unknown_field() {
        let mut gene = gene();
        assert!(gene.validate(&fields()).is_ok());

        gene.trigger_mut(TriggerRole::Sell).clauses[3].field = FieldId(7);
        assert!(matches!(
            gene.validate(&fields()),
            Err(TradegeneError::MissingField { .. })
        ));
    }

    #[test]
    fn test_random_population_is_seeded() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first = random_population(20, &fields(), &(0.5..1.5), &mut a);
        let second = random_population(20, &fields(), &(0.5..1.5), &mut b);
        assert_eq!(first.len(), 20);
        assert_eq!(first, second);
    }
}
