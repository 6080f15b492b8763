use crate::{
    data::PriceTable,
    engines::evaluation::portfolio::{Portfolio, Position},
    engines::generation::genome::Gene,
    error::{Result, TradegeneError},
    types::{EndOfDataPolicy, ExitReason, Trade},
};
use serde::{Deserialize, Serialize};

/// Fitness of every gene of one generation, in population order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
    pub best_index: usize,
    pub best_fitness: f64,
    pub fitness_sum: f64,
    pub fitnesses: Vec<f64>,
}

impl FitnessRecord {
    /// `best_index` is the first position holding the maximum.
    pub fn from_fitnesses(fitnesses: Vec<f64>) -> Result<Self> {
        let first = *fitnesses.first().ok_or_else(|| {
            TradegeneError::BacktestError("Cannot score an empty population".to_string())
        })?;

        let mut best_index = 0;
        let mut best_fitness = first;
        for (index, &fitness) in fitnesses.iter().enumerate().skip(1) {
            if fitness > best_fitness {
                best_index = index;
                best_fitness = fitness;
            }
        }

        Ok(Self {
            best_index,
            best_fitness,
            fitness_sum: fitnesses.iter().sum(),
            fitnesses,
        })
    }

    pub fn mean(&self) -> f64 {
        self.fitness_sum / self.fitnesses.len() as f64
    }
}

/// Full replay of a single gene.
#[derive(Debug, Clone)]
pub struct Backtest {
    pub gene: Gene,
    pub fitness: f64,
    pub trades: Vec<Trade>,
    /// Realized P&L per bar, plus the marks of a position closed at end of data
    pub equity_curve: Vec<f64>,
    /// Position still open at end of data under the discard policy
    pub open_position: Option<Position>,
}

/// Single-position long-only simulator. Fitness is net realized profit in
/// price units.
pub struct Backtester {
    policy: EndOfDataPolicy,
}

impl Backtester {
    pub fn new(policy: EndOfDataPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> EndOfDataPolicy {
        self.policy
    }

    /// Every clause of every gene must reference a column of `table`.
    pub fn validate(&self, table: &PriceTable, population: &[Gene]) -> Result<()> {
        for gene in population {
            gene.validate(table.fields())?;
        }
        Ok(())
    }

    pub fn evaluate(&self, table: &PriceTable, population: &[Gene]) -> Result<FitnessRecord> {
        self.validate(table, population)?;
        let fitnesses = population.iter().map(|gene| self.fitness(table, gene)).collect();
        FitnessRecord::from_fitnesses(fitnesses)
    }

    /// Net realized profit of `gene` over `table`.
    ///
    /// Panics if the gene references a column outside the table; use
    /// [`Backtester::validate`] first.
    pub fn fitness(&self, table: &PriceTable, gene: &Gene) -> f64 {
        let mut entry: Option<f64> = None;
        let mut fitness = 0.0;

        for row in table.rows() {
            if entry.is_none() && gene.buy.fires(&row) {
                entry = Some(row.price());
            }
            if let Some(entry_price) = entry {
                if gene.sell.fires(&row) {
                    fitness += row.price() - entry_price;
                    entry = None;
                }
            }
        }

        match (entry, self.policy, table.prices().last()) {
            (Some(entry_price), EndOfDataPolicy::CloseAtLast, Some(last)) => {
                fitness + last - entry_price
            }
            _ => fitness,
        }
    }

    /// Replay `gene` recording every trade and the equity curve.
    pub fn simulate(&self, table: &PriceTable, gene: &Gene) -> Result<Backtest> {
        gene.validate(table.fields())?;

        let mut portfolio = Portfolio::new();
        for row in table.rows() {
            let price = row.price();
            if portfolio.is_flat() && gene.buy.fires(&row) {
                portfolio.open_position(row.index(), price);
            }
            if !portfolio.is_flat() && gene.sell.fires(&row) {
                portfolio.close_position(row.index(), price, ExitReason::Signal);
            }
            portfolio.mark(price);
        }

        let open_position = match table.prices().last() {
            Some(&last) => portfolio.finish(table.len() - 1, last, self.policy),
            None => None,
        };

        Ok(Backtest {
            gene: *gene,
            fitness: portfolio.realized_pnl,
            equity_curve: portfolio.equity_curve,
            trades: portfolio.trades,
            open_position,
        })
    }
}

impl Default for Backtester {
    fn default() -> Self {
        Self::new(EndOfDataPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FieldId;
    use crate::engines::generation::trigger::{Clause, Trigger};

    // close, buy_flag, sell_flag
    fn table(close: &[f64], buy: &[f64], sell: &[f64]) -> PriceTable {
        PriceTable::from_columns(
            vec![
                ("close".to_string(), close.to_vec()),
                ("buy".to_string(), buy.to_vec()),
                ("sell".to_string(), sell.to_vec()),
                ("half".to_string(), vec![0.5; close.len()]),
            ],
            "close",
        )
        .unwrap()
    }

    /// Trigger firing when `flag > 0.5`
    fn flag(field: usize) -> Trigger {
        let c = |f: usize| Clause::new(FieldId(f), 1.0);
        Trigger::new([c(field), c(3), c(field), c(3)])
    }

    fn gene() -> Gene {
        Gene::new(flag(1), flag(2))
    }

    #[test]
    fn test_same_row_entry_and_exit_is_flat() {
        let table = table(&[100.0, 105.0], &[1.0, 0.0], &[1.0, 0.0]);
        let backtester = Backtester::default();

        assert_eq!(backtester.fitness(&table, &gene()), 0.0);
        let replay = backtester.simulate(&table, &gene()).unwrap();
        assert_eq!(replay.trades.len(), 1);
        assert_eq!(replay.trades[0].entry_bar, replay.trades[0].exit_bar);
    }

    #[test]
    fn test_reentry_after_exit() {
        let table = table(
            &[100.0, 110.0, 105.0, 120.0],
            &[1.0, 0.0, 1.0, 0.0],
            &[0.0, 1.0, 0.0, 1.0],
        );
        let record = Backtester::default().evaluate(&table, &[gene()]).unwrap();
        assert_eq!(record.best_fitness, 25.0);
    }

    #[test]
    fn test_discarded_position_leaves_curve_flat() {
        let table = table(&[100.0, 110.0, 50.0], &[1.0, 0.0, 0.0], &[0.0; 3]);
        let replay = Backtester::default().simulate(&table, &gene()).unwrap();

        assert_eq!(replay.fitness, 0.0);
        assert!(replay.trades.is_empty());
        assert!(replay.open_position.is_some());
        assert_eq!(replay.equity_curve, vec![0.0; 3]);
    }

    #[test]
    fn test_first_argmax_wins_ties() {
        let record = FitnessRecord::from_fitnesses(vec![1.0, 3.0, 3.0, -2.0]).unwrap();
        assert_eq!(record.best_index, 1);
        assert_eq!(record.fitness_sum, 5.0);
        assert_eq!(record.mean(), 1.25);
        assert!(FitnessRecord::from_fitnesses(Vec::new()).is_err());
    }

    #[test]
    fn test_missing_field_fails_fast() {
        let table = table(&[1.0], &[0.0], &[0.0]);
        let mut bad = gene();
        bad.sell.clauses[0].field = FieldId(10);
        let result = Backtester::default().evaluate(&table, &[gene(), bad]);
        assert!(matches!(result, Err(TradegeneError::MissingField { .. })));
    }
}
