use crate::types::{EndOfDataPolicy, ExitReason, Trade};

/// Single-asset, single-position book used when replaying one gene.
///
/// Positions are one unit long, so realized profit is `exit - entry` and
/// the equity curve is the running P&L in price units, one point per bar.
pub struct Portfolio {
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,

    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub entry_bar: usize,
    pub entry_price: f64,
}

impl Portfolio {
    pub fn new() -> Self {
        Self {
            position: None,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            realized_pnl: 0.0,
            unrealized_pnl: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    pub fn open_position(&mut self, bar: usize, price: f64) {
        if self.position.is_none() {
            self.position = Some(Position {
                entry_bar: bar,
                entry_price: price,
            });
        }
    }

    pub fn close_position(&mut self, bar: usize, price: f64, reason: ExitReason) {
        if let Some(pos) = self.position.take() {
            let profit = price - pos.entry_price;
            self.realized_pnl += profit;
            self.trades.push(Trade {
                entry_bar: pos.entry_bar,
                exit_bar: bar,
                entry_price: pos.entry_price,
                exit_price: price,
                profit,
                exit_reason: reason,
            });
        }
    }

    /// Mark the open position to `price` and extend the equity curve.
    pub fn mark(&mut self, price: f64) {
        self.unrealized_pnl = match &self.position {
            Some(pos) => price - pos.entry_price,
            None => 0.0,
        };
        self.equity_curve.push(self.equity());
    }

    /// Apply the end-of-data policy to whatever is still open. Returns the
    /// discarded position, if any.
    ///
    /// A discarded position never contributed to realized profit, so its
    /// marks are replaced by the realized P&L from its entry bar onwards.
    pub fn finish(
        &mut self,
        last_bar: usize,
        last_price: f64,
        policy: EndOfDataPolicy,
    ) -> Option<Position> {
        match policy {
            EndOfDataPolicy::Discard => {
                let position = self.position.take()?;
                self.unrealized_pnl = 0.0;
                let realized = self.realized_pnl;
                if let Some(marks) = self.equity_curve.get_mut(position.entry_bar..) {
                    marks.fill(realized);
                }
                Some(position)
            }
            EndOfDataPolicy::CloseAtLast => {
                self.close_position(last_bar, last_price, ExitReason::EndOfData);
                None
            }
        }
    }

    pub fn equity(&self) -> f64 {
        self.realized_pnl + self.unrealized_pnl
    }

    pub fn get_trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn get_equity_curve(&self) -> &[f64] {
        &self.equity_curve
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_realizes_difference() {
        let mut portfolio = Portfolio::new();
        portfolio.open_position(0, 100.0);
        portfolio.mark(100.0);
        portfolio.close_position(1, 110.0, ExitReason::Signal);
        portfolio.mark(110.0);

        assert!(portfolio.is_flat());
        assert_eq!(portfolio.realized_pnl, 10.0);
        assert_eq!(portfolio.get_trades().len(), 1);
        assert_eq!(portfolio.get_equity_curve(), &[0.0, 10.0]);
    }

    #[test]
    fn test_marks_follow_open_position() {
        let mut portfolio = Portfolio::new();
        portfolio.open_position(0, 100.0);
        for price in [100.0, 120.0, 90.0, 110.0] {
            portfolio.mark(price);
        }
        assert_eq!(portfolio.get_equity_curve(), &[0.0, 20.0, -10.0, 10.0]);
    }

    #[test]
    fn test_discard_rewrites_unrealized_marks() {
        let mut portfolio = Portfolio::new();
        portfolio.open_position(0, 100.0);
        portfolio.mark(100.0);
        portfolio.close_position(1, 105.0, ExitReason::Signal);
        portfolio.mark(105.0);
        portfolio.open_position(2, 110.0);
        portfolio.mark(110.0);
        portfolio.mark(50.0);

        portfolio.finish(3, 50.0, EndOfDataPolicy::Discard);
        assert_eq!(portfolio.get_equity_curve(), &[0.0, 5.0, 5.0, 5.0]);
        assert_eq!(portfolio.equity(), 5.0);
    }

    #[test]
    fn test_finish_policies() {
        let mut discard = Portfolio::new();
        discard.open_position(0, 100.0);
        let dropped = discard.finish(2, 90.0, EndOfDataPolicy::Discard);
        assert_eq!(dropped.map(|p| p.entry_bar), Some(0));
        assert!(discard.get_trades().is_empty());

        let mut close = Portfolio::new();
        close.open_position(0, 100.0);
        assert!(close.finish(2, 90.0, EndOfDataPolicy::CloseAtLast).is_none());
        assert_eq!(close.realized_pnl, -10.0);
        assert_eq!(close.get_trades()[0].exit_reason, ExitReason::EndOfData);
    }
}
