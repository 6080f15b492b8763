use super::fields::{FieldId, LegalFields};
use crate::error::{Result, TradegeneError};
use polars::prelude::*;

/// Column-major numeric view of the historical rows.
///
/// Every legal field is pre-extracted into its own `Vec<f64>` so the
/// backtester never touches the DataFrame or looks up a name while walking
/// rows. Nulls become NaN, which compares false in every trigger.
#[derive(Debug, Clone)]
pub struct PriceTable {
    fields: LegalFields,
    columns: Vec<Vec<f64>>,
    price_column: String,
    price: Vec<f64>,
}

impl PriceTable {
    pub fn new(
        fields: LegalFields,
        columns: Vec<Vec<f64>>,
        price_column: impl Into<String>,
        price: Vec<f64>,
    ) -> Result<Self> {
        if columns.len() != fields.len() {
            return Err(TradegeneError::DataLoading(format!(
                "Expected {} columns, got {}",
                fields.len(),
                columns.len()
            )));
        }
        if let Some(bar) = price.iter().position(|p| !p.is_finite()) {
            return Err(TradegeneError::DataLoading(format!(
                "Price column '{}' has no usable value at row {}",
                price_column.into(),
                bar
            )));
        }
        let height = price.len();
        for (id, column) in fields.ids().zip(&columns) {
            if column.len() != height {
                return Err(TradegeneError::DataLoading(format!(
                    "Column '{}' has {} rows, expected {}",
                    fields.name(id).unwrap_or("?"),
                    column.len(),
                    height
                )));
            }
        }

        Ok(Self {
            fields,
            columns,
            price_column: price_column.into(),
            price,
        })
    }

    /// Build from named columns; every column becomes a legal field and
    /// `price_column` must be one of them.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>, price_column: &str) -> Result<Self> {
        let price = columns
            .iter()
            .find(|(name, _)| name == price_column)
            .map(|(_, values)| values.clone())
            .ok_or_else(|| TradegeneError::MissingField {
                field: price_column.to_string(),
            })?;
        let (names, values): (Vec<String>, Vec<Vec<f64>>) = columns.into_iter().unzip();
        Self::new(LegalFields::new(names)?, values, price_column, price)
    }

    pub fn from_dataframe(df: &DataFrame, fields: LegalFields, price_column: &str) -> Result<Self> {
        let mut columns = Vec::with_capacity(fields.len());
        for name in fields.names() {
            columns.push(extract_column(df, name)?);
        }
        let price = extract_column(df, price_column)?;
        Self::new(fields, columns, price_column, price)
    }

    pub fn len(&self) -> usize {
        self.price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn fields(&self) -> &LegalFields {
        &self.fields
    }

    pub fn price_column(&self) -> &str {
        &self.price_column
    }

    pub fn prices(&self) -> &[f64] {
        &self.price
    }

    pub fn contains(&self, field: FieldId) -> bool {
        field.0 < self.columns.len()
    }

    pub fn column(&self, field: FieldId) -> Option<&[f64]> {
        self.columns.get(field.0).map(Vec::as_slice)
    }

    pub fn row(&self, index: usize) -> Row<'_> {
        Row { table: self, index }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.len()).map(move |index| self.row(index))
    }
}

/// One historical row. Borrowed, so evaluation can never mutate it.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a PriceTable,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of `field` on this row.
    ///
    /// Panics when `field` is not a column of the table; callers validate
    /// genes against the table before walking rows.
    #[inline]
    pub fn value(&self, field: FieldId) -> f64 {
        self.table.columns[field.0][self.index]
    }

    pub fn get(&self, field: FieldId) -> Option<f64> {
        self.table
            .columns
            .get(field.0)
            .and_then(|column| column.get(self.index))
            .copied()
    }

    #[inline]
    pub fn price(&self) -> f64 {
        self.table.price[self.index]
    }
}

fn extract_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name).map_err(|_| TradegeneError::MissingField {
        field: name.to_string(),
    })?;
    let column = column.cast(&DataType::Float64)?;
    let values = column.f64()?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}
