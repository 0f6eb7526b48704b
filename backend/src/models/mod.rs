//! Domain models for the conversion pipeline.
//!
//! - [`Value`] - A single CSV cell (text, integer, float or empty)
//! - [`Table`] - Ordered rows over an ordered, unique column list
//! - [`SchemaKind`] - The two fixed schemas (SK and WP)
//! - [`Direction`] - Which way a conversion goes

use std::fmt;
use std::str::FromStr;

use crate::error::{ConvertError, ConvertResult, CsvError, CsvResult};

// =============================================================================
// Cell Values
// =============================================================================

/// A tagged scalar stored in one table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl Value {
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => fmt_float(*x, f),
            Value::Text(s) => f.write_str(s),
            Value::Empty => Ok(()),
        }
    }
}

/// Shortest round-trip form, switching to exponent notation below `1e-4` and
/// from `1e16` up (`1e+20`, `1.5e-05`).
fn fmt_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sci = format!("{:e}", x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if x != 0.0 && x.is_finite() && !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exp.abs())
    } else if x.fract() == 0.0 {
        // keep ".0" so 1.0 does not read back as an integer
        write!(f, "{:.1}", x)
    } else {
        write!(f, "{}", x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

// =============================================================================
// Tables
// =============================================================================

/// An in-memory CSV table.
///
/// Columns are unique and ordered; every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new(columns: Vec<String>) -> CsvResult<Self> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].contains(col) {
                return Err(CsvError::DuplicateColumn(col.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Build a table from a header and rows, padding short rows with [`Value::Empty`].
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> CsvResult<Self> {
        let mut table = Self::new(columns)?;
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() > table.columns.len() {
                return Err(CsvError::RowLength {
                    // header is line 1
                    line: i as u64 + 2,
                    expected: table.columns.len(),
                    found: row.len(),
                });
            }
            table.push_row(row);
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Borrow the first row, if any.
    pub fn first_row(&self) -> Option<&[Value]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Value at `(row, column)`.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Empty);
        self.rows.push(row);
    }

    /// Replace (or append) a column with per-row values produced by `f`.
    pub fn set_column_with<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(usize) -> Value,
    {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(Value::Empty);
                }
                self.columns.len() - 1
            }
        };
        for (i, row) in self.rows.iter_mut().enumerate() {
            row[idx] = f(i);
        }
    }

    /// Replace (or append) a column holding the same value in every row.
    pub fn fill_column(&mut self, name: &str, value: &Value) {
        self.set_column_with(name, |_| value.clone());
    }

    /// Project the table onto `columns`, in that order.
    ///
    /// Fails with every requested column that does not exist.
    pub fn select(&self, columns: &[String]) -> ConvertResult<Table> {
        let mut indices = Vec::with_capacity(columns.len());
        let mut missing = Vec::new();
        for col in columns {
            match self.column_index(col) {
                Some(idx) => indices.push(idx),
                None => missing.push(col.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(ConvertError::MissingColumns(missing));
        }

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Table {
            columns: columns.to_vec(),
            rows,
        })
    }
}

// =============================================================================
// Schemas and Directions
// =============================================================================

/// One of the two fixed CSV schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Sk,
    Wp,
}

impl SchemaKind {
    /// File name of the bundled reference table defining this schema.
    pub fn reference_file(self) -> &'static str {
        match self {
            SchemaKind::Sk => crate::reference::SK_REFERENCE_FILE,
            SchemaKind::Wp => crate::reference::WP_REFERENCE_FILE,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Sk => f.write_str("SK"),
            SchemaKind::Wp => f.write_str("WP"),
        }
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sk" => Ok(SchemaKind::Sk),
            "wp" => Ok(SchemaKind::Wp),
            other => Err(format!("unknown schema '{}' (expected sk or wp)", other)),
        }
    }
}

/// Conversion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    SkToWp,
    WpToSk,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::SkToWp => "sk-to-wp",
            Direction::WpToSk => "wp-to-sk",
        }
    }

    /// Schema whose reference table drives the conversion.
    pub fn target(self) -> SchemaKind {
        match self {
            Direction::SkToWp => SchemaKind::Wp,
            Direction::WpToSk => SchemaKind::Sk,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sk-to-wp" => Ok(Direction::SkToWp),
            "wp-to-sk" => Ok(Direction::WpToSk),
            other => Err(format!(
                "unknown direction '{}' (expected sk-to-wp or wp-to-sk)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let err = Table::new(cols(&["Name", "SKU", "Name"])).unwrap_err();
        assert!(matches!(err, CsvError::DuplicateColumn(ref c) if c == "Name"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::from_rows(cols(&["a", "b", "c"]), vec![vec![Value::from(1)]]).unwrap();
        assert_eq!(table.rows()[0], vec![Value::Integer(1), Value::Empty, Value::Empty]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = Table::from_rows(
            cols(&["a"]),
            vec![vec![Value::from(1)], vec![Value::from(2), Value::from(3)]],
        )
        .unwrap_err();
        assert!(matches!(err, CsvError::RowLength { line: 3, expected: 1, found: 2 }));
    }

    #[test]
    fn test_set_column_overwrites_in_place() {
        let mut table = Table::from_rows(
            cols(&["ID", "Name"]),
            vec![vec![Value::from(7), Value::from("A")]],
        )
        .unwrap();
        table.set_column_with("ID", |i| Value::Integer(100 + i as i64));
        assert_eq!(table.columns(), &cols(&["ID", "Name"])[..]);
        assert_eq!(table.get(0, "ID"), Some(&Value::Integer(100)));
    }

    #[test]
    fn test_fill_column_appends() {
        let mut table = Table::from_rows(
            cols(&["Name"]),
            vec![vec![Value::from("A")], vec![Value::from("B")]],
        )
        .unwrap();
        table.fill_column("Price", &Value::Float(9.99));
        assert_eq!(table.columns(), &cols(&["Name", "Price"])[..]);
        assert_eq!(
            table.column("Price").unwrap(),
            vec![&Value::Float(9.99), &Value::Float(9.99)]
        );
    }

    #[test]
    fn test_select_reports_every_missing_column() {
        let table = Table::new(cols(&["Name"])).unwrap();
        let err = table.select(&cols(&["SKU", "Name", "Stock"])).unwrap_err();
        match err {
            ConvertError::MissingColumns(missing) => assert_eq!(missing, cols(&["SKU", "Stock"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(20000).to_string(), "20000");
        assert_eq!(Value::Float(9.99).to_string(), "9.99");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Text("x".into()).to_string(), "x");
        assert_eq!(Value::Empty.to_string(), "");
    }

    #[test]
    fn test_float_display_exponent_range() {
        assert_eq!(Value::Float(1e20).to_string(), "1e+20");
        assert_eq!(Value::Float(1e16).to_string(), "1e+16");
        assert_eq!(Value::Float(1e-5).to_string(), "1e-05");
        assert_eq!(Value::Float(-2.5e-7).to_string(), "-2.5e-07");
        assert_eq!(Value::Float(1.5e300).to_string(), "1.5e+300");
        assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Value::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Value::Float(0.0).to_string(), "0.0");
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("sk-to-wp".parse::<Direction>().unwrap(), Direction::SkToWp);
        assert_eq!("wp-to-sk".parse::<Direction>().unwrap().target(), SchemaKind::Sk);
        assert!("sk-to-sk".parse::<Direction>().is_err());
        assert_eq!("WP".parse::<SchemaKind>().unwrap(), SchemaKind::Wp);
    }
}
