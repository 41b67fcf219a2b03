use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};

use crate::column::{Column, ColumnType};
use crate::error::{Error, Result};
use crate::na::NA;
use crate::value::Value;

pub mod transform;

pub use transform::{DummyOptions, StackOptions, UnstackOptions};

/// Immutable-by-convention columnar table with an ordered set of key columns.
///
/// Columns are kept in insertion order and looked up by name. Every column has
/// the same length. The operators in [`transform`] never mutate their input;
/// they return a new `DataFrame` that shares column storage where possible.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    columns: Vec<Column>,
    column_indices: HashMap<String, usize>,
    column_names: Vec<String>,
    key_columns: Vec<String>,
    row_count: usize,
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column
    pub fn add_column<C: Into<Column>>(&mut self, name: impl Into<String>, column: C) -> Result<()> {
        let name = name.into();
        let column = column.into();

        if self.column_indices.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }
        self.check_length(&column)?;

        if self.columns.is_empty() {
            self.row_count = column.len();
        }
        self.column_indices.insert(name.clone(), self.columns.len());
        self.column_names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Marks `names` as the key columns, in the given order
    pub fn set_keys<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let keys: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
        self.require_columns(&keys, "key columns")?;
        require_distinct(&keys, "key columns")?;
        self.key_columns = keys;
        Ok(())
    }

    /// Builder form of [`DataFrame::set_keys`]
    pub fn with_keys<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        self.set_keys(names)?;
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.column_indices
            .get(name)
            .map(|&idx| &self.columns[idx])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Looks up several columns, preserving argument order
    pub fn columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Column>> {
        names.iter().map(|name| self.column(name.as_ref())).collect()
    }

    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        Ok(self.column(name)?.column_type())
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn key_column_names(&self) -> &[String] {
        &self.key_columns
    }

    /// Every column that is not a key, in table order
    pub fn value_column_names(&self) -> Vec<String> {
        self.column_names
            .iter()
            .filter(|name| !self.key_columns.contains(name))
            .cloned()
            .collect()
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column_indices.contains_key(name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns a copy with `name` set to `column`.
    ///
    /// An existing column of the same name is replaced in place; otherwise the
    /// column is appended.
    pub fn with_column<C: Into<Column>>(&self, name: impl Into<String>, column: C) -> Result<Self> {
        let name = name.into();
        let column = column.into();
        let mut result = self.clone();
        match self.column_indices.get(&name) {
            Some(&idx) => {
                result.check_length(&column)?;
                result.columns[idx] = column;
            }
            None => result.add_column(name, column)?,
        }
        Ok(result)
    }

    /// Returns a copy without `name`; the name is dropped from the keys as well
    pub fn without_column(&self, name: &str) -> Result<Self> {
        if !self.contains_column(name) {
            return Err(Error::ColumnNotFound(name.to_string()));
        }
        let mut result = Self {
            row_count: self.row_count,
            ..Self::default()
        };
        for (col_name, column) in self.column_names.iter().zip(&self.columns) {
            if col_name != name {
                result.add_column(col_name.clone(), column.clone())?;
            }
        }
        result.key_columns = self
            .key_columns
            .iter()
            .filter(|key| key.as_str() != name)
            .cloned()
            .collect();
        Ok(result)
    }

    /// Re-keys the table: the result holds `keys` followed by `values`, keyed by `keys`
    pub fn reindex<S: AsRef<str>>(&self, keys: &[S], values: &[S]) -> Result<Self> {
        let keys: Vec<String> = keys.iter().map(|s| s.as_ref().to_string()).collect();
        let values: Vec<String> = values.iter().map(|s| s.as_ref().to_string()).collect();
        self.require_columns(&keys, "reindex keys")?;
        self.require_columns(&values, "reindex values")?;
        let all: Vec<String> = keys.iter().chain(&values).cloned().collect();
        require_distinct(&all, "reindex")?;

        let mut result = Self {
            row_count: self.row_count,
            ..Self::default()
        };
        for name in &all {
            result.add_column(name.clone(), self.column(name)?.clone())?;
        }
        result.key_columns = keys;
        Ok(result)
    }

    /// Distinct values of `name` with their counts, in order of first occurrence
    pub fn value_counts(&self, name: &str) -> Result<Vec<(NA<Value>, usize)>> {
        let column = self.column(name)?;
        let mut positions: HashMap<NA<Value>, usize> = HashMap::new();
        let mut counts: Vec<(NA<Value>, usize)> = Vec::new();
        for value in column.values() {
            match positions.get(&value) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(value.clone(), counts.len());
                    counts.push((value, 1));
                }
            }
        }
        Ok(counts)
    }

    /// Fails with `InvalidColumnSet` naming every entry of `names` that is not a column
    pub(crate) fn require_columns<S: AsRef<str>>(&self, names: &[S], context: &str) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| !self.contains_column(name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidColumnSet(format!(
                "{}: unknown column(s) {:?}",
                context, missing
            )))
        }
    }

    fn check_length(&self, column: &Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }
        Ok(())
    }
}

pub(crate) fn require_distinct<S: AsRef<str>>(names: &[S], context: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_ref()) {
            return Err(Error::InvalidColumnSet(format!(
                "{}: column {:?} listed more than once",
                context,
                name.as_ref()
            )));
        }
    }
    Ok(())
}

impl PartialEq for DataFrame {
    fn eq(&self, other: &Self) -> bool {
        self.row_count == other.row_count
            && self.column_names == other.column_names
            && self.key_columns == other.key_columns
            && self.columns == other.columns
    }
}

impl Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_ROWS: usize = 10;

        writeln!(
            f,
            "DataFrame ({} rows x {} columns):",
            self.row_count,
            self.columns.len()
        )?;
        for name in &self.column_names {
            let marker = if self.key_columns.contains(name) { "*" } else { "" };
            write!(f, " {:<12} |", format!("{}{}", name, marker))?;
        }
        writeln!(f)?;

        for row in 0..self.row_count.min(MAX_ROWS) {
            for column in &self.columns {
                let cell = column.get(row).map_err(|_| fmt::Error)?;
                write!(f, " {:<12} |", cell.to_string())?;
            }
            writeln!(f)?;
        }
        if self.row_count > MAX_ROWS {
            writeln!(f, "... ({} more rows)", self.row_count - MAX_ROWS)?;
        }
        Ok(())
    }
}
