//! Long-to-wide layout of grouped `(label, value)` pairs.

use std::collections::HashMap;

use log::debug;

use crate::column::{Column, ColumnType};
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::groupby::Group;
use crate::na::NA;
use crate::value::Value;

/// Lays grouped pairs out into one destination column per distinct label.
///
/// Each `(group, label)` cell accepts at most one value. A second write to the
/// same cell fails with [`Error::DuplicateLabel`], even when both values are
/// missing. Cells no group wrote to stay missing, or take the fill value.
#[derive(Debug, Clone)]
pub struct PivotBuilder {
    names: Vec<String>,
    lookup: HashMap<Value, usize>,
    value_type: ColumnType,
    fill_value: Option<Value>,
}

impl PivotBuilder {
    /// `labels` fixes the destination columns and their order
    pub fn new(labels: Vec<Value>, value_type: ColumnType) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(labels.len());
        let mut names = Vec::with_capacity(labels.len());
        let mut seen_names = HashMap::new();
        for (idx, label) in labels.iter().enumerate() {
            if lookup.insert(label.clone(), idx).is_some() {
                return Err(Error::InvalidColumnSet(format!(
                    "label {:?} listed more than once",
                    label.to_string()
                )));
            }
            let name = label.to_string();
            if seen_names.insert(name.clone(), idx).is_some() {
                return Err(Error::InvalidColumnSet(format!(
                    "labels render to the same column name {:?}",
                    name
                )));
            }
            names.push(name);
        }
        Ok(Self {
            names,
            lookup,
            value_type,
            fill_value: None,
        })
    }

    /// Value written into cells that no group produced
    pub fn with_fill_value(mut self, fill_value: Option<Value>) -> Self {
        self.fill_value = fill_value;
        self
    }

    /// Appends the destination columns to `keys`, which holds one row per group.
    ///
    /// Nothing is returned unless every pair found its own cell.
    pub fn build(&self, keys: &DataFrame, groups: &[Group]) -> Result<DataFrame> {
        let n = groups.len();
        if keys.column_count() > 0 && keys.row_count() != n {
            return Err(Error::InconsistentRowCount {
                expected: n,
                found: keys.row_count(),
            });
        }

        let mut cells: Vec<Vec<NA<Value>>> = vec![vec![NA::NA; n]; self.names.len()];
        let mut occupied: Vec<Vec<bool>> = vec![vec![false; n]; self.names.len()];

        for (row, group) in groups.iter().enumerate() {
            for (label, value) in &group.pairs {
                let label = label.value().ok_or_else(|| {
                    Error::InvalidColumnSet(format!(
                        "missing label for key {}",
                        group.key_display()
                    ))
                })?;
                let dest = *self.lookup.get(label).ok_or_else(|| {
                    Error::InvalidColumnSet(format!(
                        "label {:?} has no destination column",
                        label.to_string()
                    ))
                })?;
                if occupied[dest][row] {
                    return Err(Error::DuplicateLabel {
                        key: group.key_display(),
                        label: label.to_string(),
                    });
                }
                occupied[dest][row] = true;
                cells[dest][row] = value.clone();
            }
        }

        if let Some(fill) = &self.fill_value {
            for (column, filled) in cells.iter_mut().zip(&occupied) {
                for (cell, &was_written) in column.iter_mut().zip(filled) {
                    if !was_written {
                        *cell = NA::Value(fill.clone());
                    }
                }
            }
        }

        let mut result = keys.clone();
        for (name, column) in self.names.iter().zip(cells) {
            result.add_column(name.clone(), Column::from_values(self.value_type, column)?)?;
        }
        debug!(
            "pivoted {} groups into {} destination columns",
            n,
            self.names.len()
        );
        Ok(result)
    }
}
