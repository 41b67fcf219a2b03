use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use rayon::prelude::*;

use super::{require_distinct, DataFrame};
use crate::column::{unify_types, Column, StringColumn, UInt8Column};
use crate::config::{LabelOrder, ReshapeConfig, UnifyPolicy};
use crate::error::{Error, Result};
use crate::groupby::GroupedPairs;
use crate::na::NA;
use crate::pivot::PivotBuilder;
use crate::value::Value;

/// Options for [`DataFrame::stack`] (wide to long)
#[derive(Debug, Clone, Default)]
pub struct StackOptions {
    /// Key columns to keep; defaults to the table's key columns
    pub by: Option<Vec<String>>,
    /// Columns to flatten; defaults to every column not in `by`
    pub select: Option<Vec<String>>,
    /// Name of the label column; defaults to the configured `label_name`
    pub var_name: Option<String>,
    /// Name of the value column; defaults to the configured `value_name`
    pub value_name: Option<String>,
    /// Skip output rows whose value is missing
    pub drop_missing: bool,
}

/// Options for [`DataFrame::unstack`] (long to wide)
#[derive(Debug, Clone, Default)]
pub struct UnstackOptions {
    /// Grouping key; defaults to the table's key columns
    pub by: Option<Vec<String>>,
    /// Column holding the labels that become new column names
    pub var_name: Option<String>,
    /// Column holding the values to spread
    pub value_name: Option<String>,
    /// Written into cells that no row produced, instead of NA
    pub fill_value: Option<Value>,
}

/// Options for [`DataFrame::create_dummies`]
#[derive(Debug, Clone, Default)]
pub struct DummyOptions {
    /// Columns to encode, processed left to right
    pub columns: Vec<String>,
    /// Explicit category lists per column; other columns discover theirs
    pub categories: HashMap<String, Vec<Value>>,
}

impl DummyOptions {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|s| s.as_ref().to_string()).collect(),
            categories: HashMap::new(),
        }
    }

    /// Encodes a single column
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            columns: vec![name.into()],
            categories: HashMap::new(),
        }
    }

    /// Fixes the categories of `column` instead of discovering them
    pub fn with_categories<V: Into<Value>>(mut self, column: impl Into<String>, values: Vec<V>) -> Self {
        self.categories
            .insert(column.into(), values.into_iter().map(Into::into).collect());
        self
    }
}

impl DataFrame {
    /// Flattens value columns into label/value rows
    ///
    /// Equivalent to `stack`/`melt` in pandas. Every input row yields one
    /// output row per selected column, in row-major order, and the key columns
    /// are repeated alongside.
    ///
    /// # Example
    /// ```
    /// use reshapers::{DataFrame, Int64Column, StackOptions};
    ///
    /// // | x | xsquare | xcube |
    /// // |---+---------+-------|
    /// // | 1 | 1       | 1     |
    /// // | 2 | 4       | 8     |
    /// let mut df = DataFrame::new();
    /// df.add_column("x", Int64Column::new(vec![1, 2])).unwrap();
    /// df.add_column("xsquare", Int64Column::new(vec![1, 4])).unwrap();
    /// df.add_column("xcube", Int64Column::new(vec![1, 8])).unwrap();
    /// let df = df.with_keys(&["x"]).unwrap();
    ///
    /// // | x | variable | value |
    /// // |---+----------+-------|
    /// // | 1 | xsquare  | 1     |
    /// // | 1 | xcube    | 1     |
    /// // | 2 | xsquare  | 4     |
    /// // | 2 | xcube    | 8     |
    /// let stacked = df.stack(&StackOptions::default()).unwrap();
    /// assert_eq!(stacked.row_count(), 4);
    /// ```
    pub fn stack(&self, options: &StackOptions) -> Result<DataFrame> {
        self.stack_with_config(options, &ReshapeConfig::default())
    }

    pub fn stack_with_config(
        &self,
        options: &StackOptions,
        config: &ReshapeConfig,
    ) -> Result<DataFrame> {
        let by = options
            .by
            .clone()
            .unwrap_or_else(|| self.key_columns.clone());
        self.require_columns(&by, "stack by")?;
        require_distinct(&by, "stack by")?;

        if by != self.key_columns {
            let select = match &options.select {
                Some(select) => select.clone(),
                None => self
                    .column_names
                    .iter()
                    .filter(|name| !by.contains(name))
                    .cloned()
                    .collect(),
            };
            check_select(&by, &select, "stack")?;
            debug!("stack: re-keying table from {:?} to {:?}", self.key_columns, by);
            let rekeyed = self.reindex(&by, &select)?;
            let inner = StackOptions {
                by: None,
                select: None,
                ..options.clone()
            };
            return rekeyed.stack_with_config(&inner, config);
        }

        let select = options
            .select
            .clone()
            .unwrap_or_else(|| self.value_column_names());
        self.require_columns(&select, "stack select")?;
        check_select(&by, &select, "stack")?;

        let var_name = options
            .var_name
            .clone()
            .unwrap_or_else(|| config.label_name.clone());
        let value_name = options
            .value_name
            .clone()
            .unwrap_or_else(|| config.value_name.clone());
        check_output_names(&by, &var_name, &value_name, "stack")?;

        let value_columns = self.columns(&select)?;
        let value_type = unify_types(
            value_columns.iter().map(|col| col.column_type()),
            config.unify,
            "stack",
        )?;

        let k = select.len();
        let n = self.row_count;
        debug!(
            "stack: {} rows x {} columns -> {} rows ({})",
            n,
            k,
            n * k,
            value_type
        );

        // Flat index j maps to source row j / k and select column j % k.
        let cells = (0..n * k)
            .into_par_iter()
            .map(|j| value_columns[j % k].get(j / k))
            .collect::<Result<Vec<NA<Value>>>>()?;

        let mut result = DataFrame::new();
        if options.drop_missing {
            let keep: Vec<usize> = (0..n * k).filter(|&j| cells[j].is_value()).collect();
            let source_rows: Vec<usize> = keep.iter().map(|&j| j / k).collect();
            for name in &by {
                result.add_column(name.clone(), self.column(name)?.take(&source_rows)?)?;
            }
            let labels = keep.iter().map(|&j| select[j % k].clone()).collect();
            result.add_column(var_name, StringColumn::new(labels))?;
            let values = keep.iter().map(|&j| cells[j].clone());
            result.add_column(value_name, Column::from_values(value_type, values)?)?;
        } else {
            for name in &by {
                result.add_column(name.clone(), self.column(name)?.repeat_each(k))?;
            }
            let labels = (0..n * k).map(|j| select[j % k].clone()).collect();
            result.add_column(var_name, StringColumn::new(labels))?;
            result.add_column(value_name, Column::from_values(value_type, cells)?)?;
        }
        result.set_keys(&by)?;
        Ok(result)
    }

    /// Spreads label/value rows back into one column per distinct label
    ///
    /// Inverse of [`DataFrame::stack`]. Rows are grouped by the key columns
    /// (first-seen order); every distinct label across the whole table becomes
    /// a column, and a key that never produced a label gets NA there. Two rows
    /// with the same key and label fail with [`Error::DuplicateLabel`].
    pub fn unstack(&self, options: &UnstackOptions) -> Result<DataFrame> {
        self.unstack_with_config(options, &ReshapeConfig::default())
    }

    pub fn unstack_with_config(
        &self,
        options: &UnstackOptions,
        config: &ReshapeConfig,
    ) -> Result<DataFrame> {
        let by = options
            .by
            .clone()
            .unwrap_or_else(|| self.key_columns.clone());
        let var_name = options
            .var_name
            .clone()
            .unwrap_or_else(|| config.label_name.clone());
        let value_name = options
            .value_name
            .clone()
            .unwrap_or_else(|| config.value_name.clone());

        self.require_columns(&by, "unstack by")?;
        require_distinct(&by, "unstack by")?;
        self.require_columns(&[var_name.as_str(), value_name.as_str()], "unstack")?;
        check_output_names(&by, &var_name, &value_name, "unstack")?;

        let grouped = GroupedPairs::collect(self, &by, &var_name, &value_name, config)?;

        let labels = self.distinct_labels(&var_name, config.label_order)?;
        if let Some(clash) = labels.iter().find(|label| by.contains(&label.to_string())) {
            return Err(Error::InvalidColumnSet(format!(
                "unstack: label {:?} collides with key column",
                clash.to_string()
            )));
        }

        let fill_type = options.fill_value.as_ref().map(Value::column_type);
        let value_type = unify_types(
            std::iter::once(self.column_type(&value_name)?).chain(fill_type),
            config.unify,
            "unstack",
        )?;
        debug!(
            "unstack: {} rows -> {} groups x {} labels ({})",
            self.row_count,
            grouped.len(),
            labels.len(),
            value_type
        );

        let first_rows = grouped.first_rows();
        let mut keys = DataFrame::new();
        for name in &by {
            keys.add_column(name.clone(), self.column(name)?.take(&first_rows)?)?;
        }
        keys.set_keys(&by)?;

        PivotBuilder::new(labels, value_type)?
            .with_fill_value(options.fill_value.clone())
            .build(&keys, grouped.groups())
    }

    /// One-hot encodes categorical columns
    ///
    /// For each column `c` and category `v`, appends a `uint8` column named
    /// `"{c}_{v}"` holding 1 where `c == v` and 0 elsewhere, then removes `c`.
    /// A generated name that matches an existing column, or another generated
    /// name, fails with `InvalidColumnSet` before anything is written.
    /// Without explicit categories the distinct non-missing values of `c` are
    /// used in order of first occurrence. Supplied categories are not checked
    /// against the data: unseen categories give all-zero columns and
    /// unlisted values give all-zero rows.
    pub fn create_dummies(&self, options: &DummyOptions) -> Result<DataFrame> {
        self.create_dummies_with_config(options, &ReshapeConfig::default())
    }

    pub fn create_dummies_with_config(
        &self,
        options: &DummyOptions,
        config: &ReshapeConfig,
    ) -> Result<DataFrame> {
        let mut current = self.clone();

        for name in &options.columns {
            if !current.contains_column(name) {
                return Err(Error::InvalidColumnSet(format!(
                    "create_dummies: unknown column {:?}",
                    name
                )));
            }

            let present = current.discover_categories(name)?;
            let categories = match options.categories.get(name) {
                Some(supplied) => {
                    let unknown: Vec<String> = supplied
                        .iter()
                        .filter(|cat| !present.iter().any(|seen| matches_category(seen, cat)))
                        .map(ToString::to_string)
                        .collect();
                    if !unknown.is_empty() {
                        warn!(
                            "create_dummies: categories {:?} never occur in column {:?}",
                            unknown, name
                        );
                    }
                    supplied.clone()
                }
                None => order_values(present, config.category_order),
            };

            let dummy_names: Vec<String> = categories
                .iter()
                .map(|category| format!("{}{}{}", name, config.dummy_separator, category))
                .collect();
            check_dummy_names(&current, name, &dummy_names)?;

            let cells = current.column(name)?.values();
            let indicators: Vec<UInt8Column> = categories
                .par_iter()
                .map(|category| {
                    let flags = cells
                        .iter()
                        .map(|cell| match cell {
                            NA::Value(v) => u8::from(matches_category(v, category)),
                            NA::NA => 0,
                        })
                        .collect();
                    UInt8Column::new(flags)
                })
                .collect();

            debug!(
                "create_dummies: {:?} -> {} indicator columns",
                name,
                indicators.len()
            );
            current = current.without_column(name)?;
            for (dummy_name, column) in dummy_names.into_iter().zip(indicators) {
                current.add_column(dummy_name, column)?;
            }
        }

        Ok(current)
    }

    fn discover_categories(&self, name: &str) -> Result<Vec<Value>> {
        Ok(self
            .value_counts(name)?
            .into_iter()
            .filter_map(|(value, _)| value.into_option())
            .collect())
    }

    fn distinct_labels(&self, name: &str, order: LabelOrder) -> Result<Vec<Value>> {
        let labels = self
            .value_counts(name)?
            .into_iter()
            .map(|(value, _)| {
                value.into_option().ok_or_else(|| {
                    Error::InvalidColumnSet(format!(
                        "unstack: label column {:?} contains missing values",
                        name
                    ))
                })
            })
            .collect::<Result<Vec<Value>>>()?;
        Ok(order_values(labels, order))
    }
}

fn check_select(by: &[String], select: &[String], context: &str) -> Result<()> {
    if select.is_empty() {
        return Err(Error::InvalidColumnSet(format!(
            "{}: no value columns selected",
            context
        )));
    }
    require_distinct(select, context)?;
    let by: HashSet<&String> = by.iter().collect();
    let overlap: Vec<&String> = select.iter().filter(|name| by.contains(name)).collect();
    if !overlap.is_empty() {
        return Err(Error::InvalidColumnSet(format!(
            "{}: columns {:?} are both keys and values",
            context, overlap
        )));
    }
    Ok(())
}

fn check_output_names(by: &[String], var_name: &str, value_name: &str, context: &str) -> Result<()> {
    if var_name == value_name {
        return Err(Error::InvalidColumnSet(format!(
            "{}: label and value columns share the name {:?}",
            context, var_name
        )));
    }
    if let Some(clash) = by.iter().find(|key| *key == var_name || *key == value_name) {
        return Err(Error::InvalidColumnSet(format!(
            "{}: {:?} is a key column",
            context, clash
        )));
    }
    Ok(())
}

fn order_values(mut values: Vec<Value>, order: LabelOrder) -> Vec<Value> {
    if order == LabelOrder::Lexicographic {
        values.sort();
    }
    values
}

// Indicator names must be new columns and distinct from each other; the
// encoded column itself is about to be removed, so reusing its name is fine.
fn check_dummy_names(df: &DataFrame, source: &str, names: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(Error::InvalidColumnSet(format!(
                "create_dummies: categories of {:?} produce the column name {:?} twice",
                source, name
            )));
        }
        if name != source && df.contains_column(name) {
            return Err(Error::InvalidColumnSet(format!(
                "create_dummies: indicator column {:?} already exists",
                name
            )));
        }
    }
    Ok(())
}

// Both sides are widened to their common type, so 1u8 matches 1i64 either way.
fn matches_category(cell: &Value, category: &Value) -> bool {
    let common = match cell
        .column_type()
        .unify(category.column_type(), UnifyPolicy::Widen)
    {
        Some(ty) => ty,
        None => return false,
    };
    match (cell.cast_to(common), category.cast_to(common)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
