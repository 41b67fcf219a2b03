//! Key grouping that collects `(label, value)` pairs per group.
//!
//! Groups come out in first-seen key order and the pairs inside a group keep
//! row order. Large inputs are folded in parallel shards over contiguous row
//! ranges, then merged serially in shard order, which yields exactly the same
//! result as the single-pass fold.

use std::collections::HashMap;
use std::ops::Range;

use log::{debug, trace};
use rayon::prelude::*;

use crate::column::Column;
use crate::config::ReshapeConfig;
use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::na::NA;
use crate::value::Value;

/// One `(label, value)` contribution from a source row
pub type Pair = (NA<Value>, NA<Value>);

/// Rows sharing one key tuple
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Vec<NA<Value>>,
    /// First source row with this key; used to gather the key columns
    pub first_row: usize,
    pub pairs: Vec<Pair>,
}

impl Group {
    /// Renders the key tuple for diagnostics, e.g. `(1, "a")`
    pub fn key_display(&self) -> String {
        let parts: Vec<String> = self
            .key
            .iter()
            .map(|cell| match cell {
                NA::Value(Value::String(s)) => format!("{:?}", s),
                other => other.to_string(),
            })
            .collect();
        format!("({})", parts.join(", "))
    }
}

/// Output of the grouping pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupedPairs {
    groups: Vec<Group>,
}

struct Sources<'a> {
    keys: Vec<&'a Column>,
    label: &'a Column,
    value: &'a Column,
}

impl GroupedPairs {
    /// Groups `df` by `by`, collecting the `label`/`value` cells of every row.
    ///
    /// Switches to the sharded fold when the row count reaches
    /// `config.parallel_threshold`.
    pub fn collect<S: AsRef<str>>(
        df: &DataFrame,
        by: &[S],
        label: &str,
        value: &str,
        config: &ReshapeConfig,
    ) -> Result<Self> {
        let shards = if df.row_count() >= config.parallel_threshold {
            rayon::current_num_threads().max(1)
        } else {
            1
        };
        Self::collect_sharded(df, by, label, value, shards)
    }

    /// Groups with an explicit shard count; `shards <= 1` runs a single serial pass
    pub fn collect_sharded<S: AsRef<str>>(
        df: &DataFrame,
        by: &[S],
        label: &str,
        value: &str,
        shards: usize,
    ) -> Result<Self> {
        let sources = Sources {
            keys: df.columns(by)?,
            label: df.column(label)?,
            value: df.column(value)?,
        };
        let n = df.row_count();

        let groups = if shards <= 1 || n < 2 {
            fold_rows(&sources, 0..n)?
        } else {
            let chunk = (n + shards - 1) / shards;
            let partials = (0..shards)
                .into_par_iter()
                .map(|s| fold_rows(&sources, (s * chunk).min(n)..((s + 1) * chunk).min(n)))
                .collect::<Result<Vec<Vec<Group>>>>()?;
            trace!("merging {} grouping shards", partials.len());
            merge_shards(partials)
        };

        debug!("grouped {} rows into {} groups", n, groups.len());
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// First row index of every group, in group order
    pub fn first_rows(&self) -> Vec<usize> {
        self.groups.iter().map(|g| g.first_row).collect()
    }
}

fn fold_rows(sources: &Sources<'_>, rows: Range<usize>) -> Result<Vec<Group>> {
    let mut index: HashMap<Vec<NA<Value>>, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for row in rows {
        let key = sources
            .keys
            .iter()
            .map(|col| col.get(row))
            .collect::<Result<Vec<_>>>()?;
        let pair = (sources.label.get(row)?, sources.value.get(row)?);

        match index.get(&key) {
            Some(&g) => groups[g].pairs.push(pair),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    first_row: row,
                    pairs: vec![pair],
                });
            }
        }
    }
    Ok(groups)
}

// Shards cover ascending row ranges, so merging in shard order keeps first-seen order.
fn merge_shards(partials: Vec<Vec<Group>>) -> Vec<Group> {
    let mut index: HashMap<Vec<NA<Value>>, usize> = HashMap::new();
    let mut merged: Vec<Group> = Vec::new();

    for group in partials.into_iter().flatten() {
        match index.get(&group.key) {
            Some(&g) => merged[g].pairs.extend(group.pairs),
            None => {
                index.insert(group.key.clone(), merged.len());
                merged.push(group);
            }
        }
    }
    merged
}
