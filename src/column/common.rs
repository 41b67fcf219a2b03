use std::fmt::{self, Display};
use std::sync::Arc;

use crate::column::typed_column::{
    BooleanColumn, CellType, Float64Column, Int64Column, StringColumn, TypedColumn, UInt8Column,
};
use crate::config::UnifyPolicy;
use crate::error::{Error, Result};
use crate::na::NA;
use crate::value::Value;

/// Element type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Boolean,
    UInt8,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::String => "string",
            ColumnType::Boolean => "bool",
            ColumnType::UInt8 => "uint8",
        };
        f.write_str(name)
    }
}

impl ColumnType {
    fn numeric_rank(self) -> Option<u8> {
        match self {
            ColumnType::UInt8 => Some(0),
            ColumnType::Int64 => Some(1),
            ColumnType::Float64 => Some(2),
            ColumnType::String | ColumnType::Boolean => None,
        }
    }

    /// Returns the common type of `self` and `other` under `policy`, if any
    pub fn unify(self, other: ColumnType, policy: UnifyPolicy) -> Option<ColumnType> {
        if self == other {
            return Some(self);
        }
        match policy {
            UnifyPolicy::Strict => None,
            UnifyPolicy::Widen => match (self.numeric_rank(), other.numeric_rank()) {
                (Some(a), Some(b)) => Some(if a >= b { self } else { other }),
                _ => None,
            },
        }
    }
}

/// Folds `types` into one common element type.
///
/// `context` names the operation for the error message.
pub fn unify_types<I>(types: I, policy: UnifyPolicy, context: &str) -> Result<ColumnType>
where
    I: IntoIterator<Item = ColumnType>,
{
    let mut iter = types.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| Error::InvalidColumnSet(format!("{}: no columns to unify", context)))?;
    iter.try_fold(first, |acc, ty| {
        acc.unify(ty, policy).ok_or_else(|| Error::TypeMismatch {
            context: context.to_string(),
            expected: acc,
            found: ty,
        })
    })
}

/// Null bitmask; a set bit marks a missing cell
#[derive(Debug, Clone)]
pub struct BitMask {
    pub(crate) data: Arc<[u8]>,
    pub(crate) len: usize,
}

impl BitMask {
    pub fn from_bools(bools: &[bool]) -> Self {
        let mut data = vec![0u8; (bools.len() + 7) / 8];
        for (i, &is_set) in bools.iter().enumerate() {
            if is_set {
                data[i / 8] |= 1 << (i % 8);
            }
        }
        Self {
            data: data.into(),
            len: bools.len(),
        }
    }

    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.len {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.len,
            });
        }
        Ok(self.is_set(index))
    }

    pub(crate) fn is_set(&self, index: usize) -> bool {
        self.data
            .get(index / 8)
            .map_or(false, |byte| byte & (1 << (index % 8)) != 0)
    }

    pub fn count_set(&self) -> usize {
        (0..self.len).filter(|&i| self.is_set(i)).count()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A homogeneous column of one of the supported element types
#[derive(Debug, Clone)]
pub enum Column {
    Int64(Int64Column),
    Float64(Float64Column),
    String(StringColumn),
    Boolean(BooleanColumn),
    UInt8(UInt8Column),
}

macro_rules! dispatch {
    ($self:expr, $col:ident => $body:expr) => {
        match $self {
            Column::Int64($col) => $body,
            Column::Float64($col) => $body,
            Column::String($col) => $body,
            Column::Boolean($col) => $body,
            Column::UInt8($col) => $body,
        }
    };
}

impl Column {
    pub fn len(&self) -> usize {
        dispatch!(self, col => col.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::String(_) => ColumnType::String,
            Column::Boolean(_) => ColumnType::Boolean,
            Column::UInt8(_) => ColumnType::UInt8,
        }
    }

    /// Reads one cell
    pub fn get(&self, index: usize) -> Result<NA<Value>> {
        dispatch!(self, col => col.get_value(index))
    }

    /// Number of missing cells
    pub fn null_count(&self) -> usize {
        dispatch!(self, col => col.null_count())
    }

    /// Materializes every cell in row order
    pub fn values(&self) -> Vec<NA<Value>> {
        dispatch!(self, col => col
            .iter()
            .map(|v| NA::from(v.cloned().map(CellType::to_value)))
            .collect())
    }

    /// Builds a column of type `ty` from cell values.
    ///
    /// Present values are widened into `ty`; a value that cannot be
    /// represented fails with `TypeMismatch`.
    pub fn from_values<I>(ty: ColumnType, values: I) -> Result<Column>
    where
        I: IntoIterator<Item = NA<Value>>,
    {
        let column = match ty {
            ColumnType::Int64 => Column::Int64(build_typed(ty, values)?),
            ColumnType::Float64 => Column::Float64(build_typed(ty, values)?),
            ColumnType::String => Column::String(build_typed(ty, values)?),
            ColumnType::Boolean => Column::Boolean(build_typed(ty, values)?),
            ColumnType::UInt8 => Column::UInt8(build_typed(ty, values)?),
        };
        Ok(column)
    }

    /// A column of `len` missing cells
    pub fn missing(ty: ColumnType, len: usize) -> Column {
        match ty {
            ColumnType::Int64 => Column::Int64(TypedColumn::missing(len)),
            ColumnType::Float64 => Column::Float64(TypedColumn::missing(len)),
            ColumnType::String => Column::String(TypedColumn::missing(len)),
            ColumnType::Boolean => Column::Boolean(TypedColumn::missing(len)),
            ColumnType::UInt8 => Column::UInt8(TypedColumn::missing(len)),
        }
    }

    /// Repeats every cell `n` times in place: `[a, b]` -> `[a, a, b, b]` for `n = 2`
    pub fn repeat_each(&self, n: usize) -> Column {
        dispatch!(self, col => Column::from(col.repeat_each(n)))
    }

    /// Gathers the cells at `indices`
    pub fn take(&self, indices: &[usize]) -> Result<Column> {
        Ok(dispatch!(self, col => Column::from(col.take(indices)?)))
    }
}

fn build_typed<T, I>(ty: ColumnType, values: I) -> Result<TypedColumn<T>>
where
    T: CellType,
    I: IntoIterator<Item = NA<Value>>,
{
    let cells = values
        .into_iter()
        .map(|cell| match cell {
            NA::NA => Ok(None),
            NA::Value(v) => v
                .cast_to(ty)
                .and_then(|cast| T::from_value(&cast))
                .map(Some)
                .ok_or_else(|| Error::TypeMismatch {
                    context: "column construction".to_string(),
                    expected: ty,
                    found: v.column_type(),
                }),
        })
        .collect::<Result<Vec<Option<T>>>>()?;
    Ok(TypedColumn::from_options(cells))
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        if self.column_type() != other.column_type() || self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| match (self.get(i), other.get(i)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        })
    }
}

macro_rules! impl_from_typed {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<TypedColumn<$t>> for Column {
                fn from(col: TypedColumn<$t>) -> Self {
                    Column::$variant(col)
                }
            }
        )*
    };
}

impl_from_typed!(i64 => Int64, f64 => Float64, String => String, bool => Boolean, u8 => UInt8);
