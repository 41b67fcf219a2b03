use std::fmt::Debug;
use std::sync::Arc;

use crate::column::common::{BitMask, ColumnType};
use crate::error::{Error, Result};
use crate::na::NA;
use crate::value::Value;

/// Element types that can back a [`TypedColumn`]
pub trait CellType: Clone + Default + Debug + Send + Sync + 'static {
    const COLUMN_TYPE: ColumnType;

    fn to_value(self) -> Value;

    /// Extracts the native element from a value of exactly this type
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_cell_type {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl CellType for $t {
                const COLUMN_TYPE: ColumnType = ColumnType::$variant;

                fn to_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_cell_type!(i64 => Int64, f64 => Float64, String => String, bool => Boolean, u8 => UInt8);

/// Immutable column storage: shared data plus an optional null mask.
///
/// Missing slots hold `T::default()` in `data`.
#[derive(Debug, Clone)]
pub struct TypedColumn<T> {
    pub(crate) data: Arc<[T]>,
    pub(crate) null_mask: Option<BitMask>,
}

pub type Int64Column = TypedColumn<i64>;
pub type Float64Column = TypedColumn<f64>;
pub type StringColumn = TypedColumn<String>;
pub type BooleanColumn = TypedColumn<bool>;
pub type UInt8Column = TypedColumn<u8>;

impl<T: CellType> TypedColumn<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
        }
    }

    /// Creates a column where `None` marks a missing cell
    pub fn from_options(values: Vec<Option<T>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(Option::is_none).collect();
        let null_mask = if nulls.iter().any(|&is_null| is_null) {
            Some(BitMask::from_bools(&nulls))
        } else {
            None
        };
        let data: Vec<T> = values.into_iter().map(Option::unwrap_or_default).collect();
        Self {
            data: data.into(),
            null_mask,
        }
    }

    pub(crate) fn missing(len: usize) -> Self {
        Self {
            data: vec![T::default(); len].into(),
            null_mask: Some(BitMask::from_bools(&vec![true; len])),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn column_type(&self) -> ColumnType {
        T::COLUMN_TYPE
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.null_mask
            .as_ref()
            .map_or(false, |mask| mask.is_set(index))
    }

    pub fn null_count(&self) -> usize {
        self.null_mask.as_ref().map_or(0, BitMask::count_set)
    }

    /// Returns the element at `index`, `None` when missing
    pub fn get(&self, index: usize) -> Result<Option<&T>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }
        if self.is_null(index) {
            return Ok(None);
        }
        Ok(Some(&self.data[index]))
    }

    pub(crate) fn get_value(&self, index: usize) -> Result<NA<Value>> {
        Ok(self.get(index)?.cloned().map(CellType::to_value).into())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| if self.is_null(i) { None } else { Some(v) })
    }

    pub(crate) fn repeat_each(&self, n: usize) -> Self {
        let values = self
            .iter()
            .flat_map(|v| std::iter::repeat(v.cloned()).take(n))
            .collect();
        Self::from_options(values)
    }

    pub(crate) fn take(&self, indices: &[usize]) -> Result<Self> {
        let values = indices
            .iter()
            .map(|&i| self.get(i).map(Option::<&T>::cloned))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_options(values))
    }
}

impl<T: CellType> From<Vec<T>> for TypedColumn<T> {
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}

impl StringColumn {
    /// Convenience constructor from string slices
    pub fn from_strs(values: &[&str]) -> Self {
        Self::new(values.iter().map(|s| s.to_string()).collect())
    }
}
