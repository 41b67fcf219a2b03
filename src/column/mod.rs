mod common;
mod typed_column;

pub use common::{unify_types, BitMask, Column, ColumnType};
pub use typed_column::{
    BooleanColumn, CellType, Float64Column, Int64Column, StringColumn, TypedColumn, UInt8Column,
};
