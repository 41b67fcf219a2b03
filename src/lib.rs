//! Reshape operators over an immutable columnar DataFrame.
//!
//! - [`DataFrame::stack`]: wide to long, one `(label, value)` row per value column
//! - [`DataFrame::unstack`]: long to wide, the inverse of `stack`
//! - [`DataFrame::create_dummies`]: one-hot expansion of categorical columns
//!
//! ```
//! use reshapers::{DataFrame, Int64Column, StackOptions, UnstackOptions};
//!
//! let mut df = DataFrame::new();
//! df.add_column("x", Int64Column::new(vec![1, 2, 3, 4])).unwrap();
//! df.add_column("xsquare", Int64Column::new(vec![1, 4, 9, 16])).unwrap();
//! df.add_column("xcube", Int64Column::new(vec![1, 8, 27, 64])).unwrap();
//! let df = df.with_keys(&["x"]).unwrap();
//!
//! let long = df.stack(&StackOptions::default()).unwrap();
//! assert_eq!(long.row_count(), 8);
//!
//! let wide = long.unstack(&UnstackOptions::default()).unwrap();
//! assert_eq!(wide, df);
//! ```

pub mod column;
pub mod config;
pub mod dataframe;
pub mod error;
pub mod groupby;
pub mod na;
pub mod pivot;
pub mod value;

// Re-export commonly used types
pub use column::{
    BooleanColumn, Column, ColumnType, Float64Column, Int64Column, StringColumn, TypedColumn,
    UInt8Column,
};
pub use config::{LabelOrder, ReshapeConfig, UnifyPolicy};
pub use dataframe::{DataFrame, DummyOptions, StackOptions, UnstackOptions};
pub use error::{Error, Result};
pub use groupby::{Group, GroupedPairs};
pub use na::NA;
pub use pivot::PivotBuilder;
pub use value::Value;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
