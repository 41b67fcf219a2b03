use std::fmt::{self, Debug, Display};

/// A cell that may be missing
///
/// Every cell read from a column comes back as an `NA<T>`; pivot cells that no
/// source row wrote stay `NA::NA`. Equality and hashing treat two missing cells
/// as the same key, which is what grouping needs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum NA<T> {
    Value(T),
    NA,
}

impl<T> NA<T> {
    pub fn is_na(&self) -> bool {
        matches!(self, NA::NA)
    }

    pub fn is_value(&self) -> bool {
        !self.is_na()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

impl<T> From<Option<T>> for NA<T> {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(NA::NA, NA::Value)
    }
}

impl<T: Debug> Debug for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => v.fmt(f),
            NA::NA => f.write_str("NA"),
        }
    }
}

impl<T: Display> Display for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => v.fmt(f),
            NA::NA => f.write_str("NA"),
        }
    }
}
