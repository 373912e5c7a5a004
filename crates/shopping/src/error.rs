use time::Date;

/// Failures that abort a whole shopping/nutrition request.
///
/// Anything that only affects a single line or assignment is reported as a
/// [`crate::Warning`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ShoppingError {
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: Date, end: Date },

    #[error("Catalog lookup requested with no items")]
    EmptyCatalogBatch,

    #[error("Catalog store error: {0}")]
    Catalog(#[source] anyhow::Error),

    #[error("Store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("{0}")]
    Shared(mealinsights_shared::Error),
}

impl From<mealinsights_shared::Error> for ShoppingError {
    fn from(value: mealinsights_shared::Error) -> Self {
        match value {
            mealinsights_shared::Error::InvalidDateRange { start, end } => {
                Self::InvalidDateRange { start, end }
            }
            other => Self::Shared(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShoppingError>;
