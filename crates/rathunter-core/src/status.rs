/// Stock class reported by the listing source.
///
/// The source sends free-text codes; only three are recognized. Anything
/// else is kept verbatim as [`StockStatus::Unknown`] and never matches a
/// stock filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock,
    NoStock,
    Unknown(String),
}

impl StockStatus {
    /// Classifies a raw status code. Matching is exact, as sent by the source.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "IN_STOCK" => StockStatus::InStock,
            "LOW_STOCK" => StockStatus::LowStock,
            "NO_STOCK" => StockStatus::NoStock,
            other => StockStatus::Unknown(other.to_string()),
        }
    }

    /// `true` for the statuses a hunter can actually buy from.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, StockStatus::InStock | StockStatus::LowStock)
    }

    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        matches!(self, StockStatus::NoStock)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "IN_STOCK"),
            StockStatus::LowStock => write!(f, "LOW_STOCK"),
            StockStatus::NoStock => write!(f, "NO_STOCK"),
            StockStatus::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}
