use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Multiples (e.g., 3.2x debt/EBITDA)
pub type Multiple = Decimal;

/// Percentages expressed on a 0-100 scale (12.5 = 12.5%).
pub type Percent = Decimal;

/// Risk scores on a 0-100 scale, higher = riskier.
pub type Score = Decimal;

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    EUR,
    USD,
    GBP,
    CHF,
    DKK,
    SEK,
    NOK,
    Other(String),
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EUR => write!(f, "EUR"),
            Self::USD => write!(f, "USD"),
            Self::GBP => write!(f, "GBP"),
            Self::CHF => write!(f, "CHF"),
            Self::DKK => write!(f, "DKK"),
            Self::SEK => write!(f, "SEK"),
            Self::NOK => write!(f, "NOK"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Self::EUR,
            "USD" => Self::USD,
            "GBP" => Self::GBP,
            "CHF" => Self::CHF,
            "DKK" => Self::DKK,
            "SEK" => Self::SEK,
            "NOK" => Self::NOK,
            other => Self::Other(other.to_string()),
        })
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round a derived value to two decimal places.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp(2)
}
