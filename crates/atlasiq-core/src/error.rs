use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Cannot calculate risk: no financial statement for company {company_id} in fiscal year {fiscal_year}")]
    MissingRequiredData { company_id: i64, fiscal_year: i32 },

    #[error("Unsupported currency: no EUR conversion rate for {0}")]
    UnsupportedCurrency(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AtlasError {
    fn from(e: serde_json::Error) -> Self {
        AtlasError::SerializationError(e.to_string())
    }
}
