#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("invalid provider definition: {0}")]
    InvalidDefinition(String),

    #[error("invalid storage record: {0}")]
    InvalidStorage(String),

    #[error("validation failed")]
    Validation,

    #[error("step {0} is out of bounds")]
    StepOutOfBounds(usize),

    #[error("cannot skip ahead to step {0}")]
    StepNotReached(usize),

    #[error("'{0}' is already in flight")]
    Busy(&'static str),

    #[error("a file preview is already loaded")]
    PreviewLoaded,

    #[error("invalid base URL: {0}")]
    BadBaseUrl(String),

    #[error("missing request parameter '{0}'")]
    MissingParam(&'static str),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
}

impl WizardError {
    /// Stable machine-readable label for each error class.
    pub fn code_str(&self) -> &'static str {
        match self {
            WizardError::UnknownProvider(_) => "unknown_provider",
            WizardError::UnknownField(_) => "unknown_field",
            WizardError::InvalidDefinition(_) => "invalid_definition",
            WizardError::InvalidStorage(_) => "invalid_storage",
            WizardError::Validation => "validation_failed",
            WizardError::StepOutOfBounds(_) => "step_out_of_bounds",
            WizardError::StepNotReached(_) => "step_not_reached",
            WizardError::Busy(_) => "busy",
            WizardError::PreviewLoaded => "preview_loaded",
            WizardError::BadBaseUrl(_) => "bad_base_url",
            WizardError::MissingParam(_) => "missing_param",
            WizardError::SerdeJson(_) => "parse_error",
            WizardError::HttpRequest(_) => "upstream_error",
        }
    }
}
