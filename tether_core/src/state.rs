use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether the wizard configures a new storage or edits an existing one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Create,
    Edit,
}

impl Mode {
    /// The ordered steps for this mode. Edit mode pins the provider to the
    /// existing record, so provider selection is omitted.
    pub fn steps(self) -> &'static [Step] {
        match self {
            Mode::Create => CREATE_STEPS,
            Mode::Edit => EDIT_STEPS,
        }
    }
}

/// Named step identifiers; positions within a mode's step list are the
/// only index space, so create and edit never need reconciling arithmetic.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    SelectProvider,
    ConfigureConnection,
    Preview,
    Review,
}

impl Step {
    pub fn title(self) -> &'static str {
        match self {
            Step::SelectProvider => "Select Provider",
            Step::ConfigureConnection => "Configure Connection",
            Step::Preview => "Import Settings & Preview",
            Step::Review => "Review & Confirm",
        }
    }
}

const CREATE_STEPS: &[Step] = &[
    Step::SelectProvider,
    Step::ConfigureConnection,
    Step::Preview,
    Step::Review,
];

const EDIT_STEPS: &[Step] = &[Step::ConfigureConnection, Step::Preview, Step::Review];

/// Ephemeral wizard state: current position, accumulated values, and the
/// completion flag. Created when the wizard opens, discarded on close.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub position: usize,
    pub values: Map<String, Value>,
    pub is_complete: bool,
}
