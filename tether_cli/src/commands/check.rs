use crate::cli::Cli;
use crate::commands::{CommandError, Result};
use crate::output::{format_output, OutputData};
use std::path::Path;
use tether_core::{assemble_schema, Mode, ProviderRegistry};

pub fn run(cli: &Cli, provider: &str, values_path: &Path, edit: bool) -> Result<()> {
    let registry = ProviderRegistry::with_builtins();
    let def = registry
        .get(provider)
        .ok_or_else(|| CommandError::ProviderNotFound(provider.to_string()))?;

    let raw = std::fs::read_to_string(values_path)?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    let values = parsed
        .as_object()
        .ok_or_else(|| CommandError::InvalidStorage("expected a JSON object".to_string()))?;

    let mode = if edit { Mode::Edit } else { Mode::Create };
    let errors = assemble_schema(def, mode).validate(values);
    let failed = errors.len();

    format_output(
        &OutputData::ValidationReport {
            provider: def.name.clone(),
            mode: match mode {
                Mode::Create => "create",
                Mode::Edit => "edit",
            }
            .to_string(),
            errors,
        },
        &cli.output,
    )?;

    if failed > 0 {
        return Err(CommandError::ValidationFailed(failed));
    }
    Ok(())
}
