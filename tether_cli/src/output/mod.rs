use crate::cli::OutputFormat;
use crate::commands::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub title: String,
    pub description: String,
    pub fields: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutputData {
    ProviderList(Vec<ProviderInfo>),
    ValidationReport {
        provider: String,
        mode: String,
        errors: BTreeMap<String, String>,
    },
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Pretty => {
            format_pretty_output(data)?;
        }
    }
    Ok(())
}

fn format_pretty_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::ProviderList(providers) => {
            println!();
            println!("{}", "Storage Providers".bold().cyan());
            println!();

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL_CONDENSED)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    Cell::new("Name".cyan().bold().to_string()),
                    Cell::new("Title".cyan().bold().to_string()),
                    Cell::new("Description".cyan().bold().to_string()),
                    Cell::new("Fields".cyan().bold().to_string()),
                ]);

            for p in providers {
                table.add_row(vec![
                    Cell::new(&p.name),
                    Cell::new(&p.title),
                    Cell::new(&p.description),
                    Cell::new(p.fields.to_string()),
                ]);
            }
            println!("{table}");
            println!();
            println!(
                "{} Use {} to start the wizard",
                "Tip:".dimmed(),
                "tether connect --project <id>".cyan()
            );
            println!();
        }
        OutputData::ValidationReport {
            provider,
            mode,
            errors,
        } => {
            println!();
            if errors.is_empty() {
                println!(
                    "{} {} settings are valid ({} mode)",
                    "OK".green().bold(),
                    provider.bold(),
                    mode
                );
            } else {
                println!(
                    "{} {} settings failed validation ({} mode):",
                    "FAIL".red().bold(),
                    provider.bold(),
                    mode
                );
                for (field, message) in errors {
                    println!("  {} {}", field.yellow(), message);
                }
            }
            println!();
        }
    }
    Ok(())
}
