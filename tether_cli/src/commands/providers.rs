use crate::cli::Cli;
use crate::commands::Result;
use crate::output::{format_output, OutputData, ProviderInfo};
use tether_core::ProviderRegistry;

pub fn run(cli: &Cli) -> Result<()> {
    let registry = ProviderRegistry::with_builtins();

    let providers: Vec<ProviderInfo> = registry
        .list()
        .map(|p| ProviderInfo {
            name: p.name.clone(),
            title: p.title.clone(),
            description: p.description.clone(),
            fields: p.fields.iter().filter(|f| !f.kind.is_message()).count(),
        })
        .collect();

    format_output(&OutputData::ProviderList(providers), &cli.output)
}
