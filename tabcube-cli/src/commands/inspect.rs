use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::output;
use tabcube_inspect::{source_from_config, InspectConfig, InspectedDocument};

pub fn run(
    location: &str,
    format: OutputFormat,
    max_tree_nodes: usize,
    config: &InspectConfig,
) -> CliResult<()> {
    let source = source_from_config(config)?;
    let inspected = tabcube_inspect::inspect(source, location)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inspected)?),
        OutputFormat::Text => match &inspected {
            InspectedDocument::Dataset(dataset) => print!("{}", output::format_dataset(dataset)),
            InspectedDocument::ConceptList(list) => {
                print!("{}", output::format_concept_list(list, max_tree_nodes))
            }
        },
    }
    Ok(())
}
