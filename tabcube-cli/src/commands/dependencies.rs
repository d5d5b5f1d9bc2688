use crate::error::CliResult;
use crate::output;
use tabcube_inspect::{source_from_config, InspectConfig, Resolver};

pub fn run(location: &str, config: &InspectConfig) -> CliResult<()> {
    let source = source_from_config(config)?;
    let resolved = Resolver::new(source).resolve(location)?;

    println!("Document:       {}", resolved.location);
    println!("Format:         {}", resolved.format);
    println!("Graphs loaded:  {}", resolved.store.len());
    println!("Triples:        {}", resolved.store.triple_count());
    println!();
    println!("{}", output::format_dependencies(&resolved.dependencies));
    Ok(())
}
