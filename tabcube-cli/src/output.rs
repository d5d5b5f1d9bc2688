use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use std::fmt::Write as _;
use tabcube_inspect::{
    CatalogueMetadata, ConceptListInspection, DatasetInspection, DependencyReference,
    DependencyRole, StructuralComponent,
};

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("(none)")
}

fn list(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

pub fn format_catalogue(catalogue: &CatalogueMetadata) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Title:          {}", catalogue.title.bold());
    let _ = writeln!(out, "Description:    {}", or_none(catalogue.description.as_deref()));
    let _ = writeln!(out, "Summary:        {}", or_none(catalogue.summary.as_deref()));
    let _ = writeln!(out, "Issued:         {}", or_none(catalogue.issued.as_deref()));
    let _ = writeln!(out, "Modified:       {}", or_none(catalogue.modified.as_deref()));
    let _ = writeln!(out, "License:        {}", or_none(catalogue.license.as_deref()));
    let _ = writeln!(out, "Creator:        {}", or_none(catalogue.creator.as_deref()));
    let _ = writeln!(out, "Publisher:      {}", or_none(catalogue.publisher.as_deref()));
    let _ = writeln!(out, "Landing pages:  {}", list(&catalogue.landing_pages));
    let _ = writeln!(out, "Themes:         {}", list(&catalogue.themes));
    let _ = writeln!(out, "Keywords:       {}", list(&catalogue.keywords));
    let _ = writeln!(out, "Contact point:  {}", or_none(catalogue.contact_point.as_deref()));
    let _ = writeln!(out, "Identifier:     {}", or_none(catalogue.identifier.as_deref()));
    out
}

fn components_table(components: &[StructuralComponent]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["Property", "Label", "Column", "Role", "Required"]);
    for c in components {
        table.add_row(vec![
            c.property.clone(),
            c.label.clone().unwrap_or_default(),
            c.column_title.clone().unwrap_or_default(),
            c.role.to_string(),
            if c.required { "yes" } else { "no" }.to_string(),
        ]);
    }
    table
}

pub fn format_dataset(dataset: &DatasetInspection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Document:       {}", dataset.location);
    let _ = writeln!(out, "Type:           {}", "structured dataset".green());
    out.push_str(&format_catalogue(&dataset.catalogue));

    for table in &dataset.tables {
        let _ = writeln!(out);
        let _ = writeln!(out, "Table:          {}", table.table.url);
        let _ = writeln!(out, "Dataset:        {}", or_none(table.table.dataset.as_deref()));
        let shape = table
            .shape
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(undetermined)".to_string());
        let _ = writeln!(out, "Shape:          {shape}");
        let _ = writeln!(out, "{}", components_table(&table.components));
    }
    out
}

pub fn format_concept_list(list: &ConceptListInspection, max_tree_nodes: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Document:       {}", list.location);
    let _ = writeln!(out, "Type:           {}", "concept list".green());
    out.push_str(&format_catalogue(&list.catalogue));
    let _ = writeln!(out);
    let _ = writeln!(out, "Table:          {}", list.table.url);
    let _ = writeln!(out, "Concepts:       {}", list.hierarchy.len());
    let _ = writeln!(out);
    out.push_str(&list.hierarchy.display(max_tree_nodes));
    out
}

pub fn format_dependencies(dependencies: &[DependencyReference]) -> String {
    if dependencies.is_empty() {
        return "No dependencies.".to_string();
    }
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["Target", "Role", "Format", "Referenced by", "Loaded"]);
    for dep in dependencies {
        let (role, format) = match &dep.role {
            DependencyRole::TableSchema => ("table schema", "JSON-LD".to_string()),
            DependencyRole::Dataset { format, .. } => ("dataset", format.to_string()),
        };
        table.add_row(vec![
            dep.target.clone(),
            role.to_string(),
            format,
            dep.source.clone(),
            if dep.loaded { "yes" } else { "no" }.to_string(),
        ]);
    }
    table.to_string()
}
