//! CSVW URI templates
//!
//! `propertyUrl` and `valueUrl` arrive as `csvw:uriTemplate` literals,
//! untouched by JSON-LD context processing. Before they can be compared with
//! IRIs in the graph they need their compact prefixes expanded and relative
//! references resolved.

use once_cell::sync::Lazy;
use regex::Regex;
use tabcube_graph_ir::iri;
use tabcube_vocab::prefixes;

/// `{variable}` substitution in a URI template
pub(crate) static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));

/// Whether `binding` contains at least one substitution variable
pub fn is_template(binding: &str) -> bool {
    PLACEHOLDER_RE.is_match(binding)
}

/// Names of the variables in `template`, in order
pub fn variables(template: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Expand a template into an absolute IRI (template)
///
/// `qb:dataSet` becomes the full cube IRI; `#measure/{m}` resolves against
/// `document`; anything already absolute is left alone.
pub fn expand(template: &str, document: &str) -> String {
    if let Some((prefix, local)) = iri::split_compact(template) {
        if let Some(namespace) = prefixes::namespace(prefix) {
            return format!("{namespace}{local}");
        }
    }
    if iri::is_absolute(template) {
        return template.to_string();
    }
    // `{+var}` style templates may start with a variable; leave them alone
    if template.starts_with('{') {
        return template.to_string();
    }
    iri::resolve(document, template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_placeholders() {
        assert!(is_template("http://e/measure/{measure_type}"));
        assert!(!is_template("http://e/measure/count"));
        assert!(!is_template("http://e/{}"));
        assert_eq!(
            variables("http://e/{period}/{area_code}"),
            vec!["period", "area_code"]
        );
    }

    #[test]
    fn expands_compact_and_relative() {
        let doc = "file:///data/obs.csv-metadata.json";
        assert_eq!(expand("qb:dataSet", doc), "http://purl.org/linked-data/cube#dataSet");
        assert_eq!(
            expand("sdmx-attribute:unitMeasure", doc),
            "http://purl.org/linked-data/sdmx/2009/attribute#unitMeasure"
        );
        assert_eq!(
            expand("obs.csv#measure/{measure}", doc),
            "file:///data/obs.csv#measure/{measure}"
        );
        assert_eq!(expand("http://e/area/{area}", doc), "http://e/area/{area}");
        assert_eq!(expand("{+uri}", doc), "{+uri}");
    }
}
