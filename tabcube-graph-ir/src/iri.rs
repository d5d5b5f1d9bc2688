//! IRI utilities: scheme detection, compact IRIs, and RFC 3986 resolution

/// Returns true if the IRI starts with an RFC 3986 scheme
/// (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`).
///
/// Compact IRIs such as `qb:measureType` also satisfy this; use
/// [`split_compact`] first when a prefix table is available.
pub fn is_absolute(iri: &str) -> bool {
    scheme_of(iri).is_some()
}

/// The scheme of an absolute IRI, without the colon
pub fn scheme_of(iri: &str) -> Option<&str> {
    let colon = iri.find(':')?;
    let scheme = &iri[..colon];
    let mut bytes = scheme.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return None,
    }
    bytes
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
        .then_some(scheme)
}

/// Split a compact IRI `prefix:suffix`
///
/// Returns `None` for anything that cannot be a compact IRI: no colon, an
/// empty prefix, a prefix containing `/`, or a suffix starting with `//`
/// (which marks a hierarchical absolute IRI).
pub fn split_compact(value: &str) -> Option<(&str, &str)> {
    let (prefix, suffix) = value.split_once(':')?;
    if prefix.is_empty() || prefix.contains('/') || suffix.starts_with("//") {
        return None;
    }
    Some((prefix, suffix))
}

/// Remove the fragment (`#...`) from an IRI
pub fn strip_fragment(iri: &str) -> &str {
    match iri.find('#') {
        Some(pos) => &iri[..pos],
        None => iri,
    }
}

/// The components of an IRI reference (RFC 3986 section 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IriParts<'a> {
    pub scheme: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> IriParts<'a> {
    pub fn parse(reference: &'a str) -> Self {
        let (rest, fragment) = match reference.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (reference, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };
        let (scheme, rest) = match scheme_of(rest) {
            Some(scheme) => (Some(scheme), &rest[scheme.len() + 1..]),
            None => (None, rest),
        };
        let (authority, path) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find('/').unwrap_or(after.len());
                (Some(&after[..end]), &after[end..])
            }
            None => (None, rest),
        };
        Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
    }
}

impl std::fmt::Display for IriParts<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(scheme) = self.scheme {
            write!(f, "{scheme}:")?;
        }
        if let Some(authority) = self.authority {
            write!(f, "//{authority}")?;
        }
        f.write_str(self.path)?;
        if let Some(query) = self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// Resolve `reference` against `base` (RFC 3986 section 5.2.2)
///
/// Absolute references are returned with their dot segments removed.
pub fn resolve(base: &str, reference: &str) -> String {
    let r = IriParts::parse(reference);
    let b = IriParts::parse(base);

    let (scheme, authority, path, query) = if r.scheme.is_some() {
        (r.scheme, r.authority, remove_dot_segments(r.path), r.query)
    } else if r.authority.is_some() {
        (b.scheme, r.authority, remove_dot_segments(r.path), r.query)
    } else if r.path.is_empty() {
        (b.scheme, b.authority, b.path.to_string(), r.query.or(b.query))
    } else if r.path.starts_with('/') {
        (b.scheme, b.authority, remove_dot_segments(r.path), r.query)
    } else {
        let merged = if b.authority.is_some() && b.path.is_empty() {
            format!("/{}", r.path)
        } else {
            match b.path.rfind('/') {
                Some(pos) => format!("{}{}", &b.path[..=pos], r.path),
                None => r.path.to_string(),
            }
        };
        (b.scheme, b.authority, remove_dot_segments(&merged), r.query)
    };

    IriParts {
        scheme,
        authority,
        path: &path,
        query,
        fragment: r.fragment,
    }
    .to_string()
}

/// Remove `.` and `..` segments from a path (RFC 3986 section 5.2.4)
pub fn remove_dot_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut output: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len().saturating_sub(1);

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "." => {
                if i == last {
                    output.push("");
                }
            }
            ".." => {
                // Never pop the empty segment that represents the leading '/'
                if output.len() > usize::from(absolute) {
                    output.pop();
                }
                if i == last {
                    output.push("");
                }
            }
            s => output.push(s),
        }
    }

    let joined = output.join("/");
    if absolute && !joined.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_detection() {
        assert!(is_absolute("http://example.org"));
        assert!(is_absolute("file:///tmp/x.json"));
        assert!(is_absolute("urn:isbn:0451450523"));
        assert!(!is_absolute("data.csv"));
        assert!(!is_absolute("#dataset"));
        assert!(!is_absolute("1a:b"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn compact_iris() {
        assert_eq!(split_compact("qb:dataSet"), Some(("qb", "dataSet")));
        assert_eq!(split_compact("sdmx-attribute:unitMeasure"), Some(("sdmx-attribute", "unitMeasure")));
        assert_eq!(split_compact("http://example.org/x"), None);
        assert_eq!(split_compact(":local"), None);
        assert_eq!(split_compact("dir/file:x"), None);
        assert_eq!(split_compact("plain"), None);
    }

    #[test]
    fn rfc3986_normal_examples() {
        let base = "http://a/b/c/d;p?q";
        assert_eq!(resolve(base, "g"), "http://a/b/c/g");
        assert_eq!(resolve(base, "./g"), "http://a/b/c/g");
        assert_eq!(resolve(base, "g/"), "http://a/b/c/g/");
        assert_eq!(resolve(base, "/g"), "http://a/g");
        assert_eq!(resolve(base, "//g"), "http://g");
        assert_eq!(resolve(base, "?y"), "http://a/b/c/d;p?y");
        assert_eq!(resolve(base, "g?y"), "http://a/b/c/g?y");
        assert_eq!(resolve(base, "#s"), "http://a/b/c/d;p?q#s");
        assert_eq!(resolve(base, "g#s"), "http://a/b/c/g#s");
        assert_eq!(resolve(base, ""), "http://a/b/c/d;p?q");
        assert_eq!(resolve(base, "."), "http://a/b/c/");
        assert_eq!(resolve(base, ".."), "http://a/b/");
        assert_eq!(resolve(base, "../g"), "http://a/b/g");
        assert_eq!(resolve(base, "../.."), "http://a/");
        assert_eq!(resolve(base, "../../g"), "http://a/g");
        assert_eq!(resolve(base, "../../../g"), "http://a/g");
    }

    #[test]
    fn file_urls() {
        let base = "file:///data/cube/meta.json";
        assert_eq!(resolve(base, "obs.csv"), "file:///data/cube/obs.csv");
        assert_eq!(resolve(base, "#dataset"), "file:///data/cube/meta.json#dataset");
        assert_eq!(
            resolve(base, "../codelists/area.json#scheme"),
            "file:///data/codelists/area.json#scheme"
        );
        assert_eq!(resolve(base, "http://example.org/x"), "http://example.org/x");
    }

    #[test]
    fn parts_round_trip_display() {
        let iri = "https://example.org:8080/a/b?x=1#frag";
        let parts = IriParts::parse(iri);
        assert_eq!(parts.scheme, Some("https"));
        assert_eq!(parts.authority, Some("example.org:8080"));
        assert_eq!(parts.path, "/a/b");
        assert_eq!(parts.query, Some("x=1"));
        assert_eq!(parts.fragment, Some("frag"));
        assert_eq!(parts.to_string(), iri);
    }

    #[test]
    fn fragments_are_stripped() {
        assert_eq!(strip_fragment("file:///a/b.json#x"), "file:///a/b.json");
        assert_eq!(strip_fragment("file:///a/b.json"), "file:///a/b.json");
    }
}
