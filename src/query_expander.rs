use std::collections::HashSet;

// Sector-biasing suffixes. These come before the generic business suffixes so
// callers that stop early get sector-targeted matches first.
const SECTOR_SUFFIXES: &[&str] = &[
    "real estate",
    "property",
    "realtor",
    "estate agent",
    "property management",
    "real estate agency",
    "property investment",
    "real estate broker",
    "property developer",
    "real estate consultant",
];

const GENERIC_SUFFIXES: &[&str] = &[
    "company",
    "business",
    "services",
    "ltd",
    "inc",
    "corp",
];

/// Expands one search term into an ordered list of query variants: the bare
/// term, then sector-specific variants, then generic business variants.
/// Duplicates are removed preserving first-seen order.
pub fn expand_search_terms(term: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut variants = Vec::new();

    let mut push = |variant: String| {
        if seen.insert(variant.clone()) {
            variants.push(variant);
        }
    };

    push(term.to_string());
    for suffix in SECTOR_SUFFIXES {
        push(format!("{} {}", term, suffix));
    }
    for suffix in GENERIC_SUFFIXES {
        push(format!("{} {}", term, suffix));
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_variant_is_bare_term() {
        let variants = expand_search_terms("restaurant");
        assert!(!variants.is_empty());
        assert!(variants[0].contains("restaurant"));
        assert_eq!(variants[0], "restaurant");
    }

    #[test]
    fn test_no_duplicates() {
        let variants = expand_search_terms("property");
        let unique: HashSet<&String> = variants.iter().collect();
        assert_eq!(unique.len(), variants.len());
    }

    #[test]
    fn test_sector_variants_precede_generic() {
        let variants = expand_search_terms("acme");
        let sector_pos = variants
            .iter()
            .position(|v| v == "acme real estate")
            .unwrap();
        let generic_pos = variants.iter().position(|v| v == "acme company").unwrap();
        assert!(sector_pos < generic_pos);
    }

    #[test]
    fn test_overlapping_suffix_deduped() {
        // Terms that already name a sector still expand duplicate-free.
        let variants = expand_search_terms("real estate");
        let unique: HashSet<&String> = variants.iter().collect();
        assert_eq!(unique.len(), variants.len());
    }
}
