use std::collections::BTreeMap;

use serde::Serialize;

/// One entry of the static sector catalog used to pre-fill search terms.
#[derive(Debug, Clone, Serialize)]
pub struct Sector {
    pub name: &'static str,
    pub search_terms: &'static [&'static str],
    pub description: &'static str,
}

/// Read-only catalog of supported sectors, keyed by sector id.
pub fn sector_catalog() -> BTreeMap<&'static str, Sector> {
    BTreeMap::from([
        (
            "real_estate",
            Sector {
                name: "Real Estate",
                search_terms: &[
                    "real estate",
                    "property",
                    "realtor",
                    "estate agent",
                    "property management",
                ],
                description: "Real estate agencies, property management, realtors, and property services",
            },
        ),
        (
            "finance",
            Sector {
                name: "Finance & Banking",
                search_terms: &["finance", "banking", "investment", "insurance", "mortgage"],
                description: "Banks, investment firms, insurance companies, and financial services",
            },
        ),
        (
            "healthcare",
            Sector {
                name: "Healthcare",
                search_terms: &["healthcare", "medical", "hospital", "clinic", "pharmacy"],
                description: "Hospitals, clinics, medical practices, and healthcare services",
            },
        ),
        (
            "technology",
            Sector {
                name: "Technology",
                search_terms: &["technology", "software", "IT", "digital", "tech"],
                description: "Software companies, IT services, and technology firms",
            },
        ),
        (
            "retail",
            Sector {
                name: "Retail & E-commerce",
                search_terms: &["retail", "ecommerce", "online store", "shopping", "marketplace"],
                description: "Online stores, retail chains, and e-commerce platforms",
            },
        ),
        (
            "custom",
            Sector {
                name: "Custom Search",
                search_terms: &[],
                description: "Enter your own search terms for any industry or company type",
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_expected_sectors() {
        let catalog = sector_catalog();
        assert!(catalog.contains_key("real_estate"));
        assert!(catalog.contains_key("custom"));
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_custom_sector_has_no_seed_terms() {
        let catalog = sector_catalog();
        assert!(catalog["custom"].search_terms.is_empty());
        assert!(!catalog["real_estate"].search_terms.is_empty());
    }
}
