use regex::Regex;

/// Cleans raw scraped link text into a canonical company name.
///
/// Search-result anchors bundle the name together with ratings, review counts
/// and address fragments; each rule below strips one of those artifacts. The
/// rules run in a fixed order and the whole pass is idempotent.
pub struct NameNormalizer {
    domain: Regex,
    rating: Regex,
    reviews: Regex,
    ratings: Regex,
    address: Regex,
    digits: Regex,
    special: Regex,
    whitespace: Regex,
    leading: Regex,
    trailing: Regex,
}

impl NameNormalizer {
    pub fn new() -> Self {
        NameNormalizer {
            domain: Regex::new(r"www\.[^\s]+").unwrap(),
            rating: Regex::new(r"[0-9]+\.[0-9]+").unwrap(),
            reviews: Regex::new(r"(?i)[0-9,]+\s*reviews?").unwrap(),
            ratings: Regex::new(r"(?i)[0-9,]+\s*ratings?").unwrap(),
            // Trailing digit-led clause of comma-separated words, e.g.
            // "27 Union Square West, New York, United States"
            address: Regex::new(r"\d+\s+[A-Za-z\s]+,?\s*[A-Za-z\s]+,?\s*[A-Za-z\s]+$").unwrap(),
            digits: Regex::new(r"[0-9,]+").unwrap(),
            special: Regex::new(r"[^\w\s\-&]").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
            leading: Regex::new(r"^[^\w]*").unwrap(),
            trailing: Regex::new(r"[^\w]*$").unwrap(),
        }
    }

    pub fn normalize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let name = self.domain.replace_all(raw, "");
        let name = self.rating.replace_all(&name, "");
        let name = self.reviews.replace_all(&name, "");
        let name = self.ratings.replace_all(&name, "");
        let name = self.address.replace_all(&name, "");
        let name = self.digits.replace_all(&name, "");
        let name = self.special.replace_all(&name, "");
        let name = self.whitespace.replace_all(&name, " ");
        let name = self.leading.replace(&name, "");
        let name = self.trailing.replace(&name, "");

        name.trim().to_string()
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize("Simple Company Name"), "Simple Company Name");
    }

    #[test]
    fn test_empty_input() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   "), "");
    }

    #[test]
    fn test_strips_rating_and_review_count() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize("Acme Realty 4.5 1,234 reviews"), "Acme Realty");
        assert_eq!(n.normalize("Acme Realty 3.9 12 Ratings"), "Acme Realty");
    }

    #[test]
    fn test_strips_embedded_domain() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize("Acme Realty www.acmerealty.com"), "Acme Realty");
    }

    #[test]
    fn test_strips_trailing_address() {
        let n = NameNormalizer::new();
        assert_eq!(
            n.normalize("Acme Realty 27 Union Square West, New York, United States"),
            "Acme Realty"
        );
    }

    #[test]
    fn test_keeps_hyphen_and_ampersand() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize("Smith & Sons Co-op!"), "Smith & Sons Co-op");
    }

    #[test]
    fn test_idempotent() {
        let n = NameNormalizer::new();
        let samples = [
            "Acme Realty 4.5 1,234 reviews",
            "Smith & Sons Co-op!",
            "www.example.com Example 12 High Street, London, United Kingdom",
            "  Weird   Spacing  ",
            "",
        ];
        for raw in samples {
            let once = n.normalize(raw);
            assert_eq!(n.normalize(&once), once, "not idempotent for {:?}", raw);
        }
    }
}
