// ABOUTME: Keyword classifier mapping free-text stage and idea strings to the plan taxonomy
// ABOUTME: Pure, deterministic functions that never fail on any input

use crate::types::Category;

/// Label returned when nothing usable can be derived from the idea text
pub const DEFAULT_BUSINESS_TYPE: &str = "General Business";

/// Maximum number of words kept when falling back to the idea text itself
const FALLBACK_WORD_LIMIT: usize = 4;

/// Stage keywords, checked in order. The first category with a hit wins, so
/// the more specific stages come before the generic ones.
const STAGE_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Acquisition,
        &[
            "acquisition",
            "acquire",
            "acquiring",
            "buyout",
            "buy out",
            "buying",
            "franchise",
            "takeover",
        ],
    ),
    (
        Category::Expansion,
        &[
            "expansion",
            "expand",
            "expanding",
            "growth",
            "growing",
            "scale",
            "scaling",
            "new location",
            "second location",
        ],
    ),
    (
        Category::ExistingBusiness,
        &[
            "existing",
            "established",
            "operating",
            "running",
            "mature",
            "already open",
            "revenue",
        ],
    ),
    (
        Category::NewCompany,
        &[
            "new",
            "idea",
            "startup",
            "start-up",
            "start up",
            "pre-launch",
            "prelaunch",
            "launch",
            "planning",
            "concept",
        ],
    ),
];

/// Business type keywords. Single words match whole tokens, phrases match as
/// substrings of the normalized text.
const TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "E-commerce",
        &[
            "e-commerce",
            "ecommerce",
            "online store",
            "online shop",
            "dropshipping",
            "marketplace",
        ],
    ),
    (
        "Restaurant",
        &[
            "restaurant",
            "cafe",
            "café",
            "coffee",
            "diner",
            "bistro",
            "food truck",
            "catering",
            "bar",
            "pizzeria",
        ],
    ),
    (
        "Bakery",
        &["bakery", "bakeshop", "patisserie", "pastry", "cupcake"],
    ),
    (
        "Technology",
        &[
            "software",
            "app",
            "apps",
            "saas",
            "platform",
            "tech",
            "startup app",
            "ai",
            "mobile app",
            "website",
        ],
    ),
    (
        "Consulting",
        &[
            "consulting",
            "consultancy",
            "consultant",
            "advisory",
            "coaching",
        ],
    ),
    (
        "Fitness",
        &[
            "gym",
            "fitness",
            "yoga",
            "pilates",
            "crossfit",
            "personal training",
        ],
    ),
    (
        "Beauty & Wellness",
        &[
            "salon",
            "spa",
            "barber",
            "barbershop",
            "beauty",
            "nail",
            "massage",
            "wellness",
        ],
    ),
    (
        "Healthcare",
        &[
            "clinic",
            "dental",
            "pharmacy",
            "medical",
            "healthcare",
            "therapy",
            "veterinary",
        ],
    ),
    (
        "Real Estate",
        &["real estate", "property", "rental", "airbnb", "realty"],
    ),
    (
        "Construction",
        &[
            "construction",
            "contractor",
            "remodeling",
            "plumbing",
            "roofing",
            "landscaping",
        ],
    ),
    (
        "Education",
        &[
            "tutoring",
            "school",
            "education",
            "academy",
            "training center",
            "daycare",
        ],
    ),
    (
        "Manufacturing",
        &[
            "manufacturing",
            "factory",
            "production",
            "brewery",
            "winery",
            "distillery",
        ],
    ),
    (
        "Transportation",
        &[
            "trucking",
            "logistics",
            "delivery",
            "courier",
            "transport",
            "moving",
        ],
    ),
    (
        "Agriculture",
        &["farm", "farming", "agriculture", "greenhouse", "orchard"],
    ),
    (
        "Retail",
        &["retail", "shop", "store", "boutique", "grocery"],
    ),
];

/// Classify a free-text stage into a [`Category`].
///
/// Matching is case-insensitive; unmatched or empty input maps to
/// [`Category::NewCompany`].
pub fn classify(stage: &str) -> Category {
    let normalized = normalize(stage);
    if normalized.is_empty() {
        return Category::default();
    }
    let tokens = tokenize(&normalized);

    STAGE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| matches(&normalized, &tokens, k)))
        .map(|(category, _)| *category)
        .unwrap_or_default()
}

/// Derive a short business type label from the idea text.
pub fn extract_business_type(idea: &str) -> String {
    let normalized = normalize(idea);
    if normalized.is_empty() {
        return DEFAULT_BUSINESS_TYPE.to_string();
    }
    let tokens = tokenize(&normalized);

    if let Some((label, _)) = TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| matches(&normalized, &tokens, k)))
    {
        return (*label).to_string();
    }

    let fallback = idea
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .take(FALLBACK_WORD_LIMIT)
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");

    if fallback.is_empty() {
        DEFAULT_BUSINESS_TYPE.to_string()
    } else {
        fallback
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|t| !t.is_empty())
        .collect()
}

fn matches(normalized: &str, tokens: &[&str], keyword: &str) -> bool {
    if keyword.contains(' ') {
        normalized.contains(keyword)
    } else {
        tokens.contains(&keyword)
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_stages() {
        assert_eq!(classify("Just an idea"), Category::NewCompany);
        assert_eq!(classify("Pre-launch startup"), Category::NewCompany);
        assert_eq!(classify("Established and operating"), Category::ExistingBusiness);
        assert_eq!(classify("Looking to expand to a second location"), Category::Expansion);
        assert_eq!(classify("Buying a franchise"), Category::Acquisition);
    }

    #[test]
    fn test_classify_prefers_specific_stage() {
        // "existing" and "expand" both appear; expansion is more specific
        assert_eq!(classify("Existing shop, planning to expand"), Category::Expansion);
    }

    #[test]
    fn test_classify_unmatched_and_empty_default() {
        assert_eq!(classify(""), Category::NewCompany);
        assert_eq!(classify("   "), Category::NewCompany);
        assert_eq!(classify("zzz qqq"), Category::NewCompany);
    }

    #[test]
    fn test_classify_is_total_and_deterministic() {
        let inputs = [
            "",
            "new",
            "EXPANSION",
            "renewal",
            "🚀 launch",
            "acquire a competitor",
            "\t\n",
            "operating for 10 years",
        ];
        for input in inputs {
            let first = classify(input);
            assert!(Category::ALL.contains(&first));
            assert_eq!(first, classify(input));
        }
    }

    #[test]
    fn test_classify_matches_whole_words_only() {
        // "prerevenue" contains "revenue" but is not the word "revenue"
        assert_eq!(classify("prerevenue"), Category::NewCompany);
        // "scaled" is not a listed keyword, "scale" is
        assert_eq!(classify("We want to scale"), Category::Expansion);
    }

    #[test]
    fn test_extract_business_type_keywords() {
        assert_eq!(extract_business_type("A cozy coffee shop downtown"), "Restaurant");
        assert_eq!(extract_business_type("Mobile app for dog walkers"), "Technology");
        assert_eq!(extract_business_type("Online store selling candles"), "E-commerce");
        assert_eq!(extract_business_type("Boutique fitness studio with yoga"), "Fitness");
        assert_eq!(extract_business_type("Neighborhood bakery"), "Bakery");
    }

    #[test]
    fn test_extract_business_type_does_not_match_inside_words() {
        // "happy" contains "app", "barn" contains "bar"
        assert_eq!(extract_business_type("happy barn"), "Happy Barn");
    }

    #[test]
    fn test_extract_business_type_empty_returns_default() {
        assert_eq!(extract_business_type(""), DEFAULT_BUSINESS_TYPE);
        assert_eq!(extract_business_type("   "), DEFAULT_BUSINESS_TYPE);
        assert_eq!(extract_business_type("!!! ???"), DEFAULT_BUSINESS_TYPE);
        assert_eq!(extract_business_type(""), extract_business_type(""));
    }

    #[test]
    fn test_extract_business_type_fallback_uses_leading_words() {
        assert_eq!(
            extract_business_type("artisanal goat-cheese, subscription boxes for hikers"),
            "Artisanal Goat-cheese Subscription Boxes"
        );
    }
}
