use crate::catalog::{Catalog, Product};

pub const GREETING: &str = "Hi! I'm your AI personal stylist. I'm here to help you discover amazing outfits that match your style. What are you looking for today?";

pub const OPENING_SUGGESTIONS: &[&str] = &[
    "I need a dress for a summer wedding",
    "Show me casual weekend outfits",
    "Help me find professional work attire",
    "I want to update my wardrobe",
];

const WEDDING_SUGGESTIONS: &[&str] = &[
    "What accessories would go with these?",
    "Show me shoes for this outfit",
    "Any color recommendations?",
];

const CASUAL_SUGGESTIONS: &[&str] = &[
    "What about shoes for these looks?",
    "Show me accessories",
    "Any seasonal variations?",
];

const GENERIC_SUGGESTIONS: &[&str] = &[
    "Tell me more about sizing",
    "What's trending right now?",
    "Show me similar styles",
];

#[derive(Clone, Copy, Debug)]
struct ResponseSpec {
    keywords: &'static [&'static str],
    reply: &'static str,
    product_ids: &'static [&'static str],
    suggestions: &'static [&'static str],
}

// Ordered dispatch table: the first spec whose keyword appears in the
// utterance wins, so "wedding" outranks "casual" even when both occur.
const RESPONSE_SPECS: &[ResponseSpec] = &[
    ResponseSpec {
        keywords: &["wedding", "formal"],
        reply: "Perfect! For a summer wedding, I'd recommend elegant midi or maxi dresses in breathable fabrics. Here are some beautiful options that would be perfect for the occasion:",
        product_ids: &["1", "2", "3"],
        suggestions: WEDDING_SUGGESTIONS,
    },
    ResponseSpec {
        keywords: &["casual", "weekend"],
        reply: "Great choice! For casual weekend looks, comfort meets style. I've found some versatile pieces that you can mix and match:",
        product_ids: &["4", "5", "6"],
        suggestions: CASUAL_SUGGESTIONS,
    },
    ResponseSpec {
        keywords: &["work", "professional"],
        reply: "Excellent! Professional attire that makes you feel confident is key. Here are some sophisticated options that are perfect for the workplace:",
        product_ids: &["7", "8", "9"],
        suggestions: GENERIC_SUGGESTIONS,
    },
    ResponseSpec {
        keywords: &["wardrobe", "update"],
        reply: "How exciting! A wardrobe refresh can be transformative. Let me show you some versatile staples that will elevate your entire closet:",
        product_ids: &["7", "8", "9"],
        suggestions: GENERIC_SUGGESTIONS,
    },
];

const FALLBACK_SPEC: ResponseSpec = ResponseSpec {
    keywords: &[],
    reply: "I'd love to help you find the perfect pieces! Based on what you're looking for, here are some recommendations that I think you'll love:",
    product_ids: &["7", "8", "9"],
    suggestions: GENERIC_SUGGESTIONS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StylistResponse {
    pub reply: String,
    pub products: Vec<Product>,
    pub suggestions: Vec<String>,
}

/// Maps an utterance to its canned response triple. Deterministic and pure:
/// no scoring, no blending, no external calls. Recommended ids missing from
/// the catalog are skipped rather than treated as errors.
pub fn respond(utterance: &str, catalog: &Catalog) -> StylistResponse {
    let normalized = utterance.to_ascii_lowercase();
    let spec = RESPONSE_SPECS
        .iter()
        .find(|spec| {
            spec.keywords
                .iter()
                .any(|keyword| normalized.contains(keyword))
        })
        .unwrap_or(&FALLBACK_SPEC);

    StylistResponse {
        reply: spec.reply.to_string(),
        products: spec
            .product_ids
            .iter()
            .filter_map(|id| catalog.get(id).cloned())
            .collect(),
        suggestions: spec
            .suggestions
            .iter()
            .map(|item| (*item).to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::respond;
    use crate::catalog::{default_products, Catalog};

    fn ids(response: &super::StylistResponse) -> Vec<&str> {
        response
            .products
            .iter()
            .map(|product| product.id.as_str())
            .collect()
    }

    #[test]
    fn wedding_branch_returns_the_three_dress_recommendations() {
        let catalog = Catalog::new(None);
        let response = respond("I need a dress for a summer wedding", &catalog);
        assert!(response.reply.starts_with("Perfect! For a summer wedding"));
        assert_eq!(ids(&response), vec!["1", "2", "3"]);
        assert_eq!(response.suggestions.len(), 3);
        assert_eq!(
            response.suggestions[0],
            "What accessories would go with these?"
        );
    }

    #[test]
    fn formal_triggers_the_wedding_branch_too() {
        let catalog = Catalog::new(None);
        let response = respond("something formal please", &catalog);
        assert_eq!(ids(&response), vec!["1", "2", "3"]);
    }

    #[test]
    fn wedding_outranks_casual_when_both_appear() {
        let catalog = Catalog::new(None);
        let response = respond("casual dress, but fine for a wedding", &catalog);
        assert!(response.reply.starts_with("Perfect! For a summer wedding"));
        assert_eq!(ids(&response), vec!["1", "2", "3"]);
    }

    #[test]
    fn matching_is_case_insensitive_substring_containment() {
        let catalog = Catalog::new(None);
        let response = respond("WEEKEND plans!", &catalog);
        assert!(response.reply.starts_with("Great choice!"));
        assert_eq!(ids(&response), vec!["4", "5", "6"]);
    }

    #[test]
    fn work_and_wardrobe_branches_share_products_but_not_replies() {
        let catalog = Catalog::new(None);
        let work = respond("professional outfits for work", &catalog);
        let wardrobe = respond("time to update my wardrobe", &catalog);
        assert_eq!(ids(&work), vec!["7", "8", "9"]);
        assert_eq!(ids(&wardrobe), vec!["7", "8", "9"]);
        assert!(work.reply.starts_with("Excellent!"));
        assert!(wardrobe.reply.starts_with("How exciting!"));
    }

    #[test]
    fn unmatched_input_resolves_to_the_generic_branch() {
        let catalog = Catalog::new(None);
        let response = respond("surprise me", &catalog);
        assert!(response.reply.starts_with("I'd love to help"));
        assert_eq!(ids(&response), vec!["7", "8", "9"]);
        assert_eq!(response.suggestions, vec![
            "Tell me more about sizing",
            "What's trending right now?",
            "Show me similar styles",
        ]);
    }

    #[test]
    fn missing_catalog_entries_are_skipped_silently() {
        let mut products = default_products();
        products.shift_remove("2");
        let catalog = Catalog::new(Some(products));
        let response = respond("wedding", &catalog);
        assert_eq!(ids(&response), vec!["1", "3"]);
    }

    #[test]
    fn empty_catalog_still_returns_a_reply() {
        let catalog = Catalog::new(Some(IndexMap::new()));
        let response = respond("wedding", &catalog);
        assert!(response.products.is_empty());
        assert!(!response.reply.is_empty());
    }
}
