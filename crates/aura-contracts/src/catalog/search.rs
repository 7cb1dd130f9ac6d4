use std::cmp::Ordering;

use super::{Catalog, Product};

pub const CATEGORIES: &[&str] = &["All", "Dresses", "Tops", "Bottoms", "Outerwear"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
}

impl SortKey {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "rating" => Ok(Self::Rating),
            "newest" => Ok(Self::Newest),
            other => Err(format!(
                "Unknown sort key '{other}' (expected one of: featured, price-low, price-high, rating, newest)."
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub query: String,
    pub category: String,
    pub sort: SortKey,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: "All".to_string(),
            sort: SortKey::Featured,
        }
    }
}

/// Pure filter + sort over the catalog. The default query returns the
/// catalog unchanged, so clearing filters is deterministic.
pub fn search_products(catalog: &Catalog, query: &CatalogQuery) -> Vec<Product> {
    let needle = query.query.trim().to_ascii_lowercase();
    let mut matched: Vec<Product> = catalog
        .list()
        .filter(|product| matches_query(product, &needle, &query.category))
        .cloned()
        .collect();

    // Vec::sort_by is stable, so ties keep the featured order.
    match query.sort {
        SortKey::PriceLow => matched.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHigh => matched.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => matched.sort_by(|a, b| {
            b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
        }),
        SortKey::Featured | SortKey::Newest => {}
    }

    matched
}

fn matches_query(product: &Product, needle: &str, category: &str) -> bool {
    if category != "All" && product.category != category {
        return false;
    }
    if needle.is_empty() {
        return true;
    }
    product.name.to_ascii_lowercase().contains(needle)
        || product.brand.to_ascii_lowercase().contains(needle)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_ascii_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::{search_products, CatalogQuery, SortKey};
    use crate::catalog::Catalog;

    fn query(text: &str, category: &str, sort: SortKey) -> CatalogQuery {
        CatalogQuery {
            query: text.to_string(),
            category: category.to_string(),
            sort,
        }
    }

    #[test]
    fn empty_query_returns_whole_catalog_in_featured_order() {
        let catalog = Catalog::new(None);
        let results = search_products(&catalog, &CatalogQuery::default());
        assert_eq!(results.len(), catalog.len());
        let ids: Vec<&str> = results.iter().map(|product| product.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    #[test]
    fn category_filter_only_returns_that_category() {
        let catalog = Catalog::new(None);
        let results = search_products(&catalog, &query("", "Tops", SortKey::Featured));
        assert!(!results.is_empty());
        assert!(results.iter().all(|product| product.category == "Tops"));
    }

    #[test]
    fn query_matches_name_brand_and_tags_case_insensitively() {
        let catalog = Catalog::new(None);

        let by_name = search_products(&catalog, &query("BLAZER", "All", SortKey::Featured));
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "7");

        let by_brand = search_products(&catalog, &query("madewell", "All", SortKey::Featured));
        let ids: Vec<&str> = by_brand.iter().map(|product| product.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "6"]);

        let by_tag = search_products(&catalog, &query("Wedding", "All", SortKey::Featured));
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].id, "1");
    }

    #[test]
    fn query_and_category_compose() {
        let catalog = Catalog::new(None);
        // "work" tags span several categories; the gate narrows to Tops.
        let results = search_products(&catalog, &query("work", "Tops", SortKey::Featured));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "8");
    }

    #[test]
    fn price_sorts_are_reversals_of_each_other() {
        let catalog = Catalog::new(None);
        let low = search_products(&catalog, &query("", "All", SortKey::PriceLow));
        let high = search_products(&catalog, &query("", "All", SortKey::PriceHigh));

        let mut ascending: Vec<u32> = low.iter().map(|product| product.price).collect();
        assert!(ascending.windows(2).all(|pair| pair[0] <= pair[1]));

        // No two default products share a price, so the orders reverse exactly.
        let reversed: Vec<&str> = high.iter().rev().map(|product| product.id.as_str()).collect();
        let forward: Vec<&str> = low.iter().map(|product| product.id.as_str()).collect();
        assert_eq!(forward, reversed);
        ascending.dedup();
        assert_eq!(ascending.len(), low.len());
    }

    #[test]
    fn rating_sort_is_descending() {
        let catalog = Catalog::new(None);
        let results = search_products(&catalog, &query("", "All", SortKey::Rating));
        assert!(results
            .windows(2)
            .all(|pair| pair[0].rating >= pair[1].rating));
        assert_eq!(results[0].id, "1");
    }

    #[test]
    fn newest_keeps_featured_order() {
        let catalog = Catalog::new(None);
        let featured = search_products(&catalog, &query("", "All", SortKey::Featured));
        let newest = search_products(&catalog, &query("", "All", SortKey::Newest));
        assert_eq!(featured, newest);
    }

    #[test]
    fn no_results_is_a_valid_outcome_and_reset_restores_everything() {
        let catalog = Catalog::new(None);
        let none = search_products(&catalog, &query("no-such-thing", "All", SortKey::Featured));
        assert!(none.is_empty());

        let restored = search_products(&catalog, &CatalogQuery::default());
        assert_eq!(restored.len(), catalog.len());
    }

    #[test]
    fn sort_key_parses_wire_strings_and_rejects_unknown() {
        assert_eq!(SortKey::parse("price-low"), Ok(SortKey::PriceLow));
        assert_eq!(SortKey::parse(" Rating "), Ok(SortKey::Rating));
        assert!(SortKey::parse("price").is_err());
        assert_eq!(SortKey::PriceHigh.as_str(), "price-high");
    }
}
