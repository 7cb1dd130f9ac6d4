use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub price: u32,
    pub original_price: Option<u32>,
    pub image: String,
    pub category: String,
    pub subcategory: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub rating: f64,
    pub reviews: u32,
    pub tags: Vec<String>,
    pub description: String,
}

impl Product {
    pub fn on_sale(&self) -> bool {
        self.original_price.is_some()
    }

    pub fn tagged(&self, tag: &str) -> bool {
        self.tags.iter().any(|item| item == tag)
    }
}

/// Fixed in-memory product catalog. Insertion order is the "featured" order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: IndexMap<String, Product>,
}

impl Catalog {
    pub fn new(products: Option<IndexMap<String, Product>>) -> Self {
        Self {
            products: products.unwrap_or_else(default_products),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.products
            .values()
            .filter(|product| product.category == category)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(None)
    }
}

pub fn default_products() -> IndexMap<String, Product> {
    let mut map = IndexMap::new();

    let mut insert = |id: &str,
                      name: &str,
                      brand: &str,
                      price: u32,
                      original_price: Option<u32>,
                      image: &str,
                      category: &str,
                      subcategory: &str,
                      colors: &[&str],
                      sizes: &[&str],
                      rating: f64,
                      reviews: u32,
                      tags: &[&str],
                      description: &str| {
        map.insert(
            id.to_string(),
            Product {
                id: id.to_string(),
                name: name.to_string(),
                brand: brand.to_string(),
                price,
                original_price,
                image: image.to_string(),
                category: category.to_string(),
                subcategory: subcategory.to_string(),
                colors: colors.iter().map(|item| (*item).to_string()).collect(),
                sizes: sizes.iter().map(|item| (*item).to_string()).collect(),
                rating,
                reviews,
                tags: tags.iter().map(|item| (*item).to_string()).collect(),
                description: description.to_string(),
            },
        );
    };

    insert(
        "1",
        "Floral Midi Dress",
        "Reformation",
        89,
        Some(120),
        "/elegant-floral-midi-dress.png",
        "Dresses",
        "Midi Dresses",
        &["Floral Print", "Navy", "Black"],
        &["XS", "S", "M", "L", "XL"],
        4.8,
        124,
        &["wedding", "formal", "summer", "floral"],
        "Elegant floral midi dress perfect for special occasions",
    );
    insert(
        "2",
        "Silk Wrap Dress",
        "Everlane",
        124,
        None,
        "/silk-wrap-dress.png",
        "Dresses",
        "Wrap Dresses",
        &["Sage", "Black", "Navy"],
        &["XS", "S", "M", "L"],
        4.6,
        89,
        &["elegant", "silk", "versatile", "work"],
        "Luxurious silk wrap dress for versatile styling",
    );
    insert(
        "3",
        "Linen Maxi Dress",
        "Madewell",
        95,
        None,
        "/linen-maxi-dress.png",
        "Dresses",
        "Maxi Dresses",
        &["White", "Beige", "Olive"],
        &["XS", "S", "M", "L", "XL"],
        4.7,
        156,
        &["casual", "summer", "linen", "comfortable"],
        "Breathable linen maxi dress for effortless summer style",
    );
    insert(
        "4",
        "Oversized Denim Jacket",
        "Levi's",
        68,
        Some(85),
        "/oversized-denim-jacket.png",
        "Outerwear",
        "Jackets",
        &["Light Wash", "Dark Wash", "Black"],
        &["XS", "S", "M", "L", "XL"],
        4.5,
        203,
        &["casual", "denim", "layering", "classic"],
        "Classic oversized denim jacket for layering",
    );
    insert(
        "5",
        "Cotton T-Shirt",
        "Uniqlo",
        24,
        None,
        "/cotton-t-shirt.png",
        "Tops",
        "T-Shirts",
        &["White", "Black", "Gray", "Navy", "Pink"],
        &["XS", "S", "M", "L", "XL"],
        4.4,
        312,
        &["basic", "cotton", "everyday", "comfortable"],
        "Essential cotton t-shirt for everyday wear",
    );
    insert(
        "6",
        "High-Waist Jeans",
        "Madewell",
        79,
        None,
        "/high-waist-jeans.png",
        "Bottoms",
        "Jeans",
        &["Medium Wash", "Dark Wash", "Light Wash"],
        &["24", "25", "26", "27", "28", "29", "30", "31", "32"],
        4.6,
        187,
        &["high-waist", "denim", "flattering", "versatile"],
        "Flattering high-waist jeans with perfect fit",
    );
    insert(
        "7",
        "Professional Blazer",
        "Banana Republic",
        98,
        Some(130),
        "/professional-blazer.png",
        "Outerwear",
        "Blazers",
        &["Black", "Navy", "Gray"],
        &["XS", "S", "M", "L", "XL"],
        4.7,
        94,
        &["professional", "work", "tailored", "classic"],
        "Tailored blazer perfect for professional settings",
    );
    insert(
        "8",
        "Silk Blouse",
        "J.Crew",
        54,
        Some(78),
        "/elegant-silk-blouse.png",
        "Tops",
        "Blouses",
        &["White", "Blush", "Navy"],
        &["XS", "S", "M", "L"],
        4.5,
        76,
        &["silk", "elegant", "work", "versatile"],
        "Elegant silk blouse for sophisticated looks",
    );
    insert(
        "9",
        "Tailored Trousers",
        "Everlane",
        72,
        None,
        "/tailored-trousers.png",
        "Bottoms",
        "Trousers",
        &["Black", "Navy", "Camel"],
        &["XS", "S", "M", "L", "XL"],
        4.6,
        118,
        &["tailored", "work", "professional", "comfortable"],
        "Perfectly tailored trousers for work and beyond",
    );

    map
}

#[cfg(test)]
mod tests {
    use super::Catalog;

    #[test]
    fn default_catalog_has_nine_products_with_unique_ids() {
        let catalog = Catalog::new(None);
        assert_eq!(catalog.len(), 9);
        for id in 1..=9 {
            assert!(catalog.get(&id.to_string()).is_some());
        }
    }

    #[test]
    fn default_catalog_preserves_featured_order() {
        let catalog = Catalog::new(None);
        let ids: Vec<&str> = catalog.list().map(|product| product.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    #[test]
    fn by_category_returns_only_matching_products() {
        let catalog = Catalog::new(None);
        let dresses = catalog.by_category("Dresses");
        assert_eq!(dresses.len(), 3);
        assert!(dresses.iter().all(|product| product.category == "Dresses"));
    }

    #[test]
    fn sale_products_carry_an_original_price() {
        let catalog = Catalog::new(None);
        let blazer = catalog.get("7").expect("blazer missing from default catalog");
        assert!(blazer.on_sale());
        assert_eq!(blazer.original_price, Some(130));
        assert!(blazer.tagged("professional"));
    }
}
