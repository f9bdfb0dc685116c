use serde::{Deserialize, Serialize};

/// Catalog entry as served by the product endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "isFeatured", default)]
    pub is_featured: bool,
}

/// Fields submitted when creating a product.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
}

/// Response wrapper for `/get-all-Product` and `/get-product-category/{c}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Response envelope for `/create-Product`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreated {
    pub success: bool,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Response envelope for `/toggle-featured-product/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedToggled {
    #[serde(rename = "updateProduct")]
    pub update_product: Product,
}
