//! Product catalog state.
//!
//! Mirrors the catalog as last fetched from the API, plus the admin
//! mutations (create, delete, toggle featured). Deleting a product also
//! evicts it from the cart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{Ack, FeaturedToggled, NewProduct, Product, ProductCreated, ProductList};
use crate::notify::Notifier;

use super::CartStore;

const ALL_PRODUCTS_PATH: &str = "/get-all-Product";
const CATEGORY_PATH_PREFIX: &str = "/get-product-category";
const FEATURED_PATH: &str = "/get-featured-product";
const CREATE_PATH: &str = "/create-Product";
const DELETE_PATH_PREFIX: &str = "/delete-product";
const TOGGLE_FEATURED_PATH_PREFIX: &str = "/toggle-featured-product";

pub struct ProductStore {
    products: Mutex<Vec<Product>>,
    loading: AtomicBool,
    client: ApiClient,
    cart: Arc<CartStore>,
    notifier: Notifier,
}

impl ProductStore {
    pub fn new(client: ApiClient, cart: Arc<CartStore>, notifier: Notifier) -> Self {
        Self {
            products: Mutex::new(Vec::new()),
            loading: AtomicBool::new(false),
            client,
            cart,
            notifier,
        }
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock_products().clone()
    }

    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Fetch the full catalog.
    pub async fn fetch_all(&self) {
        self.fetch_list(ALL_PRODUCTS_PATH).await;
    }

    /// Fetch the catalog filtered to one category.
    pub async fn fetch_by_category(&self, category: &str) {
        self.fetch_list(&format!("{}/{}", CATEGORY_PATH_PREFIX, category))
            .await;
    }

    /// Fetch featured products. This endpoint returns a bare array rather
    /// than the `{products}` wrapper the others use.
    pub async fn fetch_featured(&self) {
        self.set_loading(true);
        match self.client.get::<Vec<Product>>(FEATURED_PATH).await {
            Ok(products) => *self.lock_products() = products,
            Err(e) => self.report("Failed to fetch products", e),
        }
        self.set_loading(false);
    }

    /// Create a product and append it to the local catalog.
    pub async fn create(&self, product: NewProduct) {
        self.set_loading(true);
        match self
            .client
            .post::<ProductCreated, _>(CREATE_PATH, &product)
            .await
        {
            Ok(ProductCreated {
                success: true,
                product: Some(created),
                msg,
            }) => {
                self.lock_products().push(created);
                self.notifier
                    .success(msg.unwrap_or_else(|| "Product created".to_string()));
            }
            Ok(ProductCreated { msg, .. }) => {
                self.notifier
                    .error(msg.unwrap_or_else(|| "Failed to create product".to_string()));
            }
            Err(e) => self.report("Failed to create product", e),
        }
        self.set_loading(false);
    }

    /// Delete a product, removing it locally and evicting it from the cart.
    pub async fn delete(&self, product_id: &str) {
        self.set_loading(true);
        let path = format!("{}/{}", DELETE_PATH_PREFIX, product_id);
        match self.client.delete::<Ack>(&path).await {
            Ok(Ack { success: true, .. }) => {
                self.lock_products().retain(|p| p.id != product_id);
                if self.cart.remove(product_id) {
                    debug!(product_id, "deleted product evicted from cart");
                }
                self.notifier.success("Product deleted successfully");
            }
            Ok(Ack { msg, .. }) => {
                self.notifier
                    .error(msg.unwrap_or_else(|| "Failed to delete product".to_string()));
            }
            Err(e) => self.report("Failed to delete product", e),
        }
        self.set_loading(false);
    }

    /// Flip a product's featured flag from the server's updated record.
    pub async fn toggle_featured(&self, product_id: &str) {
        self.set_loading(true);
        let path = format!("{}/{}", TOGGLE_FEATURED_PATH_PREFIX, product_id);
        match self.client.patch::<FeaturedToggled>(&path).await {
            Ok(FeaturedToggled { update_product }) => {
                let mut products = self.lock_products();
                if let Some(product) = products.iter_mut().find(|p| p.id == product_id) {
                    product.is_featured = update_product.is_featured;
                }
                drop(products);
                self.notifier.success("Featured status updated");
            }
            Err(e) => self.report("Failed to update product", e),
        }
        self.set_loading(false);
    }

    async fn fetch_list(&self, path: &str) {
        self.set_loading(true);
        match self.client.get::<ProductList>(path).await {
            Ok(list) => *self.lock_products() = list.products,
            Err(e) => self.report("Failed to fetch products", e),
        }
        self.set_loading(false);
    }

    fn report(&self, fallback: &str, error: ApiError) {
        debug!(error = %error, "product operation failed");
        let message = match error {
            ApiError::Rejected(msg) => msg,
            _ => fallback.to_string(),
        };
        self.notifier.error(message);
    }

    fn set_loading(&self, value: bool) {
        self.loading.store(value, Ordering::SeqCst);
    }

    fn lock_products(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
