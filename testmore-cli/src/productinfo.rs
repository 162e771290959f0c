//! Information about this project.

/// The formal name of this product.
pub const PRODUCT_NAME: &str = "testmore";

/// The version of the product, in string form.
pub const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");
