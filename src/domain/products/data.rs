//! Products Data

use crate::domain::products::{
    errors::ProductsServiceError,
    models::{Product, ProductId},
};

/// Prices must be finite and not negative.
pub(crate) fn validate_price(price: f64) -> Result<f64, ProductsServiceError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(ProductsServiceError::InvalidPrice(price))
    }
}

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Unit price; finite and not negative.
    pub price: f64,
    /// Units available.
    pub stock: u32,
    /// Numeric category.
    pub category_id: u64,
    /// Category label.
    pub category: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Primary image.
    pub image_url: Option<String>,
    /// Gallery images.
    pub carousel_url: Option<Vec<String>>,
}

impl NewProduct {
    pub(crate) fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            stock: self.stock,
            category_id: self.category_id,
            category: self.category,
            description: self.description,
            image_url: self.image_url,
            carousel_url: self.carousel_url,
        }
    }
}

/// Partial product update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New unit price.
    pub price: Option<f64>,
    /// New stock level.
    pub stock: Option<u32>,
    /// New numeric category.
    pub category_id: Option<u64>,
    /// New category label.
    pub category: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New primary image.
    pub image_url: Option<String>,
    /// New gallery images.
    pub carousel_url: Option<Vec<String>>,
}

impl ProductUpdate {
    pub(crate) fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if self.category.is_some() {
            product.category = self.category;
        }
        if self.description.is_some() {
            product.description = self.description;
        }
        if self.image_url.is_some() {
            product.image_url = self.image_url;
        }
        if self.carousel_url.is_some() {
            product.carousel_url = self.carousel_url;
        }
    }
}

fn sample(
    id: u64,
    name: &str,
    description: &str,
    price: f64,
    stock: u32,
    category: &str,
    image_url: &str,
    carousel: &[&str],
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price,
        stock,
        category_id: id,
        category: Some(category.to_string()),
        description: Some(description.to_string()),
        image_url: Some(image_url.to_string()),
        carousel_url: Some(carousel.iter().map(ToString::to_string).collect()),
    }
}

/// Catalog seeded into an empty store.
pub(crate) fn sample_products() -> Vec<Product> {
    vec![
        sample(
            1,
            "Classic Black T-Shirt",
            "Comfortable cotton t-shirt perfect for everyday wear",
            29.99,
            25,
            "T-shirts",
            "https://www.crtz.xyz/cdn/shop/files/Sunglasses_Blue_03.png?v=1726478432",
            &[
                "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=400",
                "https://images.unsplash.com/photo-1503341504253-dff4815485f1?w=400",
            ],
        ),
        sample(
            2,
            "Cozy Pullover Hoodie",
            "Warm and comfortable hoodie for cool weather",
            59.99,
            18,
            "Hoodies",
            "https://www.crtz.xyz/cdn/shop/files/GUERILLAZCONVERTIBLEJACKET_GREENCAMO_03.png?v=1753830286",
            &[
                "https://images.unsplash.com/photo-1556821840-3a63f95609a7?w=400",
                "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=400",
            ],
        ),
        sample(
            3,
            "Slim Fit Jeans",
            "Modern slim fit jeans in classic denim blue",
            79.99,
            20,
            "Bottoms",
            "https://www.crtz.xyz/cdn/shop/files/SPRINGJACKET_BLACK_02.png?v=1750947384",
            &[
                "https://images.unsplash.com/photo-1542272604-787c3835535d?w=400",
                "https://images.unsplash.com/photo-1555689502-c4b22d76c56f?w=400",
            ],
        ),
        sample(
            4,
            "Baseball Cap",
            "Classic baseball cap with adjustable strap",
            24.99,
            30,
            "Hats",
            "https://www.crtz.xyz/cdn/shop/files/BBKNEWERACAP_BLACKWHITE_01_d903e991-7072-4736-8048-621616ea1e3e.png?v=1754175037",
            &["https://images.unsplash.com/photo-1575428652377-a312cfda7b09?w=400"],
        ),
        sample(
            5,
            "Leather Wallet",
            "Genuine leather wallet with multiple card slots",
            39.99,
            15,
            "Accessories",
            "https://www.crtz.xyz/cdn/shop/files/ALCPUFFZIPHOODIE_CAMO_02.png?v=1752249989",
            &[
                "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=400",
                "https://images.unsplash.com/photo-1622560480605-d83c853bc5c3?w=400",
            ],
        ),
    ]
}
