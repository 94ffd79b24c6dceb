//! Built-in product catalog.
//!
//! The storefront ships with a fixed set of eight products. They are served
//! through [`ProductCatalog`](medwear_core::catalog::ProductCatalog), so a
//! real catalog source can replace them without touching the commands.

use medwear_core::catalog::InMemoryCatalog;
use medwear_core::{Money, Product};

struct Fixture {
    id: &'static str,
    name: &'static str,
    price: f64,
    image: &'static str,
    colors: &'static [&'static str],
    sizes: &'static [&'static str],
    category: &'static str,
    is_new: bool,
    is_featured: bool,
    rating: f64,
    stock: Option<u32>,
    description: Option<&'static str>,
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        id: "1",
        name: "Classic V-Neck Scrub Top",
        price: 39.99,
        image: "https://images.pexels.com/photos/4226894/pexels-photo-4226894.jpeg",
        colors: &["Navy", "Light Blue", "Black"],
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        category: "Scrub Tops",
        is_new: true,
        is_featured: true,
        rating: 4.8,
        stock: Some(25),
        description: Some(
            "Our best-selling scrub top. Moisture-wicking four-way stretch fabric, \
             two front pockets and side vents. 76% Polyester, 20% Rayon, 4% Spandex.",
        ),
    },
    Fixture {
        id: "2",
        name: "Jogger-Style Scrub Pants",
        price: 42.99,
        image: "https://images.pexels.com/photos/6749775/pexels-photo-6749775.jpeg",
        colors: &["Black", "Navy", "Gray"],
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        category: "Scrub Bottoms",
        is_new: false,
        is_featured: true,
        rating: 4.9,
        stock: Some(18),
        description: Some(
            "Tapered jogger-style scrub pants with a ribbed ankle cuff, drawstring \
             waistband and seven pockets. 78% Polyester, 18% Rayon, 4% Spandex.",
        ),
    },
    Fixture {
        id: "3",
        name: "Premium Lab Coat",
        price: 59.99,
        image: "https://images.pexels.com/photos/4226269/pexels-photo-4226269.jpeg",
        colors: &["White"],
        sizes: &["S", "M", "L", "XL"],
        category: "Lab Coats",
        is_new: false,
        is_featured: true,
        rating: 4.7,
        stock: None,
        description: None,
    },
    Fixture {
        id: "4",
        name: "Fitted Scrub Top",
        price: 34.99,
        image: "https://images.pexels.com/photos/5407206/pexels-photo-5407206.jpeg",
        colors: &["Teal", "Pink", "Purple"],
        sizes: &["XS", "S", "M", "L", "XL"],
        category: "Scrub Tops",
        is_new: true,
        is_featured: true,
        rating: 4.6,
        stock: None,
        description: None,
    },
    Fixture {
        id: "5",
        name: "Cargo Scrub Pants",
        price: 48.99,
        image: "https://images.pexels.com/photos/6749777/pexels-photo-6749777.jpeg",
        colors: &["Navy", "Black", "Gray"],
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        category: "Scrub Bottoms",
        is_new: false,
        is_featured: false,
        rating: 4.5,
        stock: None,
        description: None,
    },
    Fixture {
        id: "6",
        name: "Slim-Fit Lab Coat",
        price: 64.99,
        image: "https://images.pexels.com/photos/5407023/pexels-photo-5407023.jpeg",
        colors: &["White"],
        sizes: &["S", "M", "L", "XL"],
        category: "Lab Coats",
        is_new: true,
        is_featured: false,
        rating: 4.9,
        stock: None,
        description: None,
    },
    Fixture {
        id: "7",
        name: "Core Stretch Scrub Top",
        price: 36.99,
        image: "https://images.pexels.com/photos/6129507/pexels-photo-6129507.jpeg",
        colors: &["Light Blue", "Navy", "Gray"],
        sizes: &["XS", "S", "M", "L", "XL"],
        category: "Scrub Tops",
        is_new: false,
        is_featured: false,
        rating: 4.7,
        stock: None,
        description: None,
    },
    Fixture {
        id: "8",
        name: "Medical Stethoscope",
        price: 89.99,
        image: "https://images.pexels.com/photos/7446990/pexels-photo-7446990.jpeg",
        colors: &["Black", "Blue", "Red"],
        sizes: &["Standard"],
        category: "Accessories",
        is_new: false,
        is_featured: false,
        rating: 4.9,
        stock: None,
        description: None,
    },
];

impl Fixture {
    fn to_product(&self) -> Product {
        let mut product = Product::new(self.id, self.name, Money::from_dollars(self.price), self.category)
            .with_image(self.image)
            .with_colors(self.colors.iter().copied())
            .with_sizes(self.sizes.iter().copied());
        product.is_new = self.is_new.then_some(true);
        product.is_featured = self.is_featured.then_some(true);
        product.rating = Some(self.rating);
        product.stock = self.stock;
        product.description = self.description.map(str::to_string);
        product
    }
}

/// The eight built-in storefront products, in featured order.
pub fn fixture_products() -> Vec<Product> {
    FIXTURES.iter().map(Fixture::to_product).collect()
}

/// The built-in products as a catalog.
pub fn fixture_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(fixture_products())
}
