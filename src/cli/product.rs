use clap::{Args, Subcommand};
use vallmere_cart::{
    context::AppContext,
    domain::products::models::{Product, ProductId},
};

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// List the catalog
    List {
        /// Only products with stock left
        #[arg(long)]
        in_stock: bool,
    },

    /// Show one product
    Get {
        #[arg(long)]
        id: u64,
    },

    /// Overwrite a product's stock level
    Stock {
        #[arg(long)]
        id: u64,

        #[arg(long)]
        stock: u32,
    },

    /// Search names, descriptions and categories
    Search {
        #[arg(long)]
        query: String,
    },
}

pub(crate) fn run(app: &AppContext, command: ProductCommand) -> Result<(), String> {
    let products = &app.products;

    match command.command {
        ProductSubcommand::List { in_stock } => {
            let listed = if in_stock {
                products.products_in_stock()
            } else {
                products.all_products()
            }
            .map_err(|error| format!("failed to list products: {error}"))?;

            print_products(&listed);
        }
        ProductSubcommand::Get { id } => {
            let product = products
                .get_product_by_id(ProductId::new(id))
                .map_err(|error| format!("failed to read product: {error}"))?
                .ok_or_else(|| format!("product {id} not found"))?;

            print_product(&product);
        }
        ProductSubcommand::Stock { id, stock } => {
            let updated = products
                .update_product_stock(ProductId::new(id), stock)
                .map_err(|error| format!("failed to update stock: {error}"))?;

            if !updated {
                return Err(format!("product {id} not found"));
            }

            println!("product {id} stock set to {stock}");
        }
        ProductSubcommand::Search { query } => {
            let found = products
                .search_products(&query)
                .map_err(|error| format!("failed to search products: {error}"))?;

            if found.is_empty() {
                println!("no products match {query:?}");
            }

            print_products(&found);
        }
    }

    Ok(())
}

fn print_products(products: &[Product]) {
    for product in products {
        print_product(product);
        println!();
    }
}

fn print_product(product: &Product) {
    println!("id: {}", product.id);
    println!("name: {}", product.name);
    println!("price: {:.2}", product.price);
    println!("stock: {}", product.stock);

    if let Some(category) = &product.category {
        println!("category: {category}");
    }
}
