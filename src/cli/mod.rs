use clap::{Parser, Subcommand};
use vallmere_cart::{
    config::{LoggingConfig, StoreConfig},
    context::AppContext,
};

mod cart;
mod product;

#[derive(Debug, Parser)]
#[command(name = "vallmere-cart", about = "Vallmere cart CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cart(cart::CartCommand),
    Product(product::ProductCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let app = AppContext::from_data_dir(&self.store.data_dir).map_err(|error| {
            format!(
                "failed to open data directory {}: {error}",
                self.store.data_dir.display()
            )
        })?;

        let seeded = app
            .products
            .initialize_sample_products()
            .map_err(|error| format!("failed to seed products: {error}"))?;

        if seeded {
            tracing::info!("seeded sample products");
        }

        match self.command {
            Commands::Cart(command) => cart::run(&app, command).await,
            Commands::Product(command) => product::run(&app, command),
        }
    }
}
