use std::sync::Arc;

use clap::{Args, Subcommand};
use tokio::sync::watch;
use vallmere_cart::{
    context::AppContext,
    domain::{
        carts::models::CartItemId,
        products::models::ProductId,
        session::{
            CartSession, TracingNotifier,
            models::{User, UserId},
        },
    },
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Args)]
struct UserArgs {
    /// Signed-in user id
    #[arg(long)]
    user: u64,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the user's cart
    Show(UserArgs),

    /// Add a product to the user's cart
    Add {
        #[command(flatten)]
        user: UserArgs,

        #[arg(long)]
        product: u64,

        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },

    /// Set an item's quantity; zero removes it
    Update {
        #[command(flatten)]
        user: UserArgs,

        #[arg(long)]
        item: u64,

        #[arg(long)]
        quantity: u32,
    },

    /// Remove an item from the user's cart
    Remove {
        #[command(flatten)]
        user: UserArgs,

        #[arg(long)]
        item: u64,
    },

    /// Empty the user's cart
    Clear(UserArgs),

    /// Print item count and amount of the user's cart
    Total(UserArgs),

    /// Dump carts, items and counters as JSON
    Export,

    /// Delete all carts, items and cart counters
    Reset,
}

pub(crate) async fn run(app: &AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show(user) => {
            let session = sign_in(app, &user);
            print_cart(&session);
        }
        CartSubcommand::Add {
            user,
            product,
            quantity,
        } => {
            let session = sign_in(app, &user);
            let product = app
                .products
                .get_product_by_id(ProductId::new(product))
                .map_err(|error| format!("failed to read product: {error}"))?
                .ok_or_else(|| format!("product {product} not found"))?;

            session
                .add_to_cart(&product, quantity)
                .await
                .map_err(|error| format!("failed to add to cart: {error}"))?;

            print_cart(&session);
        }
        CartSubcommand::Update {
            user,
            item,
            quantity,
        } => {
            let session = sign_in(app, &user);

            session
                .update_quantity(CartItemId::new(item), quantity)
                .await
                .map_err(|error| format!("failed to update item: {error}"))?;

            print_cart(&session);
        }
        CartSubcommand::Remove { user, item } => {
            let session = sign_in(app, &user);

            session
                .remove_from_cart(CartItemId::new(item))
                .map_err(|error| format!("failed to remove item: {error}"))?;

            print_cart(&session);
        }
        CartSubcommand::Clear(user) => {
            let session = sign_in(app, &user);

            session
                .clear_cart()
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            print_cart(&session);
        }
        CartSubcommand::Total(user) => {
            let session = sign_in(app, &user);
            let total = session
                .get_cart_total()
                .map_err(|error| format!("failed to total cart: {error}"))?;

            println!("item_count: {}", total.item_count);
            println!("total: {:.2}", total.total);
        }
        CartSubcommand::Export => {
            let export = app
                .carts
                .export_cart_data()
                .map_err(|error| format!("failed to export carts: {error}"))?;

            println!("{export}");
        }
        CartSubcommand::Reset => {
            app.carts
                .clear_all_cart_data()
                .map_err(|error| format!("failed to reset carts: {error}"))?;

            println!("cart data cleared");
        }
    }

    Ok(())
}

fn sign_in(app: &AppContext, args: &UserArgs) -> CartSession {
    let user = User::new(
        UserId::new(args.user),
        format!("user-{}@vallmere.local", args.user),
    );
    let (_auth, signal) = watch::channel(Some(user.clone()));

    let session = app.cart_session(signal, Arc::new(TracingNotifier));
    session.handle_auth_change(Some(&user));

    session
}

fn print_cart(session: &CartSession) {
    let state = session.state();

    match state.cart_id {
        Some(cart_id) => println!("cart_id: {cart_id}"),
        None => {
            println!("cart is empty");
            return;
        }
    }

    for item in &state.items {
        println!(
            "item {}: {} x {} @ {:.2} = {:.2}",
            item.cart_item_id,
            item.quantity,
            item.product.name,
            item.product.price,
            item.line_total()
        );
    }

    println!("total_items: {}", state.total_items());
    println!("total_amount: {:.2}", state.total_amount());
}
