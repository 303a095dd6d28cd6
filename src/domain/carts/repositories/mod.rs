//! Cart Repositories

mod carts;
mod items;

pub(crate) use carts::CartsRepository;
pub(crate) use items::CartItemsRepository;
