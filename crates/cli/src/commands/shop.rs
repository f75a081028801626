//! Browsing, cart and wishlist commands.
//!
//! Products come from the public catalog unless `--local` picks the store's
//! own products. Cart and wishlist changes are applied to the state file
//! through `ShopState::dispatch` and confirmed with one line of output.

use cartwheel_core::api::CartSummary;
use cartwheel_core::{Action, DELIVERY_CHARGE, Product, ProductId};

use super::{Shopper, ShopperError, notify};
use crate::client::ApiClient;

/// Where product lookups go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Catalog,
    Store,
}

impl Source {
    #[must_use]
    pub const fn from_local_flag(local: bool) -> Self {
        if local { Self::Store } else { Self::Catalog }
    }
}

async fn fetch_product(
    client: &ApiClient,
    id: &ProductId,
    source: Source,
) -> Result<Product, ShopperError> {
    let product = match source {
        Source::Catalog => client.catalog_product(id).await?,
        Source::Store => client.store_product(id).await?,
    };
    Ok(product)
}

fn product_line(product: &Product) -> String {
    let stock = if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "out of stock".to_owned()
    };
    let rating = product
        .rating
        .map(|r| format!("  {:.1}/5", r.value()))
        .unwrap_or_default();

    format!(
        "{id:<16} {title:<40} {price:>10}  {stock}{rating}",
        id = product.product_id.as_str(),
        title = product.title,
        price = product.price.display(),
    )
}

fn render_cart(summary: &CartSummary) -> Vec<String> {
    if summary.lines.is_empty() {
        return vec!["Your cart is empty".to_owned()];
    }

    let mut out: Vec<String> = summary
        .lines
        .iter()
        .map(|line| {
            format!(
                "{id:<16} {title:<32} {qty:>4} x {unit:>9} = {total:>10}",
                id = line.product_id.as_str(),
                title = line.title,
                qty = line.quantity,
                unit = line.unit_price.display(),
                total = line.line_total.display(),
            )
        })
        .collect();

    out.push(format!("{:>80}", format!("Items: {}", summary.item_count)));
    out.push(format!("{:>80}", format!("Subtotal: {}", summary.subtotal.display())));
    out.push(format!(
        "{:>80}",
        format!("Delivery: {}", summary.delivery_charge.display())
    ));
    out.push(format!("{:>80}", format!("Total: {}", summary.total.display())));
    out
}

// =============================================================================
// Products
// =============================================================================

/// List products, optionally for one catalog category.
///
/// # Errors
///
/// Returns `ShopperError::Client` if the request fails.
pub async fn list_products(category: Option<&str>, source: Source) -> Result<(), ShopperError> {
    let shopper = Shopper::open().await?;
    let products = match source {
        Source::Catalog => shopper.client.catalog_products(category).await?,
        Source::Store => {
            let mut products = shopper.client.store_products().await?;
            if let Some(category) = category {
                products.retain(|p| p.category.as_deref() == Some(category));
            }
            products
        }
    };

    if products.is_empty() {
        notify("No products found");
    }
    for product in &products {
        notify(product_line(product));
    }
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns `ShopperError::Client` with `NotFound` if the product does not exist.
pub async fn show_product(id: &str, source: Source) -> Result<(), ShopperError> {
    let shopper = Shopper::open().await?;
    let id = ProductId::parse(id)?;
    let product = fetch_product(&shopper.client, &id, source).await?;

    notify(product_line(&product));
    if let Some(brand) = &product.brand {
        notify(format_args!("  brand:    {brand}"));
    }
    if let Some(category) = &product.category {
        notify(format_args!("  category: {category}"));
    }
    if let Some(sku) = &product.sku {
        notify(format_args!("  sku:      {sku}"));
    }
    if let Some(description) = &product.description {
        notify(format_args!("  {description}"));
    }

    let state = shopper.state.shop;
    if let Some(qty) = state.cart().quantity_of(&product.product_id) {
        notify(format_args!("  in cart:  {qty}"));
    }
    if state.wishlist().contains(&product.product_id) {
        notify("  in wishlist");
    }
    Ok(())
}

// =============================================================================
// Cart
// =============================================================================

/// Print the cart with its totals.
///
/// # Errors
///
/// Returns `ShopperError::State` if the state file cannot be read.
pub async fn show_cart() -> Result<(), ShopperError> {
    let shopper = Shopper::open().await?;
    let summary = CartSummary::new(shopper.state.shop.cart(), DELIVERY_CHARGE);
    for line in render_cart(&summary) {
        notify(line);
    }
    Ok(())
}

/// Add a product to the cart, replacing any existing line for it.
///
/// # Errors
///
/// Returns `ShopperError::Client` if the product cannot be fetched.
pub async fn add_to_cart(
    id: &str,
    quantity: Option<i64>,
    source: Source,
) -> Result<(), ShopperError> {
    let mut shopper = Shopper::open().await?;
    let id = ProductId::parse(id)?;
    let product = fetch_product(&shopper.client, &id, source).await?;
    let title = product.title.clone();

    shopper.state.shop.dispatch(Action::AddToCart { product, quantity });
    shopper.save().await?;

    let qty = shopper.state.shop.cart().quantity_of(&id).unwrap_or(1);
    notify(format_args!("Added {title} to cart (quantity {qty})"));
    Ok(())
}

/// Cart line edits that need no product snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdit {
    Set(i64),
    Increment,
    Decrement,
    Remove,
}

impl LineEdit {
    fn into_action(self, product_id: ProductId) -> Action {
        match self {
            Self::Set(quantity) => Action::UpdateQuantity {
                product_id,
                quantity,
            },
            Self::Increment => Action::IncrementQuantity { product_id },
            Self::Decrement => Action::DecrementQuantity { product_id },
            Self::Remove => Action::RemoveFromCart { product_id },
        }
    }
}

/// Change or drop an existing cart line.
///
/// # Errors
///
/// Returns `ShopperError::State` if the state file cannot be read or written.
pub async fn edit_cart_line(id: &str, edit: LineEdit) -> Result<(), ShopperError> {
    let mut shopper = Shopper::open().await?;
    let id = ProductId::parse(id)?;

    let Some(title) = shopper
        .state
        .shop
        .cart()
        .get(&id)
        .map(|line| line.product.title.clone())
    else {
        notify(format_args!("{id} is not in your cart"));
        return Ok(());
    };

    shopper.state.shop.dispatch(edit.into_action(id.clone()));
    shopper.save().await?;

    match shopper.state.shop.cart().quantity_of(&id) {
        Some(qty) => notify(format_args!("{title}: quantity {qty}")),
        None => notify(format_args!("Removed {title} from cart")),
    }
    Ok(())
}

// =============================================================================
// Wishlist
// =============================================================================

/// Print saved products.
///
/// # Errors
///
/// Returns `ShopperError::State` if the state file cannot be read.
pub async fn show_wishlist() -> Result<(), ShopperError> {
    let shopper = Shopper::open().await?;
    let wishlist = shopper.state.shop.wishlist();

    if wishlist.is_empty() {
        notify("Your wishlist is empty");
    }
    for entry in wishlist.entries() {
        notify(product_line(&entry.product));
    }
    Ok(())
}

/// Save a product.
///
/// # Errors
///
/// Returns `ShopperError::Client` if the product cannot be fetched.
pub async fn add_to_wishlist(id: &str, source: Source) -> Result<(), ShopperError> {
    let mut shopper = Shopper::open().await?;
    let id = ProductId::parse(id)?;
    let product = fetch_product(&shopper.client, &id, source).await?;
    let title = product.title.clone();

    shopper.state.shop.dispatch(Action::AddToWishlist { product });
    shopper.save().await?;

    notify(format_args!("Added {title} to wishlist"));
    Ok(())
}

/// Forget a saved product.
///
/// # Errors
///
/// Returns `ShopperError::State` if the state file cannot be read or written.
pub async fn remove_from_wishlist(id: &str) -> Result<(), ShopperError> {
    let mut shopper = Shopper::open().await?;
    let id = ProductId::parse(id)?;

    if !shopper.state.shop.wishlist().contains(&id) {
        notify(format_args!("{id} is not in your wishlist"));
        return Ok(());
    }

    shopper
        .state
        .shop
        .dispatch(Action::RemoveFromWishlist { product_id: id.clone() });
    shopper.save().await?;

    notify(format_args!("Removed {id} from wishlist"));
    Ok(())
}

/// Save the product if it is not saved, forget it otherwise.
///
/// A saved product is toggled off from its stored snapshot, without a fetch.
///
/// # Errors
///
/// Returns `ShopperError::Client` if an unsaved product cannot be fetched.
pub async fn toggle_wishlist(id: &str, source: Source) -> Result<(), ShopperError> {
    let mut shopper = Shopper::open().await?;
    let id = ProductId::parse(id)?;

    let stored = shopper
        .state
        .shop
        .wishlist()
        .entries()
        .find(|entry| entry.product.product_id == id)
        .map(|entry| entry.product.clone());
    let product = match stored {
        Some(product) => product,
        None => fetch_product(&shopper.client, &id, source).await?,
    };
    let title = product.title.clone();

    shopper.state.shop.dispatch(Action::ToggleWishlist { product });
    shopper.save().await?;

    if shopper.state.shop.wishlist().contains(&id) {
        notify(format_args!("Added {title} to wishlist"));
    } else {
        notify(format_args!("Removed {title} from wishlist"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use cartwheel_core::CartState;

    use super::*;

    fn product(id: u64, price: &str, stock: u32) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "title": "Jam",
            "price": price,
            "stock": stock,
            "rating": 4.25
        }))
        .unwrap()
    }

    #[test]
    fn test_product_line() {
        let line = product_line(&product(3, "2.005", 0));
        assert!(line.starts_with("3 "));
        assert!(line.contains("2.01"));
        assert!(line.contains("out of stock"));
        assert!(line.ends_with("4.2/5") || line.ends_with("4.3/5"));
    }

    #[test]
    fn test_render_empty_cart() {
        let summary = CartSummary::new(&CartState::new(), DELIVERY_CHARGE);
        assert_eq!(render_cart(&summary), vec!["Your cart is empty"]);
    }

    #[test]
    fn test_render_cart_totals() {
        let mut cart = CartState::new();
        cart.add_to_cart(product(1, "3.335", 5), Some(3));
        let lines = render_cart(&CartSummary::new(&cart, DELIVERY_CHARGE));

        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("3 x"));
        assert!(lines[0].ends_with("10.01"));
        assert!(lines[2].ends_with("Subtotal: 10.01"));
        assert!(lines[3].ends_with("Delivery: 0.00"));
        assert!(lines[4].ends_with("Total: 10.01"));
    }

    #[test]
    fn test_line_edit_actions() {
        let id = ProductId::from(1);
        assert_eq!(
            LineEdit::Set(-4).into_action(id.clone()),
            Action::UpdateQuantity {
                product_id: id.clone(),
                quantity: -4
            }
        );
        assert_eq!(
            LineEdit::Remove.into_action(id.clone()),
            Action::RemoveFromCart { product_id: id }
        );
    }
}
