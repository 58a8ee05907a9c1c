//! Admin menu

use std::io::{BufRead, Write};

use emporium::{
    catalog,
    credentials::PasswordHasher,
    products::{NewProduct, ProductId, ProductUpdate},
};
use rust_decimal::Decimal;

use crate::{
    cli::{CliError, Console, RULE, tables, unsaved},
    shop::{Shop, ShopError},
};

const INVALID_PRICE: &str = "Invalid input. Please enter a valid price.";
const INVALID_STOCK: &str = "Invalid input. Please enter a valid integer for the stock quantity.";
const INVALID_ID: &str = "Invalid input. Please enter a valid integer for the product ID.";

pub(super) fn menu<H, R, W>(shop: &mut Shop<H>, console: &mut Console<R, W>) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    console.say(RULE)?;
    console.say("      ***************** WELCOME TO ADMIN MENU *****************")?;
    console.say(RULE)?;

    loop {
        console.say("\n1. View Products")?;
        console.say("2. Add Product")?;
        console.say("3. Remove Product")?;
        console.say("4. Modify Product")?;
        console.say("5. Logout")?;

        match console.prompt("Enter your choice: ")?.trim() {
            "1" => console.say(tables::products(shop.catalog().active()))?,
            "2" => add_product(shop, console)?,
            "3" => remove_product(shop, console)?,
            "4" => modify_product(shop, console)?,
            "5" => {
                console.say("\nLogged out successfully.")?;

                return Ok(());
            }
            _ => console.say("\nInvalid choice. Please try again.")?,
        }
    }
}

fn add_product<H, R, W>(shop: &mut Shop<H>, console: &mut Console<R, W>) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let name = console.prompt("Enter product name: ")?;
    let price = prompt_price(console, "Enter product price: ")?;
    let description = console.prompt("Enter product description: ")?;
    let stock: u32 = console.prompt_parsed("Enter stock quantity: ", INVALID_STOCK)?;

    let product = NewProduct {
        name,
        price,
        description,
        stock,
    };

    match shop.add_product(product) {
        Ok(added) => console.say(format!("\nProduct added successfully with ID {}.", added.id)),
        Err(ShopError::Store(error)) => console.say(unsaved("Product added", &error)),
        Err(error) => console.say(format!("\nError adding product: {error}")),
    }
}

fn remove_product<H, R, W>(shop: &mut Shop<H>, console: &mut Console<R, W>) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let id: u32 = console.prompt_parsed("Enter product ID to remove: ", INVALID_ID)?;

    match shop.remove_product(ProductId::new(id)) {
        Ok(_) => console.say("\nProduct removed successfully."),
        Err(ShopError::Store(error)) => console.say(unsaved("Product removed", &error)),
        Err(error) => console.say(format!("\nError removing product: {error}")),
    }
}

fn modify_product<H, R, W>(shop: &mut Shop<H>, console: &mut Console<R, W>) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let id: u32 = console.prompt_parsed("Enter product ID to modify: ", INVALID_ID)?;
    let id = ProductId::new(id);

    let Ok(current) = shop.catalog().get_active(id).cloned() else {
        return console.say("\nProduct not found.");
    };

    let name = console.prompt(&format!("Enter new name (current: {}): ", current.name))?;

    let price = loop {
        let label = format!("Enter new price (current: {}): ", current.price);

        match console.prompt_optional::<Decimal>(&label, INVALID_PRICE)? {
            Some(price) if catalog::validate_price(price).is_err() => console.say(INVALID_PRICE)?,
            price => break price,
        }
    };

    let description = console.prompt(&format!(
        "Enter new description (current: {}): ",
        current.description
    ))?;

    let stock = console.prompt_optional::<u32>(
        &format!("Enter new stock quantity (current: {}): ", current.stock),
        INVALID_STOCK,
    )?;

    let update = ProductUpdate {
        name: non_blank(name),
        price,
        description: non_blank(description),
        stock,
    };

    match shop.modify_product(id, update) {
        Ok(_) => console.say("\nProduct modified successfully."),
        Err(ShopError::Store(error)) => console.say(unsaved("Product modified", &error)),
        Err(error) => console.say(format!("\nError modifying product: {error}")),
    }
}

fn prompt_price<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    label: &str,
) -> Result<Decimal, CliError> {
    loop {
        let price: Decimal = console.prompt_parsed(label, INVALID_PRICE)?;

        if catalog::validate_price(price).is_err() {
            console.say(INVALID_PRICE)?;
        } else {
            return Ok(price);
        }
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
