//! User menu

use std::io::{BufRead, Write};

use emporium::{
    checkout::Confirmation,
    credentials::PasswordHasher,
    money::format_amount,
    payment::{self, PaymentDetails},
    products::ProductId,
};

use crate::{
    cli::{CliError, Console, RULE, tables},
    shop::Shop,
};

const DIVIDER: &str = "---------------------------------------------------------------------------------------------------------------------";

pub(super) fn menu<H, R, W>(
    shop: &mut Shop<H>,
    console: &mut Console<R, W>,
    username: &str,
) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    console.say(RULE)?;
    console.say("      ***************** WELCOME TO USER MENU *****************")?;
    console.say(RULE)?;

    loop {
        console.say("\n1. View Products")?;
        console.say("2. Add to Cart")?;
        console.say("3. View Cart")?;
        console.say("4. Remove from Cart")?;
        console.say("5. Save Cart")?;
        console.say("6. Load Saved Cart")?;
        console.say("7. Checkout")?;
        console.say("8. View Purchase History")?;
        console.say("9. Logout")?;

        match console.prompt("Enter your choice: ")?.trim() {
            "1" => console.say(tables::products(shop.catalog().active()))?,
            "2" => add_to_cart(shop, console, username)?,
            "3" => view_cart(shop, console, username)?,
            "4" => remove_from_cart(shop, console, username)?,
            "5" => match shop.save_cart(username) {
                Ok(0) => console.say("\nYour cart is empty, nothing to save.")?,
                Ok(_) => console.say("\nCart saved for later access.")?,
                Err(error) => console.say(format!("\nError saving cart: {error}"))?,
            },
            "6" => match shop.load_saved_cart(username) {
                Ok(_) => console.say("\nSaved cart loaded.")?,
                Err(error) => console.say(format!("\n{}.", capitalize(&error.to_string())))?,
            },
            "7" => checkout(shop, console, username)?,
            "8" => view_history(shop, console, username)?,
            "9" => {
                match shop.logout_user(username) {
                    Ok(()) => console.say("SUCCESSFULLY LOGGED OUT !")?,
                    Err(error) => console.say(format!("Logged out, but saving failed: {error}"))?,
                }

                return Ok(());
            }
            _ => console.say("\nInvalid choice. Please try again.")?,
        }
    }
}

fn add_to_cart<H, R, W>(
    shop: &mut Shop<H>,
    console: &mut Console<R, W>,
    username: &str,
) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let product: u32 = console.prompt_parsed("Enter product ID: ", "Invalid input.")?;
    let quantity: u32 = console.prompt_parsed("Enter quantity: ", "Invalid input.")?;
    let product = ProductId::new(product);

    match shop.add_to_cart(username, product, quantity) {
        Ok(_) => {
            let name = shop
                .catalog()
                .get(product)
                .map_or_else(|| product.to_string(), |product| product.name.clone());

            console.say(format!("{name} added to cart."))
        }
        Err(error) => console.say(format!("Error adding product to cart: {error}")),
    }
}

fn remove_from_cart<H, R, W>(
    shop: &mut Shop<H>,
    console: &mut Console<R, W>,
    username: &str,
) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let product: u32 = console.prompt_parsed("Enter product ID to remove: ", "Invalid input.")?;
    let product = ProductId::new(product);

    match shop.remove_from_cart(username, product) {
        Ok(_) => {
            let name = shop
                .catalog()
                .get(product)
                .map_or_else(|| product.to_string(), |product| product.name.clone());

            console.say(format!("{name} removed from cart."))
        }
        Err(error) => console.say(format!("{}.", capitalize(&error.to_string()))),
    }
}

fn view_cart<H, R, W>(
    shop: &Shop<H>,
    console: &mut Console<R, W>,
    username: &str,
) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    match shop.quote(username) {
        Ok(quote) => {
            console.say(DIVIDER)?;
            console.say("                                           ***** Your Cart *****")?;
            console.say(DIVIDER)?;
            console.say(tables::quote(&quote))
        }
        Err(error) => console.say(format!("Error viewing cart: {error}")),
    }
}

fn checkout<H, R, W>(
    shop: &mut Shop<H>,
    console: &mut Console<R, W>,
    username: &str,
) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let Ok(user) = shop.user(username) else {
        return console.say("\nError during checkout: unknown user.");
    };

    if user.cart().is_empty() {
        return console.say("\n*** YOUR CART IS EMPTY ***");
    }

    let address = user.address.clone();

    console.say("\nPlease enter your payment details:")?;

    let card_number = console.prompt_valid("Credit Card Number: ", payment::validate_card_number)?;
    let expiry = console.prompt_valid("Expiry Date (MMYY): ", payment::validate_expiry)?;
    let cvv = console.prompt_valid("CVV: ", payment::validate_cvv)?;

    let payment = match PaymentDetails::new(card_number, expiry, cvv) {
        Ok(payment) => payment,
        Err(error) => return console.say(format!("\nError during checkout: {error}")),
    };

    console.say("\nPlease confirm your address:")?;
    console.say(&address)?;

    let address_confirmed = console
        .prompt("Is the above address correct? (yes/no): ")?
        .trim()
        .eq_ignore_ascii_case("yes");

    let feedback = if address_confirmed {
        let feedback = console.prompt("\nPlease provide your feedback on our service: ")?;

        console.say("\nThank you for your feedback!")?;

        feedback
    } else {
        String::new()
    };

    let confirmation = Confirmation {
        payment,
        address_confirmed,
        feedback,
    };

    match shop.checkout(username, confirmation) {
        Ok(purchase) => console.say(format!(
            "\nPurchase complete. Total charged: {}",
            format_amount(purchase.total_price)
        )),
        Err(error) => console.say(format!("\n{}.", capitalize(&error.to_string()))),
    }
}

fn view_history<H, R, W>(
    shop: &Shop<H>,
    console: &mut Console<R, W>,
    username: &str,
) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let Ok(user) = shop.user(username) else {
        return console.say("Error viewing history: unknown user.");
    };

    console.say(DIVIDER)?;
    console.say("                                          ***** Your Purchase History *****")?;
    console.say(DIVIDER)?;

    for purchase in user.order_history().iter() {
        console.say(format!("Date: {}", purchase.date))?;
        console.say(tables::purchase(purchase))?;
        console.say(format!("Feedback: {}", purchase.feedback))?;
    }

    console.say(DIVIDER)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
