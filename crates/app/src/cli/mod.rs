//! Interactive console menu

use std::io::{self, BufRead, Write};

use emporium::{credentials::PasswordHasher, users::NewUser};
use thiserror::Error;

use crate::{
    shop::{Shop, ShopError},
    storage::StoreError,
};

mod admin;
mod console;
pub mod tables;
mod user;

pub use console::Console;

const RULE: &str = "==============================================================================";

/// Errors that end the console session.
#[derive(Debug, Error)]
pub enum CliError {
    /// Terminal I/O failed.
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The input was closed.
    #[error("end of input")]
    EndOfInput,
}

/// Run the main menu until the user exits or the input ends.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the terminal cannot be read or written.
pub fn run<H, R, W>(shop: &mut Shop<H>, console: &mut Console<R, W>) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    match main_menu(shop, console) {
        Err(CliError::EndOfInput) => Ok(()),
        result => result,
    }
}

fn main_menu<H, R, W>(shop: &mut Shop<H>, console: &mut Console<R, W>) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    console.say(RULE)?;
    console.say("      ***************** WELCOME TO OUR SHOPPING CENTRE *****************")?;
    console.say(RULE)?;

    let dropped = shop.load_report().dangling.len();

    if dropped > 0 {
        console.say(format!(
            "Note: {dropped} saved cart item(s) referred to products that no longer exist and were removed."
        ))?;
    }

    loop {
        console.say("\n1. Register as User")?;
        console.say("2. Login as User")?;
        console.say("3. Login as Admin")?;
        console.say("4. Exit")?;

        match console.prompt("Enter your choice: ")?.trim() {
            "1" => register(shop, console)?,
            "2" => {
                if let Some(username) = login_user(shop, console)? {
                    user::menu(shop, console, &username)?;
                }
            }
            "3" => {
                if login_admin(shop, console)? {
                    admin::menu(shop, console)?;
                }
            }
            "4" => {
                console.say(RULE)?;
                console.say("                 THANK YOU FOR SHOPPING. HAVE A NICE DAY!!!")?;
                console.say(RULE)?;

                return Ok(());
            }
            _ => console.say("\nInvalid choice. Please try again.")?,
        }
    }
}

fn register<H, R, W>(shop: &mut Shop<H>, console: &mut Console<R, W>) -> Result<(), CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let user = NewUser {
        first_name: console.prompt("First Name: ")?,
        last_name: console.prompt("Last Name: ")?,
        address: console.prompt("Address: ")?,
        username: console.prompt("Username: ")?.trim().to_string(),
    };
    let password = console.prompt("Password: ")?;

    match shop.register_user(user, &password) {
        Ok(()) => console.say("\nUser registered successfully."),
        Err(ShopError::Store(error)) => console.say(unsaved("User registered", &error)),
        Err(error) => console.say(format!("\nRegistration failed: {error}")),
    }
}

/// Message for a change that was applied but could not be written out.
fn unsaved(done: &str, error: &StoreError) -> String {
    format!("\n{done}, but saving failed: {error}. It will be saved again on exit.")
}

fn login_user<H, R, W>(
    shop: &Shop<H>,
    console: &mut Console<R, W>,
) -> Result<Option<String>, CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let username = console.prompt("Username: ")?;
    let password = console.prompt("Password: ")?;

    match shop.login_user(username.trim(), &password) {
        Ok(user) => {
            let welcome = format!("\nWelcome {} {}", user.first_name, user.last_name);
            let username = user.username().to_string();

            console.say(welcome)?;

            Ok(Some(username))
        }
        Err(_) => {
            console.say("\nInvalid username or password.")?;

            Ok(None)
        }
    }
}

fn login_admin<H, R, W>(shop: &Shop<H>, console: &mut Console<R, W>) -> Result<bool, CliError>
where
    H: PasswordHasher,
    R: BufRead,
    W: Write,
{
    let username = console.prompt("Admin Username: ")?;
    let password = console.prompt("Admin Password: ")?;

    if let Ok(admin) = shop.login_admin(username.trim(), &password) {
        console.say(format!("\nWelcome Admin {}", admin.username()))?;

        Ok(true)
    } else {
        console.say("\nInvalid admin username or password.")?;

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use emporium::{
        admins::Admin,
        credentials::{Credential, MockPasswordHasher},
        products::{Product, ProductId},
        users::User,
    };
    use testresult::TestResult;

    use crate::{
        audit::AuditLog,
        storage::{MemoryStore, MockStore, Stores},
    };

    use super::*;

    fn hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();

        hasher
            .expect_hash()
            .returning(|password| Credential::new("salt", password));

        hasher
            .expect_verify()
            .returning(|password, credential| credential.hash() == password);

        hasher
    }

    fn open(dir: &tempfile::TempDir) -> TestResult<Shop<MockPasswordHasher>> {
        Ok(Shop::open(
            Stores::json_in(dir.path()),
            AuditLog::new(dir.path().join("purchases.txt")),
            hasher(),
            "Maria",
            "maria123",
        )?)
    }

    fn session<H: PasswordHasher>(shop: &mut Shop<H>, script: &[&str]) -> TestResult<String> {
        let input = script.iter().map(|line| format!("{line}\n")).collect::<String>();
        let mut console = Console::new(input.as_bytes(), Vec::new());

        run(shop, &mut console)?;

        Ok(String::from_utf8(console.into_output())?)
    }

    #[test]
    fn shopping_session_checks_out_and_logs_out() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut shop = open(&dir)?;

        let output = session(
            &mut shop,
            &[
                "1", "Ada", "Lovelace", "12 Analytical Row", "ada", "engine",
                "2", "ada", "engine",
                "2", "1", "2",
                "3",
                "7", "1234567890123", "1228", "123", "yes", "Great",
                "8",
                "9",
                "4",
            ],
        )?;

        assert!(output.contains("User registered successfully."), "{output}");
        assert!(output.contains("Welcome Ada Lovelace"), "{output}");
        assert!(output.contains("Laptop added to cart."), "{output}");
        assert!(output.contains("$1,999.98"), "{output}");
        assert!(output.contains("Thank you for your feedback!"), "{output}");
        assert!(output.contains("Feedback: Great"), "{output}");
        assert!(output.contains("THANK YOU FOR SHOPPING"), "{output}");

        assert_eq!(
            shop.catalog().get(ProductId::new(1)).map(|product| product.stock),
            Some(8)
        );
        assert_eq!(shop.user("ada")?.order_history().len(), 1);
        assert!(dir.path().join("users.json").exists());
        assert!(dir.path().join("products.json").exists());

        Ok(())
    }

    #[test]
    fn end_of_input_ends_the_session_quietly() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut shop = open(&dir)?;

        let output = session(&mut shop, &["3", "Maria", "maria123", "1"])?;

        assert!(output.contains("Welcome Admin Maria"), "{output}");
        assert!(output.contains("Smart Doorbell"), "{output}");

        Ok(())
    }

    #[test]
    fn wrong_password_returns_to_main_menu() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut shop = open(&dir)?;

        let output = session(&mut shop, &["2", "nobody", "nothing", "5", "4"])?;

        assert!(output.contains("Invalid username or password."), "{output}");
        assert!(output.contains("Invalid choice. Please try again."), "{output}");

        Ok(())
    }

    #[test]
    fn admin_session_edits_the_catalog() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut shop = open(&dir)?;

        let output = session(
            &mut shop,
            &[
                "3", "Maria", "maria123",
                "2", "Webcam", "abc", "59.999", "59.99", "A 1080p webcam.", "4",
                "4", "16", "", "", "", "9",
                "3", "1",
                "5",
                "4",
            ],
        )?;

        assert!(output.contains("Product added successfully with ID 16."), "{output}");
        assert_eq!(output.matches("Invalid input. Please enter a valid price.").count(), 2);
        assert!(output.contains("Product modified successfully."), "{output}");
        assert!(output.contains("Product removed successfully."), "{output}");

        let webcam = shop.catalog().get_active(ProductId::new(16))?;

        assert_eq!(webcam.name, "Webcam");
        assert_eq!(webcam.stock, 9);
        assert!(shop.catalog().get_active(ProductId::new(1)).is_err());

        Ok(())
    }

    #[test]
    fn failed_save_is_reported_without_hiding_the_change() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut products = MockStore::<Product>::new();
        products.expect_load().returning(|| Ok(None));
        products.expect_save().returning(|_| Err(StoreError::Busy));

        let mut shop = Shop::open(
            Stores {
                products: Box::new(products),
                users: Box::new(MemoryStore::<User>::new()),
                admins: Box::new(MemoryStore::<Admin>::new()),
            },
            AuditLog::new(dir.path().join("purchases.txt")),
            hasher(),
            "Maria",
            "maria123",
        )?;

        let output = session(
            &mut shop,
            &["3", "Maria", "maria123", "2", "Webcam", "59.99", "A 1080p webcam.", "4", "5", "4"],
        )?;

        assert!(
            output.contains("Product added, but saving failed: memory store is already in use."),
            "{output}"
        );
        assert!(!output.contains("Error adding product"), "{output}");
        assert!(shop.catalog().get_active(ProductId::new(16)).is_ok());

        Ok(())
    }
}
