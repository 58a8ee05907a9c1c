//! Emporium console shopping cart

use std::{
    fmt::Display,
    io::{self, Write},
    process::ExitCode,
};

use emporium::credentials::Sha256Hasher;
use emporium_app::{
    audit::AuditLog,
    cli::{self, Console},
    config::AppConfig,
    observability::init_logging,
    shop::Shop,
    storage::Stores,
};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            let failed = error.use_stderr();

            _ = error.print();

            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = init_logging(&config.logging) {
        report("Logging error", &error);

        return ExitCode::FAILURE;
    }

    info!(data_dir = %config.storage.data_dir.display(), "starting emporium");

    let mut shop = match Shop::open(
        Stores::json(&config.storage),
        AuditLog::new(config.storage.purchases_log_path()),
        Sha256Hasher,
        &config.admin.username,
        config.admin.password(),
    ) {
        Ok(shop) => shop,
        Err(error) => {
            error!(%error, "failed to load shop data");
            report("Failed to load shop data", &error);

            return ExitCode::FAILURE;
        }
    };

    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    let session = cli::run(&mut shop, &mut console);

    if let Err(error) = console.into_output().flush() {
        warn!(%error, "failed to flush console output");
    }

    let mut code = ExitCode::SUCCESS;

    if let Err(error) = session {
        error!(%error, "console session failed");
        report("Console error", &error);

        code = ExitCode::FAILURE;
    }

    if let Err(error) = shop.persist() {
        error!(%error, "failed to save shop data");
        report("Failed to save shop data", &error);

        code = ExitCode::FAILURE;
    }

    code
}

fn report(context: &str, error: &impl Display) {
    #[expect(
        clippy::print_stderr,
        reason = "the console owns stdout and logging may be filtered out"
    )]
    {
        eprintln!("{context}: {error}");
    }
}
