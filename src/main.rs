use colored::Colorize;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roomgi_backend::api;
use roomgi_backend::cli::{self, CLI};
use roomgi_backend::database::sqlite::SqliteDatabase;
use roomgi_backend::handlers::directory_handler::DirectoryHandler;
use roomgi_backend::handlers::report_handler::ReportHandler;
use roomgi_backend::handlers::verification_handler::VerificationHandler;
use roomgi_backend::services::jwt::AdminContext;
use roomgi_backend::utils::crypto::PasswordManager;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json().flatten_event(true))
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            api::start_http_server().await;
        }
        Some("console") => {
            if let Err(e) = run_console().await {
                eprintln!("{}", format!("Console error: {}", e).red());
                std::process::exit(1);
            }
        }
        Some("create-admin") => {
            if let Err(e) = cli::handle_create_admin_command().await {
                eprintln!("{}", format!("Failed to create admin: {}", e).red());
                std::process::exit(1);
            }
        }
        Some("stats") => {
            if let Err(e) = cli::handle_stats_command().await {
                eprintln!("{}", format!("Failed to read stats: {}", e).red());
                std::process::exit(1);
            }
        }
        Some("help") => {
            CLI::print_help();
        }
        Some(_) => {
            println!(
                "{}",
                "Unknown command. Use 'help' to see available commands.".red()
            );
        }
        None => {
            // Default: HTTP API and moderation console side by side.
            let http = tokio::spawn(async move {
                api::start_http_server().await;
            });
            let console = tokio::spawn(async move {
                if let Err(e) = run_console().await {
                    eprintln!("{}", format!("Console error: {}", e).red());
                    std::process::exit(1);
                }
            });
            let _ = tokio::try_join!(http, console);
        }
    }
}

async fn run_console() -> Result<(), Box<dyn std::error::Error>> {
    CLI::print_header();

    let database = Arc::new(SqliteDatabase::new(&SqliteDatabase::default_path()).await?);

    // The console is admin-only. Authentication happens against the local
    // database; no token is involved.
    let admin = loop {
        let email = CLI::get_input("📧 Admin email:")?;
        let password = CLI::get_password("🔒 Password:")?;

        let user = match database.get_user_by_email(email.trim()).await? {
            Some(user) => user,
            None => {
                CLI::print_error("Invalid email or password.");
                continue;
            }
        };
        if !PasswordManager::verify_password(&password, &user.password_hash)? {
            CLI::print_error("Invalid email or password.");
            continue;
        }
        match AdminContext::for_user(&user) {
            Ok(admin) => {
                CLI::print_success(&format!("Welcome back, {}!", user.full_name));
                break admin;
            }
            Err(e) => {
                CLI::print_error(&e.to_string());
                CLI::print_info("Use 'create-admin' to provision an administrator account.");
            }
        }
    };

    loop {
        println!("\n{}", "🏠 RoomGi Moderation Console".cyan().bold());
        println!("{}", "=".repeat(40).blue());
        println!("1. 🪪 Pending user verifications");
        println!("2. 📄 Pending property verifications");
        println!("3. 🚩 Review reports");
        println!("4. 👥 User directory");
        println!("5. 📊 Platform stats");
        println!("{}", "─".repeat(40).blue());
        println!("0. 🚪 Exit");

        let choice = CLI::get_input("Select an option:")?;

        match choice.trim() {
            "1" => {
                let handler = VerificationHandler::new(database.clone());
                if let Err(e) = handler.review_users_interactive(&admin).await {
                    CLI::print_error(&format!("Review failed: {}", e));
                }
            }
            "2" => {
                let handler = VerificationHandler::new(database.clone());
                if let Err(e) = handler.review_properties_interactive(&admin).await {
                    CLI::print_error(&format!("Review failed: {}", e));
                }
            }
            "3" => {
                let handler = ReportHandler::new(database.clone());
                if let Err(e) = handler.review_reports_interactive(&admin).await {
                    CLI::print_error(&format!("Report review failed: {}", e));
                }
            }
            "4" => {
                let handler = DirectoryHandler::new(database.clone());
                if let Err(e) = handler.browse_users_interactive(&admin).await {
                    CLI::print_error(&format!("Directory failed: {}", e));
                }
            }
            "5" => {
                let handler = DirectoryHandler::new(database.clone());
                if let Err(e) = handler.show_stats(&admin).await {
                    CLI::print_error(&format!("Stats failed: {}", e));
                }
            }
            "0" => {
                println!("{}", "👋 Goodbye!".green().bold());
                break;
            }
            _ => {
                CLI::print_error("Invalid option. Please try again.");
            }
        }
    }

    Ok(())
}
