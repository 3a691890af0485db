use crate::cli::CLI;
use crate::database::sqlite::SqliteDatabase;
use crate::errors::Result;
use crate::services::user_service::UserService;
use crate::utils::validation::Validator;
use colored::Colorize;
use std::sync::Arc;

/// `create-admin`: provision an administrator account from the terminal.
/// This is the only way to create one; the register endpoint refuses the
/// admin role.
pub async fn handle_create_admin_command() -> Result<()> {
    CLI::print_header();
    CLI::print_info("Let's provision an administrator account.");
    println!();

    let database = Arc::new(SqliteDatabase::new(&SqliteDatabase::default_path()).await?);
    let user_service = UserService::new(database);

    let email = loop {
        let email = CLI::get_input("📧 Admin email address:")?;
        if email.is_empty() {
            CLI::print_error("Email cannot be empty");
            continue;
        }
        match Validator::validate_email(&email) {
            Ok(()) => break email,
            Err(e) => {
                CLI::print_error(&e.to_string());
                continue;
            }
        }
    };

    let full_name = loop {
        let name = CLI::get_input("👤 Full name:")?;
        if name.is_empty() {
            CLI::print_error("Name cannot be empty");
            continue;
        }
        match Validator::validate_full_name(&name) {
            Ok(()) => break name,
            Err(e) => {
                CLI::print_error(&e.to_string());
                continue;
            }
        }
    };

    println!();
    CLI::display_password_requirements();

    let password = loop {
        let password = CLI::get_password("🔒 Password:")?;
        if password.is_empty() {
            CLI::print_error("Password cannot be empty");
            continue;
        }
        match Validator::validate_password(&password) {
            Ok(()) => {
                let confirm = CLI::get_password("🔒 Confirm password:")?;
                if password != confirm {
                    CLI::print_error("Passwords do not match. Please try again.");
                    continue;
                }
                break password;
            }
            Err(e) => {
                CLI::print_error(&e.to_string());
                continue;
            }
        }
    };

    println!();
    println!("{}", "Account Summary:".yellow().bold());
    println!("📧 Email: {}", email);
    println!("👤 Name: {}", full_name);
    println!("🔑 Role: admin");
    println!();

    if !CLI::confirm_action("Create this administrator account?")? {
        CLI::print_info("Admin creation cancelled.");
        return Ok(());
    }

    match user_service.create_admin(&email, &full_name, &password).await {
        Ok(user) => {
            println!();
            CLI::print_success("🎉 Administrator account created!");
            println!("🆔 User ID: {}", user.id);
            println!();
        }
        Err(e) => {
            CLI::print_error(&format!("Failed to create admin: {}", e));
            return Err(e);
        }
    }

    Ok(())
}

/// `stats`: print platform counters straight from the database. The
/// operator owns the database file, so no login is involved here.
pub async fn handle_stats_command() -> Result<()> {
    let database = SqliteDatabase::new(&SqliteDatabase::default_path()).await?;

    let users = database.count_users().await?;
    let properties = database.count_properties().await?;
    let pending_users = database.count_pending_user_verifications().await?;
    let pending_properties = database.count_pending_property_verifications().await?;
    let open_reports = database.count_open_reports().await?;

    println!();
    println!("{}", "📊 Platform Statistics:".cyan().bold());
    println!("👥 Users: {}", users);
    println!("🏠 Properties: {}", properties);
    println!("🪪 Pending user verifications: {}", pending_users);
    println!("📄 Pending property verifications: {}", pending_properties);
    println!("🚩 Open reports: {}", open_reports);
    println!();

    Ok(())
}
