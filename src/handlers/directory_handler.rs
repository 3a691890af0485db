use crate::cli::CLI;
use crate::database::sqlite::{SqliteDatabase, UserFilter};
use crate::errors::Result;
use crate::models::user::UserRole;
use crate::models::verification::VerificationStatus;
use crate::services::admin_service::AdminService;
use crate::services::jwt::AdminContext;
use colored::Colorize;
use std::sync::Arc;

pub struct DirectoryHandler {
    service: AdminService,
}

impl DirectoryHandler {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self {
            service: AdminService::new(db),
        }
    }

    pub async fn browse_users_interactive(&self, admin: &AdminContext) -> Result<()> {
        let search = CLI::get_input("Search by name or email (blank for all):")?;
        let role_input = CLI::get_input("Filter by role [tenant/owner/admin, blank for all]:")?;
        let role = match role_input.trim() {
            "" => None,
            value => match UserRole::parse(value) {
                Ok(role) => Some(role),
                Err(e) => {
                    CLI::print_error(&e.to_string());
                    return Ok(());
                }
            },
        };
        let status_input =
            CLI::get_input("Filter by verification [unverified/pending/approved/rejected, blank for all]:")?;
        let verification_status = match status_input.trim() {
            "" => None,
            value => match VerificationStatus::parse(value) {
                Ok(status) => Some(status),
                Err(e) => {
                    CLI::print_error(&e.to_string());
                    return Ok(());
                }
            },
        };

        let filter = UserFilter {
            search: if search.trim().is_empty() {
                None
            } else {
                Some(search)
            },
            role,
            verification_status,
            blocked: None,
        };

        let page = self.service.list_users(admin, &filter, 1, 20).await?;
        if page.items.is_empty() {
            CLI::print_info("No users match those filters.");
            return Ok(());
        }

        println!(
            "\n{} (showing {} of {})",
            "👥 User Directory:".cyan().bold(),
            page.items.len(),
            page.total_count
        );
        for (i, user) in page.items.iter().enumerate() {
            let flags = if user.is_blocked {
                " [BLOCKED]".red().to_string()
            } else {
                String::new()
            };
            println!(
                "{}. {} ({}) — {} / {}{}",
                i + 1,
                user.full_name.green().bold(),
                user.email,
                user.role,
                user.verification_status,
                flags
            );
        }

        let choice = CLI::get_input("Select a user to block/unblock (0 to go back):")?;
        let index = match choice.parse::<usize>() {
            Ok(0) => return Ok(()),
            Ok(i) if i <= page.items.len() => i - 1,
            _ => {
                CLI::print_error("Invalid selection.");
                return Ok(());
            }
        };
        let user = &page.items[index];

        let blocked = !user.is_blocked;
        let verb = if blocked { "Block" } else { "Unblock" };
        if !CLI::confirm_action(&format!("{} {}?", verb, user.full_name))? {
            CLI::print_info("No change made.");
            return Ok(());
        }

        match self.service.set_user_blocked(admin, &user.id, blocked).await {
            Ok(updated) => CLI::print_success(&format!(
                "{} is now {}",
                updated.full_name,
                if updated.is_blocked { "blocked" } else { "active" }
            )),
            Err(e) => CLI::print_error(&format!("Failed to update: {}", e)),
        }
        Ok(())
    }

    pub async fn show_stats(&self, admin: &AdminContext) -> Result<()> {
        let stats = self.service.platform_stats(admin).await?;
        println!();
        println!("{}", "📊 Platform Statistics:".cyan().bold());
        println!("👥 Users: {}", stats.total_users);
        println!("🏠 Properties: {}", stats.total_properties);
        println!("🪪 Pending user verifications: {}", stats.pending_user_verifications);
        println!(
            "📄 Pending property verifications: {}",
            stats.pending_property_verifications
        );
        println!("🚩 Open reports: {}", stats.open_reports);
        println!();
        Ok(())
    }
}
