use crate::cli::CLI;
use crate::database::sqlite::SqliteDatabase;
use crate::errors::Result;
use crate::models::verification::ReviewDecision;
use crate::services::jwt::AdminContext;
use crate::services::storage_service::HttpStorageService;
use crate::services::verification_service::VerificationService;
use colored::Colorize;
use std::sync::Arc;

pub struct VerificationHandler {
    service: VerificationService,
}

impl VerificationHandler {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        let service = VerificationService::new(db, Arc::new(HttpStorageService::from_env()));
        Self { service }
    }

    pub async fn review_users_interactive(&self, admin: &AdminContext) -> Result<()> {
        let pending = self.service.list_pending_users(admin).await?;
        if pending.is_empty() {
            CLI::print_info("No user verifications waiting for review.");
            return Ok(());
        }

        println!("\n{}", "🪪 Pending User Verifications:".cyan().bold());
        for (i, user) in pending.iter().enumerate() {
            println!(
                "{}. {} ({})",
                i + 1,
                user.full_name.green().bold(),
                user.email
            );
            for document in user.verification.documents() {
                println!(
                    "   📄 {} — {} ({})",
                    document.kind,
                    document.url,
                    document.uploaded_at.format("%Y-%m-%d %H:%M UTC")
                );
            }
        }

        let choice = CLI::get_input("Select a submission to review (0 to go back):")?;
        let index = match choice.parse::<usize>() {
            Ok(0) => return Ok(()),
            Ok(i) if i <= pending.len() => i - 1,
            _ => {
                CLI::print_error("Invalid selection.");
                return Ok(());
            }
        };
        let subject = &pending[index];

        match self.prompt_decision()? {
            Some((decision, reason)) => {
                let state = self
                    .service
                    .decide_user(admin, &subject.id, decision, reason.as_deref())
                    .await?;
                CLI::print_success(&format!(
                    "{} is now {}",
                    subject.full_name,
                    state.status()
                ));
            }
            None => CLI::print_info("Left for later."),
        }
        Ok(())
    }

    pub async fn review_properties_interactive(&self, admin: &AdminContext) -> Result<()> {
        let pending = self.service.list_pending_properties(admin).await?;
        if pending.is_empty() {
            CLI::print_info("No property verifications waiting for review.");
            return Ok(());
        }

        println!("\n{}", "📄 Pending Property Verifications:".cyan().bold());
        for (i, entry) in pending.iter().enumerate() {
            println!(
                "{}. {} in {} — owner {} ({})",
                i + 1,
                entry.property.title.green().bold(),
                entry.property.city,
                entry.owner.full_name,
                entry.owner.email
            );
            for document in entry.property.verification.documents() {
                println!(
                    "   📄 {} — {} ({})",
                    document.kind,
                    document.url,
                    document.uploaded_at.format("%Y-%m-%d %H:%M UTC")
                );
            }
        }

        let choice = CLI::get_input("Select a submission to review (0 to go back):")?;
        let index = match choice.parse::<usize>() {
            Ok(0) => return Ok(()),
            Ok(i) if i <= pending.len() => i - 1,
            _ => {
                CLI::print_error("Invalid selection.");
                return Ok(());
            }
        };
        let entry = &pending[index];

        match self.prompt_decision()? {
            Some((decision, reason)) => {
                let state = self
                    .service
                    .decide_property(admin, &entry.property.id, decision, reason.as_deref())
                    .await?;
                CLI::print_success(&format!(
                    "'{}' is now {}",
                    entry.property.title,
                    state.status()
                ));
            }
            None => CLI::print_info("Left for later."),
        }
        Ok(())
    }

    fn prompt_decision(&self) -> Result<Option<(ReviewDecision, Option<String>)>> {
        let action = CLI::get_input("[a]pprove, [r]eject or [s]kip?")?;
        match action.to_lowercase().as_str() {
            "a" | "approve" => Ok(Some((ReviewDecision::Approved, None))),
            "r" | "reject" => {
                let reason = loop {
                    let reason = CLI::get_input("Rejection reason:")?;
                    if reason.trim().is_empty() {
                        CLI::print_error("A rejection reason is required.");
                        continue;
                    }
                    break reason;
                };
                Ok(Some((ReviewDecision::Rejected, Some(reason))))
            }
            _ => Ok(None),
        }
    }
}
