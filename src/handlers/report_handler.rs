use crate::cli::CLI;
use crate::database::sqlite::{ReportFilter, SqliteDatabase};
use crate::errors::Result;
use crate::models::report::ReportStatus;
use crate::services::jwt::AdminContext;
use crate::services::report_service::ReportService;
use colored::Colorize;
use std::sync::Arc;

pub struct ReportHandler {
    service: ReportService,
}

impl ReportHandler {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self {
            service: ReportService::new(db),
        }
    }

    pub async fn review_reports_interactive(&self, admin: &AdminContext) -> Result<()> {
        let filter = ReportFilter {
            status: Some(ReportStatus::Pending),
            ..Default::default()
        };
        let page = self.service.list_reports(admin, &filter, 1, 20).await?;
        if page.items.is_empty() {
            CLI::print_info("No open reports.");
            return Ok(());
        }

        println!(
            "\n{} ({} open)",
            "🚩 Open Reports:".cyan().bold(),
            page.total_count
        );
        for (i, entry) in page.items.iter().enumerate() {
            let reporter = entry
                .reporter
                .as_ref()
                .map(|r| r.full_name.as_str())
                .unwrap_or("unknown reporter");
            let target = entry.target_label.as_deref().unwrap_or("(target gone)");
            println!(
                "{}. [{}] {} — against {} '{}'",
                i + 1,
                entry.report.reason.to_string().yellow(),
                reporter,
                entry.report.target.model().to_lowercase(),
                target.green()
            );
            println!("   💬 {}", entry.report.message);
            println!(
                "   🗓  {}",
                entry.report.created_at.format("%Y-%m-%d %H:%M UTC")
            );
        }

        let choice = CLI::get_input("Select a report to close (0 to go back):")?;
        let index = match choice.parse::<usize>() {
            Ok(0) => return Ok(()),
            Ok(i) if i <= page.items.len() => i - 1,
            _ => {
                CLI::print_error("Invalid selection.");
                return Ok(());
            }
        };
        let entry = &page.items[index];

        let action = CLI::get_input("[r]esolve, [d]ismiss or [s]kip?")?;
        let status = match action.to_lowercase().as_str() {
            "r" | "resolve" => ReportStatus::Resolved,
            "d" | "dismiss" => ReportStatus::Dismissed,
            _ => {
                CLI::print_info("Left open.");
                return Ok(());
            }
        };

        let report = self
            .service
            .update_status(admin, &entry.report.id, status)
            .await?;
        CLI::print_success(&format!("Report {}", report.status()));
        if status == ReportStatus::Resolved {
            CLI::print_info(
                "Blocking the reported account is a separate action in the user directory.",
            );
        }
        Ok(())
    }
}
