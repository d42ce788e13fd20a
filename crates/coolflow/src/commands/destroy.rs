use crate::context::AppContext;
use crate::prompt::StdinConfirm;
use crate::utils::colored_status;
use colored::Colorize;
use coolflow_client::Project;
use coolflow_core::{
    ActionResult, BatchItem, DestroyObserver, DestroyOptions, DestroyOutcome, DestroyPlan,
    Destroyer, PollOutcome, ResourceKind,
};
use std::time::Duration;

/// Prints destroy progress as it happens
struct ConsoleObserver;

impl DestroyObserver for ConsoleObserver {
    fn on_plan(&self, plan: &DestroyPlan) {
        println!(
            "{}",
            format!("Project: {} ({})", plan.project.name, plan.project.uuid).bold()
        );
        if plan.is_empty() {
            println!("  (no resources)");
            return;
        }
        for app in &plan.applications {
            println!(
                "  • application {} [{}]",
                app.name.cyan(),
                colored_status(app.status_str())
            );
        }
        for db in &plan.databases {
            println!(
                "  • database    {} [{}]",
                db.name.cyan(),
                colored_status(db.status_str())
            );
        }
        for service in &plan.services {
            println!("  • service     {}", service.name.cyan());
        }
        println!();
    }

    fn on_stop(&self, kind: ResourceKind, name: &str, result: &ActionResult) {
        match result {
            Ok(()) => println!("  ■ stopped {} {}", kind, name),
            Err(e) => println!("  ⚠ could not stop {} {}: {}", kind, name, e),
        }
    }

    fn on_grace_period(&self, period: Duration) {
        println!(
            "{}",
            format!("Waiting {}s for containers to stop...", period.as_secs()).dimmed()
        );
    }

    fn on_delete(&self, item: &BatchItem) {
        match &item.result {
            Ok(()) => println!("  ✓ deleted {} {}", item.kind, item.name),
            Err(e) => println!("  {} {} {}: {}", "✗".red(), item.kind, item.name, e),
        }
    }

    fn on_poll(&self, attempt: u32, remaining: usize) {
        if remaining > 0 {
            println!(
                "{}",
                format!("  … {} resource(s) still listed (check {})", remaining, attempt).dimmed()
            );
        }
    }

    fn on_project_deleted(&self, project: &Project) {
        println!("  ✓ deleted project {}", project.name);
    }
}

pub async fn handle(ctx: &AppContext, project: Option<String>, force: bool) -> anyhow::Result<()> {
    let project_uuid = match project {
        Some(uuid) => uuid,
        None => ctx.settings.require_project()?.to_string(),
    };

    let options = DestroyOptions {
        force,
        ..Default::default()
    };
    let outcome = Destroyer::new(&ctx.client, options)
        .run(&project_uuid, &StdinConfirm, &ConsoleObserver)
        .await?;

    let report = match outcome {
        DestroyOutcome::Cancelled => {
            println!("{}", "Destroy cancelled, nothing was changed".yellow());
            return Ok(());
        }
        DestroyOutcome::Destroyed(report) => report,
    };

    println!();
    println!("{}", "✓ Project destroyed".green().bold());
    println!("  Applications deleted: {}", report.deleted_applications);
    println!("  Databases deleted: {}", report.deleted_databases);
    println!("  Services deleted: {}", report.deleted_services);
    if let Some(PollOutcome::Exhausted { attempts }) = report.poll {
        println!(
            "  ⚠ Coolify still listed deleted resources after {} checks",
            attempts
        );
    }
    if !report.failures.is_empty() {
        println!("{}", format!("  ⚠ {} delete(s) failed:", report.failures.len()).yellow());
        for item in &report.failures {
            if let Err(e) = &item.result {
                println!("    - {} {} ({}): {}", item.kind, item.name, item.uuid, e);
            }
        }
    }
    Ok(())
}
