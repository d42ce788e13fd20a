use crate::context::AppContext;
use colored::Colorize;
use coolflow_core::PollPolicy;
use std::cell::RefCell;

pub async fn handle(
    ctx: &AppContext,
    uuid: Option<String>,
    lines: usize,
    follow: bool,
) -> anyhow::Result<()> {
    let app_uuid = ctx.application_uuid(uuid).await?;
    let logs = ctx.client.applications().logs(&app_uuid, lines).await?;
    let initial = split_lines(&logs);
    for line in &initial {
        println!("{}", line);
    }

    if !follow {
        return Ok(());
    }

    println!("{}", "Following logs (Ctrl+C to stop)...".dimmed());
    let fresh = ctx.client.fresh();
    let seen = RefCell::new(initial);
    let (client, seen_ref, app_uuid) = (&fresh, &seen, app_uuid.as_str());

    PollPolicy::log_follow()
        .run(move |_| async move {
            match client.applications().logs(app_uuid, lines).await {
                Ok(text) => {
                    let current = split_lines(&text);
                    for line in new_lines(&seen_ref.borrow(), &current) {
                        println!("{}", line);
                    }
                    *seen_ref.borrow_mut() = current;
                }
                Err(e) => tracing::warn!("Failed to fetch logs: {}", e),
            }
            false
        })
        .await;
    Ok(())
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Lines of `current` after the overlap with the tail of `previous`
fn new_lines<'a>(previous: &[String], current: &'a [String]) -> &'a [String] {
    if previous.is_empty() {
        return current;
    }

    // longest suffix of `previous` that is a prefix of `current`
    let max = previous.len().min(current.len());
    for overlap in (1..=max).rev() {
        if previous[previous.len() - overlap..] == current[..overlap] {
            return &current[overlap..];
        }
    }
    current
}
