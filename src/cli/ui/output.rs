//! Terminal rendering of a finished job

use colored::Colorize;
use contentful_duplicate::duplicate::{DuplicationReport, RootOutcome, RootStatus};

fn root_line(root: &RootOutcome) -> String {
    let name = root.name.as_deref().unwrap_or("(untitled)");
    let duplicate = root.duplicate_id.as_deref().unwrap_or("?");
    let state = if root.published { "published" } else { "draft" };

    match root.status {
        RootStatus::Duplicated => format!(
            "{} Duplicated entry {} → {} - {} {}",
            "✓".green(),
            root.original_id,
            duplicate.cyan(),
            name,
            format!("[{}]", state).dimmed()
        ),
        RootStatus::AlreadyDuplicated => format!(
            "{} Entry {} was already duplicated earlier in this job → {} - {}",
            "•".blue(),
            root.original_id,
            duplicate.cyan(),
            name
        ),
        RootStatus::Excluded => format!("{} Entry {} is excluded, skipped", "○".dimmed(), root.original_id),
    }
}

pub fn print_report(report: &DuplicationReport, show_mapping: bool) {
    println!();
    for root in &report.roots {
        println!("{}", root_line(root));
    }

    let stats = &report.stats;
    println!();
    println!(
        "{} entries created ({} published, {} draft), {} loop references patched",
        stats.created.to_string().bold(),
        stats.published,
        stats.drafts,
        stats.loop_references_patched
    );

    if show_mapping && !report.id_map.is_empty() {
        println!();
        println!("{}", "ID mapping:".bold());
        for (original, duplicate) in &report.id_map {
            println!("  {} → {}", original, duplicate);
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("{}", format!("{} warning(s):", report.warnings.len()).yellow().bold());
        for warning in &report.warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }
    }

    if !report.unresolved.is_empty() {
        println!();
        println!(
            "{}",
            "Some duplicates still reference original entries; review them before publishing.".red()
        );
    }
}
