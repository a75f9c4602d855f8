// Colored terminal output for verdicts and the dashboard session.
//
// This module handles all terminal-specific formatting: colors, the meter
// bar, badges. main.rs delegates here.

use chrono::Utc;
use colored::{ColoredString, Colorize};

use crate::dashboard::session::{DashboardSession, FlaggedItem};
use crate::dashboard::tier::{meter_fill, severity_badge, SafetyTier};
use crate::moderation::types::{HarmType, ModerationIssue, ModerationVerdict, Severity};

/// Cells in the safety meter bar.
const METER_WIDTH: usize = 40;

/// Display a single verdict: meter, message, then each issue in full.
pub fn display_verdict(verdict: &ModerationVerdict) {
    display_meter(verdict.toxicity_score, Some(&verdict.friendly_message));

    if verdict.issues.is_empty() {
        display_all_clear();
        return;
    }

    println!(
        "\n{}",
        format!("=== {} issue(s) found ===", verdict.issues.len()).bold()
    );
    for (i, issue) in verdict.issues.iter().enumerate() {
        println!();
        println!("  {}. {}  {}", i + 1, harm_badge(issue.harm_type), severity_label(issue.severity));
        display_issue_body(issue);
    }
}

/// Display the safety meter for a score.
pub fn display_meter(score: u8, friendly_message: Option<&str>) {
    let tier = SafetyTier::from_score(score);
    println!(
        "\n{}  {}",
        "=== Safety Level ===".bold(),
        colorize_tier(tier, tier.label()).bold()
    );

    let filled = meter_fill(score, METER_WIDTH);
    let bar = format!(
        "{}{}",
        colorize_tier(tier, &"█".repeat(filled)),
        "░".repeat(METER_WIDTH - filled).dimmed()
    );
    println!("  [{bar}] {score}/100");
    println!(
        "  {:<13}{:^14}{:>13}",
        "Safe".green(),
        "Moderate".yellow(),
        "High".red()
    );
    println!("\n  {}", tier.message());
    if let Some(message) = friendly_message {
        println!("  {}", message.italic());
    }
}

/// Display the flagged-item list, newest first.
pub fn display_flagged_list(session: &DashboardSession) {
    let items = session.flagged();
    if items.is_empty() {
        display_all_clear();
        return;
    }

    println!(
        "\n{}",
        format!("=== Detected Content ({} item(s) need your attention) ===", items.len()).bold()
    );
    let now = Utc::now();
    for (i, item) in items.iter().enumerate() {
        let preview = super::truncate_chars(&item.issue.content, 120);
        println!(
            "  {:>3}. {}  {}  {}",
            i + 1,
            harm_badge(item.issue.harm_type),
            severity_label(item.issue.severity),
            super::format_relative(item.captured_at, now).dimmed()
        );
        println!("       {}", preview.dimmed());
    }
    println!(
        "\n  {}",
        "Type :why <number> to see why an item was flagged.".dimmed()
    );
}

/// The "Why was this flagged?" view for one item.
pub fn display_reason(item: &FlaggedItem) {
    let issue = &item.issue;
    println!("\n{}", "=== Why was this flagged? ===".bold());
    println!("  Let's understand together why this content was marked.\n");
    println!("  {}  {}", harm_badge(issue.harm_type), severity_label(issue.severity));
    display_issue_body(issue);
    println!(
        "\n  {} {}",
        "Remember:".green().bold(),
        "Our goal is to help you understand what's safe and keep you protected online. \
         You're doing great by learning about this!"
            .green()
    );
}

/// The support panel shown alongside the dashboard.
pub fn display_support() {
    println!("\n{}", "=== You're Not in Trouble ===".bold());
    println!(
        "  Sometimes online content can be confusing or upsetting. If something makes you\n  \
         uncomfortable, it's okay to stop and talk to a trusted adult. We're here to help you stay safe."
    );
    println!("\n  {}", "What can you do?".bold());
    let steps = [
        "Take a deep breath. It's okay to feel confused or worried.",
        "Don't respond to anything that makes you uncomfortable.",
        "Talk to a trusted adult about what you've seen.",
        "Remember: You can always step away from the screen.",
    ];
    for (i, step) in steps.iter().enumerate() {
        println!("    {}. {}", (i + 1).to_string().cyan().bold(), step);
    }
}

fn display_all_clear() {
    println!("\n  {}", "All Clear!".green().bold());
    println!(
        "  {}",
        "No concerning content has been detected. Keep up the great work staying safe online!"
            .dimmed()
    );
}

fn display_issue_body(issue: &ModerationIssue) {
    println!("     Content: {}", super::truncate_chars(&issue.content, 120).dimmed());
    println!("     Reason:  {}", issue.reason);
    println!("     {}", issue.explanation);
}

fn harm_badge(harm_type: HarmType) -> ColoredString {
    let label = format!("[{}]", harm_type.label());
    match harm_type {
        HarmType::HateSpeech => label.magenta(),
        HarmType::Abuse => label.bright_red(),
        HarmType::SelfHarm => label.blue(),
        HarmType::Explicit => label.red(),
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    colorize_tier(severity_badge(severity), severity.label())
}

/// Colorize text by the tier's color token.
fn colorize_tier(tier: SafetyTier, text: &str) -> ColoredString {
    match tier {
        SafetyTier::Safe => text.green(),
        SafetyTier::Moderate => text.yellow(),
        SafetyTier::High => text.red(),
    }
}
