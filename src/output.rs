// Colored terminal output for one-shot assessments.
//
// All terminal-specific formatting lives here; main.rs delegates.

use colored::{ColoredString, Colorize};

use crate::models::{ContentAssessment, QualityRating, RiskLevel, Severity};

/// Display a full assessment in the terminal.
pub fn display_assessment(assessment: &ContentAssessment) {
    println!(
        "\n{}",
        format!("=== Assessment for {} ===", assessment.content_id).bold()
    );
    println!("  Type: {}", assessment.content_type);
    println!();

    let quality = &assessment.quality;
    println!(
        "  Overall quality: {:.2}  ({})",
        quality.overall_score,
        colorize_rating(quality.quality_rating)
    );
    println!("    {:<13} {:>5.2}", "engagement", quality.engagement);
    println!("    {:<13} {:>5.2}", "educational", quality.educational);
    println!("    {:<13} {:>5.2}", "creativity", quality.creativity);
    println!("    {:<13} {:>5.2}", "safety", quality.safety);
    println!("    {:<13} {:>5.2}", "production", quality.production);

    if !quality.recommendations.is_empty() {
        println!();
        for recommendation in &quality.recommendations {
            println!("  {} {recommendation}", "-".dimmed());
        }
    }

    println!();
    let fraud = &assessment.fraud;
    println!(
        "  Fraud risk: {}  (confidence {:.2})",
        colorize_risk(fraud.risk_level),
        fraud.confidence_score.min(1.0)
    );
    println!("  Recommended action: {}", fraud.recommended_action.as_str());

    for indicator in &fraud.fraud_indicators {
        let marker = match indicator.severity {
            Severity::High => "!!".red().bold(),
            Severity::Medium => "!".bright_red(),
            Severity::Low => "~".yellow(),
        };
        println!(
            "  {} {} ({:.2}): {}",
            marker, indicator.kind, indicator.score, indicator.description
        );
    }
    if fraud.fraud_indicators.is_empty() {
        println!("  {}", "No fraud indicators fired.".dimmed());
    }
    println!();
}

fn colorize_rating(rating: QualityRating) -> ColoredString {
    match rating {
        QualityRating::Excellent => rating.as_str().green().bold(),
        QualityRating::Good => rating.as_str().green(),
        QualityRating::Fair => rating.as_str().yellow(),
        QualityRating::Poor => rating.as_str().red(),
    }
}

fn colorize_risk(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::High => risk.as_str().red().bold(),
        RiskLevel::Medium => risk.as_str().bright_red(),
        RiskLevel::Low => risk.as_str().yellow(),
        RiskLevel::Minimal => risk.as_str().green(),
    }
}
