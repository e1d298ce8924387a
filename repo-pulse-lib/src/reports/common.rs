//! Formatting helpers shared by the report generators.

use crate::facets::{ContributorBreakdown, EventCounts, LanguageBreakdown, ResourceFlags};
use crate::search::Pagination;

/// Format a count with `,` thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format topics with a # prefix for each item.
///
/// Returns an empty string when there are no topics.
pub fn format_topics(topics: &[String]) -> String {
    topics.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(", ")
}

/// Languages ordered by share, largest first, e.g. "Rust 80%, Shell 20%".
pub fn format_languages(languages: &LanguageBreakdown) -> String {
    if languages.is_empty() {
        return "none detected".to_string();
    }

    let mut entries: Vec<_> = languages.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries.iter().map(|(name, pct)| format!("{name} {pct}%")).collect::<Vec<_>>().join(", ")
}

pub fn format_contributor_summary(contributors: &ContributorBreakdown) -> String {
    format!(
        "{} core, {} active, {} occasional, {} one-time",
        contributors.core_developers, contributors.active_volunteers, contributors.occasional_volunteers, contributors.one_time_contributors
    )
}

/// Format `(login, contributions)` pairs as "login (count)".
pub fn format_contributor_details(details: &[(String, u64)]) -> String {
    details
        .iter()
        .map(|(login, count)| format!("{login} ({})", format_count(*count)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_events(events: &EventCounts) -> String {
    format!("{} coding, {} social", format_count(events.coding_events_total), format_count(events.social_events_total))
}

/// Render monthly activity, oldest month first, as a bar sparkline.
pub fn sparkline(values: &[u64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let max = values.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return values.iter().map(|_| BARS[0]).collect();
    }

    values
        .iter()
        .map(|&v| {
            let index = usize::try_from(v.saturating_mul(7) / max).unwrap_or(7).min(7);
            BARS[index]
        })
        .collect()
}

/// Resource presence as `(label, present)` pairs in display order.
pub const fn resource_entries(flags: &ResourceFlags) -> [(&'static str, bool); 4] {
    [
        ("README", flags.has_readme),
        ("Code of conduct", flags.has_code_of_conduct),
        ("Security policy", flags.has_security_policy),
        ("Citation", flags.has_citation),
    ]
}

pub fn format_pagination(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} per page)",
        pagination.current_page, pagination.total_pages, pagination.items_per_page
    )
}
