use super::common;
use crate::Result;
use crate::aggregate::RepoAggregate;
use crate::facets::{Facet, Provenance, format_citation};
use crate::search::Pagination;
use core::fmt::Write;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

const LABEL_WIDTH: usize = 12;

pub fn generate<W: Write>(repos: &[RepoAggregate], pagination: Option<&Pagination>, use_colors: bool, writer: &mut W) -> Result<()> {
    let term_width = get_terminal_width();

    for (index, repo) in repos.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
            writeln!(writer, "═══════════════════════════════════════")?;
            writeln!(writer)?;
        }

        let stars = format!("★ {}", common::format_count(repo.stars));
        if use_colors {
            writeln!(writer, "{}  {}", repo.id.bold(), stars.yellow())?;
        } else {
            writeln!(writer, "{}  {stars}", repo.id)?;
        }

        if let Some(description) = &repo.description {
            for line in wrap_text(description, term_width, 2) {
                writeln!(writer, "  {}", line.trim_start())?;
            }
        }

        let topics = common::format_topics(&repo.topics);
        if !topics.is_empty() {
            if use_colors {
                writeln!(writer, "  {}", topics.cyan())?;
            } else {
                writeln!(writer, "  {topics}")?;
            }
        }

        writeln!(writer)?;

        let license = repo.license.as_ref().map_or("none", |l| l.name.as_str());
        write_field(writer, "License", license, term_width)?;

        write_facet(writer, "Languages", &repo.languages, &common::format_languages(&repo.languages.value), use_colors, term_width)?;

        let contributors = &repo.contributors.value;
        write_facet(writer, "Contributors", &repo.contributors, &common::format_contributor_summary(contributors), use_colors, term_width)?;
        if !contributors.core_dev_details.is_empty() {
            write_field(writer, "  core", &common::format_contributor_details(&contributors.core_dev_details), term_width)?;
        }
        if !contributors.active_volunteer_details.is_empty() {
            write_field(writer, "  active", &common::format_contributor_details(&contributors.active_volunteer_details), term_width)?;
        }

        write_facet(writer, "Activity", &repo.activity, &common::sparkline(&repo.activity.value), use_colors, term_width)?;
        write_facet(writer, "Events", &repo.events, &common::format_events(&repo.events.value), use_colors, term_width)?;

        let resources = common::resource_entries(&repo.resources.value)
            .iter()
            .map(|(label, present)| {
                let mark = if *present { "✔️" } else { "🗙" };
                format!("{mark} {label}")
            })
            .collect::<Vec<_>>()
            .join(", ");
        write_facet(writer, "Resources", &repo.resources, &resources, use_colors, term_width)?;

        if let Some(citation) = &repo.citation {
            write_facet(writer, "Citation", citation, &format_citation(&citation.value), use_colors, term_width)?;
        }
    }

    if let Some(pagination) = pagination
        && !repos.is_empty()
    {
        writeln!(writer)?;
        let text = common::format_pagination(pagination);
        if use_colors {
            writeln!(writer, "{}", text.dimmed())?;
        } else {
            writeln!(writer, "{text}")?;
        }
    }

    Ok(())
}

/// Write a facet line, flagging placeholder values
fn write_facet<W: Write, T>(writer: &mut W, label: &str, facet: &Facet<T>, value: &str, use_colors: bool, term_width: usize) -> Result<()> {
    if facet.provenance != Provenance::Synthetic {
        return write_field(writer, label, value, term_width);
    }

    let marker = "(placeholder)";
    let marked = if use_colors {
        format!("{value} {}", marker.red())
    } else {
        format!("{value} {marker}")
    };

    write_field(writer, label, &marked, term_width)
}

fn write_field<W: Write>(writer: &mut W, label: &str, value: &str, term_width: usize) -> Result<()> {
    // "  " (2) + label + " : " (3)
    let value_indent = 2 + LABEL_WIDTH + 3;
    let wrapped_lines = wrap_text(value, term_width, value_indent);

    if let Some(first_line) = wrapped_lines.first() {
        writeln!(writer, "  {label:<LABEL_WIDTH$} : {first_line}")?;
        for line in wrapped_lines.iter().skip(1) {
            writeln!(writer, "{line}")?;
        }
    }

    Ok(())
}

/// Get the terminal width, defaulting to 80 if not detectable
fn get_terminal_width() -> usize {
    terminal_size().map_or(80, |(Width(w), _)| w as usize)
}

/// Word-wrap text to fit within a given width, with indentation for continuation lines
fn wrap_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    if width <= indent {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut is_first_line = true;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let separator_len = usize::from(!current_line.is_empty());

        // the first line sits behind a label of the same width as the indent
        let line_width = indent + current_line.chars().count();

        if !current_line.is_empty() && line_width + separator_len + word_len > width {
            if is_first_line {
                lines.push(current_line);
                is_first_line = false;
            } else {
                lines.push(format!("{:indent$}{}", "", current_line, indent = indent));
            }
            current_line = word.to_string();
        } else {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        if is_first_line {
            lines.push(current_line);
        } else {
            lines.push(format!("{:indent$}{}", "", current_line, indent = indent));
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
