//! Implementation of the `skillsync list` command.

use textwrap::Options;

use crate::{
    catalog::Store,
    commands::ColorChoice,
    config::{Config, is_local_source},
    diagnostics::Diagnostics,
    error::Result,
    frontmatter::SkillMetadata,
    palette::{fmt_heading, fmt_muted, fmt_skill_name, fmt_source_name},
    status::{SourceListing, build_listing},
};

/// Width that wrapped descriptions are kept within.
const WRAP_WIDTH: usize = 78;
/// Indent for description and detail lines.
const DETAIL_INDENT: &str = "      ";

/// Execute the list command.
pub async fn run(
    color: ColorChoice,
    verbose: bool,
    config: &Config,
    filter: Option<&str>,
) -> Result<()> {
    let diagnostics = Diagnostics::new(verbose);
    let use_color = color.enabled();
    let store = Store::for_config(config);
    let listing = build_listing(config, &store, filter, &diagnostics);

    println!();
    if listing.sources.is_empty() {
        match filter {
            Some(filter) => println!("No sources match \"{filter}\"."),
            None => println!("No sources configured."),
        }
        println!();
        return Ok(());
    }

    for source in &listing.sources {
        println!("{}", source_header(source, use_color));
        if source.skills.is_empty() {
            println!("  {}", fmt_muted(&empty_label(source), use_color));
        }
        for skill in &source.skills {
            let mut line = format!("  {}", fmt_skill_name(&skill.name, use_color));
            if let Some(declared) = declared_name(&skill.name, &skill.metadata) {
                line.push_str(&fmt_muted(&format!(" ({declared})"), use_color));
            }
            println!("{line}");
            for line in description_lines(&skill.metadata) {
                println!("{}", fmt_muted(&line, use_color));
            }
            if let Some(details) = details_line(&skill.metadata) {
                println!("{DETAIL_INDENT}{}", fmt_muted(&details, use_color));
            }
        }
        println!();
    }

    println!(
        "{}",
        fmt_heading(&format!("Total: {} skills", listing.total), use_color)
    );
    println!();
    Ok(())
}

/// Format a source header line with its count and state.
fn source_header(source: &SourceListing, use_color: bool) -> String {
    let mut header = fmt_source_name(&source.name, use_color);
    if source.fetched {
        header.push_str(&format!(" ({} skills)", source.skills.len()));
    }
    if !source.enabled {
        header.push(' ');
        header.push_str(&fmt_muted("(disabled)", use_color));
    }
    header
}

/// Describe why a source shows no skills.
fn empty_label(source: &SourceListing) -> String {
    if source.fetched {
        "(no skills)".to_string()
    } else if is_local_source(&source.name) {
        "(local, nothing stored)".to_string()
    } else {
        "(not fetched)".to_string()
    }
}

/// Return the declared skill name when it differs from the directory name.
fn declared_name<'a>(dir_name: &str, metadata: &'a SkillMetadata) -> Option<&'a str> {
    metadata
        .name
        .as_deref()
        .filter(|declared| *declared != dir_name)
}

/// Wrap a skill description into indented lines.
fn description_lines(metadata: &SkillMetadata) -> Vec<String> {
    let Some(description) = &metadata.description else {
        return Vec::new();
    };
    let options = Options::new(WRAP_WIDTH)
        .initial_indent(DETAIL_INDENT)
        .subsequent_indent(DETAIL_INDENT);
    textwrap::wrap(description, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Format author and version details, if either is present.
fn details_line(metadata: &SkillMetadata) -> Option<String> {
    let author = metadata.author.as_ref().map(|author| format!("by {author}"));
    let version = metadata.version.as_ref().map(|version| format!("v{version}"));
    match (author, version) {
        (Some(author), Some(version)) => Some(format!("{author}, {version}")),
        (Some(detail), None) | (None, Some(detail)) => Some(detail),
        (None, None) => None,
    }
}
