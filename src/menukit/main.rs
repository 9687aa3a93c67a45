use clap::Parser;
use colored::*;
use menukit::config::{self, EditorConfig};
use menukit::error::{MenuError, Result};
use menukit::links::{incoming_links, LinkFilter};
use menukit::model::{Button, Document, Section, SectionPatch};
use menukit::search::filter_by_name;
use menukit::workspace::{BackupStatus, DirtyResolution, SaveReport, Workspace};
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = config::config_dir()?;
    let config = EditorConfig::load(&config_dir)?;

    // --file wins over the configured default document.
    let document = cli.file.clone().or_else(|| config.document_path.clone());

    match cli.command {
        Some(Commands::List { search }) => handle_list(&require(document)?, &config, search),
        Some(Commands::Show { name }) => handle_show(&require(document)?, &config, &name),
        Some(Commands::Links { name, include_nav }) => {
            handle_links(&require(document)?, &config, &name, include_nav)
        }
        Some(Commands::Add { name, text, attach }) => {
            handle_add(&require(document)?, name, text, attach)
        }
        Some(Commands::Remove { name }) => handle_remove(&require(document)?, &name),
        Some(Commands::Rename { old, new }) => handle_rename(&require(document)?, &old, &new),
        Some(Commands::SetText { name, text }) => {
            handle_set_text(&require(document)?, &name, text)
        }
        Some(Commands::SetFile { name, attachment }) => {
            handle_set_file(&require(document)?, &name, attachment)
        }
        Some(Commands::ClearFile { name }) => handle_clear_file(&require(document)?, &name),
        Some(Commands::Config { key, value }) => handle_config(&config_dir, config, key, value),
        None => handle_list(&require(document)?, &config, None),
    }
}

fn require(document: Option<PathBuf>) -> Result<PathBuf> {
    document.ok_or(MenuError::NoPath)
}

fn open_workspace(path: &Path) -> Result<Workspace> {
    let mut ws = Workspace::new();
    ws.open(path, DirtyResolution::Discard)?;
    Ok(ws)
}

// Mutating commands may target a file that does not exist yet; they start
// from an empty document and create it on save.
fn open_or_create(path: &Path) -> Result<Workspace> {
    let mut ws = Workspace::new();
    if path.exists() {
        ws.open(path, DirtyResolution::Discard)?;
    }
    Ok(ws)
}

fn handle_list(path: &Path, config: &EditorConfig, search: Option<String>) -> Result<()> {
    let ws = open_workspace(path)?;
    let doc = ws.document();

    let sections: Vec<&Section> = match &search {
        Some(term) => filter_by_name(doc, term),
        None => doc.sections().iter().collect(),
    };
    let filter = config.link_filter();

    print_sections(&sections, doc, &filter);
    Ok(())
}

fn handle_show(path: &Path, config: &EditorConfig, name: &str) -> Result<()> {
    let ws = open_workspace(path)?;
    let doc = ws.document();
    let section = doc
        .find_by_name(name)
        .ok_or_else(|| MenuError::SectionNotFound(name.to_string()))?;

    println!("{}", section.name.bold());
    println!("--------------------------------");
    if !section.text.is_empty() {
        println!("{}", section.text);
    }
    if let Some(file) = &section.file {
        println!("\n{} {}", "file:".dimmed(), file);
    }
    if !section.keyboard.is_empty() {
        println!("\n{}", "keyboard:".dimmed());
        for group in &section.keyboard {
            let row: Vec<String> = group.buttons.iter().map(format_button).collect();
            println!("  {}", row.join(" "));
        }
    }

    let sources = incoming_links(doc, name, &config.link_filter());
    if sources.is_empty() {
        println!("\n{}", "No sections link here.".dimmed());
    } else {
        println!("\n{} {}", "linked from:".dimmed(), sources.join(", "));
    }
    Ok(())
}

fn handle_links(path: &Path, config: &EditorConfig, name: &str, include_nav: bool) -> Result<()> {
    let ws = open_workspace(path)?;
    let filter = if include_nav {
        LinkFilter::none()
    } else {
        config.link_filter()
    };

    let sources = incoming_links(ws.document(), name, &filter);
    if sources.is_empty() {
        println!("No sections link to \"{}\".", name);
    } else {
        for source in sources {
            println!("{}", source);
        }
    }
    Ok(())
}

fn handle_add(
    path: &Path,
    name: String,
    text: Option<String>,
    file: Option<String>,
) -> Result<()> {
    let mut ws = open_or_create(path)?;

    let mut section = Section::new(name.clone());
    section.text = text.unwrap_or_default();
    section.file = file;
    ws.add_section(section)?;

    let report = ws.save_as(path)?;
    println!("{}", format!("Added section \"{}\".", name).green());
    report_save(&report);
    Ok(())
}

fn handle_remove(path: &Path, name: &str) -> Result<()> {
    let mut ws = open_workspace(path)?;
    ws.remove_section(name)?;

    // Anything still pointing at the removed name now dangles; say so.
    let still_linking = incoming_links(ws.document(), name, &LinkFilter::none());

    let report = ws.save_as(path)?;
    println!("{}", format!("Removed section \"{}\".", name).green());
    if !still_linking.is_empty() {
        println!(
            "{}",
            format!(
                "Warning: \"{}\" is still linked from {}.",
                name,
                still_linking.join(", ")
            )
            .yellow()
        );
    }
    report_save(&report);
    Ok(())
}

fn handle_rename(path: &Path, old: &str, new: &str) -> Result<()> {
    let mut ws = open_workspace(path)?;
    ws.rename_section(old, new)?;

    let stale = incoming_links(ws.document(), old, &LinkFilter::none());

    let report = ws.save_as(path)?;
    println!(
        "{}",
        format!("Renamed section \"{}\" to \"{}\".", old, new).green()
    );
    if !stale.is_empty() {
        println!(
            "{}",
            format!(
                "Warning: links to \"{}\" from {} now dangle.",
                old,
                stale.join(", ")
            )
            .yellow()
        );
    }
    report_save(&report);
    Ok(())
}

fn handle_set_text(path: &Path, name: &str, text: String) -> Result<()> {
    let mut ws = open_workspace(path)?;
    ws.update_section(name, SectionPatch::new().text(text))?;

    let report = ws.save_as(path)?;
    println!("{}", format!("Updated text of \"{}\".", name).green());
    report_save(&report);
    Ok(())
}

fn handle_set_file(path: &Path, name: &str, file: String) -> Result<()> {
    let mut ws = open_workspace(path)?;
    ws.update_section(name, SectionPatch::new().file(file.clone()))?;

    let report = ws.save_as(path)?;
    println!(
        "{}",
        format!("Attached \"{}\" to \"{}\".", file, name).green()
    );
    report_save(&report);
    Ok(())
}

fn handle_clear_file(path: &Path, name: &str) -> Result<()> {
    let mut ws = open_workspace(path)?;
    ws.update_section(name, SectionPatch::new().clear_file())?;

    let report = ws.save_as(path)?;
    println!("{}", format!("Detached file from \"{}\".", name).green());
    report_save(&report);
    Ok(())
}

fn handle_config(
    config_dir: &Path,
    mut config: EditorConfig,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    match (key.as_deref(), value) {
        (None, _) => {
            println!("document-path = {}", display_path(&config.document_path));
            println!(
                "remote-path = {}",
                config.remote_path.as_deref().unwrap_or("(unset)")
            );
            println!("nav-labels = {}", config.nav_labels.join(","));
        }
        (Some("document-path"), None) => {
            println!("document-path = {}", display_path(&config.document_path));
        }
        (Some("document-path"), Some(v)) => {
            config.document_path = Some(PathBuf::from(v));
            config.save(config_dir)?;
            println!("{}", "Set document-path.".green());
        }
        (Some("remote-path"), None) => {
            println!(
                "remote-path = {}",
                config.remote_path.as_deref().unwrap_or("(unset)")
            );
        }
        (Some("remote-path"), Some(v)) => {
            config.remote_path = Some(v);
            config.save(config_dir)?;
            println!("{}", "Set remote-path.".green());
        }
        (Some("nav-labels"), None) => {
            println!("nav-labels = {}", config.nav_labels.join(","));
        }
        (Some("nav-labels"), Some(v)) => {
            config.nav_labels = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            config.save(config_dir)?;
            println!("{}", "Set nav-labels.".green());
        }
        (Some(other), _) => {
            println!("Unknown config key: {}", other);
        }
    }
    Ok(())
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unset)".to_string())
}

fn report_save(report: &SaveReport) {
    if let BackupStatus::Failed(reason) = &report.backup {
        println!(
            "{}",
            format!("Warning: could not back up the previous file: {}", reason).yellow()
        );
    }
}

fn format_button(button: &Button) -> String {
    match button.target() {
        Some(target) => format!("[{} -> {}]", button.text, target),
        None => format!("[{}]", button.text),
    }
}

const LINE_WIDTH: usize = 100;
const SUMMARY_WIDTH: usize = 10;
const ATTACH_MARKER: &str = "📎";

fn print_sections(sections: &[&Section], doc: &Document, filter: &LinkFilter) {
    if sections.is_empty() {
        println!("No sections found.");
        return;
    }

    for (i, section) in sections.iter().enumerate() {
        let idx_str = format!("{}. ", i + 1);

        let preview: String = section
            .text
            .chars()
            .take(50)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let name_preview = if preview.is_empty() {
            section.name.clone()
        } else {
            format!("{} {}", section.name, preview)
        };

        let marker = if section.file.is_some() {
            format!("{} ", ATTACH_MARKER)
        } else {
            "  ".to_string()
        };

        let incoming = incoming_links(doc, &section.name, filter).len();
        let buttons = section.buttons().count();
        let summary = match (buttons, incoming) {
            (0, 0) => String::new(),
            (b, 0) => format!("{} btn", b),
            (0, l) => format!("<-{}", l),
            (b, l) => format!("{} btn <-{}", b, l),
        };

        let fixed_width = idx_str.width() + marker.width() + SUMMARY_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);

        let display = truncate_to_width(&name_preview, available);
        let padding = available.saturating_sub(display.width());

        println!(
            "{}{}{}{}{}",
            idx_str,
            display,
            " ".repeat(padding),
            marker,
            format!("{:>width$}", summary, width = SUMMARY_WIDTH).dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
