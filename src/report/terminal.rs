use std::path::Path;

use owo_colors::OwoColorize;

use crate::report::sheet::Section;

/// Print the success banner and a per-section row count
pub fn render_summary(path: &Path, sections: &[Section]) {
    println!();
    println!(
        "{}  Success! Your report has been generated: {}",
        "✅".bold(),
        path.display().to_string().green()
    );
    println!();

    for section in sections {
        match &section.table {
            Some(table) if table.is_empty() => println!(
                "  {} {} {}",
                "•".bold(),
                section.title.bold(),
                "(no rows)".dimmed()
            ),
            Some(table) => println!(
                "  {} {} ({} rows)",
                "•".bold(),
                section.title.bold(),
                table.len()
            ),
            None => println!(
                "  {} {} {}",
                "•".dimmed(),
                section.title.dimmed(),
                "(empty, skipped)".dimmed()
            ),
        }
    }
    println!();
}

/// Print a red failure line when no report could be produced
pub fn render_failure(message: &str) {
    println!();
    println!("{}  {}", "❌".bold(), message.red());
    println!("   {}", "No report generated.".dimmed());
    println!();
}
