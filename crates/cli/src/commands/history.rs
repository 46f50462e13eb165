//! `stylecraft history`: List stored transformations.

use std::path::Path;

use stylecraft_core::{HistoryEntry, HistoryPage};

/// Characters of each text shown per line.
const PREVIEW_CHARS: usize = 60;

pub async fn run(
    config_path: Option<&Path>,
    limit: usize,
    offset: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let orchestrator = super::build_orchestrator(&config).await?;

    let page = orchestrator.history(limit, offset).await?;

    println!("{}", heading(&page));
    for entry in &page.entries {
        println!("{}", format_entry(entry));
    }

    Ok(())
}

fn heading(page: &HistoryPage) -> String {
    match (page.entries.len(), page.total) {
        (_, 0) => "No transformations stored yet.".to_string(),
        (0, total) => format!(
            "No transformations at offset {} ({total} stored).",
            page.offset
        ),
        (shown, total) => format!(
            "Showing {}-{} of {total}\n",
            page.offset.saturating_add(1),
            page.offset.saturating_add(shown)
        ),
    }
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    }
}

fn format_entry(entry: &HistoryEntry) -> String {
    format!(
        "{}  [{}]  {}\n    in:  {}\n    out: {}\n",
        entry.created_at.format("%Y-%m-%d %H:%M:%S"),
        entry.style,
        entry.id,
        preview(&entry.original_query),
        preview(&entry.response_text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stylecraft_core::{RecordId, Style};

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("two\nlines"), "two lines");
        let long = "word ".repeat(40);
        let shown = preview(&long);
        assert!(shown.ends_with('…'));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 1);
    }

    fn entry() -> HistoryEntry {
        HistoryEntry {
            id: RecordId::from("abc"),
            sequence: 1,
            original_query: "please send me the report".into(),
            style: Style::Formal,
            response_text: "Please send me the report at your earliest convenience.".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        }
    }

    fn page(entries: Vec<HistoryEntry>, total: usize, offset: usize) -> HistoryPage {
        HistoryPage {
            entries,
            total,
            limit: 10,
            offset,
        }
    }

    #[test]
    fn heading_for_empty_store() {
        assert_eq!(heading(&page(vec![], 0, 0)), "No transformations stored yet.");
    }

    #[test]
    fn heading_for_page_past_the_end() {
        assert_eq!(
            heading(&page(vec![], 3, 10)),
            "No transformations at offset 10 (3 stored)."
        );
    }

    #[test]
    fn heading_counts_shown_range() {
        assert_eq!(heading(&page(vec![entry()], 5, 2)), "Showing 3-3 of 5\n");
        let far = heading(&page(vec![entry()], 1, usize::MAX));
        assert!(far.starts_with(&format!("Showing {}-{}", usize::MAX, usize::MAX)));
    }

    #[test]
    fn entry_format() {
        let text = format_entry(&entry());
        assert!(text.starts_with("2024-05-01 09:30:00  [formal]  abc"));
        assert!(text.contains("in:  please send me the report"));
    }
}
