use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_core::WatchedStats;
use popcorn_models::{MovieDetail, SearchResult, WatchedRecord};

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

/// Banner line carrying the current display title
pub fn title_banner(title: &str) -> String {
    format!("\n{} {}\n", "🍿".bright_white(), title.bright_cyan().bold())
}

pub fn results_table(results: &[SearchResult]) -> Table {
    let mut table = styled_table();
    table.set_header(vec![header_cell("#"), header_cell("Title"), header_cell("Year"), header_cell("IMDb ID")]);
    for (i, result) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&result.title),
            Cell::new(&result.year),
            Cell::new(&result.id),
        ]);
    }
    table
}

pub fn detail_table(detail: &MovieDetail) -> Table {
    let mut table = styled_table();
    table.set_header(vec![header_cell(&detail.title), header_cell(&detail.year)]);

    let rating = detail
        .external_rating
        .map(|r| format!("⭐ {:.1} IMDb rating", r))
        .unwrap_or_else(|| "N/A".to_string());

    let rows = [
        ("Released", format!("{} • {}", detail.released, detail.runtime)),
        ("Genre", detail.genre.clone()),
        ("Rating", rating),
        ("Plot", detail.plot.clone()),
        ("Starring", detail.actors.clone()),
        ("Directed by", detail.director.clone()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    table
}

pub fn watched_table(records: &[WatchedRecord]) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        header_cell("Title"),
        header_cell("Year"),
        header_cell("⭐ IMDb"),
        header_cell("🌟 Yours"),
        header_cell("⏳ Runtime"),
        header_cell("IMDb ID"),
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.title),
            Cell::new(&record.year),
            Cell::new(format!("{:.1}", record.external_rating)),
            Cell::new(record.user_rating),
            Cell::new(format!("{} min", record.runtime_minutes)),
            Cell::new(&record.id),
        ]);
    }
    table
}

pub fn stats_line(stats: &WatchedStats) -> String {
    format!(
        "#️⃣ {} movies   ⭐ {:.2}   🌟 {:.2}   ⏳ {:.2} min",
        stats.count, stats.mean_external_rating, stats.mean_user_rating, stats.mean_runtime_minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_line_uses_two_decimals() {
        let stats = WatchedStats {
            count: 2,
            mean_external_rating: 8.45,
            mean_user_rating: 7.5,
            mean_runtime_minutes: 148.0,
        };
        let line = stats_line(&stats);
        assert!(line.contains("2 movies"));
        assert!(line.contains("8.45"));
        assert!(line.contains("7.50"));
        assert!(line.contains("148.00 min"));
    }

    #[test]
    fn test_results_table_has_one_row_per_result() {
        let results = vec![
            SearchResult {
                id: "tt0068646".to_string(),
                title: "The Godfather".to_string(),
                year: "1972".to_string(),
                poster_url: String::new(),
                kind: "movie".to_string(),
            },
            SearchResult {
                id: "tt0071562".to_string(),
                title: "The Godfather Part II".to_string(),
                year: "1974".to_string(),
                poster_url: String::new(),
                kind: "movie".to_string(),
            },
        ];
        let rendered = results_table(&results).to_string();
        assert!(rendered.contains("The Godfather Part II"));
        assert!(rendered.contains("tt0068646"));
    }
}
