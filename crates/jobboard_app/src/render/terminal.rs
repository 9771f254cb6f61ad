use std::fmt::Write;

use jobboard_core::{
    AppViewModel, FilterOptions, LinkCell, LoadStatus, NoticeSeverity, RefreshView, SortDirection,
    TablePage, TableRow,
};

const SOURCE_WIDTH: usize = 20;
const TITLE_WIDTH: usize = 44;
const POSTS_WIDTH: usize = 8;
const QUALIFICATION_WIDTH: usize = 22;
const DATE_WIDTH: usize = 12;
const LINK_WIDTH: usize = 40;

/// Full board: stats header, notice, refresh status and one table page.
pub fn render_board(view: &AppViewModel) -> String {
    let mut out = String::new();
    out.push_str(&render_stats(view));

    if let Some(notice) = &view.notice {
        let marker = match notice.severity {
            NoticeSeverity::Info => "i",
            NoticeSeverity::Warning => "!",
            NoticeSeverity::Error => "x",
        };
        let _ = writeln!(out, "[{marker}] {}", notice.text);
    }
    if let Some(status) = render_refresh(&view.refresh) {
        let _ = writeln!(out, "{status}");
    }

    match &view.load {
        LoadStatus::NotStarted | LoadStatus::Loading => {
            out.push_str("Loading jobs...\n");
            return out;
        }
        LoadStatus::Failed(_) => return out,
        LoadStatus::Ready => {}
    }

    if view.filter.is_active() {
        let _ = writeln!(
            out,
            "Filters: source={} qualification={} search={:?}",
            view.filter.source.label(),
            view.filter.qualification.label(),
            view.filter.query
        );
    }
    let arrow = match view.sort.direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    };
    let _ = writeln!(out, "Sorted by {} ({arrow})", view.sort.column);
    out.push('\n');
    out.push_str(&render_table(&view.table));
    out
}

pub fn render_stats(view: &AppViewModel) -> String {
    let Some(stats) = &view.stats else {
        return String::new();
    };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total jobs: {}  |  Sources: {}",
        format_with_commas(stats.total_jobs as u64),
        stats.distinct_source_count
    );
    match (&stats.last_update_relative, &stats.last_update_absolute) {
        (Some(relative), Some(absolute)) => {
            let _ = writeln!(out, "Last updated: {relative} ({absolute})");
        }
        _ => out.push_str("Last updated: unknown\n"),
    }
    out
}

pub fn render_refresh(refresh: &RefreshView) -> Option<String> {
    let status = refresh.status.as_ref()?;
    if refresh.phase.is_in_flight() {
        Some(format!("Refresh [{:>3}%] {status}", refresh.progress_percent))
    } else {
        Some(format!("Refresh: {status}"))
    }
}

pub fn render_table(page: &TablePage) -> String {
    let mut out = String::new();
    if page.total == 0 {
        out.push_str("No matching jobs.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<SOURCE_WIDTH$} {:<TITLE_WIDTH$} {:<POSTS_WIDTH$} {:<QUALIFICATION_WIDTH$} {:<DATE_WIDTH$} Link",
        "Source", "Title", "Posts", "Qualification", "Last Date"
    );
    let rule_width =
        SOURCE_WIDTH + TITLE_WIDTH + POSTS_WIDTH + QUALIFICATION_WIDTH + DATE_WIDTH + 5 + LINK_WIDTH;
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');

    for row in &page.rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "\nShowing {} to {} of {} entries (page {} of {})",
        format_with_commas(page.start() as u64),
        format_with_commas(page.end() as u64),
        format_with_commas(page.total as u64),
        page.page + 1,
        page.page_count.max(1)
    );
    out
}

fn render_row(row: &TableRow) -> String {
    let link = match &row.link {
        LinkCell::Open(url) => truncate(url, LINK_WIDTH),
        LinkCell::Disabled => row.link.label().to_string(),
    };
    format!(
        "{:<SOURCE_WIDTH$} {:<TITLE_WIDTH$} {:<POSTS_WIDTH$} {:<QUALIFICATION_WIDTH$} {:<DATE_WIDTH$} {link}",
        truncate(&row.source, SOURCE_WIDTH),
        truncate(&row.title, TITLE_WIDTH),
        truncate(&row.posts, POSTS_WIDTH),
        truncate(&row.qualification, QUALIFICATION_WIDTH),
        truncate(&row.last_date, DATE_WIDTH),
    )
}

pub fn render_options(options: &FilterOptions) -> String {
    let mut out = String::from("Sources:\n");
    for source in &options.sources {
        let _ = writeln!(out, "  {source}");
    }
    out.push_str("Qualifications:\n");
    for qualification in &options.qualifications {
        let _ = writeln!(out, "  {qualification}");
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use jobboard_core::{
        paginate, project_row, AppViewModel, BadgePalette, FilterOptions, JobRecord, LoadStatus,
        RefreshPhase, RefreshView, Stats,
    };

    use super::{format_with_commas, render_board, render_options, render_refresh, truncate};

    fn record(title: &str, link: &str) -> JobRecord {
        JobRecord {
            source: "CareerPower".to_string(),
            title: title.to_string(),
            link: link.to_string(),
            ..JobRecord::default()
        }
    }

    fn ready_view(records: &[JobRecord]) -> AppViewModel {
        let palette = BadgePalette::default();
        let rows = records.iter().map(|r| project_row(r, &palette)).collect();
        AppViewModel {
            load: LoadStatus::Ready,
            stats: Some(Stats {
                total_jobs: 1234,
                distinct_source_count: 3,
                last_update_relative: Some("2h ago".to_string()),
                last_update_absolute: Some("2025-06-01 10:00:00 UTC".to_string()),
            }),
            table: paginate(rows, 0, 25),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn board_shows_stats_rows_and_footer() {
        let view = ready_view(&[
            record("Clerk", "https://example.com/clerk"),
            record("Driver", "N/A"),
        ]);
        let text = render_board(&view);

        assert!(text.contains("Total jobs: 1,234  |  Sources: 3"));
        assert!(text.contains("Last updated: 2h ago (2025-06-01 10:00:00 UTC)"));
        assert!(text.contains("https://example.com/clerk"));
        let driver = text.lines().find(|line| line.contains("Driver")).unwrap();
        assert!(driver.ends_with("N/A"));
        assert!(text.contains("Showing 1 to 2 of 2 entries (page 1 of 1)"));
    }

    #[test]
    fn failed_load_has_no_table() {
        let view = AppViewModel {
            load: LoadStatus::Failed(jobboard_core::BoardError::EmptyResult),
            ..AppViewModel::default()
        };
        let text = render_board(&view);
        assert!(!text.contains("Showing"));
        assert!(!text.contains("Total jobs"));
    }

    #[test]
    fn empty_filter_result_is_announced() {
        let view = ready_view(&[]);
        assert!(render_board(&view).contains("No matching jobs."));
    }

    #[test]
    fn refresh_status_includes_progress_while_running() {
        let running = RefreshView::from_phase(&RefreshPhase::Waiting {
            step: 1,
            total_steps: 4,
            label: "Scraping job sources".to_string(),
        });
        assert_eq!(
            render_refresh(&running).as_deref(),
            Some("Refresh [ 25%] Scraping job sources (2/4)")
        );
        assert_eq!(render_refresh(&RefreshView::from_phase(&RefreshPhase::Idle)), None);
    }

    #[test]
    fn options_are_listed_in_order() {
        let options = FilterOptions {
            sources: vec!["AllGovtJobs".to_string(), "CareerPower".to_string()],
            qualifications: vec!["Graduate".to_string()],
        };
        assert_eq!(
            render_options(&options),
            "Sources:\n  AllGovtJobs\n  CareerPower\nQualifications:\n  Graduate\n"
        );
    }

    #[test]
    fn helpers_truncate_and_group_digits() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("short", 6), "short");
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(1_234_567), "1,234,567");
    }
}
