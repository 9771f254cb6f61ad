use askama::Template;
use jobboard_core::{AppViewModel, LinkCell, TableRow};

pub const DEFAULT_PAGE_FILE: &str = "index.html";

#[derive(Template)]
#[template(path = "board.html")]
struct BoardPage<'a> {
    has_stats: bool,
    total_jobs: usize,
    source_count: usize,
    updated_relative: &'a str,
    updated_absolute: &'a str,
    notice: &'a str,
    rows: Vec<RowCells<'a>>,
    generated_at: &'a str,
}

/// One table row as the template sees it. An empty `link_url` means no link.
struct RowCells<'a> {
    badge: &'static str,
    source: &'a str,
    title: &'a str,
    posts: &'a str,
    qualification: &'a str,
    last_date: &'a str,
    link_url: &'a str,
    link_label: &'static str,
}

impl<'a> RowCells<'a> {
    fn new(row: &'a TableRow) -> Self {
        let link_url = match &row.link {
            LinkCell::Open(url) => url.as_str(),
            LinkCell::Disabled => "",
        };
        Self {
            badge: row.badge.css_class(),
            source: &row.source,
            title: &row.title,
            posts: &row.posts,
            qualification: &row.qualification,
            last_date: &row.last_date,
            link_url,
            link_label: row.link.label(),
        }
    }
}

/// Standalone page listing `rows` under the board's stats.
pub fn render_page(
    view: &AppViewModel,
    rows: &[TableRow],
    generated_at: &str,
) -> Result<String, askama::Error> {
    let stats = view.stats.as_ref();
    let page = BoardPage {
        has_stats: stats.is_some(),
        total_jobs: stats.map_or(0, |stats| stats.total_jobs),
        source_count: stats.map_or(0, |stats| stats.distinct_source_count),
        updated_relative: stats
            .and_then(|stats| stats.last_update_relative.as_deref())
            .unwrap_or("unknown"),
        updated_absolute: stats
            .and_then(|stats| stats.last_update_absolute.as_deref())
            .unwrap_or(""),
        notice: view.notice.as_ref().map_or("", |notice| notice.text.as_str()),
        rows: rows.iter().map(RowCells::new).collect(),
        generated_at,
    };
    page.render()
}
