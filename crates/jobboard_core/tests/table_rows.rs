use jobboard_core::{
    build_rows, paginate, parse_listing_date, project_row, BadgePalette, BadgeStyle, DateOrdering,
    JobRecord, LinkCell, SortColumn, SortDirection, SortOrder,
};
use pretty_assertions::assert_eq;

fn dated(title: &str, last_date: &str) -> JobRecord {
    JobRecord {
        source: "CareerPower".to_string(),
        title: title.to_string(),
        last_date: last_date.to_string(),
        ..JobRecord::default()
    }
}

fn titles(records: &[JobRecord], order: SortOrder, dates: DateOrdering) -> Vec<String> {
    let refs: Vec<&JobRecord> = records.iter().collect();
    build_rows(&refs, &BadgePalette::default(), order, dates)
        .into_iter()
        .map(|row| row.title)
        .collect()
}

#[test]
fn unknown_source_gets_default_badge() {
    let palette = BadgePalette::default();
    assert_eq!(palette.style_for("CareerPower"), BadgeStyle::Primary);
    assert_eq!(palette.style_for("SarkariResult"), BadgeStyle::Warning);
    assert_eq!(palette.style_for("SomewhereElse"), BadgeStyle::Secondary);
}

#[test]
fn missing_or_broken_links_are_disabled() {
    let palette = BadgePalette::default();
    let mut record = dated("Clerk", "2025-01-01");

    assert_eq!(project_row(&record, &palette).link, LinkCell::Disabled);

    record.link = "javascript:alert(1)".to_string();
    assert_eq!(project_row(&record, &palette).link, LinkCell::Disabled);

    record.link = "/relative/path".to_string();
    assert_eq!(project_row(&record, &palette).link, LinkCell::Disabled);

    record.link = "https://example.com/job".to_string();
    assert_eq!(
        project_row(&record, &palette).link,
        LinkCell::Open("https://example.com/job".to_string())
    );
}

#[test]
fn default_sort_is_last_date_descending_as_text() {
    let records = vec![
        dated("first", "2025-01-05"),
        dated("second", "31/12/2024"),
        dated("third", "2025-02-01"),
    ];

    // "31/12/2024" sorts above ISO dates because '3' > '2'.
    assert_eq!(
        titles(&records, SortOrder::default(), DateOrdering::Text),
        vec!["second", "third", "first"]
    );
}

#[test]
fn parsed_date_ordering_compares_calendar_dates() {
    let records = vec![
        dated("first", "2025-01-05"),
        dated("second", "31/12/2024"),
        dated("third", "01 February 2025"),
        dated("unknown", "Soon"),
    ];

    assert_eq!(
        titles(&records, SortOrder::default(), DateOrdering::Parsed),
        vec!["third", "first", "second", "unknown"]
    );
}

#[test]
fn other_columns_sort_ascending_on_request() {
    let records = vec![dated("b", "x"), dated("c", "x"), dated("a", "x")];
    let order = SortOrder {
        column: SortColumn::Title,
        direction: SortDirection::Ascending,
    };

    assert_eq!(titles(&records, order, DateOrdering::Text), vec!["a", "b", "c"]);
}

#[test]
fn pages_are_clamped_and_report_bounds() {
    let records: Vec<JobRecord> = (0..30).map(|i| dated(&format!("job {i:02}"), "x")).collect();
    let refs: Vec<&JobRecord> = records.iter().collect();
    let rows = build_rows(
        &refs,
        &BadgePalette::default(),
        SortOrder::default(),
        DateOrdering::Text,
    );

    let page = paginate(rows.clone(), 1, 25);
    assert_eq!(page.page_count, 2);
    assert_eq!(page.rows.len(), 5);
    assert_eq!((page.start(), page.end(), page.total), (26, 30, 30));

    let clamped = paginate(rows, 9, 25);
    assert_eq!(clamped.page, 1);

    let empty = paginate(Vec::new(), 3, 25);
    assert_eq!((empty.page, empty.page_count, empty.start(), empty.end()), (0, 1, 0, 0));
}

#[test]
fn sort_column_names_parse() {
    assert_eq!("last-date".parse::<SortColumn>(), Ok(SortColumn::LastDate));
    assert_eq!("Qual".parse::<SortColumn>(), Ok(SortColumn::Qualification));
    assert!("salary".parse::<SortColumn>().is_err());
}

#[test]
fn listing_dates_in_common_formats_parse() {
    assert!(parse_listing_date("2025-07-15").is_some());
    assert!(parse_listing_date("15/07/2025").is_some());
    assert!(parse_listing_date("15-07-2025").is_some());
    assert!(parse_listing_date("15 July 2025").is_some());
    assert!(parse_listing_date("N/A").is_none());
}
