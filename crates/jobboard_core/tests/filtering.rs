use jobboard_core::{filter_options, visible, FilterState, JobRecord, Selection, NOT_AVAILABLE};
use pretty_assertions::assert_eq;

fn job(source: &str, title: &str, qualification: &str) -> JobRecord {
    JobRecord {
        source: source.to_string(),
        title: title.to_string(),
        qualification: qualification.to_string(),
        ..JobRecord::default()
    }
}

fn sample() -> Vec<JobRecord> {
    vec![
        job("A", "Junior Engineer", "B.E/ B.Tech"),
        job("B", "Clerk", "12th"),
        job("C", "Driver", NOT_AVAILABLE),
        job("B", "Senior Engineer", "B.E/ B.Tech"),
        job("B", "Peon", "10th"),
    ]
}

#[test]
fn source_filter_keeps_exact_matches() {
    let records = sample();
    let state = FilterState {
        source: Selection::Only("B".to_string()),
        ..FilterState::default()
    };
    let shown = visible(&records, &state);

    assert_eq!(shown.len(), 3);
    assert!(shown.iter().all(|job| job.source == "B"));
}

#[test]
fn source_and_qualification_intersect() {
    let records = sample();
    let state = FilterState {
        source: Selection::Only("B".to_string()),
        qualification: Selection::Only("B.E/ B.Tech".to_string()),
        query: String::new(),
    };
    let titles: Vec<_> = visible(&records, &state)
        .iter()
        .map(|job| job.title.as_str())
        .collect();

    assert_eq!(titles, vec!["Senior Engineer"]);
}

#[test]
fn free_text_search_is_case_insensitive() {
    let records = sample();
    let state = FilterState {
        query: "engineer".to_string(),
        ..FilterState::default()
    };
    let titles: Vec<_> = visible(&records, &state)
        .iter()
        .map(|job| job.title.as_str())
        .collect();

    assert_eq!(titles, vec!["Junior Engineer", "Senior Engineer"]);
}

#[test]
fn search_composes_with_source_filter() {
    let records = sample();
    let state = FilterState {
        source: Selection::Only("A".to_string()),
        query: "ENGINEER".to_string(),
        ..FilterState::default()
    };

    assert_eq!(visible(&records, &state).len(), 1);
}

#[test]
fn search_looks_at_every_displayed_column() {
    let records = sample();
    let state = FilterState {
        query: "12th".to_string(),
        ..FilterState::default()
    };

    assert_eq!(visible(&records, &state)[0].title, "Clerk");
}

#[test]
fn no_filter_shows_everything() {
    let records = sample();
    let state = FilterState::default();

    assert!(!state.is_active());
    assert_eq!(visible(&records, &state).len(), records.len());
}

#[test]
fn options_are_sorted_and_skip_placeholders() {
    let options = filter_options(&sample());

    assert_eq!(options.sources, vec!["A", "B", "C"]);
    assert_eq!(options.qualifications, vec!["10th", "12th", "B.E/ B.Tech"]);
}

#[test]
fn selection_from_choice_treats_all_as_no_filter() {
    assert_eq!(Selection::from_choice(" "), Selection::All);
    assert_eq!(Selection::from_choice("ALL"), Selection::All);
    assert_eq!(
        Selection::from_choice(" SarkariResult "),
        Selection::Only("SarkariResult".to_string())
    );
}
