use super::*;
use crate::resource::Resource;

const SAMPLE: &str = "\
week,page,page_title,title,url
1,1,Greetings,Hello,/audio/1/1/hello.mp3
1,1,Greetings (dup label),Goodbye,/audio/1/1/goodbye.mp3
1,2,Numbers,One to ten,/audio/1/2/numbers.mp3
2,1,Food,Breakfast,/audio/2/1/breakfast.mp3
1,1,Greetings,Thanks,/audio/1/1/thanks.mp3
";

fn rows() -> Vec<DatasetRow> {
    parse_csv(SAMPLE).unwrap().rows
}

#[test]
fn tracks_for_keeps_dataset_order() {
    let tracks = tracks_for(&rows(), "1", "1");
    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Hello", "Goodbye", "Thanks"]);
}

#[test]
fn pages_for_uses_first_seen_label() {
    let pages = pages_for(&rows(), "1");
    assert_eq!(
        pages,
        vec![
            PageEntry {
                number: 1,
                label: "Greetings".into()
            },
            PageEntry {
                number: 2,
                label: "Numbers".into()
            },
        ]
    );
}

#[test]
fn pages_for_skips_non_numeric_pages() {
    let data = parse_csv("week,page,page_title,title,url\n1,intro,Intro,A,a.mp3\n1,2,Two,B,b.mp3\n")
        .unwrap();
    let pages = pages_for(&data.rows, "1");
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].number, 2);
}

#[test]
fn groups_are_distinct_in_first_seen_order() {
    assert_eq!(groups(&rows()), vec!["1".to_string(), "2".to_string()]);
}

#[test]
fn builders_tolerate_an_empty_dataset() {
    let empty = Dataset::default();
    assert!(tracks_for(&empty.rows, "1", "1").is_empty());
    assert!(pages_for(&empty.rows, "1").is_empty());
    assert!(groups(&empty.rows).is_empty());
}

#[test]
fn unknown_selection_yields_no_tracks() {
    assert!(tracks_for(&rows(), "9", "1").is_empty());
    assert!(tracks_for(&rows(), "1", "9").is_empty());
}

#[test]
fn track_identity_is_its_url() {
    let a = Track::new("A", "x.mp3");
    let b = Track::new("B", "x.mp3");
    let c = Track::new("A", "y.mp3");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn parse_accepts_generic_column_names() {
    let data = parse_csv(
        "group,subgroup,subgroup_title,track_title,track_url\n3,1,Intro,Welcome,w.mp3\n",
    )
    .unwrap();
    assert_eq!(data.rows.len(), 1);
    assert_eq!(data.rows[0].group, "3");
    assert_eq!(data.rows[0].title, "Welcome");
}

#[test]
fn parse_skips_rows_without_url_and_blank_lines() {
    let data = parse_csv("week,page,page_title,title,url\n1,1,P,A,a.mp3\n\n1,1,P,B,\n").unwrap();
    assert_eq!(data.rows.len(), 1);
}

#[test]
fn parse_rejects_missing_columns() {
    let err = parse_csv("week,page,title\n1,1,A\n").unwrap_err();
    assert!(matches!(err, DatasetError::MissingColumn("url")));
}

#[test]
fn load_dataset_resolves_track_urls_next_to_the_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("audio.csv");
    std::fs::write(
        &csv_path,
        "week,page,page_title,title,url\n1,1,P,Local,w1/a.mp3\n1,1,P,Remote,https://cdn.example.com/b.mp3\n",
    )
    .unwrap();

    let client = reqwest::blocking::Client::new();
    let source = Resource::File(csv_path);
    let data = load_dataset(&source, &client).unwrap();

    assert_eq!(
        data.rows[0].url,
        dir.path().join("w1/a.mp3").display().to_string()
    );
    assert_eq!(data.rows[1].url, "https://cdn.example.com/b.mp3");
}

#[test]
fn load_dataset_reports_fetch_failures() {
    let client = reqwest::blocking::Client::new();
    let source = Resource::File("/no/such/dir/audio.csv".into());
    assert!(matches!(
        load_dataset(&source, &client),
        Err(DatasetError::Fetch(_))
    ));
}
