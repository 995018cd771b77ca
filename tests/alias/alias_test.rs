// tests/alias/alias_test.rs
use vizor::alias::AliasIndex;

fn schema() -> Vec<&'static str> {
    vec![
        "deviceType",
        "gender",
        "race/ethnicity",
        "parental level of education",
        "math_score",
        "reading-score",
        "appName",
    ]
}

#[test]
fn test_every_column_resolves_by_basic_forms() {
    let index = AliasIndex::build(&schema());

    for column in schema() {
        let lower = column.to_lowercase();
        let stripped: String = lower
            .chars()
            .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
            .collect();

        assert_eq!(index.resolve(column), Some(column), "exact form of {}", column);
        assert_eq!(index.resolve(&lower), Some(column), "lowercase form of {}", column);
        assert_eq!(
            index.resolve(&stripped),
            Some(column),
            "stripped form of {}",
            column
        );
    }
}

#[test]
fn test_spaced_and_title_forms() {
    let index = AliasIndex::build(&schema());

    assert_eq!(index.resolve("math score"), Some("math_score"));
    assert_eq!(index.resolve("Math Score"), Some("math_score"));
    assert_eq!(index.resolve("READING-SCORE"), Some("reading-score"));
    assert_eq!(index.resolve("Readingscore"), Some("reading-score"));
    assert_eq!(index.resolve("raceethnicity"), Some("race/ethnicity"));
    assert_eq!(index.resolve("DEVICETYPE"), Some("deviceType"));
}

#[test]
fn test_unknown_tokens_do_not_resolve() {
    let index = AliasIndex::build(&schema());

    assert_eq!(index.resolve("device"), None);
    assert_eq!(index.resolve("score"), None);
    assert_eq!(index.resolve(""), None);
    assert_eq!(index.resolve("   "), None);
}

#[test]
fn test_colliding_aliases_last_column_wins() {
    let index = AliasIndex::build(&["device_type", "device-type"]);

    // Each column still owns its exact spelling
    assert_eq!(index.resolve("device_type"), Some("device_type"));
    assert_eq!(index.resolve("device-type"), Some("device-type"));
    // The shared normalized form belongs to the later column
    assert_eq!(index.resolve("devicetype"), Some("device-type"));
    assert_eq!(index.resolve("device type"), Some("device-type"));
}

#[test]
fn test_mentions_prefer_longest_alias() {
    let index = AliasIndex::build(&["score", "math score", "math"]);
    let columns: Vec<&str> = index
        .mentions("histogram of math score and score")
        .iter()
        .map(|m| m.column)
        .collect();

    assert_eq!(columns, vec!["math score", "score"]);
}

#[test]
fn test_mentions_respect_word_boundaries() {
    let index = AliasIndex::build(&["age", "region"]);

    assert!(index.mentions("average usage by subregion").is_empty());

    let mentions = index.mentions("Age, then REGION.");
    assert_eq!(mentions.len(), 2);
    assert_eq!(mentions[0].column, "age");
    assert_eq!((mentions[0].start, mentions[0].end), (0, 3));
    assert_eq!(mentions[1].column, "region");
}

#[test]
fn test_multi_word_column_mentioned_in_text() {
    let index = AliasIndex::build(&schema());
    let mentions = index.mentions("bar chart of Parental Level Of Education and gender");
    let columns: Vec<&str> = mentions.iter().map(|m| m.column).collect();

    assert_eq!(columns, vec!["parental level of education", "gender"]);
}

#[test]
fn test_entries_sorted_and_complete() {
    let index = AliasIndex::build(&["device_type"]);
    let entries = index.entries();

    let aliases: Vec<&str> = entries.iter().map(|(alias, _)| *alias).collect();
    let mut sorted = aliases.clone();
    sorted.sort();
    assert_eq!(aliases, sorted);

    for expected in [
        "device_type",
        "DEVICE_TYPE",
        "Device_Type",
        "device type",
        "Device Type",
        "devicetype",
        "Devicetype",
    ] {
        assert!(aliases.contains(&expected), "missing alias {}", expected);
    }
    assert!(entries.iter().all(|(_, column)| *column == "device_type"));
    assert_eq!(index.columns(), &["device_type".to_string()]);
}
