use chrono::{FixedOffset, Timelike};
use itime::{Bucket, Error, FormatTable, FormatTableConfig, TimeInput, TimeValue};
use rstest::rstest;

fn beijing() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

#[rstest]
#[case("-", ":")]
#[case("-", "")]
#[case("/", ":")]
#[case("/", "")]
#[case("", ":")]
#[case("", "")]
fn combined_string_roundtrips_for_every_separator_pair(#[case] d: &str, #[case] t: &str) {
    let original = TimeValue::new("2021-04-04 18:23:12").unwrap();
    let rendered = original.combined_string(d, t);
    let back = TimeValue::new(rendered.as_str()).unwrap();
    assert_eq!(back.combined_string(d, t), rendered);
    assert_eq!(back, original);
}

#[rstest]
#[case("-", "2021-04-04")]
#[case("/", "2021/04/04")]
#[case("", "20210404")]
fn date_string_roundtrips_to_midnight(#[case] sep: &str, #[case] expected: &str) {
    let t = TimeValue::new("2021-04-04 18:23:12").unwrap();
    assert_eq!(t.date_string(sep), expected);
    assert_eq!(TimeValue::new(expected).unwrap(), t.start_of_day());
}

#[test]
fn epoch_seconds_and_millis_agree() {
    let secs = TimeValue::from_input_in(1_617_531_792, false, &beijing()).unwrap();
    let millis = TimeValue::from_input_in(1_617_531_792_000_i64, true, &beijing()).unwrap();
    let guessed = TimeValue::from_input_in(1_617_531_792_000_i64, false, &beijing()).unwrap();
    let fractional = TimeValue::from_input_in(1_617_531_792.123, false, &beijing()).unwrap();

    for t in [secs, millis, guessed, fractional] {
        assert_eq!(t.combined_string("-", ":"), "2021-04-04 18:23:12");
    }
}

#[test]
fn shifted_by_adds_all_units() {
    let t = TimeValue::new("2021-04-04 18:23:12").unwrap();
    assert_eq!(
        t.shifted_by(0, 10, 30, 1).unwrap().to_string(),
        "2021-04-04 19:53:22"
    );
}

#[test]
fn downsample_chains_after_shift() {
    let t = TimeValue::new("2021-07-21 23:23:12").unwrap();
    assert_eq!(
        t.downsample(Bucket::new().hours(5)).unwrap().to_string(),
        "2021-07-21 20:00:00"
    );
    assert_eq!(
        t.downsample(Bucket::new().minutes(5)).unwrap().to_string(),
        "2021-07-21 23:20:00"
    );
    assert_eq!(
        t.shifted_by(1, 0, 0, 0)
            .and_then(|t| t.downsample(Bucket::new().hours(6)))
            .unwrap()
            .to_string(),
        "2021-07-22 18:00:00"
    );
    assert_eq!(t.downsample(Bucket::new()), Err(Error::InvalidBucket));
}

#[test]
fn components_build_the_same_value_as_text() {
    let from_tuple = TimeValue::new((2021, 4, 4, 18, 23, 12)).unwrap();
    let from_text = TimeValue::new("2021-04-04 18:23:12").unwrap();
    assert_eq!(from_tuple, from_text);
}

#[test]
fn malformed_inputs_are_rejected() {
    assert!(matches!(
        TimeValue::new("not-a-date"),
        Err(Error::Format { .. })
    ));
    assert!(matches!(
        TimeValue::new(vec![TimeInput::Components(Vec::new()); 6]),
        Err(Error::UnsupportedType { .. })
    ));
    assert!(matches!(
        TimeValue::new(vec![TimeInput::Integer(2021); 5]),
        Err(Error::UnsupportedType { .. })
    ));
}

#[cfg(feature = "serde")]
#[test]
fn json_boolean_is_an_unsupported_type() {
    let err = TimeInput::try_from(serde_json::json!(true)).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType { .. }));
    assert!(err.to_string().contains("boolean"));
}

#[test]
fn start_of_day_zeroes_the_time() {
    for text in ["2021-04-04 18:23:12", "2020-02-29 23:59:59", "1999-12-31"] {
        let t = TimeValue::new(text).unwrap();
        let midnight = t.start_of_day().naive();
        assert_eq!(midnight.date(), t.naive().date());
        assert_eq!(
            (midnight.hour(), midnight.minute(), midnight.second()),
            (0, 0, 0)
        );
    }
}

#[test]
fn injected_table_changes_the_grammar() {
    let config = FormatTableConfig {
        date_separators: vec![".".into()],
        time_separators: vec![":".into(), "h".into()],
    };
    let table = FormatTable::from_config(&config).unwrap();

    let t = table.read("2021.04.04 18h23h12", false, &beijing()).unwrap();
    assert_eq!(table.combined_string(&t, ".", ":"), "2021.04.04 18:23:12");
    assert_eq!(table.time_string(&t, "h"), "18h23h12");
    assert!(table.read("2021-04-04", false, &beijing()).is_err());
}
