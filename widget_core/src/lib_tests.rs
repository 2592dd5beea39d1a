use super::*;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64_STD;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

#[test]
fn log_levels_parse_case_insensitively() {
    assert_eq!(parse_log_level("DEBUG").unwrap(), log::Level::Debug);
    assert_eq!(parse_log_level("").unwrap(), log::Level::Info);
    assert_eq!(parse_log_level("warning").unwrap(), log::Level::Warn);
    let err = parse_log_level("loud").unwrap_err();
    assert_eq!(err.to_string(), "unsupported log level: loud");
}

#[test]
fn errors_render_as_toast_messages() {
    assert_eq!(WidgetError::EmptyInput("code").to_string(), "code is empty");
    assert_eq!(
        WidgetError::invalid("hex color", "#12").to_string(),
        "invalid hex color: #12"
    );
    assert_eq!(
        WidgetError::Browser("speech synthesis not supported").to_string(),
        "browser API unavailable: speech synthesis not supported"
    );
}

#[test]
fn number_base_output_feeds_color_tools() {
    let bases = number_base::convert_number_base_internal("10", "3900150").unwrap();
    assert_eq!(bases.hexadecimal, "3B82F6");
    let formats = color::color_formats_internal(&bases.hexadecimal).unwrap();
    assert_eq!(formats.rgb, "rgb(59, 130, 246)");
}

#[test]
fn palette_entries_are_valid_colors() {
    for scheme in ["analogous", "complementary", "triadic", "monochrome"] {
        let palette = color::generate_palette_internal("#3b82f6", scheme).unwrap();
        assert!(!palette.is_empty(), "{scheme}");
        for hex in palette {
            assert!(color::color_formats_internal(&hex).is_ok(), "{scheme}: {hex}");
        }
    }
}

#[test]
fn calculator_and_browser_report_share_number_formatting() {
    let mut calc = calculator::CalculatorState::default();
    calc.input_digit('3').unwrap();
    calc.perform_operation(calculator::Operator::Divide);
    calc.input_digit('2').unwrap();
    calc.equals();
    assert_eq!(calc.display(), "1.5");

    let facts = browser_info::BrowserFacts {
        pixel_ratio: Some(1.5),
        ..browser_info::BrowserFacts::default()
    };
    let report = browser_info::browser_report(&facts);
    assert!(report.text.contains("Pixel Ratio: 1.5"));
}

#[test]
fn regex_tester_finds_every_lorem_sentence() {
    let mut rng = StdRng::seed_from_u64(3);
    let text = lorem::generate_lorem_internal(&mut rng, "sentences", 4).unwrap();
    let result =
        regex_tester::test_regex_internal(r"[A-Z][a-z ]+\.", &text, RegexFlags::default())
            .unwrap();
    assert_eq!(result.matches.len(), 4);
    let rebuilt: String = result.segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(rebuilt, text);
}

#[test]
fn url_codec_handles_minified_snippets() {
    let minified = minify::minify_code_internal("css", "a { color : red ; }").unwrap();
    let encoded = url_codec::url_encode_internal(&minified.output, UrlMode::Component).unwrap();
    assert_eq!(encoded, "a%7Bcolor%3Ared%3B%7D");
    let decoded = url_codec::url_decode_internal(&encoded, UrlMode::Component).unwrap();
    assert_eq!(decoded, minified.output);
}

#[test]
fn results_serialize_with_camel_case_keys() {
    let minified = minify::minify_code_internal("js", "let  x = 1;").unwrap();
    let value = serde_json::to_value(&minified).unwrap();
    assert!(value.get("originalSize").is_some());
    assert!(value.get("savedPercent").is_some());

    let report = password::password_strength_internal("hunter2");
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["checks"]["minLength"], json!(false));
}

#[test]
fn option_bags_fill_missing_fields_with_defaults() {
    let flags: RegexFlags = serde_json::from_value(json!({ "ignoreCase": true })).unwrap();
    assert!(flags.global);
    assert!(flags.ignore_case);

    let barcode: BarcodeOptions = serde_json::from_value(json!({ "height": 60 })).unwrap();
    assert_eq!(barcode.module_width, 2);
    assert_eq!(barcode.height, 60);

    let speech: SpeechOptions = serde_json::from_value(json!({})).unwrap();
    assert_eq!(speech, SpeechOptions::default());

    let convert: ConvertOptions = serde_json::from_value(json!({ "quality": 70 })).unwrap();
    assert_eq!(convert.quality, Some(70));
    assert_eq!(convert.compression, None);
}

#[test]
fn barcode_png_converts_to_jpeg() {
    let barcode = barcode::generate_barcode_internal("WIDGET-42", BarcodeOptions::default()).unwrap();
    assert_eq!(barcode.image.mime, "image/png");
    let png = B64_STD.decode(&barcode.image.data_base64).unwrap();
    let jpeg = image_convert::convert_image_internal(
        &png,
        "jpg",
        Some(&barcode.image.download_name),
        ConvertOptions::default(),
    )
    .unwrap();
    assert_eq!(jpeg.download_name, "barcode.jpeg");
    assert_eq!(jpeg.width, barcode.image.width);
    assert_eq!(jpeg.height, 100);
}

#[test]
fn clipboard_history_round_trips_through_storage_blob() {
    let mut history = clipboard_history::ClipboardHistoryState::default();
    history.add("first", 1_000.0);
    history.add("second", 2_000.0);
    storage::save_json(clipboard_history::STORAGE_KEY, history.items()).unwrap();
    // Host builds have no localStorage.
    assert_eq!(storage::load_raw(clipboard_history::STORAGE_KEY), None);

    let restored = clipboard_history::ClipboardHistoryState::from_json(&history.to_json().unwrap());
    assert_eq!(restored, history);
}

#[test]
fn stopwatch_display_matches_exported_formatter() {
    let mut sw = stopwatch::StopwatchState::default();
    sw.start(0.0);
    sw.lap(65_430.0);
    let snapshot = sw.snapshot(70_000.0);
    assert_eq!(snapshot.display, "01:10.00");
    assert_eq!(snapshot.laps[0].time, "01:05.43");
    assert_eq!(format_stopwatch_time(65_430.0), "01:05.43");
}

#[test]
fn datetime_and_units_agree_on_day_length() {
    let fields = datetime::convert_datetime_internal("timestamp", "86400", |_| 0).unwrap();
    let iso = fields
        .iter()
        .find(|f| f.key == "iso8601")
        .map(|f| f.value.as_str());
    assert_eq!(iso, Some("1970-01-02T00:00:00.000Z"));
    assert_eq!(
        units::convert_unit_internal("data", "kilobyte", "byte", "84.375").unwrap(),
        "86400"
    );
}
