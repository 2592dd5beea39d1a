use console_error_panic_hook::set_once as set_panic_hook;
use js_sys::Date;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

mod barcode;
mod browser_info;
mod calculator;
mod clipboard_history;
mod color;
mod datetime;
mod error;
mod image_convert;
mod lorem;
mod minify;
mod number_base;
mod password;
mod regex_tester;
mod speech;
mod stopwatch;
mod storage;
mod units;
mod url_codec;

pub use calculator::Calculator;
pub use clipboard_history::ClipboardHistory;
pub use error::{WidgetError, WidgetResult};
pub use stopwatch::Stopwatch;

use barcode::BarcodeOptions;
use browser_info::BrowserFacts;
use image_convert::{BatchEntry, ConvertOptions};
use regex_tester::RegexFlags;
use speech::SpeechOptions;
use url_codec::UrlMode;

const DEFAULT_LOG_LEVEL: log::Level = log::Level::Info;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    set_panic_hook();
    install_logger(DEFAULT_LOG_LEVEL);
}

fn install_logger(level: log::Level) {
    // A logger can only be installed once; later calls just move the filter.
    if console_log::init_with_level(level).is_err() {
        log::set_max_level(level.to_level_filter());
    }
}

fn parse_log_level(level: &str) -> WidgetResult<log::Level> {
    match level.trim().to_ascii_lowercase().as_str() {
        "" | "info" => Ok(log::Level::Info),
        "error" => Ok(log::Level::Error),
        "warn" | "warning" => Ok(log::Level::Warn),
        "debug" => Ok(log::Level::Debug),
        "trace" => Ok(log::Level::Trace),
        other => Err(WidgetError::unsupported("log level", other)),
    }
}

/// Changes how chatty the console is (`error` through `trace`).
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    install_logger(parse_log_level(level)?);
    Ok(())
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| WidgetError::from(err).into())
}

/// `null`/`undefined` option bags mean "use the defaults".
fn options_from<T: DeserializeOwned + Default>(value: JsValue) -> WidgetResult<T> {
    if value.is_null() || value.is_undefined() {
        return Ok(T::default());
    }
    Ok(serde_wasm_bindgen::from_value(value)?)
}

/// Minutes east of UTC for the browser's zone at the given epoch millisecond.
fn browser_offset_minutes(epoch_ms: i64) -> i32 {
    -(Date::new(&JsValue::from_f64(epoch_ms as f64)).get_timezone_offset() as i32)
}

#[wasm_bindgen]
pub fn unit_categories() -> Result<JsValue, JsValue> {
    to_js(&units::list_categories())
}

#[wasm_bindgen]
pub fn list_units(category: &str) -> Result<JsValue, JsValue> {
    to_js(&units::Category::parse(category)?.units())
}

#[wasm_bindgen]
pub fn convert_unit(category: &str, from: &str, to: &str, input: &str) -> Result<String, JsValue> {
    units::convert_unit_internal(category, from, to, input).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn convert_number_base(base: &str, value: &str) -> Result<JsValue, JsValue> {
    to_js(&number_base::convert_number_base_internal(base, value)?)
}

#[wasm_bindgen]
pub fn convert_datetime(kind: &str, input: &str) -> Result<JsValue, JsValue> {
    to_js(&datetime::convert_datetime_internal(
        kind,
        input,
        browser_offset_minutes,
    )?)
}

#[wasm_bindgen]
pub fn datetime_now() -> Result<JsValue, JsValue> {
    to_js(&datetime::datetime_now_internal(
        Date::now() as i64,
        browser_offset_minutes,
    )?)
}

#[wasm_bindgen]
pub fn color_formats(hex: &str) -> Result<JsValue, JsValue> {
    to_js(&color::color_formats_internal(hex)?)
}

#[wasm_bindgen]
pub fn generate_palette(base: &str, scheme: &str) -> Result<JsValue, JsValue> {
    to_js(&color::generate_palette_internal(base, scheme)?)
}

#[wasm_bindgen]
pub fn test_regex(pattern: &str, text: &str, flags: JsValue) -> Result<JsValue, JsValue> {
    let flags: RegexFlags = options_from(flags)?;
    to_js(&regex_tester::test_regex_internal(pattern, text, flags)?)
}

#[wasm_bindgen]
pub fn generate_lorem(unit: &str, count: u32) -> Result<String, JsValue> {
    lorem::generate_lorem_internal(&mut rand::rng(), unit, count).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn password_strength(password: &str) -> Result<JsValue, JsValue> {
    to_js(&password::password_strength_internal(password))
}

#[wasm_bindgen]
pub fn url_encode(input: &str, mode: &str) -> Result<String, JsValue> {
    url_codec::url_encode_internal(input, UrlMode::parse(mode)?).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn url_decode(input: &str, mode: &str) -> Result<String, JsValue> {
    url_codec::url_decode_internal(input, UrlMode::parse(mode)?).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn minify_code(language: &str, code: &str) -> Result<JsValue, JsValue> {
    to_js(&minify::minify_code_internal(language, code)?)
}

#[wasm_bindgen]
pub fn format_stopwatch_time(ms: f64) -> String {
    stopwatch::format_time(ms)
}

#[wasm_bindgen]
pub fn generate_barcode(text: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options: BarcodeOptions = options_from(options)?;
    to_js(&barcode::generate_barcode_internal(text, options)?)
}

#[wasm_bindgen]
pub fn convert_image(
    bytes: &[u8],
    to: &str,
    file_name: Option<String>,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let options: ConvertOptions = options_from(options)?;
    to_js(&image_convert::convert_image_internal(
        bytes,
        to,
        file_name.as_deref(),
        options,
    )?)
}

/// `entries`: `[{ bytes, fileName?, to, options? }]`.
#[wasm_bindgen]
pub fn convert_image_batch(entries: JsValue) -> Result<JsValue, JsValue> {
    let entries: Vec<BatchEntry> =
        serde_wasm_bindgen::from_value(entries).map_err(WidgetError::from)?;
    to_js(&image_convert::convert_image_batch_internal(entries))
}

#[wasm_bindgen]
pub fn speak(text: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options: SpeechOptions = options_from(options)?;
    let plan = speech::plan_utterance(text, options)?;
    speech::speak(&plan)?;
    to_js(&plan)
}

#[wasm_bindgen]
pub fn cancel_speech() -> Result<(), JsValue> {
    speech::cancel().map_err(JsValue::from)
}

/// Report built from facts supplied by the page, for hosts that gather
/// them in JS.
#[wasm_bindgen]
pub fn format_browser_report(facts: JsValue) -> Result<JsValue, JsValue> {
    let facts: BrowserFacts = options_from(facts)?;
    to_js(&browser_info::browser_report(&facts))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn collect_browser_info() -> Result<JsValue, JsValue> {
    to_js(&browser_info::browser_report(&browser_info::collect_facts()?))
}

#[cfg(test)]
mod lib_tests;
