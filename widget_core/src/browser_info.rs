//! Browser environment report: navigator, screen and window facts rendered
//! as ordered key/value pairs, plus a rough browser family guess.

use serde::{Deserialize, Serialize};

use crate::calculator::js_number_string;

/// Raw facts as read from the browser. Missing values stay `None`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserFacts {
    pub user_agent: String,
    pub platform: String,
    pub language: String,
    pub languages: Vec<String>,
    pub cookie_enabled: bool,
    pub online: bool,
    pub screen_width: i32,
    pub screen_height: i32,
    pub window_width: i32,
    pub window_height: i32,
    pub color_depth: i32,
    pub pixel_ratio: Option<f64>,
    pub timezone: Option<String>,
    /// `Date.getTimezoneOffset()`: minutes *behind* UTC.
    pub timezone_offset: i32,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct InfoEntry {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserFamily {
    pub name: &'static str,
    pub version: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserReport {
    pub entries: Vec<InfoEntry>,
    pub browser: BrowserFamily,
    pub text: String,
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

pub fn info_entries(facts: &BrowserFacts) -> Vec<InfoEntry> {
    let rows: [(&'static str, String); 14] = [
        ("User Agent", facts.user_agent.clone()),
        ("Platform", facts.platform.clone()),
        ("Language", facts.language.clone()),
        ("Languages", facts.languages.join(", ")),
        ("Cookie Enabled", yes_no(facts.cookie_enabled).to_string()),
        (
            "Online Status",
            if facts.online { "Online" } else { "Offline" }.to_string(),
        ),
        ("Screen Width", format!("{}px", facts.screen_width)),
        ("Screen Height", format!("{}px", facts.screen_height)),
        ("Window Width", format!("{}px", facts.window_width)),
        ("Window Height", format!("{}px", facts.window_height)),
        ("Color Depth", format!("{} bits", facts.color_depth)),
        (
            "Pixel Ratio",
            facts
                .pixel_ratio
                .map(js_number_string)
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        (
            "Timezone",
            facts.timezone.clone().unwrap_or_else(|| "N/A".to_string()),
        ),
        (
            "Timezone Offset",
            format!("{} minutes", facts.timezone_offset),
        ),
    ];
    rows.into_iter()
        .map(|(key, value)| InfoEntry { key, value })
        .collect()
}

/// `Key: Value` lines, as copied by "Copy All".
pub fn format_report(entries: &[InfoEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}: {}", entry.key, entry.value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Order matters: Chromium forks also advertise `Chrome/` and `Safari/`.
const FAMILY_TOKENS: &[(&str, &str)] = &[
    ("Edg/", "Edge"),
    ("OPR/", "Opera"),
    ("SamsungBrowser/", "Samsung Internet"),
    ("Firefox/", "Firefox"),
    ("FxiOS/", "Firefox"),
    ("CriOS/", "Chrome"),
    ("Chrome/", "Chrome"),
    ("Version/", "Safari"),
];

pub fn detect_browser(user_agent: &str) -> BrowserFamily {
    for &(token, name) in FAMILY_TOKENS {
        let Some(pos) = user_agent.find(token) else {
            continue;
        };
        if name == "Safari" && !user_agent.contains("Safari/") {
            continue;
        }
        let rest = &user_agent[pos + token.len()..];
        let version: String = rest
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        return BrowserFamily {
            name,
            version: (!version.is_empty()).then_some(version),
        };
    }
    BrowserFamily {
        name: "Unknown",
        version: None,
    }
}

pub fn browser_report(facts: &BrowserFacts) -> BrowserReport {
    let entries = info_entries(facts);
    let text = format_report(&entries);
    BrowserReport {
        browser: detect_browser(&facts.user_agent),
        entries,
        text,
    }
}

/// Reads the live environment. Values the browser refuses to expose fall
/// back to their defaults.
#[cfg(target_arch = "wasm32")]
pub fn collect_facts() -> crate::error::WidgetResult<BrowserFacts> {
    use crate::error::WidgetError;
    use wasm_bindgen::JsValue;

    let window = web_sys::window().ok_or(WidgetError::Browser("window"))?;
    let navigator = window.navigator();
    let read_bool = |target: &JsValue, key: &str| {
        js_sys::Reflect::get(target, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    };
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as i32
    };
    let screen = window.screen().ok();
    let timezone = js_sys::Reflect::get(
        &js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &js_sys::Object::new())
            .resolved_options(),
        &JsValue::from_str("timeZone"),
    )
    .ok()
    .and_then(|v| v.as_string());
    let pixel_ratio = window.device_pixel_ratio();

    Ok(BrowserFacts {
        user_agent: navigator.user_agent().unwrap_or_default(),
        platform: navigator.platform().unwrap_or_default(),
        language: navigator.language().unwrap_or_default(),
        languages: navigator
            .languages()
            .iter()
            .filter_map(|v| v.as_string())
            .collect(),
        cookie_enabled: read_bool(navigator.as_ref(), "cookieEnabled"),
        online: navigator.on_line(),
        screen_width: screen.as_ref().and_then(|s| s.width().ok()).unwrap_or(0),
        screen_height: screen.as_ref().and_then(|s| s.height().ok()).unwrap_or(0),
        window_width: dimension(window.inner_width()),
        window_height: dimension(window.inner_height()),
        color_depth: screen
            .as_ref()
            .and_then(|s| s.color_depth().ok())
            .unwrap_or(0),
        pixel_ratio: (pixel_ratio > 0.0).then_some(pixel_ratio),
        timezone,
        timezone_offset: js_sys::Date::new_0().get_timezone_offset() as i32,
    })
}
