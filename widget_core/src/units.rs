//! Unit conversion tables for the converter widget.
//!
//! Linear categories store both directions of each factor as the widget
//! displays them, so round trips reproduce the same rounding the page
//! always showed (`1 mile` is `1609.34 m`, not the exact international mile).

use serde::Serialize;

use crate::calculator::js_number_string;
use crate::error::{WidgetError, WidgetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Volume,
    Data,
}

struct LinearUnit {
    name: &'static str,
    to_base: f64,
    from_base: f64,
}

const fn unit(name: &'static str, to_base: f64, from_base: f64) -> LinearUnit {
    LinearUnit {
        name,
        to_base,
        from_base,
    }
}

const LENGTH: &[LinearUnit] = &[
    unit("meter", 1.0, 1.0),
    unit("kilometer", 1000.0, 0.001),
    unit("centimeter", 0.01, 100.0),
    unit("millimeter", 0.001, 1000.0),
    unit("inch", 0.0254, 39.3701),
    unit("foot", 0.3048, 3.28084),
    unit("yard", 0.9144, 1.09361),
    unit("mile", 1609.34, 0.000621371),
];

const WEIGHT: &[LinearUnit] = &[
    unit("kilogram", 1.0, 1.0),
    unit("gram", 0.001, 1000.0),
    unit("pound", 0.453592, 2.20462),
    unit("ounce", 0.0283495, 35.274),
    unit("ton", 1000.0, 0.001),
];

const VOLUME: &[LinearUnit] = &[
    unit("liter", 1.0, 1.0),
    unit("milliliter", 0.001, 1000.0),
    unit("gallon", 3.78541, 0.264172),
    unit("quart", 0.946353, 1.05669),
    unit("pint", 0.473176, 2.11338),
    unit("cup", 0.236588, 4.22675),
];

// Bytes are the base; binary multiples keep every factor exact in f64.
const DATA: &[LinearUnit] = &[
    unit("bit", 0.125, 8.0),
    unit("byte", 1.0, 1.0),
    unit("kilobyte", 1024.0, 1.0 / 1024.0),
    unit("megabyte", 1_048_576.0, 1.0 / 1_048_576.0),
    unit("gigabyte", 1_073_741_824.0, 1.0 / 1_073_741_824.0),
    unit("terabyte", 1_099_511_627_776.0, 1.0 / 1_099_511_627_776.0),
];

const TEMPERATURE: &[&str] = &["celsius", "fahrenheit", "kelvin"];

const CATEGORIES: &[Category] = &[
    Category::Length,
    Category::Weight,
    Category::Temperature,
    Category::Volume,
    Category::Data,
];

impl Category {
    pub fn parse(input: &str) -> WidgetResult<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(Self::Length),
            "weight" | "mass" => Ok(Self::Weight),
            "temperature" => Ok(Self::Temperature),
            "volume" => Ok(Self::Volume),
            "data" => Ok(Self::Data),
            other => Err(WidgetError::unsupported("unit category", other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Weight => "weight",
            Self::Temperature => "temperature",
            Self::Volume => "volume",
            Self::Data => "data",
        }
    }

    fn linear_table(self) -> Option<&'static [LinearUnit]> {
        match self {
            Self::Length => Some(LENGTH),
            Self::Weight => Some(WEIGHT),
            Self::Volume => Some(VOLUME),
            Self::Data => Some(DATA),
            Self::Temperature => None,
        }
    }

    pub fn units(self) -> Vec<&'static str> {
        match self.linear_table() {
            Some(table) => table.iter().map(|u| u.name).collect(),
            None => TEMPERATURE.to_vec(),
        }
    }

    fn require_unit(self, name: &str) -> WidgetResult<&'static str> {
        let wanted = name.trim().to_ascii_lowercase();
        self.units()
            .into_iter()
            .find(|candidate| *candidate == wanted)
            .ok_or_else(|| WidgetError::unsupported("unit", format!("{} {wanted}", self.name())))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUnits {
    pub category: &'static str,
    pub units: Vec<&'static str>,
    pub default_from: &'static str,
    pub default_to: &'static str,
}

pub fn list_categories() -> Vec<CategoryUnits> {
    CATEGORIES
        .iter()
        .map(|&category| {
            let units = category.units();
            let default_from = units[0];
            let default_to = units.get(1).copied().unwrap_or(default_from);
            CategoryUnits {
                category: category.name(),
                units,
                default_from,
                default_to,
            }
        })
        .collect()
}

/// Converts `value` between two units of the same category.
pub fn convert_value(category: Category, from: &str, to: &str, value: f64) -> WidgetResult<f64> {
    let from = category.require_unit(from)?;
    let to = category.require_unit(to)?;
    let Some(table) = category.linear_table() else {
        return Ok(convert_temperature(from, to, value));
    };
    let factor = |name: &str| table.iter().find(|u| u.name == name);
    match (factor(from), factor(to)) {
        (Some(src), Some(dst)) => Ok(value * src.to_base * dst.from_base),
        _ => Ok(value),
    }
}

fn convert_temperature(from: &str, to: &str, value: f64) -> f64 {
    match (from, to) {
        ("celsius", "fahrenheit") => value * 9.0 / 5.0 + 32.0,
        ("fahrenheit", "celsius") => (value - 32.0) * 5.0 / 9.0,
        ("celsius", "kelvin") => value + 273.15,
        ("kelvin", "celsius") => value - 273.15,
        ("fahrenheit", "kelvin") => (value - 32.0) * 5.0 / 9.0 + 273.15,
        ("kelvin", "fahrenheit") => (value - 273.15) * 9.0 / 5.0 + 32.0,
        _ => value,
    }
}

/// Fixed six decimals with trailing zeros (and a dangling point) removed.
/// A tiny negative value keeps its sign (`-0`), an exact zero does not.
pub fn format_unit_value(value: f64) -> String {
    if !value.is_finite() {
        return js_number_string(value);
    }
    let value = if value == 0.0 { 0.0 } else { value };
    let fixed = format!("{value:.6}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

/// Converts the raw text typed into one side of the widget. Text that is not
/// a number clears the other side instead of raising an error.
pub fn convert_unit_internal(
    category: &str,
    from: &str,
    to: &str,
    input: &str,
) -> WidgetResult<String> {
    let category = Category::parse(category)?;
    let Some(value) = parse_leading_float(input) else {
        category.require_unit(from)?;
        category.require_unit(to)?;
        return Ok(String::new());
    };
    let converted = convert_value(category, from, to, value)?;
    log::debug!("unit conversion {} {from}->{to}: {value} -> {converted}", category.name());
    Ok(format_unit_value(converted))
}

/// Parses the longest numeric prefix, mirroring how number inputs hand over
/// partially typed values such as `12.` or `3e`. Overflow yields an infinity
/// rather than a shorter prefix.
pub(crate) fn parse_leading_float(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if unsigned.starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    let numeric_len = trimmed
        .find(|ch: char| !matches!(ch, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .unwrap_or(trimmed.len());
    let numeric = &trimmed[..numeric_len];
    (1..=numeric.len())
        .rev()
        .find_map(|end| numeric[..end].parse::<f64>().ok())
}
