use num_bigint::BigInt;
use serde::Serialize;

use crate::error::{WidgetError, WidgetResult};

#[derive(Debug, Serialize, Default, PartialEq, Eq)]
pub struct NumberBases {
    pub binary: String,
    pub octal: String,
    pub decimal: String,
    pub hexadecimal: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Radix {
    fn parse(input: &str) -> WidgetResult<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "2" | "bin" | "binary" => Ok(Self::Binary),
            "8" | "oct" | "octal" => Ok(Self::Octal),
            "10" | "dec" | "decimal" => Ok(Self::Decimal),
            "16" | "hex" | "hexadecimal" => Ok(Self::Hex),
            other => Err(WidgetError::unsupported("base", other)),
        }
    }

    fn value(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hex => 16,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Octal => "octal",
            Self::Decimal => "decimal",
            Self::Hex => "hexadecimal",
        }
    }

    fn strip_prefix(self, digits: &str) -> &str {
        let prefixes: &[&str] = match self {
            Self::Binary => &["0b", "0B"],
            Self::Octal => &["0o", "0O"],
            Self::Hex => &["0x", "0X"],
            Self::Decimal => &[],
        };
        prefixes
            .iter()
            .find_map(|prefix| digits.strip_prefix(prefix))
            .unwrap_or(digits)
    }
}

pub fn convert_number_base_internal(base: &str, value: &str) -> WidgetResult<NumberBases> {
    let num = parse_number_by_base(base, value)?;
    Ok(NumberBases {
        binary: num.to_str_radix(2),
        octal: num.to_str_radix(8),
        decimal: num.to_str_radix(10),
        hexadecimal: num.to_str_radix(16).to_uppercase(),
    })
}

pub(crate) fn parse_number_by_base(base: &str, value: &str) -> WidgetResult<BigInt> {
    let radix = Radix::parse(base)?;
    let cleaned = value.trim().replace('_', "");
    if cleaned.is_empty() {
        return Err(WidgetError::EmptyInput("number"));
    }
    let (negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let digits = radix.strip_prefix(unsigned);
    if digits.is_empty() {
        return Err(WidgetError::EmptyInput("number"));
    }
    let not_in_base =
        || WidgetError::invalid("number", format!("{value:?} is not a {} value", radix.label()));
    // The sign was consumed above; `parse_bytes` would accept a second one.
    if digits.starts_with(['+', '-']) {
        return Err(not_in_base());
    }
    let num = BigInt::parse_bytes(digits.as_bytes(), radix.value()).ok_or_else(not_in_base)?;
    Ok(if negative { -num } else { num })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_input_fans_out_to_all_bases() {
        let bases = convert_number_base_internal("hex", "0xff").unwrap();
        assert_eq!(bases.binary, "11111111");
        assert_eq!(bases.octal, "377");
        assert_eq!(bases.decimal, "255");
        assert_eq!(bases.hexadecimal, "FF");
    }

    #[test]
    fn numeric_base_names_are_accepted() {
        let bases = convert_number_base_internal("10", "100").unwrap();
        assert_eq!(bases.binary, "1100100");
        assert_eq!(bases.hexadecimal, "64");
    }

    #[test]
    fn negative_binary_keeps_sign() {
        let num = parse_number_by_base("binary", "-0b1010").unwrap();
        assert_eq!(num.to_string(), "-10");
    }

    #[test]
    fn values_beyond_u64_stay_exact() {
        let bases = convert_number_base_internal("decimal", "18446744073709551616").unwrap();
        assert_eq!(bases.hexadecimal, "10000000000000000");
    }

    #[test]
    fn digits_outside_the_base_are_rejected() {
        let err = convert_number_base_internal("octal", "19").unwrap_err();
        assert!(err.to_string().contains("octal"), "msg: {err}");
        assert_eq!(
            convert_number_base_internal("binary", "  ").unwrap_err(),
            WidgetError::EmptyInput("number")
        );
        assert!(convert_number_base_internal("base64", "1").is_err());
    }

    #[test]
    fn doubled_signs_are_rejected() {
        assert!(convert_number_base_internal("decimal", "--5").is_err());
        assert!(convert_number_base_internal("decimal", "+-5").is_err());
        assert!(convert_number_base_internal("hex", "-0x-ff").is_err());
        assert!(convert_number_base_internal("hex", "0x+ff").is_err());
        assert_eq!(convert_number_base_internal("hex", "-0xff").unwrap().decimal, "-255");
    }
}
