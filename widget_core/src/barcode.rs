//! Code 128 (code set B) barcode encoder and PNG renderer.

use image::{ExtendedColorType, GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};
use crate::image_convert::{ConvertedImage, TargetFormat, encode_png};

const START_B: usize = 104;
const STOP: usize = 106;
const QUIET_ZONE_MODULES: usize = 10;
const MAX_TEXT_LEN: usize = 80;

const MODULE_WIDTH_RANGE: (u32, u32) = (1, 8);
const HEIGHT_RANGE: (u32, u32) = (20, 400);

/// Bar/space widths for symbol values 0..=106. Every symbol spans 11
/// modules except the stop pattern, which spans 13.
const PATTERNS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232", "2331112",
];

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct BarcodeOptions {
    /// Pixels per narrow module.
    pub module_width: u32,
    pub height: u32,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            module_width: 2,
            height: 100,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeResult {
    pub text: String,
    pub checksum: u8,
    /// One char per module, `1` for bar and `0` for space, quiet zones included.
    pub modules: String,
    pub image: ConvertedImage,
}

/// Symbol values including start, checksum and stop.
pub fn encode_code128b(text: &str) -> WidgetResult<Vec<usize>> {
    if text.trim().is_empty() {
        return Err(WidgetError::EmptyInput("barcode text"));
    }
    if text.len() > MAX_TEXT_LEN {
        return Err(WidgetError::invalid(
            "barcode text",
            format!("at most {MAX_TEXT_LEN} characters are supported"),
        ));
    }
    let mut values = vec![START_B];
    for ch in text.chars() {
        if !(' '..='~').contains(&ch) {
            return Err(WidgetError::invalid(
                "barcode text",
                format!("{ch:?} cannot be encoded in Code 128-B"),
            ));
        }
        values.push(ch as usize - 32);
    }
    let weighted: usize = values
        .iter()
        .enumerate()
        .map(|(pos, value)| pos.max(1) * value)
        .sum();
    values.push(weighted % 103);
    values.push(STOP);
    Ok(values)
}

pub fn module_pattern(values: &[usize]) -> String {
    let quiet = "0".repeat(QUIET_ZONE_MODULES);
    let mut modules = quiet.clone();
    for &value in values {
        for (idx, width) in PATTERNS[value].bytes().enumerate() {
            let bit = if idx % 2 == 0 { '1' } else { '0' };
            for _ in 0..(width - b'0') {
                modules.push(bit);
            }
        }
    }
    modules.push_str(&quiet);
    modules
}

pub fn generate_barcode_internal(text: &str, options: BarcodeOptions) -> WidgetResult<BarcodeResult> {
    let values = encode_code128b(text)?;
    let modules = module_pattern(&values);
    let module_width = options
        .module_width
        .clamp(MODULE_WIDTH_RANGE.0, MODULE_WIDTH_RANGE.1);
    let height = options.height.clamp(HEIGHT_RANGE.0, HEIGHT_RANGE.1);
    let width = modules.len() as u32 * module_width;
    let bars = modules.as_bytes();

    let canvas = GrayImage::from_fn(width, height, |x, _| {
        if bars[(x / module_width) as usize] == b'1' {
            Luma([0])
        } else {
            Luma([255])
        }
    });
    let png = encode_png(canvas.as_raw(), width, height, ExtendedColorType::L8, 9)?;
    log::debug!("barcode for {} chars: {width}x{height}px", text.len());

    let checksum = values[values.len() - 2] as u8;
    Ok(BarcodeResult {
        text: text.to_string(),
        checksum,
        modules,
        image: ConvertedImage::from_encoded(
            TargetFormat::Png,
            width,
            height,
            &png,
            "barcode.png".to_string(),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn pattern_table_widths() {
        for (value, pattern) in PATTERNS.iter().enumerate() {
            let modules: u32 = pattern.bytes().map(|b| u32::from(b - b'0')).sum();
            let expected = if value == STOP { 13 } else { 11 };
            assert_eq!(modules, expected, "symbol {value}");
        }
    }

    #[test]
    fn checksum_is_weighted_modulo_103() {
        // 104 + 1*33 = 137, 137 % 103 = 34
        assert_eq!(encode_code128b("A").unwrap(), vec![104, 33, 34, 106]);
        // 104 + 1*66 + 2*2 = 174, 174 % 103 = 71
        assert_eq!(encode_code128b("b\"").unwrap(), vec![104, 66, 2, 71, 106]);
    }

    #[test]
    fn modules_include_quiet_zones() {
        let modules = module_pattern(&encode_code128b("A").unwrap());
        assert_eq!(modules.len(), 10 + 11 * 3 + 13 + 10);
        assert!(modules.starts_with("0000000000110100100"));
        assert!(modules.ends_with("11000111010110000000000"));
    }

    #[test]
    fn renders_png_with_requested_geometry() {
        let result = generate_barcode_internal(
            "Hi",
            BarcodeOptions {
                module_width: 3,
                height: 50,
            },
        )
        .unwrap();
        let expected_width = (10 + 11 * 4 + 13 + 10) * 3;
        assert_eq!(result.image.width, expected_width);
        assert_eq!(result.image.height, 50);
        assert_eq!(result.image.download_name, "barcode.png");
        let png = STANDARD.decode(&result.image.data_base64).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.get_pixel(0, 0).0[0], 255);
        assert_eq!(decoded.get_pixel(30, 25).0[0], 0);
    }

    #[test]
    fn options_are_clamped() {
        let result = generate_barcode_internal(
            "x",
            BarcodeOptions {
                module_width: 50,
                height: 1,
            },
        )
        .unwrap();
        assert_eq!(result.image.height, 20);
        assert_eq!(result.image.width, result.modules.len() as u32 * 8);
    }

    #[test]
    fn rejects_blank_and_non_printable_text() {
        assert!(matches!(
            encode_code128b("  "),
            Err(WidgetError::EmptyInput(_))
        ));
        assert!(encode_code128b("tab\there").is_err());
        assert!(encode_code128b("café").is_err());
        assert!(encode_code128b(&"x".repeat(81)).is_err());
    }
}
