//! Lightweight regex minifier for JavaScript, CSS and HTML snippets.
//!
//! This is a whitespace-and-comment stripper, not a parser: string literals
//! containing `//` or `/*` are not protected.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{WidgetError, WidgetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    JavaScript,
    Css,
    Html,
}

impl CodeLanguage {
    pub fn parse(input: &str) -> WidgetResult<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "css" => Ok(Self::Css),
            "html" | "htm" => Ok(Self::Html),
            other => Err(WidgetError::unsupported("code language", other)),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MinifyResult {
    pub output: String,
    pub original_size: usize,
    pub minified_size: usize,
    pub saved_percent: f64,
}

fn regex_block_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").unwrap())
}

fn regex_line_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)//.*$").unwrap())
}

fn regex_html_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

fn regex_whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn regex_punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*([{}:;,])\s*").unwrap())
}

pub fn minify(code: &str, language: CodeLanguage) -> String {
    let mut text = code.to_string();
    match language {
        CodeLanguage::JavaScript => {
            text = regex_block_comment().replace_all(&text, "").to_string();
            text = regex_line_comment().replace_all(&text, "").to_string();
        }
        CodeLanguage::Css => {
            text = regex_block_comment().replace_all(&text, "").to_string();
        }
        CodeLanguage::Html => {
            text = regex_html_comment().replace_all(&text, "").to_string();
        }
    }
    text = regex_whitespace().replace_all(&text, " ").to_string();
    text = regex_punctuation().replace_all(&text, "$1").to_string();
    text.trim().to_string()
}

pub fn minify_code_internal(language: &str, code: &str) -> WidgetResult<MinifyResult> {
    let language = CodeLanguage::parse(language)?;
    if code.trim().is_empty() {
        return Err(WidgetError::EmptyInput("code"));
    }
    let output = minify(code, language);
    let original_size = code.len();
    let minified_size = output.len();
    let saved_percent = if original_size == 0 {
        0.0
    } else {
        let ratio = 1.0 - minified_size as f64 / original_size as f64;
        (ratio * 1000.0).round() / 10.0
    };
    log::debug!("minified {language:?}: {original_size} -> {minified_size} bytes");
    Ok(MinifyResult {
        output,
        original_size,
        minified_size,
        saved_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn javascript_comments_and_spacing_removed() {
        let js = "/* header */\nfunction add(a, b) {\n  // sum\n  return a + b;\n}\n";
        assert_eq!(
            minify(js, CodeLanguage::JavaScript),
            "function add(a,b){return a + b;}"
        );
    }

    #[test]
    fn css_rules_collapse() {
        let css = "body {\n  color : red; /* brand */\n  margin: 0 auto;\n}\n";
        assert_eq!(minify(css, CodeLanguage::Css), "body{color:red;margin:0 auto;}");
    }

    #[test]
    fn html_comments_removed_but_slashes_kept() {
        let html = "<!-- nav -->\n<a href=\"//cdn.example\">\n  Link\n</a>";
        assert_eq!(
            minify(html, CodeLanguage::Html),
            "<a href=\"//cdn.example\"> Link </a>"
        );
    }

    #[test]
    fn result_reports_savings() {
        let result = minify_code_internal("css", "a {  }").unwrap();
        assert_eq!(result.output, "a{}");
        assert_eq!(result.original_size, 6);
        assert_eq!(result.minified_size, 3);
        assert_eq!(result.saved_percent, 50.0);
    }

    #[test]
    fn rejects_blank_code_and_unknown_language() {
        assert!(minify_code_internal("css", " \n ").is_err());
        assert!(minify_code_internal("python", "x = 1").is_err());
    }
}
