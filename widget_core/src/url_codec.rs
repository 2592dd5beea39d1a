use crate::error::{WidgetError, WidgetResult};

/// Characters `encodeURIComponent` leaves alone that `urlencoding` escapes.
const COMPONENT_SAFE: &[(&str, &str)] = &[
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlMode {
    /// URI component rules: spaces become `%20`, `+` is literal.
    Component,
    /// HTML form rules: spaces become `+`.
    Form,
}

impl UrlMode {
    pub fn parse(input: &str) -> WidgetResult<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "component" | "uri" => Ok(Self::Component),
            "form" | "query" => Ok(Self::Form),
            other => Err(WidgetError::unsupported("url mode", other)),
        }
    }
}

pub fn url_encode_internal(input: &str, mode: UrlMode) -> WidgetResult<String> {
    if input.trim().is_empty() {
        return Err(WidgetError::EmptyInput("text to encode"));
    }
    let encoded = urlencoding::encode(input);
    Ok(match mode {
        UrlMode::Component => COMPONENT_SAFE
            .iter()
            .fold(encoded.into_owned(), |acc, (escaped, raw)| {
                acc.replace(escaped, raw)
            }),
        UrlMode::Form => encoded.replace("%20", "+"),
    })
}

pub fn url_decode_internal(input: &str, mode: UrlMode) -> WidgetResult<String> {
    if input.trim().is_empty() {
        return Err(WidgetError::EmptyInput("text to decode"));
    }
    let normalized = match mode {
        UrlMode::Component => input.to_string(),
        UrlMode::Form => input.replace('+', " "),
    };
    validate_escapes(&normalized)?;
    urlencoding::decode(&normalized)
        .map(|cow| cow.into_owned())
        .map_err(|_| WidgetError::invalid("URL encoding", "escapes do not form valid UTF-8"))
}

/// Every `%` must introduce two hex digits.
fn validate_escapes(input: &str) -> WidgetResult<()> {
    let bytes = input.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let well_formed = bytes
                .get(idx + 1..idx + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return Err(WidgetError::invalid(
                    "URL encoding",
                    format!("malformed escape at position {idx}"),
                ));
            }
            idx += 3;
        } else {
            idx += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_encoding_keeps_unreserved_marks() {
        let encoded = url_encode_internal("a b&c=d/é!'()*~", UrlMode::Component).unwrap();
        assert_eq!(encoded, "a%20b%26c%3Dd%2F%C3%A9!'()*~");
    }

    #[test]
    fn form_encoding_uses_plus_for_spaces() {
        assert_eq!(url_encode_internal("a b", UrlMode::Form).unwrap(), "a+b");
        assert_eq!(url_decode_internal("a+b%2B", UrlMode::Form).unwrap(), "a b+");
    }

    #[test]
    fn component_decoding_keeps_plus() {
        assert_eq!(
            url_decode_internal("a+b%20c", UrlMode::Component).unwrap(),
            "a+b c"
        );
    }

    #[test]
    fn decode_rejects_malformed_escapes() {
        assert!(url_decode_internal("100%", UrlMode::Component).is_err());
        assert!(url_decode_internal("%zz", UrlMode::Component).is_err());
        assert!(url_decode_internal("%C3", UrlMode::Component).is_err());
    }

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(
            url_encode_internal("   ", UrlMode::Component).unwrap_err(),
            WidgetError::EmptyInput("text to encode")
        );
        assert!(url_decode_internal("", UrlMode::Form).is_err());
        assert!(UrlMode::parse("base64").is_err());
    }
}
