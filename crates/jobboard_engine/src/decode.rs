use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode a feed body: BOM -> Content-Type charset -> UTF-8.
///
/// Feeds are JSON or JavaScript, so there is no sniffing beyond that.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedText, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, encoding);
        }
    }

    decode_with(bytes, UTF_8)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedText, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: encoding.name().to_string(),
            message: "invalid byte sequence".into(),
        });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::decode_text;

    #[test]
    fn charset_from_content_type_is_honoured() {
        let latin1 = [b'C', b'a', b'f', 0xE9];
        let decoded = decode_text(&latin1, Some("text/plain; Charset=\"ISO-8859-1\"")).unwrap();
        assert_eq!(decoded.text, "Café");
    }

    #[test]
    fn bom_wins_over_header() {
        let bytes = b"\xEF\xBB\xBF{\"jobs\":[]}";
        let decoded = decode_text(bytes, Some("application/json; charset=latin1")).unwrap();
        assert_eq!(decoded.text, "{\"jobs\":[]}");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn invalid_utf8_without_charset_fails() {
        assert!(decode_text(&[b'a', 0xC3, 0x28], None).is_err());
    }
}
