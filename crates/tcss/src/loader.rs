//! Reading stylesheet files from disk.
//!
//! A file whose first eight bytes spell `@charset` is decoded with the
//! encoding it names, and the `@charset ...;` prefix is dropped. Any other
//! file is decoded as UTF-8 (a byte order mark is removed). Surrounding
//! whitespace is trimmed in both cases.
//!
//! ```css
//! @charset "iso-8859-1";
//! Label { color: red; }
//! ```

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use nom::IResult;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::char;
use nom::sequence::{preceded, terminated};

use crate::error::{Result, TcssError};

/// Read and decode the stylesheet at `path`.
pub fn read_stylesheet(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    log::debug!("reading stylesheet {}", path.display());
    let bytes = fs::read(path)?;
    decode_stylesheet(&bytes)
}

/// Decode stylesheet bytes, honoring a leading `@charset` declaration.
pub fn decode_stylesheet(bytes: &[u8]) -> Result<String> {
    let text = match charset_prelude(bytes) {
        Ok((rest, label)) => {
            let label = charset_label(label);
            let encoding = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| TcssError::UnknownEncoding(label.clone()))?;
            log::debug!("stylesheet declares charset {}", encoding.name());
            encoding.decode_with_bom_removal(rest).0
        }
        Err(_) => UTF_8.decode_with_bom_removal(bytes).0,
    };
    Ok(text.trim().to_string())
}

/// `@charset` followed by everything up to and including the first `;`.
fn charset_prelude(input: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(tag("@charset"), terminated(take_until(";"), char(';')))(input)
}

fn charset_label(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tcss-loader-{}-{name}", std::process::id()));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn plain_utf8_file() {
        let path = fixture("plain.tcss", "  Label { color: red; }\n".as_bytes());
        assert_eq!(read_stylesheet(&path).unwrap(), "Label { color: red; }");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn charset_selects_encoding() {
        let mut bytes = b"@charset \"ISO-8859-1\";\n".to_vec();
        bytes.extend_from_slice(b"Label { content: \"caf\xE9\"; }");
        let path = fixture("latin1.tcss", &bytes);
        assert_eq!(
            read_stylesheet(&path).unwrap(),
            "Label { content: \"café\"; }"
        );
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn unknown_charset_is_an_error() {
        let result = decode_stylesheet(b"@charset \"klingon\"; a {}");
        assert!(matches!(result, Err(TcssError::UnknownEncoding(label)) if label == "klingon"));
    }

    #[test]
    fn charset_without_semicolon_is_plain_text() {
        assert_eq!(
            decode_stylesheet(b"@charset utf-8").unwrap(),
            "@charset utf-8"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = read_stylesheet("/nonexistent/tcss/file.tcss");
        assert!(matches!(result, Err(TcssError::Io(_))));
    }
}
