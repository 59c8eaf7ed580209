//! Data URI encoding for uploaded images.
//!
//! Images are persisted as self-describing text of the form
//! `data:<content-type>;base64,<payload>`, which browsers can render directly.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Content type recorded when an upload does not declare one.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Encodes `bytes` as a base64 data URI carrying `content_type`.
///
/// The content type is trusted as given and no size limit is applied.
///
/// # Examples
///
/// ```
/// use maskpair::encoding::encode_data_uri;
///
/// assert_eq!(encode_data_uri(b"hi", "text/plain"), "data:text/plain;base64,aGk=");
/// ```
pub fn encode_data_uri(bytes: &[u8], content_type: &str) -> String {
    format!("{SCHEME}{content_type}{BASE64_MARKER}{}", STANDARD.encode(bytes))
}

/// A decoded base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    /// Parses a `data:<content-type>;base64,<payload>` string.
    ///
    /// # Errors
    /// - `EncodingError::MissingScheme` if the text does not start with `data:`.
    /// - `EncodingError::NotBase64` if the `;base64,` marker is absent.
    /// - `EncodingError::Payload` if the payload is not valid base64.
    pub fn parse(uri: &str) -> Result<Self, EncodingError> {
        let rest = uri
            .strip_prefix(SCHEME)
            .ok_or(EncodingError::MissingScheme)?;
        let (content_type, payload) = rest
            .split_once(BASE64_MARKER)
            .ok_or(EncodingError::NotBase64)?;

        Ok(DataUri {
            content_type: content_type.to_string(),
            bytes: STANDARD.decode(payload)?,
        })
    }

    /// File extension matching the content type, if one is known.
    pub fn extension(&self) -> Option<&'static str> {
        let ext = match self.content_type.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            "image/avif" => "avif",
            _ => return None,
        };
        Some(ext)
    }
}

impl std::str::FromStr for DataUri {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataUri::parse(s)
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("not a data URI: missing `data:` scheme")]
    MissingScheme,

    #[error("data URI is not base64 encoded")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::{DataUri, EncodingError, encode_data_uri};

    #[test]
    fn test_encode_layout() {
        assert_eq!(
            "data:image/png;base64,iVBORw==",
            encode_data_uri(&[0x89, b'P', b'N', b'G'], "image/png")
        );
    }

    #[test]
    fn test_round_trip_binary() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4099).collect();
        let uri = encode_data_uri(&bytes, "image/png");

        let decoded = DataUri::parse(&uri).unwrap();

        assert_eq!("image/png", decoded.content_type);
        assert_eq!(bytes, decoded.bytes);
    }

    #[test]
    fn test_round_trip_empty() {
        let uri = encode_data_uri(&[], "image/jpeg");
        assert_eq!("data:image/jpeg;base64,", uri);

        let decoded: DataUri = uri.parse().unwrap();
        assert!(decoded.bytes.is_empty());
    }

    #[test]
    fn test_round_trip_large() {
        let bytes = vec![0xAB; 5 * 1024 * 1024 + 1];
        let decoded = DataUri::parse(&encode_data_uri(&bytes, "image/webp")).unwrap();

        assert_eq!(bytes.len(), decoded.bytes.len());
        assert_eq!(bytes, decoded.bytes);
    }

    #[test]
    fn test_content_type_is_not_validated() {
        let uri = encode_data_uri(b"x", "not really/a mime");
        assert_eq!("not really/a mime", DataUri::parse(&uri).unwrap().content_type);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            DataUri::parse("image/png;base64,AAAA"),
            Err(EncodingError::MissingScheme)
        ));
        assert!(matches!(
            DataUri::parse("data:image/png,AAAA"),
            Err(EncodingError::NotBase64)
        ));
        assert!(matches!(
            DataUri::parse("data:image/png;base64,@@@"),
            Err(EncodingError::Payload(_))
        ));
    }

    #[test]
    fn test_extension() {
        let uri = DataUri::parse("data:image/jpeg;base64,").unwrap();
        assert_eq!(Some("jpg"), uri.extension());

        let uri = DataUri::parse("data:application/octet-stream;base64,").unwrap();
        assert_eq!(None, uri.extension());
    }
}
