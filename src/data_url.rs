//! `data:` URLs carrying base64 payloads.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

/// A decoded `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        DataUrl { mime: mime.into(), data }
    }

    /// Parses a base64 data URL. Percent-encoded (non-base64) payloads are not supported.
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidDataUrl("missing `data:` scheme".into()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidDataUrl("missing `,` separator".into()))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| Error::InvalidDataUrl("only base64 payloads are supported".into()))?;
        let data = STANDARD
            .decode(payload)
            .map_err(|e| Error::InvalidDataUrl(e.to_string()))?;
        Ok(DataUrl::new(mime, data))
    }

    pub fn to_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_png_url() {
        let url = DataUrl::new("image/png", vec![0x89, b'P', b'N', b'G']).to_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = DataUrl::parse(&url).unwrap();
        assert_eq!(parsed.mime, "image/png");
        assert_eq!(parsed.data, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DataUrl::parse("blob:qrgenius/1").is_err());
        assert!(DataUrl::parse("data:image/png;base64").is_err());
        assert!(DataUrl::parse("data:text/plain,hello").is_err());
        assert!(DataUrl::parse("data:image/png;base64,@@@").is_err());
    }
}
