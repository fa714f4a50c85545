//! `application/x-www-form-urlencoded` decoding
//!
//! Page bodies are arbitrary bytes, so values are decoded to `Vec<u8>` and
//! never forced through UTF-8.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use std::borrow::Cow;

/// Errors while reading a form submission
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    Body(String),
}

/// Collect a request body, refusing to buffer more than `limit` bytes
pub async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, FormError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(FormError::TooLarge { limit })
        }
        Err(e) => Err(FormError::Body(e.to_string())),
    }
}

/// Decoded form fields in submission order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, Vec<u8>)>,
}

impl FormData {
    /// Parse an urlencoded payload (request body or query string)
    pub fn parse(input: &[u8]) -> Self {
        let fields = input
            .split(|&b| b == b'&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let mut parts = pair.splitn(2, |&b| b == b'=');
                let key = parts.next().unwrap_or_default();
                let value = parts.next().unwrap_or_default();
                (
                    String::from_utf8_lossy(&decode_component(key)).into_owned(),
                    decode_component(value).into_owned(),
                )
            })
            .collect();
        Self { fields }
    }

    /// First value submitted for `name`
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_slice())
    }
}

/// Decode one component: `+` is a space, then percent escapes
fn decode_component(raw: &[u8]) -> Cow<'_, [u8]> {
    if raw.contains(&b'+') {
        let spaced: Vec<u8> = raw
            .iter()
            .map(|&b| if b == b'+' { b' ' } else { b })
            .collect();
        Cow::Owned(urlencoding::decode_binary(&spaced).into_owned())
    } else {
        urlencoding::decode_binary(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    #[tokio::test]
    async fn test_read_body_within_limit() {
        let bytes = read_body(Full::new(Bytes::from("body=abc")), 64).await.unwrap();
        assert_eq!(FormData::parse(&bytes).get("body"), Some(&b"abc"[..]));
    }

    #[tokio::test]
    async fn test_read_body_over_limit() {
        let err = read_body(Full::new(Bytes::from(vec![b'a'; 65])), 64)
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::TooLarge { limit: 64 }));
    }

    #[test]
    fn test_parse_plus_and_percent() {
        let form = FormData::parse(b"body=hello+world%21&other=x");
        assert_eq!(form.get("body"), Some(&b"hello world!"[..]));
        assert_eq!(form.get("other"), Some(&b"x"[..]));
    }

    #[test]
    fn test_multiline_and_non_utf8_values() {
        let form = FormData::parse(b"body=line1%0D%0Aline2%FF");
        assert_eq!(form.get("body"), Some(&b"line1\r\nline2\xff"[..]));
    }

    #[test]
    fn test_first_value_wins() {
        let form = FormData::parse(b"body=first&body=second");
        assert_eq!(form.get("body"), Some(&b"first"[..]));
    }

    #[test]
    fn test_missing_and_empty_fields() {
        let form = FormData::parse(b"title=x&body=");
        assert_eq!(form.get("body"), Some(&b""[..]));
        assert_eq!(form.get("absent"), None);

        let form = FormData::parse(b"flag&&");
        assert_eq!(form.get("flag"), Some(&b""[..]));
        assert_eq!(FormData::parse(b""), FormData::default());
    }
}
