use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime};

use super::CertificateDecoder;
use crate::process;

/// Reads certificates with `openssl x509 -enddate -noout`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Openssl;

impl CertificateDecoder for Openssl {
    fn not_after(&self, pem: &[u8]) -> Result<OffsetDateTime, Box<dyn std::error::Error + Send + Sync>> {
        let output = process::command!("openssl", "x509", "-enddate", "-noout")
            .output_with_input(pem)?
            .require_success()?;

        Ok(parse_enddate(std::str::from_utf8(&output.stdout)?)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseEnddateError {
    #[error("expected `notAfter=<date>`, got {0:?}")]
    MissingPrefix(String),

    #[error("invalid date {input:?}: {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: time::error::Parse,
    },
}

/// Parses the `notAfter=Jun  1 12:00:00 2025 GMT` line printed by `openssl x509 -enddate`.
pub fn parse_enddate(output: &str) -> Result<OffsetDateTime, ParseEnddateError> {
    let output = output.trim();
    let date = output
        .strip_prefix("notAfter=")
        .ok_or_else(|| ParseEnddateError::MissingPrefix(output.to_owned()))?;

    // openssl pads single digit days with a space. Collapsing runs of whitespace lets a single format cover both.
    let date = date.split_whitespace().collect::<Vec<_>>().join(" ");

    let format = format_description!(
        "[month repr:short] [day padding:none] [hour]:[minute]:[second] [year] GMT"
    );

    PrimitiveDateTime::parse(&date, format)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|source| ParseEnddateError::InvalidDate {
            input: date,
            source,
        })
}
