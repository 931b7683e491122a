//! Certificate validity checks.

use ceda_core::{CertificateStatus, CertificateValidity, InvalidReason};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::Path;
use tracing::debug;

/// Returns true if the certificate at `path` is in date and has at least
/// `min_lifetime` left. Missing or unparsable files are simply not valid.
pub fn is_certificate_valid(path: &Path, min_lifetime: Duration) -> bool {
    check_certificate(path, min_lifetime).is_valid()
}

/// Inspect the certificate at `path` against the current time
pub fn check_certificate(path: &Path, min_lifetime: Duration) -> CertificateStatus {
    check_certificate_at(path, min_lifetime, Utc::now())
}

/// Inspect the certificate at `path` as of `now`.
///
/// Never fails: read and parse problems come back as
/// [`CertificateStatus::Invalid`].
pub fn check_certificate_at(
    path: &Path,
    min_lifetime: Duration,
    now: DateTime<Utc>,
) -> CertificateStatus {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "certificate not readable");
            let reason = if e.kind() == std::io::ErrorKind::NotFound {
                InvalidReason::Missing
            } else {
                InvalidReason::Unparsable {
                    detail: e.to_string(),
                }
            };
            return CertificateStatus::Invalid {
                reason,
                validity: None,
            };
        }
    };

    let validity = match read_validity(&data) {
        Ok(validity) => validity,
        Err(detail) => {
            debug!(path = %path.display(), %detail, "certificate not parsable");
            return CertificateStatus::Invalid {
                reason: InvalidReason::Unparsable { detail },
                validity: None,
            };
        }
    };

    match validity.check_at(now, min_lifetime) {
        Ok(()) => CertificateStatus::Valid { validity },
        Err(reason) => CertificateStatus::Invalid {
            reason,
            validity: Some(validity),
        },
    }
}

/// Validity window of the first `CERTIFICATE` block in a PEM file
pub fn read_validity(pem_data: &[u8]) -> Result<CertificateValidity, String> {
    let blocks = pem::parse_many(pem_data).map_err(|e| e.to_string())?;
    let block = blocks
        .iter()
        .find(|p| p.tag() == "CERTIFICATE")
        .ok_or_else(|| "no CERTIFICATE block found".to_string())?;

    let (_, cert) =
        x509_parser::parse_x509_certificate(block.contents()).map_err(|e| e.to_string())?;

    let validity = cert.validity();
    Ok(CertificateValidity {
        not_before: asn1_to_utc(validity.not_before)?,
        not_after: asn1_to_utc(validity.not_after)?,
    })
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: x509_parser::time::ASN1Time) -> Result<DateTime<Utc>, String> {
    Utc.timestamp_opt(t.timestamp(), 0)
        .single()
        .ok_or_else(|| format!("timestamp out of range: {t}"))
}
