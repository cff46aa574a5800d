//! Object storage — presigned URLs for an S3-compatible bucket.
//!
//! URLs are signed with AWS Signature Version 4 in the query string
//! (`UNSIGNED-PAYLOAD`, only the `host` header signed), so the holder can
//! fetch or upload the object without credentials until the URL expires.

use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::StorageConfig;
use crate::error::StorageError;

/// Lifetime of signed download URLs.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Longest expiry SigV4 accepts.
const MAX_EXPIRY: Duration = Duration::from_secs(7 * 24 * 3600);

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";

/// Produces time-limited retrieval URLs for stored objects.
pub trait AssetSigner: Send + Sync {
    /// Signed GET URL for the object stored under `key`.
    fn signed_url(&self, key: &str) -> Result<String, StorageError>;
}

/// Inputs of a single presign operation.
#[derive(Debug, Clone)]
pub struct PresignRequest<'a> {
    pub method: &'a str,
    /// Base URL of the object, e.g. `https://bucket.s3.eu-west-1.amazonaws.com/Uploads/logo.png`.
    pub url: &'a Url,
    pub region: &'a str,
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub expires_in: Duration,
    pub now: DateTime<Utc>,
}

/// Sign `request`, returning the URL with the authentication query appended.
pub fn presign(request: &PresignRequest<'_>) -> Result<Url, StorageError> {
    if request.expires_in.is_zero() || request.expires_in > MAX_EXPIRY {
        return Err(StorageError::Signing(format!(
            "expiry of {}s is outside 1..={}s",
            request.expires_in.as_secs(),
            MAX_EXPIRY.as_secs()
        )));
    }
    let host = host_header(request.url)?;

    let amz_date = request.now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = request.now.format("%Y%m%d").to_string();
    let scope = format!("{date}/{}/{SERVICE}/aws4_request", request.region);
    let credential = format!("{}/{scope}", request.access_key_id);

    // Keys are already in sorted order.
    let params = [
        ("X-Amz-Algorithm", ALGORITHM.to_string()),
        ("X-Amz-Credential", credential),
        ("X-Amz-Date", amz_date.clone()),
        ("X-Amz-Expires", request.expires_in.as_secs().to_string()),
        ("X-Amz-SignedHeaders", "host".to_string()),
    ];
    let canonical_query = params
        .iter()
        .map(|(k, v)| format!("{}={}", uri_encode(k, true), uri_encode(v, true)))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_path = uri_encode(request.url.path(), false);
    let canonical_request = format!(
        "{}\n{canonical_path}\n{canonical_query}\nhost:{host}\n\nhost\nUNSIGNED-PAYLOAD",
        request.method
    );

    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let key = signing_key(request.secret_access_key, &date, request.region)?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    let mut signed = request.url.clone();
    signed.set_query(Some(&format!("{canonical_query}&X-Amz-Signature={signature}")));
    Ok(signed)
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, StorageError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| StorageError::Signing(format!("failed to initialize hmac: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn signing_key(secret: &str, date: &str, region: &str) -> Result<Vec<u8>, StorageError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// `host` header value, with the port when it is not the scheme default.
fn host_header(url: &Url) -> Result<String, StorageError> {
    let host = url
        .host_str()
        .ok_or_else(|| StorageError::Signing(format!("URL has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Percent-encode per SigV4: everything but `A-Za-z0-9-_.~` (and `/` when
/// `encode_slash` is false). Existing escapes in `value` are decoded first.
fn uri_encode(value: &str, encode_slash: bool) -> String {
    let decoded = percent_decode(value);
    let mut out = String::with_capacity(decoded.len());
    for byte in decoded {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn percent_decode(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2]))
        {
            out.push(hi << 4 | lo);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn hex_digit(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// S3 bucket client: presigns object URLs and uploads through them.
pub struct S3Storage {
    config: StorageConfig,
    http: reqwest::Client,
}

impl S3Storage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Unsigned URL of the object stored under `filename`.
    ///
    /// With a custom endpoint the bucket goes in the path, otherwise in the
    /// AWS virtual-hosted domain. Key segments are percent-encoded, so `#`,
    /// `?` and `%` stay part of the object name.
    pub fn object_url(&self, filename: &str) -> Result<Url, StorageError> {
        let filename = filename.trim_start_matches('/');
        if filename.trim().is_empty() {
            return Err(StorageError::InvalidKey(filename.to_string()));
        }
        let key = format!("{}{filename}", self.config.key_prefix);
        let invalid = |reason: String| StorageError::InvalidKey(format!("{key}: {reason}"));

        let (base, bucket_in_path) = match &self.config.endpoint {
            Some(endpoint) => (endpoint.clone(), true),
            None => (
                format!(
                    "https://{}.s3.{}.amazonaws.com/",
                    self.config.bucket, self.config.region
                ),
                false,
            ),
        };
        let mut url = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| invalid(format!("endpoint {base} cannot carry a path")))?;
            segments.pop_if_empty();
            if bucket_in_path {
                segments.push(&self.config.bucket);
            }
            segments.extend(key.split('/'));
        }
        Ok(url)
    }

    /// Presign `method` on the object stored under `filename`.
    pub fn presigned_url(
        &self,
        method: &str,
        filename: &str,
        expires_in: Duration,
        now: DateTime<Utc>,
    ) -> Result<Url, StorageError> {
        let url = self.object_url(filename)?;
        presign(&PresignRequest {
            method,
            url: &url,
            region: &self.config.region,
            access_key_id: &self.config.access_key_id,
            secret_access_key: self.config.secret_access_key.expose_secret(),
            expires_in,
            now,
        })
    }

    /// Upload `body` under `filename`, returning the filename on success.
    pub async fn upload(
        &self,
        body: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = self.presigned_url("PUT", filename, SIGNED_URL_TTL, Utc::now())?;
        let size = body.len();

        let response = self
            .http
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed {
                key: filename.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StorageError::UploadFailed {
                key: filename.to_string(),
                reason: format!("HTTP {status}: {}", detail.chars().take(200).collect::<String>()),
            });
        }

        info!(key = filename, bytes = size, "Object uploaded");
        Ok(filename.to_string())
    }
}

impl AssetSigner for S3Storage {
    fn signed_url(&self, key: &str) -> Result<String, StorageError> {
        let url = self.presigned_url("GET", key, SIGNED_URL_TTL, Utc::now())?;
        debug!(key, "Signed object URL");
        Ok(url.to_string())
    }
}

/// Signed URL of the company logo, or `None` when no logo is configured or
/// signing fails. Failures are logged and never surfaced.
pub fn signed_logo_url(signer: Option<&dyn AssetSigner>, logo_name: Option<&str>) -> Option<String> {
    let logo_name = logo_name?;
    let Some(signer) = signer else {
        warn!(logo = logo_name, "Logo configured but object storage is not, omitting logo");
        return None;
    };
    match signer.signed_url(logo_name) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(logo = logo_name, error = %e, "Failed to sign logo URL, omitting logo");
            None
        }
    }
}
