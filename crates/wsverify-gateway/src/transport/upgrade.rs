//! Pre-upgrade admission.
//!
//! - Build a descriptor from URI + headers (lower-cased names, UTF-8 values only)
//! - Bridge the callback-style verifier into async via oneshot
//! - Bound deferred custom checks with a timeout

use std::time::Duration;

use axum::http::{header, HeaderMap, Uri};
use tokio::sync::oneshot;

use wsverify_core::{AdmissionDecision, RequestDescriptor, UpgradeVerifier};

pub const STATUS_ABANDONED: u16 = 500;
pub const STATUS_TIMED_OUT: u16 = 504;

pub fn describe(uri: &Uri, headers: &HeaderMap, trust_forwarded_proto: bool) -> RequestDescriptor {
    let scheme_secure = matches!(uri.scheme_str(), Some("https") | Some("wss"));
    let forwarded_secure = trust_forwarded_proto
        && headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("https"));

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let mut req = RequestDescriptor::new(scheme_secure || forwarded_secure, origin);
    for (name, value) in headers {
        // non-UTF-8 values are treated as absent
        if let Ok(v) = value.to_str() {
            req.headers.insert(name.as_str().to_string(), v.to_string());
        }
    }
    req
}

/// Run the verifier and wait for its single decision.
///
/// A responder dropped without resolving yields 500; a check that never
/// resolves within `timeout` yields 504.
pub async fn admit(
    verifier: &dyn UpgradeVerifier,
    request: RequestDescriptor,
    timeout: Duration,
) -> AdmissionDecision {
    let (tx, rx) = oneshot::channel();
    verifier.verify(
        request,
        Box::new(move |admitted, status, message| {
            let _ = tx.send((admitted, status, message));
        }),
    );

    match tokio::time::timeout(timeout, rx).await {
        Ok(Ok((true, _, _))) => AdmissionDecision::Admit,
        Ok(Ok((false, status, message))) => AdmissionDecision::Reject {
            status: status.unwrap_or(400),
            message,
        },
        Ok(Err(_)) => {
            tracing::warn!("custom check dropped its responder without resolving");
            AdmissionDecision::Reject {
                status: STATUS_ABANDONED,
                message: Some("Verification abandoned".into()),
            }
        }
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "custom check timed out");
            AdmissionDecision::Reject {
                status: STATUS_TIMED_OUT,
                message: Some("Verification timed out".into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn describe_reads_origin_and_headers() {
        let mut h = HeaderMap::new();
        h.insert(header::ORIGIN, HeaderValue::from_static("https://a.example"));
        h.insert("x-auth-token", HeaderValue::from_static("k"));
        h.insert("x-bin", HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap());

        let uri: Uri = "/v1/ws".parse().unwrap();
        let d = describe(&uri, &h, false);
        assert!(!d.is_secure_transport);
        assert_eq!(d.origin, "https://a.example");
        assert_eq!(d.header("X-Auth-Token"), Some("k"));
        assert_eq!(d.header("x-bin"), None);
    }

    #[test]
    fn secure_from_scheme_or_trusted_proxy() {
        let abs: Uri = "https://gw.example/v1/ws".parse().unwrap();
        assert!(describe(&abs, &HeaderMap::new(), false).is_secure_transport);

        let mut h = HeaderMap::new();
        h.insert("x-forwarded-proto", HeaderValue::from_static("HTTPS"));
        let rel: Uri = "/v1/ws".parse().unwrap();
        assert!(!describe(&rel, &h, false).is_secure_transport);
        assert!(describe(&rel, &h, true).is_secure_transport);
    }

    #[test]
    fn missing_origin_is_empty() {
        let uri: Uri = "/".parse().unwrap();
        assert_eq!(describe(&uri, &HeaderMap::new(), false).origin, "");
    }
}
