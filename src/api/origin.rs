use crate::AppState;
use crate::api::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Host},
    http::{HeaderMap, request::Parts},
};
use url::Url;

/// Where the current request was addressed to, used to build absolute links.
///
/// `PUBLIC_URL` wins when configured. Otherwise the authority comes from the
/// `Host` header and the scheme is `http`, unless `TRUST_PROXY` is on and the
/// proxy sent `X-Forwarded-Proto`.
#[derive(Debug, Clone)]
pub struct RequestOrigin {
    pub host: String,
    pub base_url: Url,
}

impl RequestOrigin {
    pub fn new(host: &str, base: &str) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base)
            .map_err(|e| AppError::BadRequest(format!("Invalid base URL {:?}: {}", base, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            host: host.to_string(),
            base_url,
        })
    }

    /// Absolute URL for a path relative to the service root.
    pub fn url_for(&self, path: &str) -> Result<String, AppError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map(String::from)
            .map_err(|e| AppError::Internal(format!("Failed to build URL for {}: {}", path, e)))
    }
}

fn forwarded_scheme(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|v| *v == "https" || *v == "http")
}

#[async_trait]
impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let host = Host::from_request_parts(parts, state)
            .await
            .ok()
            .map(|Host(host)| host);

        match (&state.config.public_url, host) {
            (Some(public_url), host) => {
                let host = match host {
                    Some(host) => host,
                    None => Url::parse(public_url)
                        .ok()
                        .and_then(|u| {
                            u.host_str().map(|h| match u.port() {
                                Some(port) => format!("{}:{}", h, port),
                                None => h.to_string(),
                            })
                        })
                        .unwrap_or_default(),
                };
                Self::new(&host, public_url)
            }
            (None, Some(host)) => {
                let scheme = if state.config.trust_proxy {
                    forwarded_scheme(&parts.headers).unwrap_or("http")
                } else {
                    "http"
                };
                Self::new(&host, &format!("{}://{}", scheme, host))
            }
            (None, None) => Err(AppError::BadRequest("Missing Host header".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_root() {
        let origin = RequestOrigin::new("localhost:3000", "http://localhost:3000").unwrap();
        assert_eq!(
            origin.url_for("api/upload").unwrap(),
            "http://localhost:3000/api/upload"
        );
        assert_eq!(
            origin.url_for("/uploads/a.png").unwrap(),
            "http://localhost:3000/uploads/a.png"
        );
    }

    #[test]
    fn test_url_for_sub_path() {
        let origin = RequestOrigin::new("example.com", "https://example.com/files").unwrap();
        assert_eq!(
            origin.url_for("api/delete/a.txt?key=abc").unwrap(),
            "https://example.com/files/api/delete/a.txt?key=abc"
        );
    }

    #[test]
    fn test_forwarded_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(forwarded_scheme(&headers), None);

        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        assert_eq!(forwarded_scheme(&headers), Some("https"));

        headers.insert("x-forwarded-proto", "javascript".parse().unwrap());
        assert_eq!(forwarded_scheme(&headers), None);
    }

    #[test]
    fn test_invalid_base() {
        assert!(RequestOrigin::new("bad host", "http://bad host").is_err());
    }
}
