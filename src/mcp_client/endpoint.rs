//! Remote server endpoint.
//!
//! Resolved once per client from configuration and never mutated afterwards.

use std::fmt;

use reqwest::Url;

use super::errors::McpError;

/// Endpoint used when no flag, environment variable or settings entry is set.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8081/mcp";

/// URL scheme of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Immutable `scheme://host:port/path` target for JSON-RPC POSTs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    port: u16,
    path: String,
}

impl Endpoint {
    /// Parse an endpoint from a URL string.
    ///
    /// Only `http` and `https` are accepted. A missing port falls back to the
    /// scheme default; a missing path becomes `/`.
    pub fn parse(raw: &str) -> Result<Self, McpError> {
        let url = Url::parse(raw.trim()).map_err(|e| McpError::ConfigError {
            reason: format!("invalid endpoint '{raw}': {e}"),
        })?;

        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(McpError::ConfigError {
                    reason: format!("unsupported endpoint scheme '{other}' in '{raw}'"),
                })
            }
        };

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| McpError::ConfigError {
                reason: format!("endpoint '{raw}' has no host"),
            })?
            .to_string();

        let port = url
            .port_or_known_default()
            .ok_or_else(|| McpError::ConfigError {
                reason: format!("endpoint '{raw}' has no port"),
            })?;

        Ok(Self {
            scheme,
            host,
            port,
            path: url.path().to_string(),
        })
    }

    /// The hardcoded fallback endpoint.
    pub fn default_endpoint() -> Self {
        // DEFAULT_ENDPOINT is a constant known to parse.
        Self {
            scheme: Scheme::Http,
            host: "localhost".to_string(),
            port: 8081,
            path: "/mcp".to_string(),
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_tls(&self) -> bool {
        self.scheme == Scheme::Https
    }

    /// Full URL string for the HTTP client.
    pub fn url(&self) -> String {
        // IPv6 literals come back from `host_str` already bracketed.
        format!(
            "{}://{}:{}{}",
            self.scheme.as_str(),
            self.host,
            self.port,
            self.path
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_url() {
        let ep = Endpoint::parse("https://mcp.apps.example.com:8443/mcp").unwrap();
        assert_eq!(ep.scheme(), Scheme::Https);
        assert_eq!(ep.host(), "mcp.apps.example.com");
        assert_eq!(ep.port(), 8443);
        assert_eq!(ep.path(), "/mcp");
        assert!(ep.is_tls());
        assert_eq!(ep.url(), "https://mcp.apps.example.com:8443/mcp");
    }

    #[test]
    fn test_parse_default_port() {
        let ep = Endpoint::parse("https://mcp.example.com/mcp").unwrap();
        assert_eq!(ep.port(), 443);
        let ep = Endpoint::parse("http://mcp.example.com").unwrap();
        assert_eq!(ep.port(), 80);
        assert_eq!(ep.path(), "/");
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        let err = Endpoint::parse("ftp://example.com/mcp").unwrap_err();
        assert!(matches!(err, McpError::ConfigError { .. }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Endpoint::parse("not a url").is_err());
    }

    #[test]
    fn test_default_matches_constant() {
        assert_eq!(
            Endpoint::default_endpoint(),
            Endpoint::parse(DEFAULT_ENDPOINT).unwrap()
        );
    }
}
