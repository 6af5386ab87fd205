//! Protocol version and well-known endpoints.

/// Validation protocol version spoken by this client.
pub const PROTOCOL_VERSION: &str = "2.0";

/// The public YubiCloud validation servers.
pub const DEFAULT_API_URLS: [&str; 5] = [
    "https://api.yubico.com/wsapi/2.0/verify",
    "https://api2.yubico.com/wsapi/2.0/verify",
    "https://api3.yubico.com/wsapi/2.0/verify",
    "https://api4.yubico.com/wsapi/2.0/verify",
    "https://api5.yubico.com/wsapi/2.0/verify",
];

/// Whether `url` carries an explicit `http://` or `https://` scheme.
pub fn has_supported_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_urls_are_https() {
        assert!(DEFAULT_API_URLS.iter().all(|u| u.starts_with("https://")));
        assert!(DEFAULT_API_URLS.iter().all(|u| u.contains(PROTOCOL_VERSION)));
    }

    #[test]
    fn scheme_check() {
        assert!(has_supported_scheme("http://example.com"));
        assert!(has_supported_scheme("https://example.com/wsapi/2.0/verify"));
        assert!(!has_supported_scheme("127.0.0.1:8000/test"));
        assert!(!has_supported_scheme("ftp.example.com/test"));
        assert!(!has_supported_scheme("example.com"));
    }
}
