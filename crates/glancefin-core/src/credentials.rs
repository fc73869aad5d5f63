//! Read-only access to the web client's persisted credential blob.

use serde::Deserialize;

/// localStorage key under which the web client persists its credentials.
pub const STORAGE_KEY: &str = "jellyfin_credentials";

#[derive(Debug, Deserialize)]
struct CredentialBlob {
    #[serde(rename = "Servers", default)]
    servers: Vec<ServerEntry>,
}

#[derive(Debug, Deserialize)]
struct ServerEntry {
    #[serde(rename = "AccessToken")]
    access_token: Option<String>,
}

/// Extract the first server's access token from the raw credential blob.
///
/// The blob is externally owned and may be absent, malformed, or empty; every
/// such case yields `None`. Parse failures are logged, never propagated.
pub fn access_token(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let blob: CredentialBlob = match serde_json::from_str(raw) {
        Ok(blob) => blob,
        Err(err) => {
            tracing::warn!(error = %err, "failed to parse credential blob");
            return None;
        }
    };
    blob.servers
        .into_iter()
        .next()
        .and_then(|server| server.access_token)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_blob() {
        let raw = r#"{"Servers": [{"AccessToken": "tok123", "Name": "home"}]}"#;
        assert_eq!(access_token(Some(raw)).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_first_server_wins() {
        let raw = r#"{"Servers": [{"AccessToken": "first"}, {"AccessToken": "second"}]}"#;
        assert_eq!(access_token(Some(raw)).as_deref(), Some("first"));
    }

    #[test]
    fn test_absent_blob() {
        assert_eq!(access_token(None), None);
    }

    #[test]
    fn test_malformed_blob() {
        assert_eq!(access_token(Some("not json at all")), None);
        assert_eq!(access_token(Some("{\"Servers\": 7}")), None);
    }

    #[test]
    fn test_empty_servers() {
        assert_eq!(access_token(Some(r#"{"Servers": []}"#)), None);
        assert_eq!(access_token(Some(r#"{}"#)), None);
    }

    #[test]
    fn test_missing_or_empty_token() {
        assert_eq!(access_token(Some(r#"{"Servers": [{"Name": "x"}]}"#)), None);
        assert_eq!(
            access_token(Some(r#"{"Servers": [{"AccessToken": ""}]}"#)),
            None
        );
    }
}
