//! Helpers around the shared API key which callers must present.
//!
//! Requests carry the key in the `token` field of their JSON body. There's no
//! signing or expiry; the token either matches `$ALIEM_API_KEY` or it doesn't.

use serde_json::Value;
use std::fmt;

/// A newtype wrapper around the shared API key.
#[derive(Clone)]
pub struct ApiKey(pub String);

/// Keep the key out of logs.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

/// Compare a caller-supplied token against our key. Tokens which aren't
/// strings can never match.
pub fn is_valid_token(key: &ApiKey, token: &Value) -> bool {
    token.as_str() == Some(key.0.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_valid_token() {
        let key = ApiKey(String::from("foobar"));

        assert!(is_valid_token(&key, &json!("foobar")));
        assert!(!is_valid_token(&key, &json!("FOOBAR")));
        assert!(!is_valid_token(&key, &json!("foobar ")));
        assert!(!is_valid_token(&key, &json!(["foobar"])));
        assert!(!is_valid_token(&key, &json!(true)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = ApiKey(String::from("foobar"));

        assert_eq!(format!("{:?}", key), "ApiKey(..)");
    }
}
