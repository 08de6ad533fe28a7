//! Reading the link out of a host response.

use crate::error::{Result, UploadError};
use serde_json::Value;

/// Extract the share link from a 2xx JSON body.
///
/// A body with `"success": false` (or `"status": "error"`) is a rejection even
/// if it carries a link. Otherwise the value at `pointer` must be a non-empty
/// string.
///
/// ```
/// use photobeam_uploader::extract_link;
/// use serde_json::json;
///
/// let body = json!({ "success": true, "link": "https://host/abc123" });
/// assert_eq!(extract_link(&body, "/link").unwrap(), "https://host/abc123");
///
/// let nested = json!({ "status": "success", "data": { "url": "https://t/1/a.jpg" } });
/// assert_eq!(extract_link(&nested, "/data/url").unwrap(), "https://t/1/a.jpg");
/// ```
pub fn extract_link(body: &Value, pointer: &str) -> Result<String> {
    let rejected = body.get("success") == Some(&Value::Bool(false))
        || body.get("status").and_then(Value::as_str) == Some("error");
    if rejected {
        return Err(UploadError::Rejected(rejection_message(body)));
    }

    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
        .ok_or_else(|| UploadError::MissingLink {
            pointer: pointer.to_string(),
        })
}

fn rejection_message(body: &Value) -> String {
    ["message", "error", "code"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .unwrap_or("no reason given")
        .to_string()
}
