//! Small helpers shared by the views.

use url::{form_urlencoded, Url};

/// Name of the `<meta>` tag carrying the backend base URL to the browser.
pub const API_URL_META: &str = "rechargex-api-url";

/// `/login`, remembering where the visitor was headed.
pub fn login_path(from: &str) -> String {
    if from.is_empty() || from == "/" || from == "/login" {
        return "/login".to_string();
    }
    let encoded: String = form_urlencoded::byte_serialize(from.as_bytes()).collect();
    format!("/login?redirect={encoded}")
}

/// Where to go after login. Only same-site absolute paths are honoured.
pub fn post_login_target(redirect: Option<&str>) -> String {
    match redirect {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/login") => {
            path.to_string()
        }
        _ => "/dashboard".to_string(),
    }
}

/// `/status/<id>`, with the id encoded as a single path segment.
pub fn status_path(transaction_id: &str) -> String {
    let Ok(mut url) = Url::parse("http://rechargex.local/status") else {
        return "/status".to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(transaction_id);
    }
    url.path().to_string()
}

/// Read the backend URL the server rendered into the page.
#[cfg(not(feature = "ssr"))]
pub fn api_url_from_document() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let selector = format!("meta[name=\"{API_URL_META}\"]");
    document
        .query_selector(&selector)
        .ok()
        .flatten()?
        .get_attribute("content")
        .filter(|url| !url.trim().is_empty())
}

/// Hand `contents` to the browser as a CSV download.
#[cfg(not(feature = "ssr"))]
pub fn download_csv(file_name: &str, contents: &str) -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::{JsCast, JsValue};

    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8;");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_path_remembers_origin() {
        assert_eq!(login_path("/status/TX 1"), "/login?redirect=%2Fstatus%2FTX+1");
        assert_eq!(login_path("/"), "/login");
    }

    #[test]
    fn post_login_target_rejects_foreign_paths() {
        assert_eq!(post_login_target(Some("/history")), "/history");
        assert_eq!(post_login_target(Some("//evil.example")), "/dashboard");
        assert_eq!(post_login_target(Some("https://evil.example")), "/dashboard");
        assert_eq!(post_login_target(Some("/login")), "/dashboard");
        assert_eq!(post_login_target(None), "/dashboard");
    }

    #[test]
    fn status_path_encodes_id() {
        assert_eq!(status_path("RX-1001"), "/status/RX-1001");
        assert_eq!(status_path("a/b"), "/status/a%2Fb");
    }

    #[test]
    fn status_path_keeps_space_and_plus_distinct() {
        assert_eq!(status_path("TX 1"), "/status/TX%201");
        assert_eq!(status_path("TX+1"), "/status/TX+1");
        assert_eq!(status_path("50%"), "/status/50%25");
    }
}
