use crate::core::AssetLoadError;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// GET `url` and return the response body.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetLoadError> {
    let fail = |reason: String| AssetLoadError::Fetch {
        url: url.to_string(),
        reason,
    };
    let window = web::window().ok_or_else(|| fail("no window".into()))?;

    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|_| fail("response cast failed".into()))?;
    if !resp.ok() {
        return Err(AssetLoadError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }

    let body = resp
        .array_buffer()
        .map_err(|e| fail(format!("{:?}", e)))?;
    let body = JsFuture::from(body)
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&body).to_vec())
}
