use tour_itinerary::{FetchError, TourStop};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Data directory the page is served next to.
pub const DATA_ROOT: &str = "data";

fn js_reason(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

async fn get(path: &str) -> Result<Option<Response>, FetchError> {
    let url = format!("{DATA_ROOT}/{path}");
    let Some(window) = web_sys::window() else {
        return Err(FetchError::new(path, "no window"));
    };

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|e| FetchError::new(path, js_reason(&e)))?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::new(path, js_reason(&e)))?
        .dyn_into::<Response>()
        .map_err(|e| FetchError::new(path, js_reason(&e)))?;

    if !response.ok() {
        web_sys::console::warn_1(&format!("{url}: HTTP {}", response.status()).into());
        return Ok(None);
    }
    Ok(Some(response))
}

/// Body of `path` under the data root; a non-success status is `Ok(None)`.
pub async fn fetch_text(path: String) -> Result<Option<String>, FetchError> {
    let Some(response) = get(&path).await? else {
        return Ok(None);
    };
    let promise = response
        .text()
        .map_err(|e| FetchError::new(path.as_str(), js_reason(&e)))?;
    let body = JsFuture::from(promise)
        .await
        .map_err(|e| FetchError::new(path.as_str(), js_reason(&e)))?;
    Ok(body.as_string())
}

pub async fn fetch_itinerary() -> Result<Vec<TourStop>, String> {
    let path = tour_itinerary::content::ITINERARY_PATH;
    let response = get(path)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{DATA_ROOT}/{path} not found"))?;
    let promise = response.json().map_err(|e| js_reason(&e))?;
    let json = JsFuture::from(promise).await.map_err(|e| js_reason(&e))?;
    serde_wasm_bindgen::from_value::<Vec<TourStop>>(json)
        .map_err(|e| format!("Failed to parse {path}: {e}"))
}
