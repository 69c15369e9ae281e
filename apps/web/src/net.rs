use tariff_core::{normalize_countries, LeadSubmission, Normalized};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

pub const DATASET_PATH: &str = "countries.json";

fn js_error(context: &str, value: &JsValue) -> String {
    value
        .as_string()
        .map_or_else(|| format!("{context} failed"), |message| format!("{context}: {message}"))
}

async fn send(request: &Request) -> Result<Response, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(|e| js_error("network error", &e))?;
    value
        .dyn_into::<Response>()
        .map_err(|_| "unexpected fetch result".to_string())
}

/// Fetches the same-origin dataset and normalizes it.
pub async fn fetch_countries() -> Result<Normalized, String> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(DATASET_PATH, &opts)
        .map_err(|e| js_error("invalid request", &e))?;
    let response = send(&request).await?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    let body = response.json().map_err(|e| js_error("read body", &e))?;
    let json = JsFuture::from(body)
        .await
        .map_err(|e| js_error("invalid JSON", &e))?;
    let value: serde_json::Value = serde_wasm_bindgen::from_value(json)
        .map_err(|e| format!("Failed to parse {DATASET_PATH}: {e}"))?;

    let normalized = normalize_countries(&value).map_err(|e| e.to_string())?;
    for row in &normalized.dropped {
        web_sys::console::warn_1(&format!("dropped row {}: {}", row.index, row.reason).into());
    }
    Ok(normalized)
}

/// Posts a lead as JSON. Any completed request counts as sent.
pub async fn post_lead(webhook_url: &str, submission: &LeadSubmission) -> Result<(), String> {
    let body = serde_json::to_string(submission).map_err(|e| e.to_string())?;

    let headers = Headers::new().map_err(|e| js_error("headers", &e))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| js_error("headers", &e))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(webhook_url, &opts)
        .map_err(|e| js_error("invalid request", &e))?;
    let response = send(&request).await?;
    web_sys::console::log_1(
        &format!("lead {} submitted ({})", submission.id, response.status()).into(),
    );
    Ok(())
}
