use tariff_core::LeadSubmission;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("lead webhook is not configured")]
    NotConfigured,

    #[error("submission failed: {0}")]
    Request(String),
}

/// Posts a lead to the webhook.
///
/// The response is not inspected: any completed request counts as sent.
pub async fn submit_lead(
    client: &reqwest::Client,
    webhook_url: Option<&str>,
    submission: &LeadSubmission,
) -> Result<(), SubmitError> {
    let url = webhook_url.ok_or(SubmitError::NotConfigured)?;

    let response = client
        .post(url)
        .json(submission)
        .send()
        .await
        .map_err(|e| {
            warn!(id = %submission.id, error = %e, "lead submission failed");
            SubmitError::Request(e.to_string())
        })?;

    debug!(
        id = %submission.id,
        form_type = submission.form_type.as_str(),
        status = response.status().as_u16(),
        "lead submitted"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::http_client;
    use crate::data::test_server::serve_once;
    use tariff_core::FormType;

    fn submission() -> LeadSubmission {
        LeadSubmission {
            id: "popup-1".to_string(),
            title: "Stay informed".to_string(),
            form_type: FormType::Popup,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            company: String::new(),
        }
    }

    #[tokio::test]
    async fn posts_json_payload() {
        let (url, request) = serve_once("200 OK", "{}").await;
        let client = http_client().expect("client");

        submit_lead(&client, Some(&url), &submission())
            .await
            .expect("sent");

        let request = request.await.expect("request captured");
        assert!(request.starts_with("POST /countries.json"));
        let body = request.split("\r\n\r\n").nth(1).expect("body");
        let json: serde_json::Value = serde_json::from_str(body).expect("json body");
        assert_eq!(json["formType"], "popup");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["company"], "");
    }

    #[tokio::test]
    async fn error_status_still_counts_as_sent() {
        let (url, _request) = serve_once("500 Internal Server Error", "").await;
        let client = http_client().expect("client");

        assert!(submit_lead(&client, Some(&url), &submission()).await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_webhook_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let url = format!("http://{}/lead", listener.local_addr().expect("addr"));
        drop(listener);
        let client = http_client().expect("client");

        let err = submit_lead(&client, Some(&url), &submission())
            .await
            .expect_err("connection refused");
        assert!(matches!(err, SubmitError::Request(_)));
    }

    #[tokio::test]
    async fn missing_webhook_is_not_configured() {
        let client = http_client().expect("client");
        let err = submit_lead(&client, None, &submission())
            .await
            .expect_err("no url");
        assert!(matches!(err, SubmitError::NotConfigured));
    }
}
