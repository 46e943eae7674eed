use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{parse_recommended_term, AdvisoryError, AdvisoryGateway};
use crate::config::AdvisoryConfig;
use crate::workflows::financing::domain::{CreditProfile, FinancingOption};

/// Advisor backed by an OpenAI-style `responses` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAdvisor {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: String,
}

#[derive(Debug, Deserialize)]
struct ResponsesPayload {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesPayload {
    fn text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }

        self.output
            .into_iter()
            .flat_map(|item| item.content)
            .filter_map(|content| content.text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HttpAdvisor {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, AdvisoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers(api_key)?)
            .build()
            .map_err(|err| AdvisoryError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
        })
    }

    /// Builds a client when an API key is configured.
    pub fn from_config(config: &AdvisoryConfig) -> Result<Option<Self>, AdvisoryError> {
        match config.api_key.as_deref() {
            Some(key) => Self::new(&config.endpoint, &config.model, key, config.timeout).map(Some),
            None => Ok(None),
        }
    }
}

fn default_headers(api_key: &str) -> Result<HeaderMap, AdvisoryError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let bearer = HeaderValue::try_from(format!("Bearer {api_key}"))
        .map_err(|err| AdvisoryError::Transport(format!("invalid API key header: {err}")))?;
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

#[async_trait]
impl AdvisoryGateway for HttpAdvisor {
    async fn recommend(
        &self,
        menu: &[FinancingOption],
        profile: &CreditProfile,
    ) -> Result<Option<u32>, AdvisoryError> {
        let request = ResponsesRequest {
            model: &self.model,
            input: build_prompt(menu, profile),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| AdvisoryError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Transport(format!(
                "advisor returned HTTP {status}"
            )));
        }

        let payload: ResponsesPayload = response
            .json()
            .await
            .map_err(|err| AdvisoryError::Malformed(err.to_string()))?;
        let text = payload.text();
        debug!(response = %text, "advisor replied");

        parse_recommended_term(&text)
    }
}

pub(crate) fn build_prompt(menu: &[FinancingOption], profile: &CreditProfile) -> String {
    let mut prompt = String::from(
        "You help a car shopper pick a financing term. \
         Reply with only the number of months of the single best option, or NONE.\n",
    );
    let _ = writeln!(
        prompt,
        "Shopper: credit score {}, monthly income ${:.2}, vehicle price ${:.2}.",
        profile.credit_score, profile.monthly_income, profile.vehicle_price
    );
    prompt.push_str("Options:\n");
    for option in menu {
        let _ = writeln!(
            prompt,
            "- {} months at {:.2}% APR: ${:.2}/month",
            option.term_months,
            option.annual_rate * 100.0,
            option.monthly_payment
        );
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap as RequestHeaders, StatusCode};
    use axum::routing::post;
    use axum::Router;

    async fn spawn_advisor(router: Router) -> HttpAdvisor {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind local listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        // Local listener; keep any ambient HTTP proxy out of the way.
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(2))
            .default_headers(default_headers("sk-test").expect("headers"))
            .build()
            .expect("client builds");
        HttpAdvisor {
            client,
            endpoint: format!("http://{addr}/v1/responses"),
            model: "test-model".to_string(),
        }
    }

    fn sample_menu() -> Vec<FinancingOption> {
        vec![
            FinancingOption::new(36, 0.0565, 817.12),
            FinancingOption::new(48, 0.059, 636.02),
        ]
    }

    #[test]
    fn prompt_lists_every_option() {
        let menu = vec![
            FinancingOption::new(24, 0.054, 1189.37),
            FinancingOption::new(36, 0.0565, 817.12),
        ];
        let prompt = build_prompt(&menu, &CreditProfile::new(750, 6000.0, 30000.0));

        assert!(prompt.contains("credit score 750"));
        assert!(prompt.contains("- 24 months at 5.40% APR: $1189.37/month"));
        assert!(prompt.contains("- 36 months at 5.65% APR: $817.12/month"));
    }

    #[test]
    fn payload_text_prefers_output_text() {
        let payload: ResponsesPayload =
            serde_json::from_str(r#"{ "output_text": "48", "output": [] }"#).expect("json");
        assert_eq!(payload.text(), "48");

        let payload: ResponsesPayload = serde_json::from_str(
            r#"{ "output": [ { "type": "message", "content": [ { "type": "output_text", "text": "60 months" } ] } ] }"#,
        )
        .expect("json");
        assert_eq!(payload.text(), "60 months");
    }

    #[test]
    fn no_key_means_no_client() {
        let config = AdvisoryConfig {
            api_key: None,
            endpoint: "http://127.0.0.1:9/v1/responses".to_string(),
            model: "test".to_string(),
            timeout: Duration::from_millis(50),
        };
        assert!(HttpAdvisor::from_config(&config).expect("builds").is_none());
    }

    #[tokio::test]
    async fn reads_term_from_a_successful_reply() {
        let router = Router::new().route(
            "/v1/responses",
            post(|headers: RequestHeaders| async move {
                let authorized = headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    == Some("Bearer sk-test");
                if authorized {
                    (StatusCode::OK, r#"{ "output_text": "48 months" }"#)
                } else {
                    (StatusCode::UNAUTHORIZED, "{}")
                }
            }),
        );
        let advisor = spawn_advisor(router).await;

        let term = advisor
            .recommend(&sample_menu(), &CreditProfile::new(750, 6000.0, 30000.0))
            .await
            .expect("advisor answers");
        assert_eq!(term, Some(48));
    }

    #[tokio::test]
    async fn server_errors_are_transport_failures() {
        let router = Router::new().route(
            "/v1/responses",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
        let advisor = spawn_advisor(router).await;

        let error = advisor
            .recommend(&sample_menu(), &CreditProfile::new(750, 6000.0, 30000.0))
            .await
            .expect_err("500 is a failure");
        match error {
            AdvisoryError::Transport(message) => assert!(message.contains("500"), "{message}"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_bodies_are_malformed() {
        let router = Router::new().route(
            "/v1/responses",
            post(|| async { (StatusCode::OK, "<html>definitely not json</html>") }),
        );
        let advisor = spawn_advisor(router).await;

        let error = advisor
            .recommend(&sample_menu(), &CreditProfile::new(750, 6000.0, 30000.0))
            .await
            .expect_err("garbage body");
        assert!(matches!(error, AdvisoryError::Malformed(_)), "{error:?}");
    }
}
