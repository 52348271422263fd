//! Slack notification sink.
//!
//! Delivers message text to a single configured Slack channel through the
//! `chat.postMessage` Web API. One HTTP POST per send, no retry: transport
//! failures, non-2xx responses and `"ok": false` bodies all surface as
//! `NotifyError` for the caller to log.

use crate::{NotifierFactory, NotifierInterface, NotifierRegistry, NotifyError};
use async_trait::async_trait;
use baedal_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, SecretString, ValidationError,
};
use serde::Deserialize;

/// Default Slack Web API endpoint for posting messages.
const DEFAULT_API_URL: &str = "https://slack.com/api/chat.postMessage";

/// Safety bound on the HTTP client itself; the dispatching service applies
/// the configured (tighter) per-send timeout on top.
const CLIENT_TIMEOUT_SECS: u64 = 30;

/// Slack-backed notifier implementation.
pub struct SlackNotifier {
	/// Shared HTTP client with connection pooling.
	client: reqwest::Client,
	/// Channel id the messages are posted to.
	channel: String,
	/// Bot token used as the bearer credential.
	token: SecretString,
	/// API endpoint; overridable for tests and staging.
	api_url: String,
}

/// The subset of the `chat.postMessage` response the sink inspects.
#[derive(Debug, Deserialize)]
struct SlackResponse {
	ok: bool,
	error: Option<String>,
}

impl SlackNotifier {
	/// Creates a new SlackNotifier.
	pub fn new(
		channel: String,
		token: SecretString,
		api_url: Option<String>,
	) -> Result<Self, NotifyError> {
		let client = reqwest::Client::builder()
			.timeout(std::time::Duration::from_secs(CLIENT_TIMEOUT_SECS))
			.build()
			.map_err(|e| NotifyError::Configuration(e.to_string()))?;

		Ok(Self {
			client,
			channel,
			token,
			api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
		})
	}
}

#[async_trait]
impl NotifierInterface for SlackNotifier {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(SlackNotifierSchema)
	}

	async fn send(&self, text: &str) -> Result<(), NotifyError> {
		let response = self
			.client
			.post(&self.api_url)
			.bearer_auth(self.token.expose_secret())
			.json(&serde_json::json!({
				"channel": self.channel,
				"text": text,
			}))
			.send()
			.await
			.map_err(|e| NotifyError::Network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(NotifyError::Api(format!("HTTP {}", status)));
		}

		let body: SlackResponse = response
			.json()
			.await
			.map_err(|e| NotifyError::Network(e.to_string()))?;

		if !body.ok {
			return Err(NotifyError::Api(
				body.error.unwrap_or_else(|| "unknown error".to_string()),
			));
		}

		Ok(())
	}
}

/// Configuration schema for SlackNotifier.
pub struct SlackNotifierSchema;

impl ConfigSchema for SlackNotifierSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let non_empty = |v: &toml::Value| {
			if v.as_str().is_some_and(|s| s.is_empty()) {
				Err("must not be empty".to_string())
			} else {
				Ok(())
			}
		};

		let schema = Schema::new(
			vec![
				Field::new("channel", FieldType::String).with_validator(non_empty),
				Field::new("token", FieldType::String).with_validator(non_empty),
			],
			vec![Field::new("api_url", FieldType::String)],
		);
		schema.validate(config)
	}
}

/// Registry for the Slack notifier implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "slack";
	type Factory = NotifierFactory;

	fn factory() -> Self::Factory {
		create_notifier
	}
}

impl NotifierRegistry for Registry {}

/// Factory function to create a Slack notifier from configuration.
///
/// Configuration parameters:
/// - `channel` (required): channel id to post to.
/// - `token` (required): bot token, typically supplied via `${SLACK_TOKEN}`.
/// - `api_url` (optional): endpoint override for tests/staging.
pub fn create_notifier(config: &toml::Value) -> Result<Box<dyn NotifierInterface>, NotifyError> {
	let channel = config
		.get("channel")
		.and_then(|v| v.as_str())
		.ok_or_else(|| NotifyError::Configuration("channel is required".to_string()))?;
	let token = config
		.get("token")
		.and_then(|v| v.as_str())
		.ok_or_else(|| NotifyError::Configuration("token is required".to_string()))?;
	let api_url = config
		.get("api_url")
		.and_then(|v| v.as_str())
		.map(str::to_string);

	Ok(Box::new(SlackNotifier::new(
		channel.to_string(),
		SecretString::from(token),
		api_url,
	)?))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(s: &str) -> toml::Value {
		toml::from_str(s).unwrap()
	}

	#[test]
	fn schema_requires_channel_and_token() {
		let schema = SlackNotifierSchema;

		let ok = parse("channel = \"C0123\"\ntoken = \"xoxb-test\"");
		assert!(schema.validate(&ok).is_ok());

		let missing_token = parse("channel = \"C0123\"");
		assert!(schema.validate(&missing_token).is_err());

		let empty_channel = parse("channel = \"\"\ntoken = \"xoxb-test\"");
		assert!(schema.validate(&empty_channel).is_err());
	}

	#[test]
	fn factory_rejects_missing_fields() {
		let err = match create_notifier(&parse("channel = \"C0123\"")) {
			Ok(_) => panic!("expected error"),
			Err(e) => e,
		};
		assert!(matches!(err, NotifyError::Configuration(m) if m.contains("token")));
	}

	#[test]
	fn factory_accepts_api_url_override() {
		let config = parse(
			"channel = \"C0123\"\ntoken = \"xoxb-test\"\napi_url = \"http://127.0.0.1:9/slack\"",
		);
		assert!(create_notifier(&config).is_ok());
	}
}
