//! Natural-language analysis of the latest simulation by an external model.
//!
//! Each [`AgentOperation`] pairs a fixed system prompt with the latest result.
//! The model's reply is opaque text; operations that ask for JSON attempt to
//! parse it and report `ok: false` with the raw text when parsing fails.

mod chat;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AgentConfig;
use crate::sim::SimulationResult;

pub use chat::ChatCompletions;

/// Failure to get a reply from the language model.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("language model is not configured")]
    NotConfigured,

    #[error("language model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("language model returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("language model returned no content")]
    EmptyReply,

    #[error("failed to encode simulation: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A chat-style language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends one system + user exchange and returns the reply text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, AgentError>;
}

/// What the agent is asked to do with the latest result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentOperation {
    /// Answer a free-text question.
    Ask,
    /// Propose battery and load settings.
    AutoTune,
    /// Predict the next few hours.
    Forecast,
    /// Write a narrative report.
    Report,
}

const ASK_PROMPT: &str = "You are an energy analyst for a small community microgrid with a \
solar plant, a battery, a hospital, a school and homes. Power is allocated by priority: \
hospital, then school, then homes. Answer the operator's question using only the simulation \
snapshot provided. Be concise and concrete, quote figures in kW.";

const AUTOTUNE_PROMPT: &str = "You tune a community microgrid (solar, battery, hospital, \
school, homes; priority hospital > school > homes). Given the simulation snapshot, propose \
settings that remove any shortage while keeping cost reasonable. Reply with JSON only, no prose, \
in the form {\"battery_capacity_kwh\": number, \"max_homes\": integer, \
\"actions\": [string], \"rationale\": string}.";

const FORECAST_PROMPT: &str = "You forecast the short-term state of a community microgrid \
(solar, battery, hospital, school, homes). Given the simulation snapshot, estimate the next \
three hours. Reply with JSON only, no prose, in the form {\"hours\": [{\"hour\": integer, \
\"solar_kw\": number, \"demand_kw\": number, \"shortage_risk\": \"low\"|\"medium\"|\"high\"}], \
\"summary\": string}.";

const REPORT_PROMPT: &str = "You write operator reports for a community microgrid serving a \
hospital, a school and homes. Given the simulation snapshot, write a short report with \
sections: Summary, Supply, Demand and Allocation, Risks, Recommendations. Plain text.";

impl AgentOperation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::AutoTune => "autotune",
            Self::Forecast => "forecast",
            Self::Report => "report",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::Ask => ASK_PROMPT,
            Self::AutoTune => AUTOTUNE_PROMPT,
            Self::Forecast => FORECAST_PROMPT,
            Self::Report => REPORT_PROMPT,
        }
    }

    /// Whether the reply is expected to be JSON.
    pub fn expects_json(self) -> bool {
        matches!(self, Self::AutoTune | Self::Forecast)
    }
}

/// Agent reply as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReply {
    /// False only when a JSON reply could not be parsed.
    pub ok: bool,
    pub operation: &'static str,
    /// Free-text reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Parsed JSON reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Unparseable reply text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl AgentReply {
    /// Interprets the model's reply text for `operation`.
    pub fn from_text(operation: AgentOperation, text: String) -> Self {
        let name = operation.name();
        if !operation.expects_json() {
            return Self {
                ok: true,
                operation: name,
                answer: Some(text),
                data: None,
                raw: None,
            };
        }

        match extract_json(&text) {
            Some(data) => Self {
                ok: true,
                operation: name,
                answer: None,
                data: Some(data),
                raw: None,
            },
            None => {
                warn!(operation = name, "model reply is not valid JSON");
                Self {
                    ok: false,
                    operation: name,
                    answer: None,
                    data: None,
                    raw: Some(text),
                }
            }
        }
    }
}

/// Parses a JSON object from a reply, tolerating code fences and prose
/// around the outermost braces.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return value.is_object().then_some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&trimmed[start..=end])
        .ok()
        .filter(Value::is_object)
}

/// Builds the user message: the snapshot, plus the question for `Ask`.
pub fn user_prompt(
    result: &SimulationResult,
    question: Option<&str>,
) -> Result<String, AgentError> {
    let snapshot = serde_json::to_string_pretty(result)?;
    Ok(match question {
        Some(q) => format!("Simulation snapshot:\n{snapshot}\n\nQuestion: {q}"),
        None => format!("Simulation snapshot:\n{snapshot}"),
    })
}

/// Front door for agent operations; holds the model if one is configured.
#[derive(Clone, Default)]
pub struct Agent {
    model: Option<Arc<dyn LanguageModel>>,
}

impl Agent {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model: Some(model) }
    }

    /// An agent that answers every operation with [`AgentError::NotConfigured`].
    pub fn disabled() -> Self {
        Self { model: None }
    }

    /// Builds the agent from configuration and the environment.
    ///
    /// A missing or empty API key disables the agent rather than failing.
    ///
    /// # Errors
    ///
    /// Returns an `AgentError` if the HTTP client cannot be built.
    pub fn from_config(cfg: &AgentConfig) -> Result<Self, AgentError> {
        let key = std::env::var(&cfg.api_key_env).unwrap_or_default();
        if key.trim().is_empty() {
            info!(env = %cfg.api_key_env, "no language model key set, agent routes disabled");
            return Ok(Self::disabled());
        }

        let model = ChatCompletions::new(
            &cfg.base_url,
            &cfg.model,
            key,
            cfg.temperature,
            Duration::from_secs(cfg.timeout_secs),
        )?;
        Ok(Self::new(Arc::new(model)))
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// Runs `operation` against `result`.
    ///
    /// # Errors
    ///
    /// Returns an `AgentError` if no model is configured or the model call
    /// fails. A reply that is not valid JSON is not an error.
    pub async fn run(
        &self,
        operation: AgentOperation,
        result: &SimulationResult,
        question: Option<&str>,
    ) -> Result<AgentReply, AgentError> {
        let model = self.model.as_ref().ok_or(AgentError::NotConfigured)?;
        let user = user_prompt(result, question)?;
        let text = model.complete(operation.system_prompt(), &user).await?;
        Ok(AgentReply::from_text(operation, text))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::sim::advisor::Alert;
    use crate::sim::types::Distribution;

    struct Scripted {
        reply: String,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl Scripted {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for Scripted {
        async fn complete(&self, system: &str, user: &str) -> Result<String, AgentError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            Ok(self.reply.clone())
        }
    }

    fn result() -> SimulationResult {
        SimulationResult {
            current_time: "19:00:00".to_string(),
            hour: 19,
            weather: "cloudy".to_string(),
            cloud_cover_percent: 60,
            sunrise_time: "06:00".to_string(),
            sunset_time: "18:00".to_string(),
            homes: 20,
            battery_capacity_kwh: 10.0,
            solar_power_kw: 0.0,
            battery_level_percent: 50,
            battery_support_kw: 5.0,
            total_demand_kw: 12.5,
            total_supply_kw: 5.0,
            distribution: Distribution {
                hospital_kw: 3.0,
                school_kw: 0.5,
                homes_kw: 1.5,
            },
            alert: Alert::Shortage,
            suggestions: vec!["⚡ Energy shortage: 7.50 kW.".to_string()],
        }
    }

    #[test]
    fn only_autotune_and_forecast_expect_json() {
        assert!(!AgentOperation::Ask.expects_json());
        assert!(AgentOperation::AutoTune.expects_json());
        assert!(AgentOperation::Forecast.expects_json());
        assert!(!AgentOperation::Report.expects_json());
    }

    #[test]
    fn extract_json_handles_fences_and_prose() {
        assert_eq!(
            extract_json("{\"a\": 1}"),
            Some(serde_json::json!({"a": 1}))
        );
        assert_eq!(
            extract_json("```json\n{\"a\": [1, 2]}\n```"),
            Some(serde_json::json!({"a": [1, 2]}))
        );
        assert_eq!(
            extract_json("Sure! Here it is: {\"b\": \"x\"} Hope that helps."),
            Some(serde_json::json!({"b": "x"}))
        );
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("[1, 2, 3]"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn unparseable_structured_reply_is_flagged() {
        let reply = AgentReply::from_text(AgentOperation::Forecast, "it will be fine".to_string());
        assert!(!reply.ok);
        assert_eq!(reply.raw.as_deref(), Some("it will be fine"));
        assert!(reply.data.is_none());
    }

    #[test]
    fn text_reply_is_always_ok() {
        let reply = AgentReply::from_text(AgentOperation::Report, "Summary: ...".to_string());
        assert!(reply.ok);
        assert_eq!(reply.answer.as_deref(), Some("Summary: ..."));
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json.get("raw").is_none());
        assert_eq!(json["operation"], "report");
    }

    #[test]
    fn user_prompt_embeds_snapshot_and_question() {
        let prompt = user_prompt(&result(), Some("Why is there a shortage?")).unwrap();
        assert!(prompt.contains("\"total_demand_kw\": 12.5"));
        assert!(prompt.ends_with("Question: Why is there a shortage?"));

        let prompt = user_prompt(&result(), None).unwrap();
        assert!(!prompt.contains("Question:"));
    }

    #[test]
    fn enabled_only_with_a_model() {
        assert!(!Agent::disabled().is_enabled());
        assert!(!Agent::default().is_enabled());
        assert!(Agent::new(Arc::new(Scripted::new("hi"))).is_enabled());
    }

    #[tokio::test]
    async fn disabled_agent_refuses() {
        let err = Agent::disabled()
            .run(AgentOperation::Ask, &result(), Some("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::NotConfigured));
    }

    #[tokio::test]
    async fn run_uses_operation_prompt() {
        let model = Arc::new(Scripted::new("{\"battery_capacity_kwh\": 20}"));
        let agent = Agent::new(model.clone());
        let reply = agent
            .run(AgentOperation::AutoTune, &result(), None)
            .await
            .unwrap();
        assert!(reply.ok);
        assert_eq!(reply.data, Some(serde_json::json!({"battery_capacity_kwh": 20})));

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, AgentOperation::AutoTune.system_prompt());
        assert!(seen[0].1.contains("\"alert\""));
    }
}
