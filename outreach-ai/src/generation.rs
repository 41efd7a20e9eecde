//! Message generation contract
//!
//! Shapes a [`GenerationRequest`] into a provider conversation and
//! normalizes whatever the provider answers into a [`GeneratedMessage`].

use crate::error::{GenerationError, Result};
use crate::llm::{CompletionOptions, LlmEngine, Message};
use crate::types::{Channel, LeadData, MessageType, Tone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Validated request for a generator-backed draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub lead_data: LeadData,
    pub channel: Channel,
    pub message_type: MessageType,
    pub tone: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

/// Wire body of `POST /generate-message`, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPayload {
    pub lead_data: Option<LeadData>,
    pub channel: Option<String>,
    pub message_type: Option<String>,
    pub tone: Option<String>,
    pub custom_prompt: Option<String>,
}

impl GenerationPayload {
    /// Check required fields and parse the vocabulary strings
    pub fn validate(self) -> Result<GenerationRequest> {
        let (Some(lead_data), Some(channel), Some(message_type), Some(tone)) =
            (self.lead_data, self.channel, self.message_type, self.tone)
        else {
            return Err(GenerationError::InvalidRequest(
                "Missing required fields".to_string(),
            ));
        };

        if lead_data.name.trim().is_empty() {
            return Err(GenerationError::InvalidRequest(
                "leadData.name is required".to_string(),
            ));
        }

        let invalid = |e: crate::types::UnknownVariant| GenerationError::InvalidRequest(e.to_string());

        Ok(GenerationRequest {
            lead_data,
            channel: channel.parse().map_err(invalid)?,
            message_type: message_type.parse().map_err(invalid)?,
            tone: tone.parse().map_err(invalid)?,
            custom_prompt: self.custom_prompt,
        })
    }
}

/// Draft produced by a generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMessage {
    pub subject: Option<String>,
    pub content: String,
}

/// Anything able to turn a request into a draft
#[async_trait::async_trait]
pub trait DraftGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedMessage>;

    /// Short description for logs
    fn describe(&self) -> String;
}

fn or_unknown(value: &Option<String>) -> &str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
}

/// Build the (system, user) prompt pair for a request
pub fn build_prompts(request: &GenerationRequest) -> (String, String) {
    let lead = &request.lead_data;
    let channel = request.channel.label();

    let system = format!(
        "You are an expert outreach specialist. Write personalized {channel} messages that are:\n\
         - {tone} in tone\n\
         - tailored to the {industry} industry\n\
         - suited to a {message_type} message\n\
         - personalized for {name} at {company}\n\
         - engaging and likely to get a response\n\n\
         Emails need a subject line. LinkedIn messages stay under 300 characters. \
         Social media and SMS messages are short and conversational.",
        tone = request.tone.as_str(),
        industry = or_unknown(&lead.industry),
        message_type = request.message_type.label(),
        name = lead.name,
        company = or_unknown(&lead.company),
    );

    let mut user = format!(
        "Write a {message_type} {channel} message for:\n\
         Name: {name}\n\
         Company: {company}\n\
         Title: {title}\n\
         Industry: {industry}\n",
        message_type = request.message_type.label(),
        name = lead.name,
        company = or_unknown(&lead.company),
        title = or_unknown(&lead.title),
        industry = or_unknown(&lead.industry),
    );

    if let Some(custom) = request
        .custom_prompt
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        user.push_str(&format!("\nAdditional instructions: {}\n", custom));
    }

    user.push_str(
        "\nAnswer with a JSON object of this exact shape:\n\
         {\n  \"subject\": \"subject line, or null when the channel is not email\",\n  \"content\": \"message content\"\n}",
    );

    (system, user)
}

/// Subject used when the provider output could not be parsed
pub fn fallback_subject(lead: &LeadData) -> String {
    let company = lead
        .company
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("your company");
    format!("Quick question about {}", company)
}

/// Interpret raw provider text
///
/// A JSON object with a string `content` is taken as-is. Anything else
/// becomes the content verbatim, with a synthesized subject for email.
pub fn normalize_output(raw: &str, request: &GenerationRequest) -> GeneratedMessage {
    if let Ok(serde_json::Value::Object(object)) = serde_json::from_str(raw.trim()) {
        if let Some(content) = object.get("content").and_then(|c| c.as_str()) {
            return GeneratedMessage {
                subject: object
                    .get("subject")
                    .and_then(|s| s.as_str())
                    .map(str::to_string),
                content: content.to_string(),
            };
        }
    }

    warn!(
        "Provider output is not a draft object, using raw text ({} bytes)",
        raw.len()
    );

    GeneratedMessage {
        subject: request
            .channel
            .supports_subject()
            .then(|| fallback_subject(&request.lead_data)),
        content: raw.to_string(),
    }
}

/// Generator backed by an LLM provider
pub struct MessageGenerator {
    llm: Arc<dyn LlmEngine>,
    options: CompletionOptions,
}

impl MessageGenerator {
    pub fn new(llm: Arc<dyn LlmEngine>) -> Self {
        Self {
            llm,
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait::async_trait]
impl DraftGenerator for MessageGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedMessage> {
        let (system, user) = build_prompts(request);

        info!(
            "Generating {} {} message for {}",
            request.message_type,
            request.channel,
            request.lead_data.name
        );

        let response = self
            .llm
            .generate(vec![Message::system(system), Message::user(user)], self.options)
            .await
            .map_err(|e| {
                warn!("Provider call failed: {:#}", e);
                GenerationError::Unavailable(e.to_string())
            })?;

        debug!("Provider finished with reason {}", response.finish_reason);

        Ok(normalize_output(&response.text, request))
    }

    fn describe(&self) -> String {
        format!("llm:{}", self.llm.model_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;

    fn request(channel: Channel) -> GenerationRequest {
        GenerationRequest {
            lead_data: LeadData::new("John Smith")
                .with_company("Acme")
                .with_title("VP of Marketing")
                .with_industry("SaaS"),
            channel,
            message_type: MessageType::ColdOutreach,
            tone: Tone::Friendly,
            custom_prompt: None,
        }
    }

    #[tokio::test]
    async fn test_parsed_json_is_returned_exactly() {
        let generator =
            MessageGenerator::new(Arc::new(MockLlm::replying(r#"{"subject":"S","content":"C"}"#)));

        let message = generator.generate(&request(Channel::Email)).await.unwrap();

        assert_eq!(
            message,
            GeneratedMessage {
                subject: Some("S".to_string()),
                content: "C".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_plain_text_for_non_email_has_no_subject() {
        let generator = MessageGenerator::new(Arc::new(MockLlm::replying("Hello world")));

        let message = generator.generate(&request(Channel::Linkedin)).await.unwrap();

        assert_eq!(message.subject, None);
        assert_eq!(message.content, "Hello world");
    }

    #[tokio::test]
    async fn test_plain_text_for_email_gets_company_subject() {
        let generator = MessageGenerator::new(Arc::new(MockLlm::replying("Hi John, quick note.")));

        let message = generator.generate(&request(Channel::Email)).await.unwrap();

        let subject = message.subject.unwrap();
        assert!(subject.contains("Acme"));
        assert_eq!(message.content, "Hi John, quick note.");
    }

    #[tokio::test]
    async fn test_provider_failure_is_unavailable() {
        let generator = MessageGenerator::new(Arc::new(MockLlm::failing("HTTP 500")));

        let result = generator.generate(&request(Channel::Email)).await;

        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }

    #[test]
    fn test_json_without_content_falls_back() {
        let message = normalize_output(r#"{"subject":"S"}"#, &request(Channel::Sms));
        assert_eq!(message.subject, None);
        assert_eq!(message.content, r#"{"subject":"S"}"#);

        let message = normalize_output("[1, 2]", &request(Channel::Email));
        assert_eq!(message.subject.as_deref(), Some("Quick question about Acme"));
    }

    #[test]
    fn test_null_subject_is_kept_null() {
        let message = normalize_output(
            r#"{"subject": null, "content": "Short DM"}"#,
            &request(Channel::Instagram),
        );
        assert_eq!(message.subject, None);
        assert_eq!(message.content, "Short DM");
    }

    #[test]
    fn test_fallback_subject_without_company() {
        let lead = LeadData::new("Jane");
        assert_eq!(fallback_subject(&lead), "Quick question about your company");
    }

    #[test]
    fn test_prompts_carry_request_context() {
        let mut req = request(Channel::Linkedin);
        req.custom_prompt = Some("Mention our webinar".to_string());

        let (system, user) = build_prompts(&req);

        assert!(system.contains("friendly in tone"));
        assert!(system.contains("SaaS industry"));
        assert!(system.contains("John Smith at Acme"));
        assert!(user.contains("Title: VP of Marketing"));
        assert!(user.contains("Additional instructions: Mention our webinar"));
        assert!(user.contains("\"content\""));
    }

    #[test]
    fn test_blank_custom_prompt_is_omitted() {
        let mut req = request(Channel::Email);
        req.custom_prompt = Some("   ".to_string());

        let (_, user) = build_prompts(&req);

        assert!(!user.contains("Additional instructions"));
    }

    #[test]
    fn test_payload_validation() {
        let payload: GenerationPayload = serde_json::from_value(serde_json::json!({
            "leadData": {"name": "John", "company": "Acme"},
            "channel": "email",
            "messageType": "follow_up",
            "tone": "direct",
            "customPrompt": "keep it short"
        }))
        .unwrap();
        let request = payload.validate().unwrap();
        assert_eq!(request.channel, Channel::Email);
        assert_eq!(request.message_type, MessageType::FollowUp);
        assert_eq!(request.tone, Tone::Direct);
        assert_eq!(request.lead_data.title, None);

        let missing: GenerationPayload = serde_json::from_value(serde_json::json!({
            "leadData": {"name": "John"},
            "channel": "email"
        }))
        .unwrap();
        assert!(matches!(
            missing.validate(),
            Err(GenerationError::InvalidRequest(_))
        ));

        let unknown: GenerationPayload = serde_json::from_value(serde_json::json!({
            "leadData": {"name": "John"},
            "channel": "fax",
            "messageType": "follow_up",
            "tone": "direct"
        }))
        .unwrap();
        assert!(unknown.validate().is_err());
    }
}
