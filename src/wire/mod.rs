use serde::{Deserialize, Serialize};

/// ========================================
/// Workflow endpoint payloads
/// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub prompt_name: String,
    pub prompt_template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub success: bool,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsResponse {
    pub success: bool,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of the generate call; `prompt` is the already-filled template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    pub prompt_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
    pub subject: String,
    pub content: String,
}

impl EmailRequest {
    pub fn for_response(address: &str, prompt_name: &str, content: &str) -> Self {
        Self {
            email: address.to_string(),
            subject: format!("AI Response: {prompt_name}"),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_request_uses_camel_case() {
        let req = GenerateRequest { prompt: "Welcome to Austin!".into(), prompt_name: "Intro".into() };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "prompt": "Welcome to Austin!", "promptName": "Intro" })
        );
    }

    #[test]
    fn failure_bodies_parse_without_payload() {
        let cats: CategoriesResponse = serde_json::from_value(json!({ "success": false })).unwrap();
        assert!(!cats.success);
        assert!(cats.categories.is_empty());

        let generated: GenerateResponse =
            serde_json::from_value(json!({ "success": false, "error": "model offline" })).unwrap();
        assert_eq!(generated.error.as_deref(), Some("model offline"));
        assert!(generated.response.is_none());
    }

    #[test]
    fn prompts_parse_from_service_shape() {
        let body = json!({
            "success": true,
            "prompts": [{ "promptName": "Intro", "promptTemplate": "Welcome to {{city}}!" }]
        });
        let parsed: PromptsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.prompts[0].prompt_name, "Intro");
        assert_eq!(parsed.prompts[0].prompt_template, "Welcome to {{city}}!");
    }

    #[test]
    fn email_subject_derives_from_prompt_name() {
        let req = EmailRequest::for_response("a@b.co", "Listing Blurb", "body");
        assert_eq!(req.subject, "AI Response: Listing Blurb");
        assert_eq!(req.content, "body");
    }
}
