//! Google Forms API client
//!
//! The choice-list refresh needs each question's position and question ID,
//! which only the form structure knows, so updates are a fetch followed by
//! one batchUpdate.

use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const FORMS_BASE_URL: &str = "https://forms.googleapis.com/v1/forms";
const USER_AGENT: &str = "evishare/0.1";

/// Forms client errors
#[derive(Debug, Error)]
pub enum FormsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Google Forms API client
pub struct GoogleFormsClient {
    http_client: reqwest::Client,
    token: String,
}

impl GoogleFormsClient {
    pub fn new(token: String) -> Result<Self, FormsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FormsError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, token })
    }

    /// Fetch the form structure as raw JSON.
    pub async fn get_form(&self, form_id: &str) -> Result<Value, FormsError> {
        let url = format!("{}/{}", FORMS_BASE_URL, form_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| FormsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FormsError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| FormsError::ParseError(e.to_string()))
    }

    /// Apply a batchUpdate request list. No-op for an empty list.
    pub async fn batch_update(&self, form_id: &str, requests: Vec<Value>) -> Result<(), FormsError> {
        if requests.is_empty() {
            return Ok(());
        }

        let url = format!("{}/{}:batchUpdate", FORMS_BASE_URL, form_id);

        tracing::debug!(form_id = form_id, requests = requests.len(), "Updating form");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| FormsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FormsError::ApiError(status.as_u16(), error_text));
        }

        Ok(())
    }
}

/// Locate a choice question by item ID. Returns its position in the item
/// list and its question ID, both required by UpdateItem.
pub fn find_choice_item(form: &Value, item_id: &str) -> Option<(u32, String)> {
    let items = form.get("items")?.as_array()?;
    items.iter().enumerate().find_map(|(index, item)| {
        if item.get("itemId").and_then(|v| v.as_str()) != Some(item_id) {
            return None;
        }
        let question_id = item
            .get("questionItem")?
            .get("question")?
            .get("questionId")?
            .as_str()?;
        Some((index as u32, question_id.to_string()))
    })
}

/// UpdateItem request replacing a choice question's whole option list with
/// the given values plus the free-text "other" option.
pub fn choice_update_request(
    index: u32,
    item_id: &str,
    question_id: &str,
    values: &[String],
) -> Value {
    let mut options: Vec<Value> = values.iter().map(|v| json!({ "value": v })).collect();
    options.push(json!({ "isOther": true }));

    json!({
        "updateItem": {
            "item": {
                "itemId": item_id,
                "questionItem": {
                    "question": {
                        "questionId": question_id,
                        "choiceQuestion": { "options": options }
                    }
                }
            },
            "location": { "index": index },
            "updateMask": "questionItem.question.choiceQuestion.options"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> Value {
        json!({
            "formId": "form-1",
            "items": [
                { "itemId": "title-item", "pageBreakItem": {} },
                {
                    "itemId": "submitter-item",
                    "questionItem": { "question": {
                        "questionId": "q-submitter",
                        "choiceQuestion": { "type": "DROP_DOWN", "options": [] }
                    }}
                },
                {
                    "itemId": "aff-item",
                    "questionItem": { "question": {
                        "questionId": "q-aff",
                        "choiceQuestion": { "type": "CHECKBOX", "options": [] }
                    }}
                }
            ]
        })
    }

    #[test]
    fn test_find_choice_item() {
        let form = sample_form();
        assert_eq!(
            find_choice_item(&form, "aff-item"),
            Some((2, "q-aff".to_string()))
        );
    }

    #[test]
    fn test_find_choice_item_missing() {
        let form = sample_form();
        assert_eq!(find_choice_item(&form, "nope"), None);
    }

    #[test]
    fn test_choice_update_request_appends_other_option() {
        let request = choice_update_request(
            2,
            "aff-item",
            "q-aff",
            &["Equality".to_string(), "Economy".to_string()],
        );

        let options = request["updateItem"]["item"]["questionItem"]["question"]["choiceQuestion"]
            ["options"]
            .as_array()
            .unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0]["value"], "Equality");
        assert_eq!(options[2]["isOther"], true);
        assert_eq!(request["updateItem"]["location"]["index"], 2);
        assert_eq!(
            request["updateItem"]["updateMask"],
            "questionItem.question.choiceQuestion.options"
        );
    }
}
