//! Web research API client (browsing agent tasks).

use repairdesk_core::{MAX_SEARCH_RESULTS, ResearchConfig, Shop, TaskState};
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::parse::{strip_markdown_json, truncate};
use crate::types::{ResearchRequest, TaskOutput, TaskStatus};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
struct RunTaskRequest<'a> {
    task: &'a str,
}

#[derive(Deserialize)]
struct RunTaskResponse {
    id: String,
}

#[derive(Deserialize)]
struct TaskResponse {
    status: String,
    #[serde(default)]
    output: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ShopsJson {
    List(Vec<Shop>),
    Wrapped { shops: Vec<Shop> },
}

pub struct ResearchClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for ResearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ResearchClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: &ResearchConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| RemoteError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Starts a research task and returns its remote id.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn create(&self, request: &ResearchRequest) -> Result<String, RemoteError> {
        let prompt = build_research_prompt(request);
        let response = self
            .client
            .post(format!("{}/api/v1/run-task", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&RunTaskRequest { task: &prompt })
            .send()
            .await?;
        let body = checked_body(response).await?;
        let created: RunTaskResponse = serde_json::from_str(&body).map_err(|e| {
            RemoteError::JsonParse {
                context: format!("run-task response (body: {})", truncate(&body, 200)),
                source: e,
            }
        })?;
        Ok(created.id)
    }

    /// # Errors
    /// Returns an error on transport failure, a non-success status, an
    /// unknown status string or an unparseable shop list.
    pub async fn status(&self, task_id: &str) -> Result<TaskStatus, RemoteError> {
        let response = self
            .client
            .get(format!("{}/api/v1/task/{task_id}", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let body = checked_body(response).await?;
        let task: TaskResponse = serde_json::from_str(&body).map_err(|e| RemoteError::JsonParse {
            context: format!("task status (body: {})", truncate(&body, 200)),
            source: e,
        })?;

        let state = map_research_status(&task.status)?;
        let output = match state {
            TaskState::Succeeded => {
                let shops = task.output.as_deref().map(parse_shops).transpose()?;
                Some(TaskOutput::Shops(shops.unwrap_or_default()))
            },
            TaskState::Pending | TaskState::Failed => None,
        };
        Ok(TaskStatus { state, output })
    }
}

pub(crate) async fn checked_body(response: reqwest::Response) -> Result<String, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.text().await?);
    }
    let body = response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
    Err(RemoteError::HttpStatus { code: status.as_u16(), body })
}

fn map_research_status(status: &str) -> Result<TaskState, RemoteError> {
    match status.to_lowercase().as_str() {
        "created" | "queued" | "running" | "paused" => Ok(TaskState::Pending),
        "finished" | "succeeded" | "completed" => Ok(TaskState::Succeeded),
        "failed" | "stopped" => Ok(TaskState::Failed),
        other => Err(RemoteError::MalformedResponse(format!("unknown research status '{other}'"))),
    }
}

/// Parses the agent's final answer into shops, keeping named entries only.
pub(crate) fn parse_shops(output: &str) -> Result<Vec<Shop>, RemoteError> {
    let content = strip_markdown_json(output);
    let parsed: ShopsJson = serde_json::from_str(content).map_err(|e| RemoteError::JsonParse {
        context: format!("research output (content: {})", truncate(content, 300)),
        source: e,
    })?;
    let shops = match parsed {
        ShopsJson::List(shops) | ShopsJson::Wrapped { shops } => shops,
    };
    Ok(shops
        .into_iter()
        .filter(|s| !s.name.trim().is_empty())
        .take(MAX_SEARCH_RESULTS)
        .collect())
}

fn build_research_prompt(request: &ResearchRequest) -> String {
    let coordinates = match (request.latitude, request.longitude) {
        (Some(lat), Some(lon)) => format!(" (coordinates {lat:.5}, {lon:.5})"),
        _ => String::new(),
    };
    format!(
        r#"Find up to {max} auto body and repair shops within {radius} miles of {location}{coordinates} that can fix this damage: {damage}

Prefer shops with good reviews and a listed phone number.
Return ONLY a JSON array where each element has:
- name: shop name
- phone: phone number in international format
- address: street address
- rating: average review rating (number, optional)
- review_count: number of reviews (optional)
- website: website URL (optional)
- specialties: array of relevant services (optional)"#,
        max = MAX_SEARCH_RESULTS,
        radius = request.radius_miles,
        location = request.location,
        damage = request.damage_description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_research_status() {
        assert_eq!(map_research_status("created").unwrap(), TaskState::Pending);
        assert_eq!(map_research_status("Running").unwrap(), TaskState::Pending);
        assert_eq!(map_research_status("finished").unwrap(), TaskState::Succeeded);
        assert_eq!(map_research_status("stopped").unwrap(), TaskState::Failed);
        assert!(map_research_status("exploded").is_err());
    }

    #[test]
    fn test_parse_shops_accepts_list_and_wrapped() {
        let list = parse_shops(r#"```json
[{"name": "A", "phone": "+1"}, {"name": "  "}]
```"#)
        .unwrap();
        assert_eq!(list.len(), 1);

        let wrapped = parse_shops(r#"{"shops": [{"name": "B", "rating": 4.5}]}"#).unwrap();
        assert_eq!(wrapped[0].rating, Some(4.5));
    }

    #[test]
    fn test_parse_shops_rejects_prose() {
        assert!(parse_shops("I could not find any shops.").is_err());
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = build_research_prompt(&ResearchRequest {
            location: "Fresno, CA".to_owned(),
            damage_description: "rear bumper dent".to_owned(),
            radius_miles: 15,
            latitude: Some(36.7378),
            longitude: Some(-119.7871),
        });
        assert!(prompt.contains("within 15 miles of Fresno, CA"));
        assert!(prompt.contains("rear bumper dent"));
        assert!(prompt.contains("36.73780"));
    }
}
