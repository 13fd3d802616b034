//! Voice calling API client.
//!
//! One outbound phone call per task. The assistant is either a preconfigured
//! remote assistant (variables passed as overrides) or an inline assistant
//! built from the call's purpose. Structured call analysis carries the
//! quotation or booking outcome.

use repairdesk_core::{BookingOutcome, Quotation, TaskState, VoiceConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::RemoteError;
use crate::parse::{parse_flag, parse_price, parse_text, truncate};
use crate::research::checked_body;
use crate::types::{BookingCallRequest, CallReport, QuoteCallRequest, TaskOutput, TaskStatus};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCallRequest {
    phone_number_id: String,
    customer: Customer,
    #[serde(skip_serializing_if = "Option::is_none")]
    assistant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assistant: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assistant_overrides: Option<Value>,
}

#[derive(Serialize)]
struct Customer {
    number: String,
    name: String,
}

#[derive(Deserialize)]
struct CallCreated {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallResponse {
    status: String,
    #[serde(default)]
    ended_reason: Option<String>,
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    analysis: Option<CallAnalysis>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallAnalysis {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    structured_data: Option<Value>,
}

/// Which structured fields to extract from an ended call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPurpose {
    Quote,
    Booking,
}

pub struct VoiceClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    phone_number_id: String,
    assistant_id: Option<String>,
}

impl std::fmt::Debug for VoiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("phone_number_id", &self.phone_number_id)
            .field("assistant_id", &self.assistant_id)
            .finish()
    }
}

impl VoiceClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: &VoiceConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| RemoteError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            phone_number_id: config.phone_number_id.clone(),
            assistant_id: config.assistant_id.clone(),
        })
    }

    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn create_quote_call(&self, request: &QuoteCallRequest) -> Result<String, RemoteError> {
        let variables = json!({
            "shopName": request.shop.name,
            "damageDescription": request.damage_description,
        });
        let system = format!(
            "You are calling {shop} on behalf of a customer to get a repair quote. \
             The damage: {damage}. Ask for a price estimate and how long the repair \
             would take. Be brief and polite, and end the call once you have the quote \
             or the shop declines.",
            shop = request.shop.name,
            damage = request.damage_description,
        );
        let schema = json!({
            "type": "object",
            "properties": {
                "price": {"type": "number", "description": "Quoted price in US dollars"},
                "estimatedDuration": {"type": "string", "description": "Estimated repair time"},
                "notes": {"type": "string"}
            }
        });
        self.create_call(&request.shop.phone, &request.shop.name, variables, &system, schema).await
    }

    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn create_booking_call(
        &self,
        request: &BookingCallRequest,
    ) -> Result<String, RemoteError> {
        let variables = json!({
            "shopName": request.shop.name,
            "customerName": request.customer_name,
            "customerPhone": request.customer_phone,
            "damageDescription": request.damage_description,
            "requestedDate": request.requested_date,
        });
        let system = format!(
            "You are calling {shop} to book a repair appointment for {customer} \
             (callback number {phone}). The damage: {damage}. Ask for an appointment \
             on {date} or the closest available slot. Confirm the date, time and any \
             confirmation number or drop-off instructions before ending the call.",
            shop = request.shop.name,
            customer = request.customer_name,
            phone = request.customer_phone,
            damage = request.damage_description,
            date = request.requested_date,
        );
        let schema = json!({
            "type": "object",
            "properties": {
                "appointmentBooked": {"type": "boolean"},
                "appointmentDate": {"type": "string"},
                "appointmentTime": {"type": "string"},
                "confirmationNumber": {"type": "string"},
                "instructions": {"type": "string"}
            },
            "required": ["appointmentBooked"]
        });
        self.create_call(&request.shop.phone, &request.shop.name, variables, &system, schema).await
    }

    async fn create_call(
        &self,
        number: &str,
        name: &str,
        variables: Value,
        system_prompt: &str,
        schema: Value,
    ) -> Result<String, RemoteError> {
        let (assistant, assistant_overrides) = if self.assistant_id.is_some() {
            (None, Some(json!({ "variableValues": variables })))
        } else {
            let assistant = json!({
                "firstMessage": "Hi, I'm calling about a vehicle repair.",
                "model": {
                    "provider": "openai",
                    "model": "gpt-4o",
                    "messages": [{"role": "system", "content": system_prompt}]
                },
                "analysisPlan": {"structuredDataSchema": schema}
            });
            (Some(assistant), None)
        };
        let request = CreateCallRequest {
            phone_number_id: self.phone_number_id.clone(),
            customer: Customer { number: normalize_phone(number), name: name.to_owned() },
            assistant_id: self.assistant_id.clone(),
            assistant,
            assistant_overrides,
        };

        let response = self
            .client
            .post(format!("{}/call", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let body = checked_body(response).await?;
        let created: CallCreated = serde_json::from_str(&body).map_err(|e| RemoteError::JsonParse {
            context: format!("create call response (body: {})", truncate(&body, 200)),
            source: e,
        })?;
        Ok(created.id)
    }

    /// # Errors
    /// Returns an error on transport failure, a non-success status or an
    /// unknown call status.
    pub async fn status(&self, call_id: &str, purpose: CallPurpose) -> Result<TaskStatus, RemoteError> {
        let response = self
            .client
            .get(format!("{}/call/{call_id}", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let body = checked_body(response).await?;
        let call: CallResponse = serde_json::from_str(&body).map_err(|e| RemoteError::JsonParse {
            context: format!("call status (body: {})", truncate(&body, 200)),
            source: e,
        })?;
        let state = map_call_status(&call.status, call.ended_reason.as_deref())?;
        if state == TaskState::Pending {
            return Ok(TaskStatus::pending());
        }

        let (analysis_summary, structured) = match call.analysis {
            Some(a) => (a.summary, a.structured_data),
            None => (None, None),
        };
        let report = CallReport {
            transcript: call.transcript,
            summary: analysis_summary.or(call.summary),
            ended_reason: call.ended_reason,
        };
        let output = match purpose {
            CallPurpose::Quote => TaskOutput::Quote {
                report,
                quotation: structured.as_ref().and_then(extract_quotation),
            },
            CallPurpose::Booking => TaskOutput::Booking {
                report,
                outcome: structured.as_ref().map(extract_booking),
            },
        };
        Ok(TaskStatus { state, output: Some(output) })
    }
}

fn map_call_status(status: &str, ended_reason: Option<&str>) -> Result<TaskState, RemoteError> {
    match status {
        "scheduled" | "queued" | "ringing" | "in-progress" | "forwarding" => Ok(TaskState::Pending),
        "failed" => Ok(TaskState::Failed),
        "ended" => {
            let errored = ended_reason.is_some_and(|r| r.contains("error") || r.contains("failed"));
            Ok(if errored { TaskState::Failed } else { TaskState::Succeeded })
        },
        other => Err(RemoteError::MalformedResponse(format!("unknown call status '{other}'"))),
    }
}

fn extract_quotation(data: &Value) -> Option<Quotation> {
    let price = data.get("price").and_then(parse_price)?;
    Some(Quotation {
        price,
        estimated_duration: parse_text(data.get("estimatedDuration")),
        notes: parse_text(data.get("notes")),
    })
}

fn extract_booking(data: &Value) -> BookingOutcome {
    BookingOutcome {
        appointment_booked: parse_flag(data.get("appointmentBooked")),
        appointment_date: parse_text(data.get("appointmentDate")),
        appointment_time: parse_text(data.get("appointmentTime")),
        confirmation_number: parse_text(data.get("confirmationNumber")),
        instructions: parse_text(data.get("instructions")),
    }
}

/// Keeps digits and a leading `+`; bare 10-digit numbers get a `+1` prefix.
fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if raw.trim_start().starts_with('+') {
        format!("+{digits}")
    } else if digits.len() == 10 {
        format!("+1{digits}")
    } else {
        format!("+{digits}")
    }
}
