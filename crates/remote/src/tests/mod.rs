//! HTTP-level tests for the research and voice clients.

use repairdesk_core::{ResearchConfig, ShopContact, VoiceConfig};
use wiremock::MockServer;

use crate::research::ResearchClient;
use crate::voice::VoiceClient;

mod research_tests;

pub fn research_client(server: &MockServer) -> ResearchClient {
    ResearchClient::new(&ResearchConfig { api_key: "research-key".to_owned(), base_url: server.uri() })
        .unwrap()
}

pub fn voice_client(server: &MockServer, assistant_id: Option<&str>) -> VoiceClient {
    VoiceClient::new(&VoiceConfig {
        api_key: "voice-key".to_owned(),
        base_url: server.uri(),
        phone_number_id: "pn-1".to_owned(),
        assistant_id: assistant_id.map(str::to_owned),
    })
    .unwrap()
}

pub fn test_contact(name: &str) -> ShopContact {
    ShopContact { name: name.to_owned(), phone: "(408) 555-0101".to_owned(), address: "1 Test Way".to_owned() }
}
