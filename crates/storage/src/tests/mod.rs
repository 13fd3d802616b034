//! Test utilities and module declarations for storage tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use repairdesk_core::{CacheEntry, CallSession, Shop, ShopContact};
use tempfile::TempDir;

use crate::error::StorageError;
use crate::traits::RemoteCacheTier;

mod session_tests;

pub fn create_test_dir() -> TempDir {
    TempDir::new().unwrap()
}

pub fn create_test_session(shops: &[&str]) -> CallSession {
    let contacts = shops
        .iter()
        .map(|name| ShopContact {
            name: (*name).to_owned(),
            phone: "+14085550100".to_owned(),
            address: "1 Test Way".to_owned(),
        })
        .collect::<Vec<_>>();
    let call_ids = shops.iter().map(|name| format!("call-{name}")).collect();
    CallSession::new(call_ids, contacts, "cracked windshield", Utc::now())
}

pub fn create_test_shops(names: &[&str]) -> Vec<Shop> {
    names.iter().map(|name| Shop::new(*name, "+14085550100", "1 Test Way")).collect()
}

/// In-memory remote tier that records writes and can be told to fail.
#[derive(Default)]
pub struct FakeRemoteTier {
    pub entries: Mutex<HashMap<String, CacheEntry>>,
    pub fail: bool,
}

#[async_trait]
impl RemoteCacheTier for FakeRemoteTier {
    async fn fetch(&self, key: &str) -> Result<Option<CacheEntry>, StorageError> {
        if self.fail {
            return Err(StorageError::RemoteStatus { code: 503, body: "down".to_owned() });
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn store(&self, key: &str, entry: &CacheEntry) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::RemoteStatus { code: 503, body: "down".to_owned() });
        }
        self.entries.lock().unwrap().insert(key.to_owned(), entry.clone());
        Ok(())
    }
}
