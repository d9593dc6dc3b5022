//! JSON bodies exchanged between the CRUD endpoints and their clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Health {
    pub status: String,
}

/// `{ "message": ... }` body used by every mutating endpoint and every error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total_records: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Body of a list request: one projected object per record plus paging info.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListBody {
    pub data: Vec<Map<String, Value>>,
    pub pagination: PaginationInfo,
}
