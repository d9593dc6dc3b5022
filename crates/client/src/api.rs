use common::types::{ListBody, MessageBody};
use models::{EntityDescriptor, RecordId};
use reqwest::{Response, StatusCode};
use tracing::debug;

use crate::errors::ClientError;
use crate::form::FormResult;

/// HTTP client for the per-entity CRUD routes.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn collection_url(&self, descriptor: &EntityDescriptor) -> String {
        format!("{}{}/{}", self.base_url, descriptor.binding.path_prefix(), descriptor.resource)
    }

    fn item_url(&self, descriptor: &EntityDescriptor, id: &RecordId) -> String {
        format!("{}/{}", self.collection_url(descriptor), id)
    }

    pub async fn list(
        &self,
        descriptor: &EntityDescriptor,
        page: u64,
        page_size: u64,
        filter: Option<&str>,
    ) -> Result<ListBody, ClientError> {
        let mut query = vec![("page", page.to_string()), ("page_size", page_size.to_string())];
        if let Some(f) = filter {
            query.push(("filter", f.to_string()));
        }
        let res = self.http.get(self.collection_url(descriptor)).query(&query).send().await?;
        if !res.status().is_success() {
            return Err(api_error(res).await);
        }
        Ok(res.json::<ListBody>().await?)
    }

    pub async fn create(&self, descriptor: &EntityDescriptor, form: &FormResult) -> Result<String, ClientError> {
        let res = self.http.post(self.collection_url(descriptor)).json(&form.to_fields()).send().await?;
        message(res).await
    }

    pub async fn update(
        &self,
        descriptor: &EntityDescriptor,
        id: &RecordId,
        form: &FormResult,
    ) -> Result<String, ClientError> {
        let res = self.http.put(self.item_url(descriptor, id)).json(&form.to_fields()).send().await?;
        message(res).await
    }

    pub async fn delete(&self, descriptor: &EntityDescriptor, id: &RecordId) -> Result<String, ClientError> {
        let res = self.http.delete(self.item_url(descriptor, id)).send().await?;
        message(res).await
    }
}

async fn message(res: Response) -> Result<String, ClientError> {
    if !res.status().is_success() {
        return Err(api_error(res).await);
    }
    let body = res.json::<MessageBody>().await?;
    debug!(message = %body.message, "api_ok");
    Ok(body.message)
}

async fn api_error(res: Response) -> ClientError {
    let status = res.status();
    let message = match res.json::<MessageBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("error").to_string(),
    };
    ClientError::Api { status: status.as_u16(), message }
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }
}
