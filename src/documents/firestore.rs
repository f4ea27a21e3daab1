//! Firestore REST implementation of [`DocumentStore`]

use std::rc::Rc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use super::value::{decode_fields, encode_fields};
use super::{Document, DocumentStore, Fields};
use crate::api::encode_component;
use crate::error::StoreError;
use crate::session::TokenSource;

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

#[derive(Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Fields,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl RawDocument {
    fn into_document(self) -> Result<Document, StoreError> {
        let id = self.name.rsplit('/').next().unwrap_or_default().to_string();
        Ok(Document {
            id,
            fields: decode_fields(&self.fields)?,
        })
    }
}

pub struct Firestore {
    http: Client,
    project_id: String,
    tokens: Rc<dyn TokenSource>,
}

impl Firestore {
    pub fn new(project_id: &str, tokens: Rc<dyn TokenSource>) -> Self {
        Self {
            http: Client::new(),
            project_id: project_id.to_string(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(encode_component)
            .collect();
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            FIRESTORE_URL,
            self.project_id,
            segments.join("/")
        )
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, StoreError> {
        if self.project_id.is_empty() {
            return Err(StoreError::Network("missing project id".to_string()));
        }
        let request = match self.tokens.bearer_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        match response.status().as_u16() {
            200..=299 => Ok(response),
            401 | 403 => Err(StoreError::Denied),
            404 => Err(StoreError::NotFound(path.to_string())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::Network(format!("status {}: {}", status, body)))
            }
        }
    }
}

/// Query string for a partial update: one `updateMask.fieldPaths` per field
fn update_mask(fields: &Fields) -> Vec<(&'static str, String)> {
    fields
        .keys()
        .map(|k| ("updateMask.fieldPaths", k.clone()))
        .collect()
}

#[async_trait(?Send)]
impl DocumentStore for Firestore {
    async fn get(&self, path: &str) -> Result<Option<Fields>, StoreError> {
        let request = self.http.get(self.url(path));
        match self.send(request, path).await {
            Ok(response) => {
                let doc: RawDocument = response.json().await?;
                Ok(Some(decode_fields(&doc.fields)?))
            }
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set(&self, path: &str, fields: &Fields) -> Result<(), StoreError> {
        let body = serde_json::json!({ "fields": encode_fields(fields) });
        let request = self.http.patch(self.url(path)).json(&body);
        self.send(request, path).await.map(|_| ())
    }

    async fn update(&self, path: &str, fields: &Fields) -> Result<(), StoreError> {
        let body = serde_json::json!({ "fields": encode_fields(fields) });
        let request = self
            .http
            .patch(self.url(path))
            .query(&update_mask(fields))
            .query(&[("currentDocument.exists", "true")])
            .json(&body);
        self.send(request, path).await.map(|_| ())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self.http.get(self.url(collection));
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let page: ListResponse = match self.send(request, collection).await {
                Ok(response) => response.json().await?,
                // An empty collection does not exist
                Err(StoreError::NotFound(_)) => break,
                Err(e) => return Err(e),
            };
            for raw in page.documents {
                documents.push(raw.into_document()?);
            }
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(documents)
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let request = self.http.delete(self.url(path));
        match self.send(request, path).await {
            Ok(_) | Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
