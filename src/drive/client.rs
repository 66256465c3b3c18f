use crate::drive::DriveEndpoints;
use crate::drive::types::{DriveFile, FileList};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// The identifier of the document in the remote store. Never cached across
/// calls; rediscovered by name on every save/load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocumentHandle {
    pub file_id: String,
}

#[async_trait]
pub trait RemoteDocumentApi {
    async fn find_file(
        &self,
        access_token: &str,
        name: &str,
    ) -> Result<Option<RemoteDocumentHandle>>;

    async fn create_file(&self, access_token: &str, name: &str) -> Result<RemoteDocumentHandle>;

    async fn upload_content(
        &self,
        access_token: &str,
        handle: &RemoteDocumentHandle,
        content: &str,
    ) -> Result<()>;

    async fn download_content(
        &self,
        access_token: &str,
        handle: &RemoteDocumentHandle,
    ) -> Result<String>;
}

pub struct DriveClient {
    http: reqwest::Client,
    endpoints: DriveEndpoints,
}

impl DriveClient {
    pub fn new(endpoints: DriveEndpoints) -> Result<Self> {
        Ok(Self {
            http: super::http_client()?,
            endpoints,
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteApi { status, body });
        }

        Ok(response)
    }
}

/// Assemble a multipart/related body: JSON metadata part + JSON content part.
fn multipart_related_body(boundary: &str, metadata: &str, content: &str) -> String {
    format!(
        "--{boundary}\r\n\
         Content-Type: application/json; charset=UTF-8\r\n\r\n\
         {metadata}\r\n\
         --{boundary}\r\n\
         Content-Type: application/json\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    )
}

#[async_trait]
impl RemoteDocumentApi for DriveClient {
    async fn find_file(
        &self,
        access_token: &str,
        name: &str,
    ) -> Result<Option<RemoteDocumentHandle>> {
        let url = format!("{}/files", self.endpoints.api_base_url);
        let query = format!("name = '{}' and trashed = false", name);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("q", query.as_str()),
                ("spaces", "drive"),
                ("pageSize", "1"),
                ("fields", "files(id, name)"),
            ])
            .send()
            .await?;
        let response = Self::check(response).await?;

        let list: FileList = response.json().await?;
        let handle = list
            .files
            .into_iter()
            .next()
            .map(|file| RemoteDocumentHandle { file_id: file.id });

        Ok(handle)
    }

    async fn create_file(&self, access_token: &str, name: &str) -> Result<RemoteDocumentHandle> {
        let url = format!("{}/files", self.endpoints.api_base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({
                "name": name,
                "mimeType": "application/json",
            }))
            .send()
            .await?;
        let response = Self::check(response).await?;

        let file: DriveFile = response.json().await?;
        Ok(RemoteDocumentHandle { file_id: file.id })
    }

    async fn upload_content(
        &self,
        access_token: &str,
        handle: &RemoteDocumentHandle,
        content: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/files/{}",
            self.endpoints.upload_base_url, handle.file_id
        );

        let boundary = uuid::Uuid::new_v4().simple().to_string();
        let metadata = serde_json::json!({ "mimeType": "application/json" }).to_string();
        let body = multipart_related_body(&boundary, &metadata, content);

        let response = self
            .http
            .patch(&url)
            .bearer_auth(access_token)
            .query(&[("uploadType", "multipart")])
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await?;
        Self::check(response).await?;

        Ok(())
    }

    async fn download_content(
        &self,
        access_token: &str,
        handle: &RemoteDocumentHandle,
    ) -> Result<String> {
        let url = format!("{}/files/{}", self.endpoints.api_base_url, handle.file_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("alt", "media")])
            .send()
            .await?;
        let response = Self::check(response).await?;

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_body_layout() {
        let body = multipart_related_body("b0undary", r#"{"mimeType":"x"}"#, r#"{"a":1}"#);

        assert!(body.starts_with("--b0undary\r\n"));
        assert!(body.ends_with("--b0undary--\r\n"));
        assert_eq!(body.matches("--b0undary\r\n").count(), 2);
        assert!(body.contains("Content-Type: application/json; charset=UTF-8\r\n\r\n{\"mimeType\":\"x\"}\r\n"));
        assert!(body.contains("Content-Type: application/json\r\n\r\n{\"a\":1}\r\n"));
    }
}
