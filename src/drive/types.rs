use serde::Deserialize;

// https://developers.google.com/identity/protocols/oauth2/web-server#exchange-authorization-code
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
    #[serde(default)]
    pub(crate) expires_in: Option<u64>,
}

// https://developers.google.com/drive/api/reference/rest/v3/files/list
#[derive(Debug, Deserialize)]
pub(crate) struct FileList {
    #[serde(default)]
    pub(crate) files: Vec<DriveFile>,
}

// https://developers.google.com/drive/api/reference/rest/v3/files
#[derive(Debug, Deserialize)]
pub(crate) struct DriveFile {
    pub(crate) id: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub(crate) name: Option<String>,
}
