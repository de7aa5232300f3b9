// API client module: a small blocking HTTP client for the file-sharing
// server. Calls run on executor threads, never on the event loop, so the
// blocking reqwest client keeps the code straight-line.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::AUTHORIZATION;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::command::SiteAccess;
use crate::config::Config;
use crate::error::CommandError;
use crate::state::{FileEntry, SiteCredentials};

/// The remote operations the executor needs. `ApiClient` is the real
/// implementation; tests substitute an in-memory one.
pub trait SiteApi: Send + Sync {
    /// `GET /site/{site}?password=` returning a token and the listing.
    fn fetch_site(&self, site_name: &str, password: &str) -> Result<SiteAccess, CommandError>;

    /// `POST /createsite`, returning the issued token.
    fn create_site(&self, site_name: &str, password: &str) -> Result<String, CommandError>;

    /// `GET /getfile/{id}`, returning the file content.
    fn get_file(&self, file_id: i64, auth_token: &str) -> Result<String, CommandError>;

    /// `POST /upload/{site}` as multipart field `file`. Returns bytes sent.
    fn upload_file(
        &self,
        site_name: &str,
        path: &Path,
        auth_token: &str,
    ) -> Result<u64, CommandError>;
}

/// Holds a reqwest blocking client and the base URL of the server.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

/// Body of `POST /createsite`.
#[derive(Serialize, Debug)]
struct CreateSiteRequest<'a> {
    site_name: &'a str,
    password: &'a str,
}

#[derive(Deserialize, Debug)]
struct SiteResponse {
    auth_token: String,
    // The server sends `null` for a site without files.
    #[serde(default)]
    files: Option<Vec<FileEntry>>,
}

#[derive(Deserialize, Debug)]
struct CreateSiteResponse {
    #[serde(default)]
    message: String,
    auth_token: String,
}

#[derive(Deserialize, Debug)]
struct FileResponse {
    #[serde(default)]
    message: String,
    file: String,
}

impl ApiClient {
    /// Build a client for `config.server_url` with the configured timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: config.server_url.clone(),
        })
    }

    /// Base URL joined with URL-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CommandError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CommandError::Connection(format!("invalid server URL {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<Response, CommandError> {
        request.send().map_err(|e| CommandError::connection(&e))
    }
}

/// Read the body and fail with the server's message unless the status is 2xx.
fn success_body(res: Response) -> Result<String, CommandError> {
    let status = res.status();
    let body = res
        .text()
        .map_err(|e| CommandError::Parse(format!("error reading server response: {e}")))?;
    if !status.is_success() {
        return Err(server_error(status, &body));
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CommandError> {
    serde_json::from_str(body).map_err(|e| CommandError::Parse(e.to_string()))
}

/// Error bodies are plain text or a JSON object with `error`/`message`.
pub fn server_error(status: StatusCode, body: &str) -> CommandError {
    let body = body.trim();
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|field| value.get(field)?.as_str().map(str::to_string))
        });
    let message = match from_json {
        Some(text) => text,
        None if body.is_empty() => format!("server returned status {}", status.as_u16()),
        None => body.to_string(),
    };
    CommandError::Server {
        status: status.as_u16(),
        message,
    }
}

impl SiteApi for ApiClient {
    fn fetch_site(&self, site_name: &str, password: &str) -> Result<SiteAccess, CommandError> {
        let url = self.endpoint(&["site", site_name])?;
        let res = self.send(self.client.get(url).query(&[("password", password)]))?;
        let parsed: SiteResponse = decode(&success_body(res)?)?;
        Ok(SiteAccess {
            site: SiteCredentials {
                site_name: site_name.to_string(),
                password: password.to_string(),
            },
            auth_token: parsed.auth_token,
            files: parsed.files.unwrap_or_default(),
        })
    }

    fn create_site(&self, site_name: &str, password: &str) -> Result<String, CommandError> {
        let url = self.endpoint(&["createsite"])?;
        let req = CreateSiteRequest {
            site_name,
            password,
        };
        let res = self.send(self.client.post(url).json(&req))?;
        let parsed: CreateSiteResponse = decode(&success_body(res)?)?;
        tracing::debug!(site = site_name, message = %parsed.message, "site created");
        Ok(parsed.auth_token)
    }

    fn get_file(&self, file_id: i64, auth_token: &str) -> Result<String, CommandError> {
        let id = file_id.to_string();
        let url = self.endpoint(&["getfile", id.as_str()])?;
        let res = self.send(self.client.get(url).header(AUTHORIZATION, auth_token))?;
        let parsed: FileResponse = decode(&success_body(res)?)?;
        tracing::debug!(file_id, message = %parsed.message, "file fetched");
        Ok(parsed.file)
    }

    fn upload_file(
        &self,
        site_name: &str,
        path: &Path,
        auth_token: &str,
    ) -> Result<u64, CommandError> {
        let url = self.endpoint(&["upload", site_name])?;

        let file = File::open(path).map_err(|e| CommandError::io("error opening file", e))?;
        let len = file
            .metadata()
            .map_err(|e| CommandError::io("error reading file metadata", e))?
            .len();
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        let part = multipart::Part::reader_with_length(file, len).file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        let res = self.send(
            self.client
                .post(url)
                .header(AUTHORIZATION, auth_token)
                .multipart(form),
        )?;
        success_body(res)?;
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = Config {
            server_url: Url::parse(base).unwrap(),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn endpoint_encodes_segments() {
        let api = client("http://localhost:8080");
        let url = api.endpoint(&["site", "my blog/x"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/site/my%20blog%2Fx");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let api = client("http://example.com/api/");
        let url = api.endpoint(&["getfile", "3"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/getfile/3");
    }

    #[test]
    fn plain_text_error_body_is_the_message() {
        let err = server_error(StatusCode::UNAUTHORIZED, "bad password\n");
        assert!(matches!(
            err,
            CommandError::Server { status: 401, ref message } if message == "bad password"
        ));
    }

    #[test]
    fn json_error_body_uses_error_field() {
        let err = server_error(StatusCode::CONFLICT, r#"{"error":"site exists"}"#);
        assert_eq!(err.to_string(), "site exists");
    }

    #[test]
    fn empty_error_body_mentions_status() {
        let err = server_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "server returned status 500");
    }

    #[test]
    fn null_file_list_decodes_as_empty() {
        let parsed: SiteResponse = decode(r#"{"auth_token":"t","files":null}"#).unwrap();
        assert_eq!(parsed.files.unwrap_or_default(), Vec::new());
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let err = decode::<FileResponse>("not json").unwrap_err();
        assert!(matches!(err, CommandError::Parse(_)));
        assert!(err.to_string().starts_with("error parsing server response:"));
    }
}
