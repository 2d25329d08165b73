//! HTTP client for the catalog service

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::auth::{LoginRequest, LoginResponse, RegisterUser};
use super::CatalogService;
use crate::catalog::types::SkillUpdate;
use crate::catalog::{PhotoFile, Skill, SkillFields, SkillId};
use crate::config::ApiConfig;
use crate::error::{Error, Operation, RemoteError, Result};
use crate::session::Session;

/// Catalog service client
#[derive(Clone)]
pub struct HttpCatalogClient {
    /// HTTP client
    client: Client,
    /// Base URL, without trailing slash
    base_url: String,
    /// Source of the bearer credential
    session: Session,
}

impl HttpCatalogClient {
    /// Create a new client
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpCatalogClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the session's bearer credential, when there is one
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer().await {
            Some(bearer) => request.header(header::AUTHORIZATION, bearer),
            None => request,
        }
    }

    /// Send a request and turn non-success statuses into errors
    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| {
                warn!("{} request failed: {}", operation, e);
                RemoteError::transport(operation, &e)
            })?;

        let status = response.status();
        if status.is_success() {
            debug!("{} -> {}", operation, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("{} rejected with status {}: {}", operation, status, body);
        Err(RemoteError::status(operation, status.as_u16(), body).into())
    }

    async fn json<T: DeserializeOwned>(operation: Operation, response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::decode(operation, e).into())
    }

    /// Exchange credentials for a token. Does not touch the session.
    pub async fn login(&self, email: &str, senha: &str) -> Result<LoginResponse> {
        debug!("Logging in as {}", email);
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, senha });
        let response = self.send(Operation::Login, request).await?;
        Self::json(Operation::Login, response).await
    }

    /// Create a user account
    pub async fn register(&self, user: &RegisterUser) -> Result<LoginResponse> {
        debug!("Registering user {}", user.email);
        let request = self.client.post(self.url("/auth/register")).json(user);
        let response = self.send(Operation::Register, request).await?;
        Self::json(Operation::Register, response).await
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    async fn list_skills(&self) -> Result<Vec<Skill>> {
        let request = self.client.get(self.url("/skills/listar_skills"));
        let response = self.send(Operation::ListSkills, request).await?;
        let skills: Vec<Skill> = Self::json(Operation::ListSkills, response).await?;
        debug!("Fetched {} skills", skills.len());
        Ok(skills)
    }

    async fn create_skill(&self, fields: &SkillFields) -> Result<Skill> {
        let request = self
            .client
            .post(self.url("/skills/register_skills"))
            .json(fields);
        let response = self.send(Operation::CreateSkill, request).await?;
        Self::json(Operation::CreateSkill, response).await
    }

    async fn update_skill(&self, id: SkillId, fields: &SkillFields) -> Result<Option<Skill>> {
        let request = self
            .client
            .put(self.url(&format!("/skills/alterar_infos/{}", id)))
            .json(&SkillUpdate { id, fields });
        let response = self.send(Operation::UpdateSkill, request).await?;

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::decode(Operation::UpdateSkill, e))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| RemoteError::decode(Operation::UpdateSkill, e).into())
    }

    async fn delete_skill(&self, id: SkillId) -> Result<()> {
        debug!("Deleting skill {}", id);
        let request = self
            .client
            .delete(self.url(&format!("/skills/deletar_skills/{}", id)));
        self.send(Operation::DeleteSkill, request).await?;
        Ok(())
    }

    async fn upload_photo(&self, id: SkillId, photo: &PhotoFile) -> Result<Skill> {
        let part = Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.content_type)
            .map_err(|e| Error::InvalidInput(format!("Invalid photo content type: {}", e)))?;
        let form = Form::new().part("photo", part);

        debug!("Uploading photo {} for skill {}", photo.file_name, id);
        let request = self
            .client
            .post(self.url(&format!("/skills/{}/photo", id)))
            .multipart(form);
        let response = self.send(Operation::UploadPhoto, request).await?;
        Self::json(Operation::UploadPhoto, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> ApiConfig {
        ApiConfig {
            base_url,
            timeout: Duration::from_secs(5),
        }
    }

    async fn logged_in_client(server: &MockServer) -> HttpCatalogClient {
        let session = Session::new();
        session.begin("ana@neki.com", SecretString::from("test-token")).await;
        HttpCatalogClient::new(&test_config(server.uri()), session).unwrap()
    }

    fn sample_skill(id: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "nome": "Desenvolvedor Backend",
            "descricao": "Desenvolvedor API",
            "tecnologia": "Java",
            "nivel": "Básico"
        })
    }

    #[test]
    fn test_client_creation() {
        let client = HttpCatalogClient::new(
            &test_config("http://localhost:8080/project_skills/".to_string()),
            Session::new(),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/project_skills");
    }

    #[tokio::test]
    async fn test_list_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/skills/listar_skills"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([sample_skill(1), sample_skill(2)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = logged_in_client(&server).await;
        let skills = client.list_skills().await.unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[1].id, 2);
    }

    #[tokio::test]
    async fn test_list_failure_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/skills/listar_skills"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;

        let client = logged_in_client(&server).await;
        let err = client.list_skills().await.unwrap_err();
        match err {
            Error::Fetch(remote) => {
                assert_eq!(remote.status, Some(500));
                assert_eq!(remote.message, "database down");
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_posts_service_field_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/skills/register_skills"))
            .and(body_json(serde_json::json!({
                "nome": "Desenvolvedor Backend",
                "descricao": "Desenvolvedor API",
                "tecnologia": "Java",
                "nivel": "Básico"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_skill(10)))
            .mount(&server)
            .await;

        let client = logged_in_client(&server).await;
        let fields = SkillFields::new("Desenvolvedor Backend", "Desenvolvedor API", "Java", "Básico");
        let skill = client.create_skill(&fields).await.unwrap();
        assert_eq!(skill.id, 10);
    }

    #[tokio::test]
    async fn test_update_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/skills/alterar_infos/3"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = logged_in_client(&server).await;
        let fields = SkillFields::new("Desenvolvedor Backend", "Desenvolvedor API", "SQL", "Avançado");
        assert!(client.update_skill(3, &fields).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/skills/deletar_skills/5"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = logged_in_client(&server).await;
        let err = client.delete_skill(5).await.unwrap_err();
        let remote = err.remote().unwrap();
        assert_eq!(remote.operation, Operation::DeleteSkill);
        assert_eq!(remote.status, Some(404));
        assert!(matches!(err, Error::Remote(_)));
    }

    #[tokio::test]
    async fn test_upload_photo_is_multipart() {
        let server = MockServer::start().await;
        let mut updated = sample_skill(4);
        updated["photo"] = serde_json::json!("aGVsbG8=");
        Mock::given(method("POST"))
            .and(path("/skills/4/photo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .mount(&server)
            .await;

        let client = logged_in_client(&server).await;
        let skill = client
            .upload_photo(4, &PhotoFile::new("me.png", b"hello".to_vec()))
            .await
            .unwrap();
        assert_eq!(skill.photo.as_deref(), Some("aGVsbG8="));

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));

        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains(r#"name="photo""#));
        assert!(body.contains(r#"filename="me.png""#));
        assert!(body.contains("hello"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let client = HttpCatalogClient::new(
            &test_config("http://127.0.0.1:9".to_string()),
            Session::new(),
        )
        .unwrap();
        let err = client.delete_skill(1).await.unwrap_err();
        assert!(err.is_remote());
        assert_eq!(err.remote().unwrap().status, None);
    }
}
