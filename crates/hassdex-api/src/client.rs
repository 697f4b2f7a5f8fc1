// Hub HTTP client
//
// Wraps `reqwest::Client` with bearer-token auth, base URL handling and
// status mapping. Template queries live in `templates.rs` as inherent
// methods to keep this module focused on transport mechanics.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{HubConfig, StateObject};
use crate::transport::TransportConfig;

/// Longest body excerpt carried in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Async client for a Home Assistant hub.
///
/// Every call is a single request; there is no retry or batching. Callers
/// that need strict ordering simply await calls one after another.
pub struct HubClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HubClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a long-lived access token and transport config.
    ///
    /// Injects `Authorization: Bearer <token>` as a sensitive default header.
    pub fn from_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The hub base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Raw verbs ────────────────────────────────────────────────────

    /// `GET {path}`, returning the body as text.
    pub async fn get_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_text(resp).await
    }

    /// `POST {path}` with a JSON body, returning the body as text.
    pub async fn post_text<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_text(resp).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let body = self.get_text(path).await?;
        decode(body)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_text(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "access token rejected by hub".into(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.to_string()
            } else {
                preview(&body).to_owned()
            };
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Every entity's current state.
    ///
    /// `GET /api/states`
    pub async fn get_states(&self) -> Result<Vec<StateObject>, Error> {
        debug!("fetching states");
        self.get_json("api/states").await
    }

    /// Hub configuration (version, location name, ...).
    ///
    /// `GET /api/config`
    pub async fn get_config(&self) -> Result<HubConfig, Error> {
        debug!("fetching config");
        self.get_json("api/config").await
    }

    /// Render a Jinja template on the hub and return the plain-text result.
    ///
    /// `POST /api/template` with `{"template": ...}`
    pub async fn render_template(&self, template: &str) -> Result<String, Error> {
        self.post_text("api/template", &json!({ "template": template }))
            .await
    }
}

fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

/// First `BODY_PREVIEW_LEN` bytes of `body`, cut on a char boundary.
pub(crate) fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
