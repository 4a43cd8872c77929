//! Interactive browser sign-in
//!
//! Authorization code flow with PKCE against the Microsoft identity
//! platform. The redirect URI must point at the local machine; a one-shot
//! listener on that port receives the authorization code.

use crate::credential::{AccessToken, TokenCache, TokenCredential, token_from_response, token_url};
use crate::error::{AzureError, Result};
use crate::types::{AUTHORITY_BASE, TokenErrorResponse, TokenResponse};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

/// How long to wait for the user to finish signing in
const LOGIN_TIMEOUT: Duration = Duration::from_secs(300);

/// How long one connection may take to send its request line
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(5);

const SUCCESS_PAGE: &str = "<html><body><h3>Sign-in complete.</h3>\
<p>You can close this window and return to ezstart.</p></body></html>";

/// PKCE verifier / challenge pair (S256)
#[derive(Debug, Clone)]
pub struct Pkce {
    pub verifier: String,
    pub challenge: String,
}

impl Pkce {
    pub fn generate() -> Self {
        Self::from_verifier(random_string(64))
    }

    pub fn from_verifier(verifier: String) -> Self {
        let digest = Sha256::digest(verifier.as_bytes());
        let challenge = URL_SAFE_NO_PAD.encode(digest);
        Self {
            verifier,
            challenge,
        }
    }
}

fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Result of inspecting one request on the redirect listener
#[derive(Debug, PartialEq, Eq)]
enum Callback {
    Code(String),
    Denied(String),
    /// Not the redirect (e.g., `/favicon.ico`)
    Ignored,
}

/// Parse the request target (`/path?query`) received on the redirect listener
fn parse_callback(target: &str, redirect_path: &str, expected_state: &str) -> Result<Callback> {
    let url = Url::parse("http://localhost")?.join(target)?;
    if url.path() != redirect_path {
        return Ok(Callback::Ignored);
    }

    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        let detail = description.unwrap_or_default();
        return Ok(Callback::Denied(format!("{} {}", error, detail).trim().to_string()));
    }

    match code {
        Some(code) if state.as_deref() == Some(expected_state) => Ok(Callback::Code(code)),
        Some(_) => Err(AzureError::AuthenticationFailed(
            "state mismatch in sign-in redirect".to_string(),
        )),
        None => Ok(Callback::Ignored),
    }
}

/// Interactive browser credential
pub struct BrowserCredential {
    http: reqwest::Client,
    client_id: String,
    tenant_id: String,
    /// As configured; must match the app registration byte for byte
    redirect_uri: String,
    redirect: Url,
    read_timeout: Duration,
    cache: TokenCache,
}

impl BrowserCredential {
    pub fn new(
        client_id: impl Into<String>,
        tenant_id: impl Into<String>,
        redirect_uri: &str,
    ) -> Result<Self> {
        let redirect = Url::parse(redirect_uri)?;
        match redirect.host_str() {
            Some("localhost") | Some("127.0.0.1") => {}
            other => {
                return Err(AzureError::InvalidConfig(format!(
                    "redirect URI must point at localhost, got {:?}",
                    other
                )));
            }
        }
        if redirect.scheme() != "http" {
            return Err(AzureError::InvalidConfig(
                "redirect URI must use http".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            client_id: client_id.into(),
            tenant_id: tenant_id.into(),
            redirect_uri: redirect_uri.to_string(),
            redirect,
            read_timeout: REQUEST_READ_TIMEOUT,
            cache: TokenCache::default(),
        })
    }

    /// Authorization endpoint URL the browser is sent to
    pub fn authorize_url(&self, scope: &str, pkce: &Pkce, state: &str) -> Result<Url> {
        let base = format!(
            "{}/{}/oauth2/v2.0/authorize",
            AUTHORITY_BASE, self.tenant_id
        );
        let scopes = format!("{} offline_access", scope);
        let url = Url::parse_with_params(
            &base,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_mode", "query"),
                ("scope", scopes.as_str()),
                ("state", state),
                ("code_challenge", pkce.challenge.as_str()),
                ("code_challenge_method", "S256"),
                ("prompt", "select_account"),
            ],
        )?;
        Ok(url)
    }

    async fn acquire(&self, scope: &str) -> Result<AccessToken> {
        let port = self.redirect.port_or_known_default().unwrap_or(80);
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;

        let pkce = Pkce::generate();
        let state = random_string(24);
        let url = self.authorize_url(scope, &pkce, &state)?;

        tracing::info!("Opening browser for Azure sign-in");
        if let Err(e) = open::that(url.as_str()) {
            tracing::warn!("Could not open a browser ({}). Visit: {}", e, url);
        }

        let code = tokio::time::timeout(LOGIN_TIMEOUT, self.wait_for_code(&listener, &state))
            .await
            .map_err(|_| {
                AzureError::AuthenticationFailed("timed out waiting for browser sign-in".to_string())
            })??;

        self.exchange_code(scope, &code, &pkce).await
    }

    async fn wait_for_code(&self, listener: &TcpListener, state: &str) -> Result<String> {
        loop {
            let (stream, peer) = listener.accept().await?;
            tracing::debug!("Redirect listener connection from {}", peer);

            match self.handle_connection(stream, state).await? {
                Callback::Code(code) => return Ok(code),
                Callback::Denied(reason) => return Err(AzureError::AuthenticationFailed(reason)),
                Callback::Ignored => continue,
            }
        }
    }

    /// Read one request from the redirect listener and answer it
    ///
    /// Connections that send nothing in time or fail mid-request count as
    /// `Ignored`.
    async fn handle_connection(&self, stream: TcpStream, state: &str) -> Result<Callback> {
        let mut reader = BufReader::new(stream);
        let mut request_line = String::new();
        match tokio::time::timeout(self.read_timeout, reader.read_line(&mut request_line)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::debug!("Redirect listener read failed: {}", e);
                return Ok(Callback::Ignored);
            }
            Err(_) => {
                tracing::debug!("Redirect listener connection sent no request");
                return Ok(Callback::Ignored);
            }
        }

        // "GET /path?query HTTP/1.1"
        let target = request_line.split_whitespace().nth(1).unwrap_or("/");
        let callback = parse_callback(target, self.redirect.path(), state)?;

        let mut stream = reader.into_inner();
        if let Err(e) = respond(&mut stream, &callback).await {
            tracing::debug!("Could not answer redirect request: {}", e);
        }
        Ok(callback)
    }

    async fn exchange_code(&self, scope: &str, code: &str, pkce: &Pkce) -> Result<AccessToken> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", pkce.verifier.as_str()),
            ("scope", scope),
        ];

        let response = self
            .http
            .post(token_url(&self.tenant_id))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let error: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            return Err(AzureError::AuthenticationFailed(format!(
                "{} {}",
                error.error,
                error.error_description.unwrap_or_default()
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        tracing::info!("Azure sign-in completed");
        Ok(token_from_response(token))
    }
}

async fn respond(stream: &mut TcpStream, callback: &Callback) -> std::io::Result<()> {
    let (status, body) = match callback {
        Callback::Code(_) => ("200 OK", SUCCESS_PAGE.to_string()),
        Callback::Denied(reason) => (
            "400 Bad Request",
            format!("<html><body><h3>Sign-in failed</h3><p>{}</p></body></html>", reason),
        ),
        Callback::Ignored => ("404 Not Found", String::new()),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

#[async_trait]
impl TokenCredential for BrowserCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        self.cache
            .get_or_acquire(scope, || self.acquire(scope))
            .await
    }
}
