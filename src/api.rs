//! Klient KSP API.
//!
//! ## Operace
//! - `list` - seznam úloh, které lze odevzdávat
//! - `status` - body a stav podúloh jedné úlohy
//! - `get_test` - stažení (a případně vygenerování) vstupu podúlohy
//! - `submit` - odevzdání výstupu podúlohy
//! - `generate` - vygenerování nového vstupu podúlohy
//!
//! Každá operace odpovídá jedné variantě `Endpoint` s pevnou cestou a metodou.
//! Všechny požadavky nesou hlavičku `Authorization: Bearer <token>`.
//!
//! ## Chyby
//! - Nedostupný server vrací `ApiError::Connection`.
//! - Odpověď s jiným stavem než `200 OK` vrací `ApiError::Rejected`. Pokud je
//!   tělo JSON s položkou `errorMsg`, zobrazí se přesně její text, jinak
//!   obecná hláška a surové tělo jen v debug logu (`--verbose`).
//! - Nic se neopakuje, každá chyba ukončí právě prováděný příkaz.

use log::debug;
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

use crate::commands::config::ClientConfig;
use crate::credentials::Token;
use crate::messages::{fill, text, Msg};

/// Hodnota parametru `set`, která do seznamu přidá úlohy z cvičiště
pub const TRAINING_GROUND_SET: &str = "cviciste";

/// Endpointy KSP API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    List,
    Status,
    Input,
    Submit,
    Generate,
}

impl Endpoint {
    /// Cesta relativní k adrese API
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::List => "tasks/list",
            Endpoint::Status => "tasks/status",
            Endpoint::Input => "tasks/input",
            Endpoint::Submit => "tasks/submit",
            Endpoint::Generate => "tasks/generate",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::List | Endpoint::Status => Method::GET,
            Endpoint::Input | Endpoint::Submit | Endpoint::Generate => Method::POST,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Connection {
        api_url: String,
        source: reqwest::Error,
    },
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    Decode(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Connection { api_url, .. } => {
                f.write_str(&fill(Msg::NoConnection, &[api_url]))
            }
            ApiError::Rejected {
                message: Some(message),
                ..
            } => f.write_str(message),
            ApiError::Rejected {
                status,
                message: None,
            } => f.write_str(&fill(Msg::NonJsonError, &[status])),
            ApiError::Decode(e) => write!(f, "{}: {}", text(Msg::UnexpectedResponse), e),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Connection { source, .. } => Some(source),
            ApiError::Rejected { .. } => None,
            ApiError::Decode(e) => Some(e),
        }
    }
}

/// Stav úlohy z `tasks/status`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub name: String,
    pub points: f64,
    pub max_points: f64,
    pub subtasks: Vec<SubtaskStatus>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubtaskStatus {
    pub id: SubtaskId,
    pub input_generated: bool,
    #[serde(default)]
    pub input_valid_until: Option<String>,
    pub points: f64,
    pub max_points: f64,
    #[serde(default)]
    pub verdict: Option<String>,
}

/// Server posílá identifikátor podúlohy jako číslo nebo řetězec
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SubtaskId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SubtaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtaskId::Number(n) => write!(f, "{}", n),
            SubtaskId::Text(s) => f.write_str(s),
        }
    }
}

/// Výsledek odevzdání z `tasks/submit`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubmitVerdict {
    #[serde(default)]
    pub verdict: String,
    pub points: f64,
    pub max_points: f64,
}

pub struct KspClient {
    http: Client,
    api_url: String,
    token: Token,
    training_ground: bool,
}

impl KspClient {
    pub fn new(config: &ClientConfig, token: Token) -> Self {
        KspClient {
            http: Client::new(),
            api_url: config.api_url.clone(),
            token,
            training_ground: config.training_ground,
        }
    }

    /// Úlohy otevřené k odevzdávání, v režimu cvičiště i úlohy z cvičiště
    pub async fn list(&self) -> Result<Value, ApiError> {
        let mut query = Vec::new();
        if self.training_ground {
            query.push(("set", TRAINING_GROUND_SET.to_string()));
        }
        let body = self.send(Endpoint::List, &query, None).await?;
        decode(&body)
    }

    pub async fn status(&self, task: &str) -> Result<TaskStatus, ApiError> {
        let query = [("task", task.to_string())];
        let body = self.send(Endpoint::Status, &query, None).await?;
        decode(&body)
    }

    /// Textový vstup podúlohy; s `generate` ho server případně nejdřív vygeneruje
    pub async fn get_test(
        &self,
        task: &str,
        subtask: u32,
        generate: bool,
    ) -> Result<String, ApiError> {
        let query = [
            ("task", task.to_string()),
            ("subtask", subtask.to_string()),
            ("generate", generate.to_string()),
        ];
        self.send(Endpoint::Input, &query, None).await
    }

    /// Odešle výstup jako tělo požadavku s typem `text/plain`
    pub async fn submit(
        &self,
        task: &str,
        subtask: u32,
        content: &[u8],
    ) -> Result<Value, ApiError> {
        let query = [("task", task.to_string()), ("subtask", subtask.to_string())];
        let body = self
            .send(Endpoint::Submit, &query, Some(content.to_vec()))
            .await?;
        decode(&body)
    }

    /// Vynutí vygenerování nového vstupu, i když platný vstup existuje
    #[allow(dead_code)]
    pub async fn generate(&self, task: &str, subtask: u32) -> Result<String, ApiError> {
        let query = [("task", task.to_string()), ("subtask", subtask.to_string())];
        self.send(Endpoint::Generate, &query, None).await
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<String, ApiError> {
        let url = format!("{}{}", self.api_url, endpoint.path());
        debug!("{} {} {:?}", endpoint.method(), url, query);

        let mut request = self
            .http
            .request(endpoint.method(), &url)
            .header(header::AUTHORIZATION, self.token.bearer());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.header(header::CONTENT_TYPE, "text/plain").body(body);
        }

        let response = request.send().await.map_err(|e| self.connection_error(e))?;
        debug!("{} -> {}", url, response.status());
        if response.status() != StatusCode::OK {
            return Err(rejection(response).await);
        }
        response.text().await.map_err(|e| self.connection_error(e))
    }

    fn connection_error(&self, source: reqwest::Error) -> ApiError {
        ApiError::Connection {
            api_url: self.api_url.clone(),
            source,
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::Decode)
}

/// Vytáhne `errorMsg` z JSON těla chybové odpovědi
async fn rejection(response: Response) -> ApiError {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);
    let body = response.text().await.unwrap_or_default();

    let message = if is_json {
        serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| value.get("errorMsg")?.as_str().map(str::to_string))
    } else {
        None
    };
    if message.is_none() {
        debug!("{}", body);
    }
    ApiError::Rejected { status, message }
}
