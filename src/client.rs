use std::time::Instant;

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ApiError, Credentials, Result};

/// Thin HTTP gateway to the remote API. Each public method on the resource
/// modules issues exactly one request through here; every request is logged
/// with its elapsed duration at debug level.
#[derive(Clone)]
pub struct ApiClient {
    credentials: Credentials,
    client: Client,
    model: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiClient")
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorWrapper {
    error: ApiError,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Empty {}

impl ApiClient {
    pub fn new(credentials: Credentials, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(
                [
                    (
                        AUTHORIZATION,
                        HeaderValue::from_str(&format!("Bearer {}", credentials.api_key))?,
                    ),
                    (
                        HeaderName::from_static("openai-beta"),
                        HeaderValue::from_static("assistants=v2"),
                    ),
                ]
                .into_iter()
                .collect(),
            )
            .build()?;

        Ok(Self {
            credentials,
            client,
            model: model.into(),
        })
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    pub async fn request<S, R, T>(&self, method: Method, route: R, body: Option<S>) -> Result<T>
    where
        R: Into<String>,
        S: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.credentials.base_url, route.into());
        let mut request = self.client.request(method.clone(), url.clone());

        if let Some(body) = body {
            request = request.json(&body);
        }

        let started = Instant::now();
        let response = request.send().await?;
        log::debug!(
            "{} {} -> {} in {:?}",
            method,
            url,
            response.status().as_str(),
            started.elapsed()
        );

        Self::parse(response).await
    }

    pub async fn get<R, T>(&self, route: R) -> Result<T>
    where
        R: Into<String>,
        T: DeserializeOwned,
    {
        self.request::<(), R, T>(Method::GET, route, None).await
    }

    pub async fn post<S, R, T>(&self, route: R, body: S) -> Result<T>
    where
        R: Into<String>,
        S: Serialize,
        T: DeserializeOwned,
    {
        self.request(Method::POST, route, Some(body)).await
    }

    pub async fn delete<R>(&self, route: R) -> Result<Empty>
    where
        R: Into<String>,
    {
        self.request::<(), R, Empty>(Method::DELETE, route, None)
            .await
    }

    pub async fn post_multipart<T>(&self, route: &str, form: Form) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.credentials.base_url, route);
        let started = Instant::now();
        let response = self.client.post(&url).multipart(form).send().await?;
        log::debug!(
            "POST {} -> {} in {:?}",
            url,
            response.status().as_str(),
            started.elapsed()
        );

        Self::parse(response).await
    }

    /// Fetches every page of a list endpoint (`order=asc`, follow `last_id`
    /// while `has_more` holds) and returns the concatenated data.
    pub async fn list<R, T>(&self, route: R) -> Result<Vec<T>>
    where
        R: Into<String>,
        T: DeserializeOwned,
    {
        let route = route.into();
        let mut after: Option<String> = None;
        let mut data = Vec::new();

        loop {
            let page_route = match &after {
                Some(after) => format!("{route}?order=asc&after={after}"),
                None => format!("{route}?order=asc"),
            };
            let page: List<T> = self.get(page_route).await?;
            data.extend(page.data);

            if !page.has_more {
                break;
            }
            match page.last_id {
                Some(last_id) => after = Some(last_id),
                None => break,
            }
        }

        Ok(data)
    }

    async fn parse<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if response.status().is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await?;
        match serde_json::from_str::<ApiErrorWrapper>(&body) {
            Ok(wrapper) => Err(wrapper.error.into()),
            Err(_) => Err(ApiError {
                message: body,
                error_type: "unknown".to_string(),
                param: None,
                code: None,
            }
            .into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct List<T> {
    pub first_id: Option<String>,
    pub last_id: Option<String>,
    pub data: Vec<T>,
    // Some list endpoints omit the pagination flag entirely.
    #[serde(default)]
    pub has_more: bool,
}
