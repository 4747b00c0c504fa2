// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the LI.FI quote endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use super::types::{ApiErrorBody, QuoteRequest, QuoteResponse};
use crate::config::{Secret, SwapConfig};
use crate::error::SwapError;
use crate::workflow::QuoteSource;

pub const API_KEY_HEADER: &str = "x-lifi-api-key";
const QUOTE_PATH: &str = "/v1/quote";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct AggregatorClient {
    base_url: String,
    api_key: Secret,
    integrator: Option<String>,
    http: Client,
}

impl AggregatorClient {
    pub fn new(base_url: impl Into<String>, api_key: Secret) -> Result<Self, SwapError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SwapError::QuoteRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            api_key,
            integrator: None,
            http,
        })
    }

    pub fn from_config(config: &SwapConfig) -> Result<Self, SwapError> {
        Ok(Self::new(
            config.aggregator_base_url.clone(),
            config.aggregator_api_key.clone(),
        )?
        .with_integrator(config.integrator.clone()))
    }

    /// Tag every quote with an integrator name unless the request sets one.
    pub fn with_integrator(mut self, integrator: Option<String>) -> Self {
        self.integrator = integrator;
        self
    }

    fn quote_url(&self, request: &QuoteRequest) -> Result<Url, SwapError> {
        let mut url = Url::parse(&format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            QUOTE_PATH
        ))
        .map_err(|e| SwapError::MissingConfig(format!("invalid aggregator base URL: {e}")))?;

        let mut request = request.clone();
        if request.integrator.is_none() {
            request.integrator = self.integrator.clone();
        }
        url.query_pairs_mut().extend_pairs(request.query_pairs());
        Ok(url)
    }

    /// Fetch a quote with an attached, ready-to-sign transaction.
    pub async fn get_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, SwapError> {
        let url = self.quote_url(request)?;
        debug!(url = %url, "Requesting quote");

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .send()
            .await
            .map_err(|e| SwapError::QuoteRequest(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SwapError::QuoteRequest(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| match (b.message, b.code) {
                    (Some(message), Some(code)) => Some(format!("{message} (code {code})")),
                    (Some(message), None) => Some(message),
                    _ => None,
                })
                .unwrap_or(body);
            return Err(SwapError::QuoteRejected {
                status: status.as_u16(),
                message,
            });
        }

        let quote: QuoteResponse = serde_json::from_str(&body)
            .map_err(|e| SwapError::QuoteRequest(format!("invalid quote response: {e}")))?;

        info!(
            quote_id = quote.id.as_deref().unwrap_or("-"),
            tool = quote.tool.as_deref().unwrap_or("-"),
            steps = quote.included_steps.len(),
            to_amount = quote
                .estimate
                .as_ref()
                .and_then(|e| e.to_amount.as_deref())
                .unwrap_or("-"),
            "Quote received"
        );

        Ok(quote)
    }
}

#[async_trait]
impl QuoteSource for AggregatorClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, SwapError> {
        self.get_quote(request).await
    }
}
