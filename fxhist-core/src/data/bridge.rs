//! HTTP bridge to a locally running trading terminal.
//!
//! The terminal's own API is only reachable in-process, so a small bridge
//! service runs next to it and exposes each call as a JSON endpoint. This
//! client speaks that protocol with a blocking reqwest client. No retries:
//! a failed call is reported once and the extractor decides what to skip.

use super::provider::{LastError, RawRate, SymbolInfo, TerminalDataSource, TerminalError};
use crate::config::BridgeConfig;
use crate::domain::{Credentials, Timeframe};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct Ack {
    ok: bool,
}

#[derive(Debug, Serialize)]
struct SelectRequest<'a> {
    symbol: &'a str,
    enable: bool,
}

/// Terminal data source backed by the bridge service.
pub struct BridgeClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl BridgeClient {
    pub fn new(config: &BridgeConfig) -> Result<Self, TerminalError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TerminalError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL the client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint)
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TerminalError> {
        log::debug!("GET /{path} {query:?}");
        let resp = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .map_err(|e| transport_error(path, e))?;
        decode(path, resp)
    }

    fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TerminalError> {
        log::debug!("POST /{path}");
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(|e| transport_error(path, e))?;
        decode(path, resp)
    }
}

fn transport_error(path: &str, e: reqwest::Error) -> TerminalError {
    if e.is_connect() || e.is_timeout() {
        TerminalError::Unreachable(format!("/{path}: {e}"))
    } else {
        TerminalError::Protocol(format!("/{path}: {e}"))
    }
}

fn decode<T: DeserializeOwned>(
    path: &str,
    resp: reqwest::blocking::Response,
) -> Result<T, TerminalError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(TerminalError::Protocol(format!("HTTP {status} from /{path}")));
    }
    resp.json()
        .map_err(|e| TerminalError::Protocol(format!("failed to parse /{path} response: {e}")))
}

/// Query string for a ranged history request (times as epoch seconds).
fn rates_query(
    symbol: &str,
    timeframe: Timeframe,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", symbol.to_string()),
        ("timeframe", timeframe.terminal_code().to_string()),
        ("date_from", from.timestamp().to_string()),
        ("date_to", to.timestamp().to_string()),
    ]
}

impl TerminalDataSource for BridgeClient {
    fn name(&self) -> &str {
        "terminal_bridge"
    }

    fn initialize(&self, credentials: &Credentials) -> Result<bool, TerminalError> {
        let ack: Ack = self.post("initialize", credentials)?;
        Ok(ack.ok)
    }

    fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>, TerminalError> {
        self.get("symbol_info", &[("symbol", symbol.to_string())])
    }

    fn symbol_select(&self, symbol: &str, enable: bool) -> Result<bool, TerminalError> {
        let ack: Ack = self.post("symbol_select", &SelectRequest { symbol, enable })?;
        Ok(ack.ok)
    }

    fn copy_rates_range(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<Vec<RawRate>>, TerminalError> {
        self.get("copy_rates_range", &rates_query(symbol, timeframe, from, to))
    }

    fn last_error(&self) -> LastError {
        self.get("last_error", &[]).unwrap_or_else(|e| {
            LastError::new(LastError::INTERNAL_FAIL, format!("last_error unavailable: {e}"))
        })
    }

    fn shutdown(&self) -> Result<(), TerminalError> {
        let _: Ack = self.post("shutdown", &serde_json::json!({}))?;
        Ok(())
    }
}
