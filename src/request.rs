use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// HTTP methods the backend contract uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// Immutable description of one outbound request.
///
/// Construction validates the method/payload pairing: a POST must carry a
/// payload, a GET must not. The pool stamps a unique id on acceptance; the
/// returned [`ResultFuture`](crate::pool::ResultFuture) carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    endpoint: String,
    method: Method,
    payload: Option<Value>,
    timeout: Option<Duration>,
}

impl RequestDescriptor {
    pub fn new(
        endpoint: impl Into<String>,
        method: Method,
        payload: Option<Value>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with('/') {
            return Err(Error::InvalidConfig(format!(
                "endpoint must begin with '/': {endpoint}"
            )));
        }
        match (method, &payload) {
            (Method::Post, None) => {
                return Err(Error::InvalidConfig(
                    "no payload given for POST request".to_string(),
                ));
            }
            (Method::Get, Some(_)) => {
                return Err(Error::InvalidConfig(
                    "payload supplied for GET request".to_string(),
                ));
            }
            _ => {}
        }
        Ok(Self {
            endpoint,
            method,
            payload,
            timeout: None,
        })
    }

    pub fn get(endpoint: impl Into<String>) -> Result<Self> {
        Self::new(endpoint, Method::Get, None)
    }

    pub fn post(endpoint: impl Into<String>, payload: Value) -> Result<Self> {
        Self::new(endpoint, Method::Post, Some(payload))
    }

    /// Overrides the pool's default timeout for this request only.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// The completed outcome of one accepted descriptor.
///
/// Exactly one record exists per accepted request. `status` is absent when
/// the transport failed before a status line arrived; `error` carries the
/// captured per-request failure, if any.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub request_id: u64,
    pub status: Option<u16>,
    pub body: String,
    pub error: Option<Error>,
}

impl ResponseRecord {
    pub(crate) fn success(request_id: u64, status: u16, body: String) -> Self {
        Self {
            request_id,
            status: Some(status),
            body,
            error: None,
        }
    }

    pub(crate) fn failure(request_id: u64, error: Error) -> Self {
        Self {
            request_id,
            status: None,
            body: String::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && matches!(self.status, Some(s) if (200..300).contains(&s))
    }

    /// Decodes the record into a typed value.
    ///
    /// A captured request error is returned as-is, a non-2xx status becomes
    /// [`Error::Http`], and a body that does not parse as `T` becomes
    /// [`Error::Decode`].
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        match self.status {
            Some(status) if (200..300).contains(&status) => {
                serde_json::from_str(&self.body).map_err(|e| Error::Decode(e.to_string()))
            }
            Some(status) => Err(Error::Http {
                status,
                body: self.body.clone(),
            }),
            None => Err(Error::Connection("no response received".to_string())),
        }
    }
}
