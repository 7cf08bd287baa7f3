//! Result envelope: the `{data, error, meta}` value every command produces.
//!
//! Built once per invocation through by-value builder calls, then handed to
//! the output stage by reference. Field order in the serialized form is fixed:
//! `data`, `error`, `meta`.

use crate::error::ClassifiedError;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub start_token: String,
    pub next_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub duration_ms: u64,
    pub services: Vec<String>,
    pub pagination: Pagination,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    data: Option<Value>,
    error: Option<ClassifiedError>,
    meta: Meta,
}

impl Envelope {
    /// Successful envelope carrying `data`.
    pub fn new(data: Value) -> Self {
        Self {
            data: Some(data),
            error: None,
            meta: Meta::default(),
        }
    }

    /// Failed envelope; `data` stays unset.
    pub fn from_error(error: ClassifiedError) -> Self {
        Self {
            data: None,
            error: Some(error),
            meta: Meta::default(),
        }
    }

    /// Append service names, keeping first-insertion order and dropping repeats.
    pub fn with_services<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.meta.services.contains(&name) {
                self.meta.services.push(name);
            }
        }
        self
    }

    pub fn with_pagination(mut self, start: impl Into<String>, next: impl Into<String>) -> Self {
        self.meta.pagination = Pagination {
            start_token: start.into(),
            next_token: next.into(),
        };
        self
    }

    pub fn with_warnings<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.warnings.extend(messages.into_iter().map(Into::into));
        self
    }

    pub fn with_duration(mut self, elapsed: Duration) -> Self {
        self.meta.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ClassifiedError> {
        self.error.as_ref()
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Generic JSON tree for projection and rendering.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
