//! Origin (upstream server) of a website.
//!
//! Origins are never reconciled by identifier: every save replaces the
//! whole set, so an origin id is not stable across saves.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors, field_path};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(format!("unknown protocol: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Origin {
    pub id: Uuid,
    pub website_id: Uuid,
    pub host: String,
    pub protocol: Protocol,
    pub port: Option<u16>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OriginFields {
    pub host: String,
    pub protocol: Protocol,
    #[serde(default)]
    pub port: Option<u16>,
}

impl OriginFields {
    pub fn new(host: impl Into<String>, protocol: Protocol, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            protocol,
            port,
        }
    }
}

impl Validate for OriginFields {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        errors.non_empty(&field_path(prefix, "host"), &self.host);
    }
}
