// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Cookie transport for session tokens.
//!
//! The store only moves a token between cookie headers and the caller. It keeps
//! no server-side record of issued sessions, so clearing the cookie is the only
//! logout there is.

use axum::http::{header, HeaderMap, HeaderValue};
use latch_config::{SameSite, SessionConfig};

use crate::error::{ApiError, ApiResult};

/// Expiry date used to make a browser drop a cookie immediately.
const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Reads and writes the session cookie.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cookie_name: String,
    max_age: u64,
    secure: bool,
    same_site: SameSite,
}

impl SessionStore {
    /// Creates a store from the session configuration.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            max_age: config.token_ttl_secs,
            secure: config.secure_cookie,
            same_site: config.same_site,
        }
    }

    /// Returns the cookie name.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Returns the cookie Max-Age in seconds.
    pub fn max_age(&self) -> u64 {
        self.max_age
    }

    /// Appends a `Set-Cookie` header carrying `token`.
    pub fn attach(&self, headers: &mut HeaderMap, token: &str) -> ApiResult<()> {
        let cookie = format!(
            "{}={}; Path=/; Max-Age={}{}",
            self.cookie_name,
            token,
            self.max_age,
            self.attributes()
        );
        headers.append(header::SET_COOKIE, header_value(cookie)?);
        Ok(())
    }

    /// Appends a `Set-Cookie` header that removes the session cookie.
    pub fn clear(&self, headers: &mut HeaderMap) -> ApiResult<()> {
        let cookie = format!(
            "{}=; Path=/; Max-Age=0; Expires={}{}",
            self.cookie_name,
            EPOCH_EXPIRES,
            self.attributes()
        );
        headers.append(header::SET_COOKIE, header_value(cookie)?);
        Ok(())
    }

    /// Returns the session token from the request cookies, if any.
    ///
    /// Every `Cookie` header is searched; the first pair with the configured
    /// name wins. An empty value counts as absent.
    pub fn extract(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == self.cookie_name)
            .map(|(_, value)| unquote(value.trim()).to_string())
            .filter(|value| !value.is_empty())
    }

    fn attributes(&self) -> String {
        let mut attrs = String::from("; HttpOnly");
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs.push_str("; SameSite=");
        attrs.push_str(self.same_site.as_str());
        attrs
    }
}

fn header_value(cookie: String) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::internal(format!("Invalid cookie header: {}", e)))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
