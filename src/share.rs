//! Share links: a route document packed into a URL-safe token.
//!
//! Decoding is lenient by contract. Anything that does not decode into a valid, non-empty route
//! yields `None`, never an error.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::foundation::error::{FlyPathError, FlyPathResult};
use crate::model::destination::DestinationList;
use crate::settings::AnimationSettings;

/// Query parameter carrying the token.
pub const ROUTE_PARAM: &str = "route";

/// Everything needed to reproduce a route animation.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteDocument {
    /// Ordered stops.
    pub destinations: DestinationList,
    /// Animation settings.
    #[serde(default)]
    pub settings: AnimationSettings,
}

impl RouteDocument {
    /// Parse and validate a JSON document.
    pub fn from_json(s: &str) -> FlyPathResult<Self> {
        let doc: Self = serde_json::from_str(s)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Pretty JSON form.
    pub fn to_json_pretty(&self) -> FlyPathResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check destinations and settings.
    pub fn validate(&self) -> FlyPathResult<()> {
        self.destinations.validate()?;
        self.settings.validate()
    }
}

/// Encode `doc` as base64url (no padding) of its compact JSON.
pub fn encode_token(doc: &RouteDocument) -> FlyPathResult<String> {
    let json = serde_json::to_vec(doc)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a token produced by [`encode_token`].
///
/// Returns `None` for malformed input, an empty destination list, or values that fail
/// validation.
pub fn decode_token(token: &str) -> Option<RouteDocument> {
    let bytes = match URL_SAFE_NO_PAD.decode(token.trim().trim_end_matches('=')) {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!(error = %e, "share token is not base64url");
            return None;
        }
    };
    let doc: RouteDocument = match serde_json::from_slice(&bytes) {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(error = %e, "share token is not a route document");
            return None;
        }
    };
    if doc.destinations.is_empty() {
        tracing::debug!("share token has no destinations");
        return None;
    }
    if let Err(e) = doc.validate() {
        tracing::debug!(error = %e, "share token failed validation");
        return None;
    }
    Some(doc)
}

/// `base` with the route token set as its [`ROUTE_PARAM`] query parameter.
pub fn share_url(base: &str, doc: &RouteDocument) -> FlyPathResult<url::Url> {
    let mut url = url::Url::parse(base)
        .map_err(|e| FlyPathError::validation(format!("invalid share base url '{base}': {e}")))?;
    let token = encode_token(doc)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != ROUTE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut q = url.query_pairs_mut();
        q.clear();
        for (k, v) in &kept {
            q.append_pair(k, v);
        }
        q.append_pair(ROUTE_PARAM, &token);
    }
    Ok(url)
}

/// Route document carried by `url`, if any.
pub fn document_from_url(url: &url::Url) -> Option<RouteDocument> {
    let (_, token) = url.query_pairs().find(|(k, _)| k == ROUTE_PARAM)?;
    decode_token(&token)
}

#[cfg(test)]
#[path = "../tests/unit/share/share.rs"]
mod tests;
