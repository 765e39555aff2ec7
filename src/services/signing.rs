//! Hold request signing
//!
//! A hold action travels through the client (in a link) before coming back to
//! the server. Only the fields named by the catalog's signed keys are put in the
//! query, followed by a `hashKey` computed over those fields with a server-side
//! secret, so the request can be checked later without session state.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{
    error::{AppError, AppResult},
    models::{hold::HASH_KEY_PARAM, ActionToken, HoldRequestDescriptor},
};

type HmacSha256 = Hmac<Sha256>;

/// Signs request fields
pub trait RequestSigner: Send + Sync {
    /// Signature over `data` restricted to `keys`, in `keys` order
    fn generate(&self, keys: &[String], data: &HoldRequestDescriptor) -> AppResult<String>;

    /// Check `signature` against the fields named by `keys`
    fn verify(&self, keys: &[String], data: &HoldRequestDescriptor, signature: &str) -> AppResult<bool> {
        Ok(self.generate(keys, data)? == signature)
    }
}

/// HMAC-SHA256 signer keyed by a server secret
#[derive(Clone)]
pub struct HmacSigner {
    key: Vec<u8>,
}

impl HmacSigner {
    pub fn new(key: impl AsRef<[u8]>) -> AppResult<Self> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(AppError::Signature("Hold signing key is empty".to_string()));
        }
        Ok(Self { key: key.to_vec() })
    }

    fn mac(&self, keys: &[String], data: &HoldRequestDescriptor) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AppError::Signature(format!("Invalid signing key: {}", e)))?;
        mac.update(&canonical_bytes(keys, data));
        Ok(mac)
    }
}

impl RequestSigner for HmacSigner {
    fn generate(&self, keys: &[String], data: &HoldRequestDescriptor) -> AppResult<String> {
        Ok(hex::encode(self.mac(keys, data)?.finalize().into_bytes()))
    }

    fn verify(&self, keys: &[String], data: &HoldRequestDescriptor, signature: &str) -> AppResult<bool> {
        let Ok(expected) = hex::decode(signature) else {
            return Ok(false);
        };
        Ok(self.mac(keys, data)?.verify_slice(&expected).is_ok())
    }
}

/// Signed input: for each signed key, the length-prefixed key, then `0` when
/// the field is absent or `1` and the length-prefixed value.
fn canonical_bytes(keys: &[String], data: &HoldRequestDescriptor) -> Vec<u8> {
    let mut bytes = Vec::new();
    for key in keys {
        push_field(&mut bytes, key);
        match data.get(key) {
            Some(value) => {
                bytes.push(1);
                push_field(&mut bytes, value);
            }
            None => bytes.push(0),
        }
    }
    bytes
}

fn push_field(bytes: &mut Vec<u8>, field: &str) {
    bytes.extend_from_slice(&(field.len() as u64).to_be_bytes());
    bytes.extend_from_slice(field.as_bytes());
}

/// Build the signed hold action for a request.
///
/// The query lists the signed keys present in `data` in `signed_keys` order,
/// then `hashKey`. Any other field of `data` is dropped and cannot be recovered
/// from the token.
pub fn hold_details(
    data: &HoldRequestDescriptor,
    signed_keys: &[String],
    signer: &dyn RequestSigner,
) -> AppResult<ActionToken> {
    let record = data
        .id()
        .ok_or_else(|| AppError::BadRequest("Hold request has no record id".to_string()))?
        .to_string();

    let hash = signer.generate(signed_keys, data)?;

    let mut query: Vec<String> = signed_keys
        .iter()
        .filter_map(|key| {
            data.get(key)
                .map(|value| format!("{}={}", key, urlencoding::encode(value)))
        })
        .collect();
    query.push(format!("{}={}", HASH_KEY_PARAM, urlencoding::encode(&hash)));

    Ok(ActionToken::new(record, query.join("&")))
}

/// Check decoded query parameters of a returning hold request.
///
/// Returns the signed fields when the signature matches, `None` when it is
/// missing or does not match. Unsigned parameters are ignored.
pub fn validate_request(
    params: &HashMap<String, String>,
    signed_keys: &[String],
    signer: &dyn RequestSigner,
) -> AppResult<Option<HoldRequestDescriptor>> {
    let Some(signature) = params.get(HASH_KEY_PARAM) else {
        return Ok(None);
    };

    let data = signed_keys
        .iter()
        .filter_map(|key| params.get(key).map(|value| (key, value)))
        .fold(HoldRequestDescriptor::default(), |data, (key, value)| {
            data.with(key.clone(), value.clone())
        });

    if signer.verify(signed_keys, &data, signature)? {
        Ok(Some(data))
    } else {
        tracing::debug!("Hold request signature mismatch");
        Ok(None)
    }
}
