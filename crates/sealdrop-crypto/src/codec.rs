//! Access-code encoding.
//!
//! An access code is the only artifact a creator hands to a reader. It is
//! compact JSON carrying both key halves, encoded as Base58 (Bitcoin
//! alphabet) so it survives copy/paste:
//!
//! ```text
//! base58( {"publicKey":"<b64>","privateKey":"<b64>"[,"messageId":"..."]} )
//! ```
//!
//! - No padding, no whitespace, no `0`/`O`/`I`/`l`
//! - Unknown JSON fields are ignored on decode, so a later format may add
//!   fields (a version, say) without breaking existing readers
//! - Every decode failure is [`CryptoError::InvalidCodeFormat`]

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{CryptoError, CryptoResult};
use crate::keys::KeyPair;

/// JSON field holding the public key.
pub const PUBLIC_KEY_FIELD: &str = "publicKey";

/// JSON field holding the private key.
pub const PRIVATE_KEY_FIELD: &str = "privateKey";

/// Optional JSON field holding a ledger lookup identifier.
pub const MESSAGE_ID_FIELD: &str = "messageId";

fn invalid(reason: impl Into<String>) -> CryptoError {
    CryptoError::InvalidCodeFormat(reason.into())
}

fn to_base58(json: &[u8]) -> String {
    bs58::encode(json).into_string()
}

/// Encode an arbitrary mapping of named strings as an access code.
///
/// Keys are emitted in sorted order, so equal mappings give equal codes.
pub fn encode_fields(fields: &BTreeMap<String, String>) -> CryptoResult<String> {
    let json = serde_json::to_vec(fields).map_err(|e| invalid(e.to_string()))?;
    Ok(to_base58(&json))
}

/// Decode an access code into its named string fields.
///
/// Surrounding whitespace is ignored. Every name in `required` must be
/// present with a non-empty value.
pub fn decode_fields(code: &str, required: &[&str]) -> CryptoResult<BTreeMap<String, String>> {
    let code = code.trim();
    if code.is_empty() {
        return Err(invalid("access code is empty"));
    }

    let bytes = bs58::decode(code)
        .into_vec()
        .map_err(|e| invalid(format!("not Base58: {}", e)))?;

    let text = std::str::from_utf8(&bytes).map_err(|_| invalid("payload is not UTF-8"))?;

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| invalid(format!("payload is not JSON: {}", e)))?;

    let object = match value {
        serde_json::Value::Object(map) => map,
        _ => return Err(invalid("payload is not a JSON object")),
    };

    let mut fields = BTreeMap::new();
    for (name, value) in object {
        match value {
            serde_json::Value::String(s) => {
                fields.insert(name, s);
            }
            _ => return Err(invalid(format!("field '{}' is not a string", name))),
        }
    }

    for name in required {
        match fields.get(*name) {
            Some(value) if !value.is_empty() => {}
            Some(_) => return Err(invalid(format!("field '{}' is empty", name))),
            None => return Err(invalid(format!("missing field '{}'", name))),
        }
    }

    Ok(fields)
}

/// Wire shape of an access code. Field order here is the emitted order.
#[derive(Serialize)]
struct AccessCodeWire<'a> {
    #[serde(rename = "publicKey")]
    public_key: &'a str,
    #[serde(rename = "privateKey")]
    private_key: &'a str,
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    message_id: Option<&'a str>,
}

/// Decoded access code: both key halves as text, plus an optional lookup id.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCode {
    /// Public key, base64.
    pub public_key: String,
    /// Private key, base64.
    pub private_key: String,
    /// Ledger lookup identifier, for ledgers not keyed by public key.
    pub message_id: Option<String>,
}

impl AccessCode {
    /// Build an access code for a keypair.
    pub fn from_keypair(keypair: &KeyPair) -> Self {
        Self {
            public_key: keypair.public.to_text(),
            private_key: keypair.private.to_text(),
            message_id: None,
        }
    }

    /// Attach a ledger lookup identifier.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Encode as a Base58 access code string.
    pub fn encode(&self) -> CryptoResult<String> {
        let wire = AccessCodeWire {
            public_key: &self.public_key,
            private_key: &self.private_key,
            message_id: self.message_id.as_deref(),
        };
        let json = serde_json::to_vec(&wire).map_err(|e| invalid(e.to_string()))?;
        Ok(to_base58(&json))
    }

    /// Decode an access code string.
    ///
    /// Only structure is checked here; use [`AccessCode::to_keypair`] to
    /// validate the keys themselves.
    pub fn decode(code: &str) -> CryptoResult<Self> {
        let mut fields = decode_fields(code, &[PUBLIC_KEY_FIELD, PRIVATE_KEY_FIELD])?;
        let public_key = fields.remove(PUBLIC_KEY_FIELD).unwrap_or_default();
        let private_key = fields.remove(PRIVATE_KEY_FIELD).unwrap_or_default();
        let message_id = fields.remove(MESSAGE_ID_FIELD);
        Ok(Self {
            public_key,
            private_key,
            message_id,
        })
    }

    /// Parse the keys and check the private half derives the public half.
    pub fn to_keypair(&self) -> CryptoResult<KeyPair> {
        KeyPair::from_text(&self.public_key, &self.private_key).map_err(|e| match e {
            CryptoError::InvalidKey(reason) => invalid(reason),
            other => other,
        })
    }
}

impl fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCode")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("message_id", &self.message_id)
            .finish()
    }
}

impl Drop for AccessCode {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.private_key);
    }
}
