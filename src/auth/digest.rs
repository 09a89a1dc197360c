//! Digest access authentication (RFC 2617, MD5 with `qop`).
//!
//! The challenge values (`realm`, `nonce`, `qop`) and the client counters
//! (`nc`, `cnonce`) are supplied by the caller. No `401` round-trip is made to
//! obtain them.

use md5::{Digest, Md5};

/// Parameters for one Digest `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestParams {
    pub username: String,
    pub password: String,
    pub realm: String,
    pub nonce: String,
    pub qop: String,
    pub nc: String,
    pub cnonce: String,
}

impl DigestParams {
    /// Computes the lowercase hex `response` value for `method` and `uri`.
    ///
    /// `HA1 = MD5(username:realm:password)`, `HA2 = MD5(method:uri)`,
    /// `response = MD5(HA1:nonce:nc:cnonce:qop:HA2)`.
    pub fn response(&self, method: &str, uri: &str) -> String {
        let ha1 = md5_hex(&format!("{}:{}:{}", self.username, self.realm, self.password));
        let ha2 = md5_hex(&format!("{}:{}", method, uri));
        md5_hex(&format!(
            "{}:{}:{}:{}:{}:{}",
            ha1, self.nonce, self.nc, self.cnonce, self.qop, ha2
        ))
    }

    /// Builds the full `Authorization` header value.
    pub fn header_value(&self, method: &str, uri: &str) -> String {
        format!(
            "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", qop={}, nc={}, cnonce=\"{}\", response=\"{}\"",
            self.username,
            self.realm,
            self.nonce,
            uri,
            self.qop,
            self.nc,
            self.cnonce,
            self.response(method, uri)
        )
    }
}

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}
