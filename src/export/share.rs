// src/export/share.rs
//! Share-link tokens: 8 lowercase base-36 characters.
//! Good enough to avoid casual collisions, not meant as a secret.

use uuid::Uuid;

pub const TOKEN_LEN: usize = 8;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn generate_token() -> String {
    let mut n = Uuid::new_v4().as_u128();
    (0..TOKEN_LEN)
        .map(|_| {
            let digit = (n % 36) as usize;
            n /= 36;
            ALPHABET[digit] as char
        })
        .collect()
}

pub fn share_url(base_url: &str, token: &str) -> String {
    format!("{}/share/{}", base_url.trim_end_matches('/'), token)
}

pub fn is_valid_token(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| ALPHABET.contains(&b))
}
