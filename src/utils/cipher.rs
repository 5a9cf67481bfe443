//! Seed based AES-256-CBC envelopes.
//!
//! An envelope is `hex(iv):hex(ciphertext)`. The key is a single SHA-256 of the
//! seed, without salt or iterations, so that envelopes written by older
//! deployments keep decrypting. Moving to a real KDF changes every stored
//! envelope and has to ship as a migration.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;
const SEPARATOR: char = ':';

#[derive(Error, Debug)]
pub enum CipherError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("envelope is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid key or IV length")]
    InvalidLength,

    #[error("decryption failed, wrong seed or corrupted ciphertext")]
    DecryptFailed,

    #[error("decrypted data is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// 由 seed 推導 32 bytes 金鑰 (單次 SHA-256)
pub fn derive_key(seed: &str) -> [u8; KEY_LEN] {
    Sha256::digest(seed.as_bytes()).into()
}

pub fn encrypt(plaintext: &str, seed: &str) -> Result<String, CipherError> {
    let key = derive_key(seed);
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new_from_slices(&key, &iv)
        .map_err(|_| CipherError::InvalidLength)?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    Ok(format!(
        "{}{}{}",
        hex::encode(iv),
        SEPARATOR,
        hex::encode(ciphertext)
    ))
}

pub fn decrypt(envelope: &str, seed: &str) -> Result<String, CipherError> {
    let (iv_hex, data_hex) = envelope.split_once(SEPARATOR).ok_or_else(|| {
        CipherError::MalformedEnvelope("missing ':' between IV and ciphertext".to_string())
    })?;

    let iv = hex::decode(iv_hex)?;
    if iv.len() != IV_LEN {
        return Err(CipherError::MalformedEnvelope(format!(
            "IV must be {} bytes, got {}",
            IV_LEN,
            iv.len()
        )));
    }

    let ciphertext = hex::decode(data_hex)?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CipherError::MalformedEnvelope(format!(
            "ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_LEN
        )));
    }

    let key = derive_key(seed);
    let plaintext = Aes256CbcDec::new_from_slices(&key, &iv)
        .map_err(|_| CipherError::InvalidLength)?
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| CipherError::DecryptFailed)?;

    // padding 碰巧合法時，UTF-8 檢查是最後一道防線
    Ok(String::from_utf8(plaintext)?)
}
