use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// Errors never carry key material, ciphertext or plaintext.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("invalid {0}: expected hex-encoded {1} bytes")]
    InvalidKeyMaterial(&'static str, usize),

    #[error("ciphertext is not valid hex")]
    InvalidHex,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("plaintext is not valid UTF-8")]
    NotUtf8,
}

/// Turns stored ciphertext into plaintext.
pub trait SecretCipher: Send + Sync {
    fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError>;
}

/// AES-256-CBC with PKCS#7 padding and hex-encoded ciphertext.
pub struct AesCbcCipher {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl AesCbcCipher {
    pub fn new(key: [u8; KEY_LEN], iv: [u8; IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Build the cipher from the hex strings found in configuration.
    pub fn from_hex(key_hex: &str, iv_hex: &str) -> Result<Self, CipherError> {
        let key = decode_fixed::<KEY_LEN>(key_hex)
            .ok_or(CipherError::InvalidKeyMaterial("encryption key", KEY_LEN))?;
        let iv = decode_fixed::<IV_LEN>(iv_hex)
            .ok_or(CipherError::InvalidKeyMaterial("encryption IV", IV_LEN))?;
        Ok(Self::new(key, iv))
    }

    /// Produce the hex ciphertext stored in the `keys` collection.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let bytes = Aes256CbcEnc::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        hex::encode(bytes)
    }
}

impl SecretCipher for AesCbcCipher {
    fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
        let bytes = hex::decode(ciphertext.trim()).map_err(|_| CipherError::InvalidHex)?;
        let plain = Aes256CbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
            .map_err(|_| CipherError::DecryptionFailed)?;
        String::from_utf8(plain).map_err(|_| CipherError::NotUtf8)
    }
}

fn decode_fixed<const N: usize>(value: &str) -> Option<[u8; N]> {
    hex::decode(value.trim()).ok()?.try_into().ok()
}
