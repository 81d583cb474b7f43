pub mod accounts;
pub mod config;
pub mod dispatcher;
pub mod hotp;
pub mod mcp;
pub mod secrets;
pub mod totp;

use std::{fmt::Display, str::FromStr};

use hmac::{digest::KeyInit, Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error("Secret decode error: {0}")]
    SecretDecode(data_encoding::DecodeError),
    #[error("Secret decodes to empty key material")]
    EmptySecret,
    #[error("Invalid HMAC key")]
    InvalidKey,
    #[error("Invalid digest")]
    InvalidDigest(Vec<u8>),
    #[error("Invalid digit count {0}, expected a value between 1 and 9")]
    InvalidDigits(u32),
    #[error("Invalid period, it must be at least one second")]
    InvalidPeriod,
    #[error("Invalid hashing algorithm, found {0}. Expected one of: SHA1, SHA256 or SHA512")]
    InvalidHashingAlgorithm(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum OtpHashAlgorithm {
    #[default]
    SHA1,
    SHA256,
    SHA512,
}

impl Display for OtpHashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SHA1 => write!(f, "SHA1"),
            Self::SHA256 => write!(f, "SHA256"),
            Self::SHA512 => write!(f, "SHA512"),
        }
    }
}

impl FromStr for OtpHashAlgorithm {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_uppercase();

        match normalized.as_str() {
            "SHA1" => Ok(Self::SHA1),
            "SHA256" => Ok(Self::SHA256),
            "SHA512" => Ok(Self::SHA512),
            _ => Err(OtpError::InvalidHashingAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OtpCode {
    code: u32,
    digits: u32,
}

impl OtpCode {
    pub fn integer(&self) -> u32 {
        self.code
    }
}

impl Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:0padding$}",
            self.code,
            padding = (self.digits as usize)
        )
    }
}

fn sign<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Result<Vec<u8>, OtpError> {
    let mut mac = <M as Mac>::new_from_slice(key).map_err(|_| OtpError::InvalidKey)?;
    mac.update(data);

    Ok(mac.finalize().into_bytes().to_vec())
}

pub trait Otp {
    /// Decodes a secret (given as an RFC4648 base32-encoded ASCII string)
    /// into a byte string.
    ///
    /// Authenticator apps hand secrets out in lowercase, grouped with spaces
    /// and sometimes padded, so those are normalized away before decoding.
    fn decode_secret(secret: &str) -> Result<Vec<u8>, OtpError> {
        let normalized: String = secret
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .trim_end_matches('=')
            .to_ascii_uppercase();

        let decoded = data_encoding::BASE32_NOPAD
            .decode(normalized.as_bytes())
            .map_err(OtpError::SecretDecode)?;

        if decoded.is_empty() {
            return Err(OtpError::EmptySecret);
        }

        Ok(decoded)
    }

    /// Calculates the HMAC digest of the big-endian counter for the given secret.
    fn calc_digest(
        &self,
        decoded_secret: &[u8],
        algorithm: OtpHashAlgorithm,
        data: u64,
    ) -> Result<Vec<u8>, OtpError> {
        let data = data.to_be_bytes();

        match algorithm {
            OtpHashAlgorithm::SHA1 => sign::<Hmac<Sha1>>(decoded_secret, &data),
            OtpHashAlgorithm::SHA256 => sign::<Hmac<Sha256>>(decoded_secret, &data),
            OtpHashAlgorithm::SHA512 => sign::<Hmac<Sha512>>(decoded_secret, &data),
        }
    }

    /// Encodes the HMAC digest into a truncated integer.
    fn encode_digest_truncated(digest: &[u8], target_digits_count: u32) -> Result<u32, OtpError> {
        if !(1..=9).contains(&target_digits_count) {
            return Err(OtpError::InvalidDigits(target_digits_count));
        }

        // While sometimes this is a hardcoded 19
        // the last byte tells us the offset for any algorithm
        let offset = match digest.last() {
            Some(x) => *x & 0xf,
            None => return Err(OtpError::InvalidDigest(Vec::from(digest))),
        } as usize;

        // Gets the 4 bytes that will compose the code
        let code_bytes: [u8; 4] = match digest
            .get(offset..offset + 4)
            .map(<[u8; 4]>::try_from)
        {
            Some(Ok(x)) => x,
            _ => return Err(OtpError::InvalidDigest(Vec::from(digest))),
        };

        let code = u32::from_be_bytes(code_bytes);
        let truncation_factor = u32::pow(10, target_digits_count);

        Ok((code & 0x7fffffff) % truncation_factor)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{hotp::Hotp, Otp, OtpError};

    #[rstest]
    #[case("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ")]
    #[case("gezdgnbvgy3tqojqgezdgnbvgy3tqojq")]
    #[case("gezd gnbv gy3t qojq gezd gnbv gy3t qojq")]
    #[case("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ====")]
    fn decode_secret_normalizes(#[case] secret: &str) {
        let decoded = Hotp::decode_secret(secret).unwrap();

        assert_eq!(b"12345678901234567890".to_vec(), decoded);
    }

    #[rstest]
    #[case("not base32!")]
    #[case("GEZDG1")]
    fn decode_secret_rejects_garbage(#[case] secret: &str) {
        assert!(matches!(
            Hotp::decode_secret(secret),
            Err(OtpError::SecretDecode(_))
        ));
    }

    #[test]
    fn decode_secret_rejects_empty_key() {
        assert!(matches!(
            Hotp::decode_secret("  =="),
            Err(OtpError::EmptySecret)
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(10)]
    fn truncation_rejects_bad_digit_counts(#[case] digits: u32) {
        let digest = [0u8; 20];

        assert!(matches!(
            Hotp::encode_digest_truncated(&digest, digits),
            Err(OtpError::InvalidDigits(d)) if d == digits
        ));
    }

    #[test]
    fn truncation_rejects_short_digest() {
        // Offset 15 needs 19 bytes, only 16 given
        let mut digest = [0u8; 16];
        digest[15] = 0x0f;

        assert!(matches!(
            Hotp::encode_digest_truncated(&digest, 6),
            Err(OtpError::InvalidDigest(_))
        ));
    }
}
