//! Digest algorithms used for gateway message integrity

use crate::errors::{CryptoError, CustomResult};

/// Compute a digest over a message.
pub trait GenerateDigest {
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, CryptoError>;
}

/// MD5 content digest.
///
/// The gateway's tamper-proof seal is an MD5 digest; wire compatibility
/// fixes the algorithm, so a gateway-mandated migration replaces this one
/// implementation.
#[derive(Debug)]
pub struct Md5;

impl GenerateDigest for Md5 {
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, CryptoError> {
        let digest = md5::compute(message);
        Ok(digest.to_vec())
    }
}
