/// bcrypt only reads this many bytes of input; anything longer is refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt hashing with a fixed work factor.
///
/// Hashing is CPU-bound; async callers go through the `*_blocking` variants
/// so the work lands on tokio's blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailure(#[from] bcrypt::BcryptError),
    #[error("password exceeds {MAX_PASSWORD_BYTES} bytes")]
    TooLong,
    #[error("password hashing task was aborted")]
    Aborted,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Lower costs are only meant for tests.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Salted one-way digest of `plaintext`.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Constant-time check of `plaintext` against `digest`. A mismatch is
    /// `Ok(false)`; only a malformed digest is an error. Over-long input can
    /// never have been hashed, so it never matches.
    pub fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, PasswordError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        Ok(bcrypt::verify(plaintext, digest)?)
    }

    pub async fn hash_blocking(self, plaintext: String) -> Result<String, PasswordError> {
        tokio::task::spawn_blocking(move || self.hash(&plaintext))
            .await
            .map_err(|_| PasswordError::Aborted)?
    }

    pub async fn verify_blocking(
        self,
        digest: String,
        plaintext: String,
    ) -> Result<bool, PasswordError> {
        tokio::task::spawn_blocking(move || self.verify(&digest, &plaintext))
            .await
            .map_err(|_| PasswordError::Aborted)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4)
    }

    #[test]
    fn test_hash_then_verify() {
        let digest = hasher().hash("secret1").unwrap();

        assert_ne!(digest, "secret1");
        assert!(hasher().verify(&digest, "secret1").unwrap());
        assert!(!hasher().verify(&digest, "secret2").unwrap());
        assert!(!hasher().verify(&digest, "").unwrap());
    }

    #[test]
    fn test_input_past_72_bytes_is_not_truncated() {
        let at_limit = "a".repeat(MAX_PASSWORD_BYTES);
        let digest = hasher().hash(&at_limit).unwrap();
        assert!(hasher().verify(&digest, &at_limit).unwrap());

        let longer = format!("{at_limit}X");
        assert!(matches!(hasher().hash(&longer), Err(PasswordError::TooLong)));
        assert!(!hasher().verify(&digest, &longer).unwrap());
        assert!(!hasher()
            .verify(&digest, &format!("{at_limit}Y-totally-different"))
            .unwrap());
    }

    #[test]
    fn test_limit_counts_bytes_not_chars() {
        // 37 two-byte chars: 37 chars, 74 bytes.
        let multibyte = "é".repeat(37);
        assert!(matches!(hasher().hash(&multibyte), Err(PasswordError::TooLong)));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hasher().hash("same").unwrap();
        let b = hasher().hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_digest_is_an_error() {
        let result = hasher().verify("not-a-bcrypt-digest", "secret1");
        assert!(matches!(result, Err(PasswordError::HashingFailure(_))));
    }

    #[test]
    fn test_default_uses_bcrypt_default_cost() {
        let digest = PasswordHasher::default().hash("pw").unwrap();
        assert!(digest.contains(&format!("${}$", bcrypt::DEFAULT_COST)));
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let digest = hasher().hash_blocking("secret1".into()).await.unwrap();
        assert!(hasher()
            .verify_blocking(digest, "secret1".into())
            .await
            .unwrap());
    }
}
