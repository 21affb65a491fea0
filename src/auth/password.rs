use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::PasswordConfig;

/// One-way password hashing capability.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> anyhow::Result<String>;

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool>;
}

/// Salted Argon2id hasher producing PHC strings.
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(cfg: &PasswordConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        // Cost parameters come from the stored hash, not from `self`.
        match self.argon2().verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                error!(error = %e, "argon2 verify_password error");
                Err(anyhow::anyhow!(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn fast_hasher() -> Argon2Hasher {
    Argon2Hasher::new(&PasswordConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .expect("test params are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = fast_hasher();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!hasher.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let hasher = fast_hasher();
        let a = hasher.hash("secret123").unwrap();
        let b = hasher.hash("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = fast_hasher().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn verify_errors_on_hash_argon2_cannot_check() {
        let scrypt = "$scrypt$ln=4,r=8,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaGhhc2g";
        assert!(PasswordHash::new(scrypt).is_ok());
        assert!(fast_hasher().verify("anything", scrypt).is_err());
    }

    #[test]
    fn rejects_impossible_params() {
        let cfg = PasswordConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(Argon2Hasher::new(&cfg).is_err());
    }

    #[test]
    fn default_params_are_accepted() {
        assert!(Argon2Hasher::new(&PasswordConfig::default()).is_ok());
    }
}
