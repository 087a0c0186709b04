//! Argon2id password hashing.

use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

use tripgenius_core::ports::{AuthError, PasswordService};

/// Stores PHC strings (`$argon2id$v=19$...`) so parameters travel with each hash.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::with_params(Params::default())
    }

    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

fn hashing_error(err: password_hash::Error) -> AuthError {
    AuthError::HashingError(err.to_string())
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(hashing_error)?;
        Ok(hash.to_string())
    }

    /// A wrong password is `Ok(false)`; a stored value that is not a PHC
    /// string is an error.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let stored = PasswordHash::new(hash).map_err(hashing_error)?;

        match self.argon2.verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(hashing_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2PasswordService {
        Argon2PasswordService::with_params(Params::new(1024, 1, 1, None).unwrap())
    }

    #[test]
    fn test_hash_then_verify() {
        let passwords = cheap();
        let hash = passwords.hash("wander-lust-2025").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(passwords.verify("wander-lust-2025", &hash).unwrap());
        assert!(!passwords.verify("wander-lust-2024", &hash).unwrap());
    }

    #[test]
    fn test_each_hash_gets_its_own_salt() {
        let passwords = cheap();
        assert_ne!(passwords.hash("same").unwrap(), passwords.hash("same").unwrap());
    }

    #[test]
    fn test_default_service_verifies_cheap_hash() {
        let hash = cheap().hash("portable").unwrap();
        assert!(Argon2PasswordService::new().verify("portable", &hash).unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error() {
        assert!(matches!(
            cheap().verify("pw", "plaintext-password"),
            Err(AuthError::HashingError(_))
        ));
    }
}
