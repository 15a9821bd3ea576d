use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use super::{IdentityError, IdentityFailure};

const USER_NAME_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-._@+";

/// Password and username rules applied before an account is created
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub required_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            required_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

impl PasswordPolicy {
    /// Every rule the password breaks, in a stable order
    pub fn validate(&self, password: &str) -> Vec<IdentityFailure> {
        let mut failures = Vec::new();

        if password.chars().count() < self.required_length {
            failures.push(IdentityFailure::new(
                "PasswordTooShort",
                format!("Passwords must be at least {} characters.", self.required_length),
            ));
        }
        if self.require_non_alphanumeric && password.chars().all(|c| c.is_ascii_alphanumeric()) {
            failures.push(IdentityFailure::new(
                "PasswordRequiresNonAlphanumeric",
                "Passwords must have at least one non alphanumeric character.",
            ));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            failures.push(IdentityFailure::new(
                "PasswordRequiresDigit",
                "Passwords must have at least one digit ('0'-'9').",
            ));
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            failures.push(IdentityFailure::new(
                "PasswordRequiresLower",
                "Passwords must have at least one lowercase ('a'-'z').",
            ));
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            failures.push(IdentityFailure::new(
                "PasswordRequiresUpper",
                "Passwords must have at least one uppercase ('A'-'Z').",
            ));
        }

        failures
    }

    pub fn validate_user_name(&self, user_name: &str) -> Option<IdentityFailure> {
        if user_name.chars().all(|c| USER_NAME_ALPHABET.contains(c)) {
            None
        } else {
            Some(IdentityFailure::new(
                "InvalidUserName",
                format!("Username '{}' is invalid, can only contain letters or digits.", user_name),
            ))
        }
    }
}

/// Argon2id password hashing
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordHasher {
    /// Custom cost parameters (memory in KiB, iterations, lanes)
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, IdentityError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| IdentityError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, IdentityError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| IdentityError::Hashing(e.to_string()))
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, IdentityError> {
        let parsed = PasswordHash::new(hash).map_err(|e| IdentityError::Hashing(e.to_string()))?;
        Ok(self.argon2.verify_password(password.as_bytes(), &parsed).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_params(Params::MIN_M_COST, 1, 1).unwrap()
    }

    #[test]
    fn accepts_strong_password() {
        assert!(PasswordPolicy::default().validate("Secret123!").is_empty());
    }

    #[test]
    fn reports_every_broken_rule() {
        let codes: Vec<String> = PasswordPolicy::default()
            .validate("abc")
            .into_iter()
            .map(|f| f.code)
            .collect();
        assert_eq!(
            codes,
            vec![
                "PasswordTooShort",
                "PasswordRequiresNonAlphanumeric",
                "PasswordRequiresDigit",
                "PasswordRequiresUpper",
            ]
        );
    }

    #[test]
    fn rejects_user_name_with_spaces() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate_user_name("alice").is_none());
        assert!(policy.validate_user_name("alice@x.com").is_none());
        assert_eq!(
            policy.validate_user_name("alice smith").map(|f| f.code),
            Some("InvalidUserName".to_string())
        );
    }

    #[test]
    fn hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("Secret123!").unwrap();
        assert!(hash.starts_with("$argon2id"));
        assert!(hasher.verify("Secret123!", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = hasher();
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(matches!(
            hasher().verify("any", "not-a-hash"),
            Err(IdentityError::Hashing(_))
        ));
    }
}
