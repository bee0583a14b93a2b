use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// One-way bcrypt hashing of user credentials.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        PasswordHasher { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, BcryptError> {
        hash(password, self.cost)
    }

    /// A hash that bcrypt cannot parse verifies as `false`.
    pub fn verify(&self, password: &str, hashed: &str) -> bool {
        match verify(password, hashed) {
            Ok(is_valid) => is_valid,
            Err(e) => {
                log::debug!("Password verification failed: {:?}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        PasswordHasher::new(DEFAULT_COST)
    }
}
