//! Credentials lookup for the login flow

use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use crate::database::Database;
use crate::error::AuthError;
use crate::models::Role;
use crate::password::PasswordEncoder;
use crate::repositories::users;

/// What the login mechanism needs to know about a principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Read-only bridge between the user store and authentication
#[derive(Clone)]
pub struct CredentialsProvider {
    db: Database,
    encoder: Arc<dyn PasswordEncoder>,
    /// Verified against when the username is unknown, so that both failure
    /// paths cost one hash verification
    dummy_hash: Arc<OnceLock<Option<String>>>,
}

impl CredentialsProvider {
    pub fn new(db: Database, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            db,
            encoder,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    fn dummy_hash(&self) -> Option<&str> {
        self.dummy_hash
            .get_or_init(|| self.encoder.encode("unknown-principal").ok())
            .as_deref()
    }

    pub async fn load_credentials(&self, username: &str) -> Result<Credentials, AuthError> {
        let mut conn = self.db.pool().acquire().await.map_err(|e| {
            AuthError::from(common::error::DatabaseError::Connection(e))
        })?;
        let user = users::find_by_username(&mut conn, username)
            .await?
            .ok_or_else(|| AuthError::PrincipalNotFound(username.to_string()))?;

        let role = user.role();
        Ok(Credentials {
            username: user.username,
            password_hash: user.password_hash,
            role,
        })
    }

    /// Verify a login attempt
    ///
    /// An unknown username and a wrong password are reported the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Credentials, AuthError> {
        let credentials = match self.load_credentials(username).await {
            Ok(credentials) => credentials,
            Err(AuthError::PrincipalNotFound(_)) => {
                if let Some(hash) = self.dummy_hash() {
                    self.encoder.matches(password, hash);
                }
                warn!(username = %username, "Login failed: unknown user");
                return Err(AuthError::BadCredentials);
            }
            Err(e) => return Err(e),
        };

        if !self.encoder.matches(password, &credentials.password_hash) {
            warn!(username = %username, "Login failed: bad password");
            return Err(AuthError::BadCredentials);
        }

        info!(username = %username, role = %credentials.role, "User authenticated");
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use argon2::Params;
    use chrono::Utc;

    use super::*;
    use crate::password::{Argon2PasswordEncoder, PasswordError};

    /// Counts verifications on top of a real encoder
    struct CountingEncoder {
        inner: Argon2PasswordEncoder,
        verifications: AtomicUsize,
    }

    impl PasswordEncoder for CountingEncoder {
        fn encode(&self, raw: &str) -> Result<String, PasswordError> {
            self.inner.encode(raw)
        }

        fn matches(&self, raw: &str, encoded: &str) -> bool {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            self.inner.matches(raw, encoded)
        }
    }

    async fn provider() -> (CredentialsProvider, Arc<CountingEncoder>) {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("argon2 params");
        let encoder = Arc::new(CountingEncoder {
            inner: Argon2PasswordEncoder::with_params(params),
            verifications: AtomicUsize::new(0),
        });
        let db = Database::open_in_memory().await.expect("open database");

        let hash = encoder.encode("password").expect("hash");
        let mut conn = db.pool().acquire().await.expect("acquire");
        users::insert(
            &mut conn,
            &users::UserRecord {
                username: "jdoe",
                password_hash: &hash,
                first_name: "John",
                last_name: "Doe",
                email: "jdoe@example.com",
                admin: true,
                created_at: Utc::now(),
            },
        )
        .await
        .expect("insert user");

        (CredentialsProvider::new(db, encoder.clone()), encoder)
    }

    #[tokio::test]
    async fn test_authenticate() {
        let (provider, _) = provider().await;

        let credentials = provider
            .authenticate("jdoe", "password")
            .await
            .expect("authenticate");
        assert_eq!(credentials.username, "jdoe");
        assert_eq!(credentials.role, Role::Admin);

        assert!(matches!(
            provider.authenticate("jdoe", "wrong").await,
            Err(AuthError::BadCredentials)
        ));
        assert!(matches!(
            provider.load_credentials("nobody").await,
            Err(AuthError::PrincipalNotFound(name)) if name == "nobody"
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_still_verifies_a_hash() {
        let (provider, encoder) = provider().await;

        assert!(matches!(
            provider.authenticate("nobody", "password").await,
            Err(AuthError::BadCredentials)
        ));
        assert_eq!(encoder.verifications.load(Ordering::SeqCst), 1);

        assert!(matches!(
            provider.authenticate("jdoe", "wrong").await,
            Err(AuthError::BadCredentials)
        ));
        assert_eq!(encoder.verifications.load(Ordering::SeqCst), 2);
    }
}
