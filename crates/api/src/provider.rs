//! The identity-provider boundary.
//!
//! Credential storage, password hashing, and lockout counting live entirely
//! behind [`IdentityProvider`]; the facade treats the provider as a black
//! box and never adds its own locking around it. The in-memory
//! implementation below backs dev wiring and the black-box test suite.

use std::sync::Mutex;

use signet_auth::{ClaimEntry, Principal, PrincipalId, Role};

/// Outcome of a credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialVerification {
    pub succeeded: bool,
    pub is_locked_out: bool,
}

impl CredentialVerification {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            is_locked_out: false,
        }
    }

    pub fn failure() -> Self {
        Self {
            succeeded: false,
            is_locked_out: false,
        }
    }

    pub fn locked_out() -> Self {
        Self {
            succeeded: false,
            is_locked_out: true,
        }
    }
}

/// External identity-management collaborator.
///
/// Implementations are expected to serialize their own concurrent updates
/// (account creation, lockout counters) for the same principal.
pub trait IdentityProvider: Send + Sync {
    /// Create an account. On rejection, every provider-reported reason is
    /// returned so the caller can surface all of them.
    fn create_account(&self, email: &str, password: &str) -> Result<PrincipalId, Vec<String>>;

    /// Verify email+password. With `lockout_enabled`, failed attempts count
    /// toward the provider's lockout threshold.
    fn verify_credentials(
        &self,
        email: &str,
        password: &str,
        lockout_enabled: bool,
    ) -> CredentialVerification;

    /// Claims stored against the account, in provider order.
    fn get_claims(&self, principal_id: PrincipalId) -> Vec<ClaimEntry>;

    /// Role names granted to the account, in provider order.
    fn get_roles(&self, principal_id: PrincipalId) -> Vec<Role>;

    fn find_by_email(&self, email: &str) -> Option<Principal>;
}

pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;

#[derive(Debug)]
struct AccountRecord {
    id: PrincipalId,
    email: String,
    password: String,
    roles: Vec<Role>,
    claims: Vec<ClaimEntry>,
    failed_attempts: u32,
    locked_out: bool,
}

/// In-memory provider for development and tests.
///
/// Passwords are held in plain text and accounts vanish on restart; never
/// wire this outside dev/test.
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    accounts: Mutex<Vec<AccountRecord>>,
    lockout_threshold: u32,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::with_lockout_threshold(DEFAULT_LOCKOUT_THRESHOLD)
    }

    pub fn with_lockout_threshold(lockout_threshold: u32) -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            lockout_threshold,
        }
    }

    /// Grant roles to an existing account (test/dev setup).
    pub fn assign_roles(&self, principal_id: PrincipalId, roles: Vec<Role>) {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.id == principal_id) {
            account.roles.extend(roles);
        }
    }

    /// Attach stored claims to an existing account (test/dev setup).
    pub fn assign_claims(&self, principal_id: PrincipalId, claims: Vec<ClaimEntry>) {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.id == principal_id) {
            account.claims.extend(claims);
        }
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn create_account(&self, email: &str, password: &str) -> Result<PrincipalId, Vec<String>> {
        let email = email.trim().to_lowercase();
        let mut accounts = self.accounts.lock().unwrap();

        if accounts.iter().any(|a| a.email == email) {
            return Err(vec![format!("an account with email '{email}' already exists")]);
        }

        let id = PrincipalId::new();
        accounts.push(AccountRecord {
            id,
            email,
            password: password.to_string(),
            roles: Vec::new(),
            claims: Vec::new(),
            failed_attempts: 0,
            locked_out: false,
        });

        Ok(id)
    }

    fn verify_credentials(
        &self,
        email: &str,
        password: &str,
        lockout_enabled: bool,
    ) -> CredentialVerification {
        let email = email.trim().to_lowercase();
        let mut accounts = self.accounts.lock().unwrap();

        let Some(account) = accounts.iter_mut().find(|a| a.email == email) else {
            // Unknown email reports the same plain failure as a bad password.
            return CredentialVerification::failure();
        };

        if account.locked_out {
            return CredentialVerification::locked_out();
        }

        if account.password == password {
            account.failed_attempts = 0;
            return CredentialVerification::success();
        }

        if lockout_enabled {
            account.failed_attempts += 1;
            if account.failed_attempts >= self.lockout_threshold {
                account.locked_out = true;
                return CredentialVerification::locked_out();
            }
        }

        CredentialVerification::failure()
    }

    fn get_claims(&self, principal_id: PrincipalId) -> Vec<ClaimEntry> {
        let accounts = self.accounts.lock().unwrap();
        accounts
            .iter()
            .find(|a| a.id == principal_id)
            .map(|a| a.claims.clone())
            .unwrap_or_default()
    }

    fn get_roles(&self, principal_id: PrincipalId) -> Vec<Role> {
        let accounts = self.accounts.lock().unwrap();
        accounts
            .iter()
            .find(|a| a.id == principal_id)
            .map(|a| a.roles.clone())
            .unwrap_or_default()
    }

    fn find_by_email(&self, email: &str) -> Option<Principal> {
        let email = email.trim().to_lowercase();
        let accounts = self.accounts.lock().unwrap();
        accounts.iter().find(|a| a.email == email).map(|a| Principal {
            id: a.id,
            email: a.email.clone(),
            roles: a.roles.clone(),
        })
    }
}
