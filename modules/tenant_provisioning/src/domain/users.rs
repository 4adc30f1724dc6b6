//! Demo login provisioning

use super::catalog::tenants::DemoUser;
use super::repository::TenantStore;
use crate::contract::{
    Ensured, NewUser, ProvisioningError, ProvisioningResult, SkipReason, Tally, User,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use tracing::{info, warn};

/// Hash a password with Argon2id and return the PHC string
pub fn hash_password(password: &str) -> ProvisioningResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ProvisioningError::Credential(e.to_string()))
}

pub struct UserProvisioner {
    store: TenantStore,
}

impl UserProvisioner {
    pub fn new(store: TenantStore) -> Self {
        Self { store }
    }

    /// Upsert by email: an existing user gets name and password hash replaced
    pub async fn upsert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> ProvisioningResult<Ensured<User>> {
        match self.store.users.find_by_email(email).await? {
            Some(mut existing) => {
                existing.name = name.to_string();
                existing.password_hash = password_hash.to_string();
                Ok(Ensured::Existing(self.store.users.update(&existing).await?))
            }
            None => {
                let created = self
                    .store
                    .users
                    .create(&NewUser {
                        name: name.to_string(),
                        email: email.to_string(),
                        password_hash: password_hash.to_string(),
                    })
                    .await?;
                Ok(Ensured::Created(created))
            }
        }
    }

    /// Upsert each demo user and add its role if missing.
    ///
    /// The password is hashed once per run; every user gets the same PHC string.
    pub async fn provision(
        &self,
        tenant_id: &str,
        users: &[DemoUser],
        password: &str,
    ) -> ProvisioningResult<Tally> {
        let password_hash = hash_password(password)?;
        let mut tally = Tally::default();

        for demo in users {
            let email = demo.email_for(tenant_id);
            let user = self.upsert_user(demo.name, &email, &password_hash).await?;
            tally.record(&user);

            match self.store.roles.find_role(demo.role).await? {
                Some(role) => self.store.users.assign_role(user.get().id, role.id).await?,
                None => {
                    warn!(email = %email, role = demo.role, "Role not found, user left without it");
                    tally.skip(
                        email,
                        SkipReason::RoleMissing {
                            name: demo.role.to_string(),
                        },
                    );
                }
            }
        }

        info!(
            tenant = tenant_id,
            created = tally.created,
            updated = tally.existing,
            "Demo users provisioned"
        );
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2id_phc() {
        let hash = hash_password("password").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("password").unwrap(), hash_password("password").unwrap());
    }
}
