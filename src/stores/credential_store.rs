use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::db::Role;
use crate::types::db::user::{self, ActiveModel, Entity as User};

/// CredentialStore manages user records and their password hashes
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection and password pepper
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - The secret key used for password hashing (from SecretManager)
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| {
            InternalError::crypto(
                "argon2_init",
                format!("Failed to initialize Argon2 with secret: {}", e),
            )
        })
    }

    fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| InternalError::crypto("password_hash", format!("Password hashing error: {}", e)))
    }

    /// Add a new user to the database
    ///
    /// Email is probed before username so the conflict reported matches the first
    /// colliding field. A storage-level unique violation after the probe is mapped
    /// to the same field-specific error.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user
    /// * `Err(InternalError)` - DuplicateEmail / DuplicateUsername, or a database/crypto failure
    pub async fn add_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let username = username.trim().to_string();
        let email = email.trim().to_lowercase();

        if self.find_by_email(&email).await?.is_some() {
            return Err(CredentialError::DuplicateEmail(email).into());
        }

        let existing = User::find()
            .filter(user::Column::Username.eq(&username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))?;
        if existing.is_some() {
            return Err(CredentialError::DuplicateUsername(username).into());
        }

        let password_hash = self.hash_password(password)?;
        let now = Utc::now().timestamp();

        let new_user = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(username.clone()),
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            role: Set(role),
            profile_image: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = new_user.insert(&self.db).await.map_err(|e| {
            let err = InternalError::database("insert_user", e);
            match err.unique_violation() {
                Some(detail) if detail.contains("email") => {
                    CredentialError::DuplicateEmail(email.clone()).into()
                }
                Some(_) => CredentialError::DuplicateUsername(username.clone()).into(),
                None => err,
            }
        })?;

        tracing::info!("User {} created with role {}", created.id, created.role);
        Ok(created)
    }

    /// Verify credentials by email and return the user on success
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let user = self
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(CredentialError::InvalidCredentials)?;

        let parsed_hash =
            PasswordHash::new(&user.password_hash).map_err(|_| CredentialError::InvalidCredentials)?;

        self.argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| CredentialError::InvalidCredentials)?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// All users, oldest first
    pub async fn list_users(&self) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn count_users(&self) -> Result<u64, InternalError> {
        User::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }

    /// Overwrite the role of an existing user
    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<user::Model, InternalError> {
        let existing = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CredentialError::user_id_not_found(user_id))?;

        let mut active = existing.into_active_model();
        active.role = Set(role);
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_user_role", e))?;

        tracing::info!("User {} role set to {}", updated.id, updated.role);
        Ok(updated)
    }

    /// Permanently remove a user
    pub async fn delete_user(&self, user_id: &str) -> Result<(), InternalError> {
        let result = User::delete_by_id(user_id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        if result.rows_affected == 0 {
            return Err(CredentialError::user_id_not_found(user_id).into());
        }

        tracing::info!("User {} deleted", user_id);
        Ok(())
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
