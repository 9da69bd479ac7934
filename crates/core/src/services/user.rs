//! User service: registration, sessions and account management.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vidtube_common::{AppError, AppResult, IdGenerator, MediaKind, SharedMediaStorage};
use vidtube_db::{entities::user, repositories::UserRepository};

use super::{
    MediaUpload, TokenKind, TokenPair, TokenService, not_blank,
    uploads::discard,
};

const AVATAR_FOLDER: &str = "avatars";
const COVER_FOLDER: &str = "covers";

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    tokens: TokenService,
    media: SharedMediaStorage,
    id_gen: IdGenerator,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(custom(function = "not_blank"), length(max = 64))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "not_blank"), length(max = 128))]
    pub fullname: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Login credentials. Either `username` or `email` identifies the user.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    pub username: Option<String>,
    pub email: Option<String>,

    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutput {
    pub user: user::Model,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Input for updating account details.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAccountInput {
    #[validate(custom(function = "not_blank"), length(max = 128))]
    pub fullname: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}

/// Input for changing the password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    #[validate(custom(function = "not_blank"))]
    pub old_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        tokens: TokenService,
        media: SharedMediaStorage,
    ) -> Self {
        Self {
            user_repo,
            tokens,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user with a required avatar and an optional cover image.
    pub async fn register(
        &self,
        input: RegisterInput,
        avatar: Option<MediaUpload>,
        cover_image: Option<MediaUpload>,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let username = input.username.trim().to_lowercase();
        let email = input.email.trim().to_lowercase();

        if self
            .user_repo
            .exists_by_username_or_email(&username, &email)
            .await?
        {
            return Err(AppError::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }

        let avatar =
            avatar.ok_or_else(|| AppError::BadRequest("Avatar file is required".to_string()))?;
        let avatar = avatar.store(&self.media, AVATAR_FOLDER).await?;

        let cover_image_url = match cover_image {
            Some(cover) => Some(cover.store(&self.media, COVER_FOLDER).await?.url),
            None => None,
        };

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username),
            email: Set(email),
            fullname: Set(input.fullname.trim().to_string()),
            avatar_url: Set(avatar.url),
            cover_image_url: Set(cover_image_url),
            password_hash: Set(password_hash),
            refresh_token: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Registered user");
        Ok(user)
    }

    /// Check credentials and open a session.
    pub async fn login(&self, input: LoginInput) -> AppResult<LoginOutput> {
        input.validate()?;

        let identifier = input
            .username
            .as_deref()
            .or(input.email.as_deref())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Username or email is required".to_string()))?;

        let user = self
            .user_repo
            .find_by_login(identifier)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let tokens = self.issue_session(&user.id).await?;
        Ok(LoginOutput { user, tokens })
    }

    /// Close the actor's session by forgetting its refresh token.
    pub async fn logout(&self, actor_id: &str) -> AppResult<()> {
        self.user_repo.set_refresh_token(actor_id, None).await
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The presented token must be the one currently stored for the user;
    /// both tokens are rotated.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;

        let user = self
            .user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            tracing::debug!(user_id = %user.id, "Refresh token is expired or used");
            return Err(AppError::Unauthorized);
        }

        self.issue_session(&user.id).await
    }

    async fn issue_session(&self, user_id: &str) -> AppResult<TokenPair> {
        let tokens = self.tokens.issue_pair(user_id)?;
        self.user_repo
            .set_refresh_token(user_id, Some(tokens.refresh_token.clone()))
            .await?;
        Ok(tokens)
    }

    /// Resolve the user behind an access token.
    pub async fn authenticate_access_token(&self, token: &str) -> AppResult<user::Model> {
        let claims = self.tokens.verify(token, TokenKind::Access)?;
        self.user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Update fullname and/or email.
    pub async fn update_account(
        &self,
        actor_id: &str,
        input: UpdateAccountInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if input.fullname.is_none() && input.email.is_none() {
            return Err(AppError::BadRequest(
                "At least one field is required".to_string(),
            ));
        }

        let user = self.get(actor_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(fullname) = input.fullname {
            active.fullname = Set(fullname.trim().to_string());
        }
        if let Some(email) = input.email {
            active.email = Set(email.trim().to_lowercase());
        }
        active.updated_at = Set(Utc::now().into());

        self.user_repo.update(active).await
    }

    /// Change the actor's password after checking the old one.
    pub async fn change_password(&self, actor_id: &str, input: ChangePasswordInput) -> AppResult<()> {
        input.validate()?;

        let user = self.get(actor_id).await?;
        if !verify_password(&input.old_password, &user.password_hash)? {
            return Err(AppError::BadRequest("Invalid old password".to_string()));
        }

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(hash_password(&input.new_password)?);
        active.updated_at = Set(Utc::now().into());
        self.user_repo.update(active).await?;

        Ok(())
    }

    /// Replace the avatar. The previous image is removed best-effort.
    pub async fn update_avatar(&self, actor_id: &str, upload: MediaUpload) -> AppResult<user::Model> {
        let user = self.get(actor_id).await?;
        let stored = upload.store(&self.media, AVATAR_FOLDER).await?;
        let previous = user.avatar_url.clone();

        let mut active: user::ActiveModel = user.into();
        active.avatar_url = Set(stored.url);
        active.updated_at = Set(Utc::now().into());
        let updated = self.user_repo.update(active).await?;

        discard(&self.media, &previous, MediaKind::Image).await;
        Ok(updated)
    }

    /// Replace the cover image. The previous image is removed best-effort.
    pub async fn update_cover_image(
        &self,
        actor_id: &str,
        upload: MediaUpload,
    ) -> AppResult<user::Model> {
        let user = self.get(actor_id).await?;
        let stored = upload.store(&self.media, COVER_FOLDER).await?;
        let previous = user.cover_image_url.clone();

        let mut active: user::ActiveModel = user.into();
        active.cover_image_url = Set(Some(stored.url));
        active.updated_at = Set(Utc::now().into());
        let updated = self.user_repo.update(active).await?;

        if let Some(previous) = previous {
            discard(&self.media, &previous, MediaKind::Image).await;
        }
        Ok(updated)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
