// src/services/auth_service.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
    tenancy::SessionStore,
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    sessions: SessionStore,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        sessions: SessionStore,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            sessions,
            jwt_secret,
            pool,
        }
    }

    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        // 1. Hashing fora do executor async (bcrypt é pesado)
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Cria o usuário dentro de uma transação
        let mut tx = self.pool.begin().await?;
        let new_user = self
            .user_repo
            .create_user(&mut *tx, name, email, &hashed_password)
            .await?;
        tx.commit().await?;

        // 3. Abre a sessão lógica e gera o token
        let session_id = self.sessions.create(new_user.id).await;
        self.create_token(new_user.id, session_id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let session_id = self.sessions.create(user.id).await;
        self.create_token(user.id, session_id)
    }

    /// Valida o bearer token e devolve o usuário + a sessão lógica dele.
    pub async fn validate_token(&self, token: &str) -> Result<(User, Uuid), AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;

        // A sessão precisa existir E pertencer ao dono do token
        let session = self
            .sessions
            .get(claims.sid)
            .await
            .ok_or(AppError::InvalidToken)?;
        if session.user_id != claims.sub {
            return Err(AppError::InvalidToken);
        }

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok((user, claims.sid))
    }

    fn create_token(&self, user_id: Uuid, session_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id,
            sid: session_id,
            iat: now,
            exp: now + 60 * 60 * 24, // 24 horas
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }
}
