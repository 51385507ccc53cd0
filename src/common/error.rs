use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Negações de regra de negócio (gates) NÃO passam por aqui: elas são
// valores (`GateResult::Deny`), não erros.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Acesso negado: {0}")]
    AccessDenied(String),

    // O utilizador autenticado não tem nenhum estabelecimento ativo
    #[error("Sem acesso a nenhum estabelecimento")]
    NoTenantContext,

    #[error("{0}")]
    UniqueConstraintViolation(String),

    #[error("Já existe um produto com esse SKU neste estabelecimento")]
    SkuAlreadyExists,

    // O código de barras é único entre TODOS os estabelecimentos
    #[error("Já existe uma variação com esse código de barras")]
    BarcodeAlreadyExists,

    #[error("A loja ainda possui caixas registadoras vinculadas")]
    OutletHasRegisters,

    #[error("Você não pode excluir a sua própria conta")]
    SelfDeletion,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{} não encontrado.", what))
            }
            AppError::AccessDenied(reason) => (StatusCode::FORBIDDEN, reason),
            AppError::NoTenantContext => (
                StatusCode::FORBIDDEN,
                "Sem acesso a nenhum estabelecimento. Contacte o administrador.".to_string(),
            ),
            AppError::UniqueConstraintViolation(msg) => (StatusCode::CONFLICT, msg),
            AppError::SkuAlreadyExists => (
                StatusCode::CONFLICT,
                "Já existe um produto com esse SKU neste estabelecimento.".to_string(),
            ),
            AppError::BarcodeAlreadyExists => (
                StatusCode::CONFLICT,
                "Já existe uma variação com esse código de barras.".to_string(),
            ),
            AppError::OutletHasRegisters => (
                StatusCode::CONFLICT,
                "A loja ainda possui caixas registadoras vinculadas.".to_string(),
            ),
            AppError::SelfDeletion => (
                StatusCode::CONFLICT,
                "Você não pode excluir a sua própria conta.".to_string(),
            ),

            // Todos os outros erros viram 500. O `tracing` loga a mensagem
            // detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
