// src/middleware/tenancy.rs
//
// O guard que estabelece o contexto de tenant de cada requisição:
// sessão → tenant default → primeiro vínculo → rejeita (se o ator não for
// privilegiado). Também monta o retrato (Actor) e o escopo de query que os
// handlers consomem.

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    db::scope::QueryScope,
    middleware::auth::AuthSession,
    models::tenancy::Tenant,
    policy::Actor,
    tenancy::TenantContext,
};

// O tenant ativo da requisição (ausente apenas para super-admin sem seleção)
#[derive(Clone)]
pub struct ActiveTenant(pub Tenant);

pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth = request
        .extensions()
        .get::<AuthSession>()
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    // O contexto nasce vazio a cada unidade de trabalho; a resolução
    // restabelece o override a partir da sessão
    let mut ctx = TenantContext::new(app_state.sessions.clone(), auth.session_id);
    let tenant = app_state
        .tenancy
        .resolve_for_request(&mut ctx, auth.user.id)
        .await?;

    let partition = tenant.as_ref().map(|t| t.id);
    let actor = app_state
        .rbac_service
        .load_actor(auth.user.clone(), partition)
        .await?;

    // Sem tenant e sem privilégio: rejeita antes de tocar em qualquer dado
    if tenant.is_none() && !actor.can_access_all_tenants() {
        return Err(AppError::NoTenantContext);
    }

    let scope = QueryScope::from_context(&ctx);

    let extensions = request.extensions_mut();
    if let Some(tenant) = tenant {
        extensions.insert(ActiveTenant(tenant));
    }
    extensions.insert(actor);
    extensions.insert(scope);
    extensions.insert(ctx);

    Ok(next.run(request).await)
}

// ---
// Extratores
// ---

/// O ator (usuário + cargos/permissões da partição ativa).
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(CurrentActor)
            .ok_or(AppError::InvalidToken)
    }
}

impl<S> FromRequestParts<S> for ActiveTenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ActiveTenant>()
            .cloned()
            .ok_or(AppError::NoTenantContext)
    }
}

/// O escopo de query derivado do contexto: é ele que os handlers passam
/// aos serviços para toda leitura/gravação escopada.
pub struct Scoped(pub QueryScope);

impl<S> FromRequestParts<S> for Scoped
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<QueryScope>()
            .copied()
            .map(Scoped)
            .ok_or(AppError::NoTenantContext)
    }
}

/// O contexto de tenant completo (para troca/limpeza e chaves de cache).
pub struct CurrentContext(pub TenantContext);

impl<S> FromRequestParts<S> for CurrentContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .map(CurrentContext)
            .ok_or(AppError::NoTenantContext)
    }
}
