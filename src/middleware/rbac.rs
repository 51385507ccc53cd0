// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::rbac::permissions, policy::Actor};

/// 1. O trait que define o que é uma permissão exigível na rota
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O extrator (guardião): a rota só roda se o ator tiver a capacidade.
/// Super-admin satisfaz qualquer uma.
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. O retrato do ator já foi montado pelo tenant_guard
        let actor = parts
            .extensions
            .get::<Actor>()
            .ok_or(AppError::InvalidToken)?;

        // B. Checa a capacidade no retrato
        let required = T::slug();
        if !actor.has_permission_to(required) {
            return Err(AppError::AccessDenied(format!(
                "Você precisa da permissão '{}' para realizar esta ação.",
                required
            )));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermViewOutlet;
impl PermissionDef for PermViewOutlet {
    fn slug() -> &'static str {
        permissions::VIEW_OUTLET
    }
}

pub struct PermManageOutlet;
impl PermissionDef for PermManageOutlet {
    fn slug() -> &'static str {
        permissions::MANAGE_OUTLET
    }
}

pub struct PermViewProduct;
impl PermissionDef for PermViewProduct {
    fn slug() -> &'static str {
        permissions::VIEW_PRODUCT
    }
}

pub struct PermManageProduct;
impl PermissionDef for PermManageProduct {
    fn slug() -> &'static str {
        permissions::MANAGE_PRODUCT
    }
}

pub struct PermViewInventory;
impl PermissionDef for PermViewInventory {
    fn slug() -> &'static str {
        permissions::VIEW_INVENTORY
    }
}

pub struct PermAdjustStock;
impl PermissionDef for PermAdjustStock {
    fn slug() -> &'static str {
        permissions::ADJUST_STOCK
    }
}

pub struct PermViewUser;
impl PermissionDef for PermViewUser {
    fn slug() -> &'static str {
        permissions::VIEW_USER
    }
}

pub struct PermManageUser;
impl PermissionDef for PermManageUser {
    fn slug() -> &'static str {
        permissions::MANAGE_USER
    }
}

pub struct PermViewRole;
impl PermissionDef for PermViewRole {
    fn slug() -> &'static str {
        permissions::VIEW_ROLE
    }
}

pub struct PermManageRole;
impl PermissionDef for PermManageRole {
    fn slug() -> &'static str {
        permissions::MANAGE_ROLE
    }
}

pub struct PermViewSettings;
impl PermissionDef for PermViewSettings {
    fn slug() -> &'static str {
        permissions::VIEW_SETTINGS
    }
}

pub struct PermManageSettings;
impl PermissionDef for PermManageSettings {
    fn slug() -> &'static str {
        permissions::MANAGE_SETTINGS
    }
}
