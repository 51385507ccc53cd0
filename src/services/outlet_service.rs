// src/services/outlet_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{scope::QueryScope, OutletRepository},
    models::outlet::{
        CreateOutletPayload, CreateRegisterPayload, Outlet, Register, UpdateOutletPayload,
    },
};

#[derive(Clone)]
pub struct OutletService {
    repo: OutletRepository,
    pool: PgPool,
}

impl OutletService {
    pub fn new(repo: OutletRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_outlet(
        &self,
        scope: &QueryScope,
        payload: &CreateOutletPayload,
    ) -> Result<Outlet, AppError> {
        let mut tx = self.pool.begin().await?;
        let outlet = self
            .repo
            .create_outlet(
                &mut *tx,
                scope,
                None,
                &payload.code,
                &payload.name,
                payload.address.as_deref(),
                payload.mode.as_str(),
                payload.settings.as_ref(),
            )
            .await?;
        tx.commit().await?;
        Ok(outlet)
    }

    pub async fn list_outlets(&self, scope: &QueryScope) -> Result<Vec<Outlet>, AppError> {
        self.repo.list_outlets(scope).await
    }

    pub async fn get_outlet(&self, scope: &QueryScope, id: Uuid) -> Result<Outlet, AppError> {
        self.repo
            .find_outlet(scope, id)
            .await?
            .ok_or(AppError::NotFound("Loja"))
    }

    pub async fn update_outlet(
        &self,
        scope: &QueryScope,
        id: Uuid,
        payload: &UpdateOutletPayload,
    ) -> Result<Outlet, AppError> {
        self.repo
            .update_outlet(
                scope,
                id,
                &payload.name,
                payload.address.as_deref(),
                payload.mode.as_str(),
                payload.settings.as_ref(),
            )
            .await?
            .ok_or(AppError::NotFound("Loja"))
    }

    /// Excluir uma loja é barrado enquanto ela tiver caixas vinculadas.
    pub async fn delete_outlet(&self, scope: &QueryScope, id: Uuid) -> Result<(), AppError> {
        let outlet = self.get_outlet(scope, id).await?;

        if self.repo.count_registers(outlet.id).await? > 0 {
            return Err(AppError::OutletHasRegisters);
        }

        self.repo.delete_outlet(scope, id).await?;
        Ok(())
    }

    // ---
    // Registers
    // ---

    /// A loja dona é resolvida pelo escopo ANTES de criar a caixa: é assim
    /// que a caixa, sem tenant_id próprio, nunca nasce fora do tenant.
    pub async fn create_register(
        &self,
        scope: &QueryScope,
        payload: &CreateRegisterPayload,
    ) -> Result<Register, AppError> {
        let outlet = self.get_outlet(scope, payload.outlet_id).await?;

        let mut tx = self.pool.begin().await?;
        let register = self
            .repo
            .create_register(
                &mut *tx,
                outlet.id,
                &payload.name,
                payload.printer_profile_id,
                payload.settings.as_ref(),
            )
            .await?;
        tx.commit().await?;
        Ok(register)
    }

    pub async fn list_registers(
        &self,
        scope: &QueryScope,
        outlet_id: Option<Uuid>,
    ) -> Result<Vec<Register>, AppError> {
        self.repo.list_registers(scope, outlet_id).await
    }

    pub async fn update_register(
        &self,
        scope: &QueryScope,
        id: Uuid,
        name: &str,
        printer_profile_id: Option<Uuid>,
        settings: Option<&serde_json::Value>,
    ) -> Result<Register, AppError> {
        self.repo
            .update_register(scope, id, name, printer_profile_id, settings)
            .await?
            .ok_or(AppError::NotFound("Caixa"))
    }

    pub async fn delete_register(&self, scope: &QueryScope, id: Uuid) -> Result<(), AppError> {
        let deleted = self.repo.delete_register(scope, id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Caixa"));
        }
        Ok(())
    }
}
