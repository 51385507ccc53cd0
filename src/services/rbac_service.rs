// src/services/rbac_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::RbacRepository;
use crate::models::auth::User;
use crate::models::rbac::{permissions, CreateRolePayload, Permission, Role, RoleResponse};
use crate::policy::Actor;

// Descrições do catálogo, gravadas junto com cada permissão no seeding
const CATALOG: &[(&str, &str)] = &[
    (permissions::CREATE_SALE, "Registrar vendas"),
    (permissions::VOID_SALE, "Cancelar vendas"),
    (permissions::VIEW_SALE, "Consultar vendas"),
    (
        permissions::CREATE_RETURN,
        "Criar devoluções (sujeito ao limite de valor para caixas)",
    ),
    (
        permissions::CREATE_UNLIMITED_RETURN,
        "Criar devoluções sem limite de valor",
    ),
    (permissions::VIEW_PRODUCT, "Consultar produtos"),
    (permissions::MANAGE_PRODUCT, "Criar, alterar e arquivar produtos"),
    (permissions::VIEW_INVENTORY, "Consultar níveis de estoque"),
    (
        permissions::ADJUST_STOCK,
        "Ajustar estoque (sujeito ao limite de quantidade para supervisores)",
    ),
    (
        permissions::UNLIMITED_STOCK_ADJUSTMENT,
        "Ajustar estoque sem limite de quantidade",
    ),
    (permissions::OPEN_SHIFT, "Abrir turnos de caixa"),
    (permissions::CLOSE_SHIFT, "Fechar turnos de caixa"),
    (permissions::VIEW_SHIFT, "Consultar turnos"),
    (permissions::APPLY_DISCOUNT, "Aplicar descontos básicos"),
    (permissions::APPROVE_DISCOUNT, "Aprovar descontos maiores"),
    (permissions::VIEW_REPORTS, "Consultar relatórios"),
    (permissions::GENERATE_REPORTS, "Gerar relatórios personalizados"),
    (permissions::VIEW_USER, "Consultar usuários"),
    (permissions::MANAGE_USER, "Criar, alterar e excluir usuários"),
    (permissions::VIEW_ROLE, "Consultar cargos"),
    (permissions::MANAGE_ROLE, "Criar cargos e atribuir permissões"),
    (permissions::VIEW_SETTINGS, "Consultar configurações"),
    (permissions::MANAGE_SETTINGS, "Alterar configurações"),
    (permissions::VIEW_OUTLET, "Consultar lojas"),
    (permissions::MANAGE_OUTLET, "Criar e gerenciar lojas"),
];

#[derive(Clone)]
pub struct RbacService {
    repo: RbacRepository,
    pool: PgPool,
}

impl RbacService {
    pub fn new(repo: RbacRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Garante o catálogo de permissões na inicialização (idempotente).
    pub async fn seed_permission_catalog(&self) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for (name, description) in CATALOG {
            self.repo
                .ensure_permission(&mut *tx, name, Some(description))
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Cria um cargo na partição dada com o conjunto de permissões pedido.
    /// Nomes desconhecidos são ignorados em silêncio; a resposta carrega o
    /// conjunto efetivamente vinculado.
    pub async fn create_role_with_permissions(
        &self,
        partition: Option<Uuid>,
        payload: &CreateRolePayload,
    ) -> Result<RoleResponse, AppError> {
        // 1. Inicia transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria o cargo
        let role = self
            .repo
            .create_role(&mut *tx, partition, &payload.name)
            .await?;

        // 3. Resolve nomes ("create_sale") para linhas
        let found = self
            .repo
            .find_permissions_by_names(&mut *tx, &payload.permissions)
            .await?;

        let permission_ids: Vec<Uuid> = found.iter().map(|p| p.id).collect();
        let valid_names: Vec<String> = found.into_iter().map(|p| p.name).collect();

        // 4. Salva o vínculo
        if !permission_ids.is_empty() {
            self.repo
                .assign_permissions(&mut *tx, role.id, &permission_ids)
                .await?;
        }

        // 5. Commit
        tx.commit().await?;

        Ok(RoleResponse {
            role,
            permissions: valid_names,
        })
    }

    pub async fn list_roles(&self, partition: Option<Uuid>) -> Result<Vec<Role>, AppError> {
        self.repo.list_roles(partition).await
    }

    pub async fn list_system_permissions(&self) -> Result<Vec<Permission>, AppError> {
        self.repo.list_all_permissions().await
    }

    /// Substitui o conjunto de cargos do usuário NA PARTIÇÃO DADA: a
    /// partição vem sempre de fora (em geral, o tenant do próprio
    /// usuário-alvo), nunca de um ponteiro ambiente. Cargos de outras
    /// partições ficam intactos. Devolve os nomes efetivados.
    pub async fn sync_user_roles(
        &self,
        user_id: Uuid,
        partition: Option<Uuid>,
        role_names: &[String],
    ) -> Result<Vec<String>, AppError> {
        let mut tx = self.pool.begin().await?;

        self.repo
            .clear_roles_in_partition(&mut *tx, user_id, partition)
            .await?;

        let mut applied = Vec::new();
        for name in role_names {
            if let Some(role) = self.repo.find_role(partition, name).await? {
                self.repo.assign_role(&mut *tx, user_id, role.id).await?;
                applied.push(role.name);
            }
        }

        tx.commit().await?;
        Ok(applied)
    }

    /// Atribui um cargo (por nome) ao usuário na partição dada.
    pub async fn assign_role(
        &self,
        user_id: Uuid,
        partition: Option<Uuid>,
        role_name: &str,
    ) -> Result<bool, AppError> {
        let Some(role) = self.repo.find_role(partition, role_name).await? else {
            return Ok(false);
        };
        let mut tx = self.pool.begin().await?;
        self.repo.assign_role(&mut *tx, user_id, role.id).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Checagem crua de capacidade com curto-circuito de super-admin -
    /// o `hasPermissionTo` exposto aos colaboradores externos.
    pub async fn has_permission_to(
        &self,
        user_id: Uuid,
        partition: Option<Uuid>,
        permission_name: &str,
    ) -> Result<bool, AppError> {
        if self.repo.is_super_admin(user_id).await? {
            return Ok(true);
        }
        self.repo
            .user_has_permission(user_id, partition, permission_name)
            .await
    }

    /// Monta o retrato do ator para a partição ativa: cargos, permissões e
    /// o flag de super-admin, carregados uma vez por requisição.
    pub async fn load_actor(
        &self,
        user: User,
        partition: Option<Uuid>,
    ) -> Result<Actor, AppError> {
        let super_admin = self.repo.is_super_admin(user.id).await?;
        let roles = self.repo.user_role_names(user.id, partition).await?;
        let perms = self.repo.user_permission_names(user.id, partition).await?;
        Ok(Actor::new(user, partition, roles, perms, super_admin))
    }

    /// Os cargos do usuário na partição dele mesmo (telas de listagem).
    pub async fn roles_for_user(
        &self,
        user_id: Uuid,
        partition: Option<Uuid>,
    ) -> Result<Vec<String>, AppError> {
        self.repo.user_role_names(user_id, partition).await
    }
}
