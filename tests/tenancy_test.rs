// tests/tenancy_test.rs
//
// As propriedades da camada de tenancy: resolução de contexto, troca de
// tenant, assunção por super-admin e chaves de cache.

mod common;

use common::{make_tenant, make_user, MemoryDirectory};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use pos_backend::tenancy::{SessionStore, TenancyService, TenantContext};

async fn new_context(store: &SessionStore, user_id: Uuid) -> TenantContext {
    let sid = store.create(user_id).await;
    TenantContext::new(store.clone(), sid)
}

#[tokio::test]
async fn switch_tenant_succeeds_exactly_when_user_has_access() {
    let dir = MemoryDirectory::new();
    let service = TenancyService::new(dir.clone());
    let store = SessionStore::new();

    let t1 = make_tenant("loja-um");
    let t2 = make_tenant("loja-dois");
    let user = make_user("ana");
    dir.add_tenant(&t1).await;
    dir.add_tenant(&t2).await;
    dir.add_membership(user.id, t1.id, true).await;

    let mut ctx = new_context(&store, user.id).await;

    // Membro: troca funciona e o contexto aponta para o tenant
    assert!(service
        .switch_tenant(&mut ctx, user.id, t1.id)
        .await
        .unwrap());
    assert_eq!(ctx.current_id(), Some(t1.id));

    // Não-membro: negado, e o estado fica exatamente como estava
    assert!(!service
        .switch_tenant(&mut ctx, user.id, t2.id)
        .await
        .unwrap());
    assert_eq!(ctx.current_id(), Some(t1.id));
}

#[tokio::test]
async fn switch_to_unknown_tenant_is_denied_with_state_unchanged() {
    let dir = MemoryDirectory::new();
    let service = TenancyService::new(dir.clone());
    let store = SessionStore::new();

    let user = make_user("bia");
    let mut ctx = new_context(&store, user.id).await;

    let switched = service
        .switch_tenant(&mut ctx, user.id, Uuid::new_v4())
        .await
        .unwrap();

    assert!(!switched);
    assert_eq!(ctx.current_id(), None);
}

#[tokio::test]
async fn assume_tenant_is_restricted_to_super_admins() {
    let dir = MemoryDirectory::new();
    let service = TenancyService::new(dir.clone());
    let store = SessionStore::new();

    let t1 = make_tenant("loja-um");
    dir.add_tenant(&t1).await;

    let root = make_user("root");
    let mortal = make_user("carlos");
    dir.make_super_admin(root.id).await;
    // root NÃO tem vínculo com t1 e mesmo assim pode assumir

    let mut root_ctx = new_context(&store, root.id).await;
    assert!(service
        .assume_tenant(&mut root_ctx, root.id, t1.id)
        .await
        .unwrap());
    assert_eq!(root_ctx.current_id(), Some(t1.id));

    let mut mortal_ctx = new_context(&store, mortal.id).await;
    assert!(!service
        .assume_tenant(&mut mortal_ctx, mortal.id, t1.id)
        .await
        .unwrap());
    assert_eq!(mortal_ctx.current_id(), None);
}

#[tokio::test]
async fn super_admin_has_access_to_every_tenant() {
    let dir = MemoryDirectory::new();
    let service = TenancyService::new(dir.clone());

    let t1 = make_tenant("loja-um");
    let t2 = make_tenant("loja-dois");
    dir.add_tenant(&t1).await;
    dir.add_tenant(&t2).await;

    let root = make_user("root");
    dir.make_super_admin(root.id).await;
    dir.add_membership(root.id, t1.id, true).await;

    assert!(service.has_access_to_tenant(root.id, t1.id).await.unwrap());
    // Sem vínculo com t2, mas super-admin passa
    assert!(service.has_access_to_tenant(root.id, t2.id).await.unwrap());

    let mortal = make_user("carlos");
    dir.add_membership(mortal.id, t1.id, true).await;
    assert!(service
        .has_access_to_tenant(mortal.id, t1.id)
        .await
        .unwrap());
    assert!(!service
        .has_access_to_tenant(mortal.id, t2.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn request_resolution_prefers_session_then_default_then_first() {
    let dir = MemoryDirectory::new();
    let service = TenancyService::new(dir.clone());
    let store = SessionStore::new();

    let first = make_tenant("primeira");
    let default = make_tenant("padrao");
    let chosen = make_tenant("escolhida");
    dir.add_tenant(&first).await;
    dir.add_tenant(&default).await;
    dir.add_tenant(&chosen).await;

    let user = make_user("ana");
    dir.add_membership(user.id, first.id, false).await;
    dir.add_membership(user.id, default.id, true).await;
    dir.add_membership(user.id, chosen.id, false).await;

    // Sem nada na sessão: cai no default
    let mut ctx = new_context(&store, user.id).await;
    let resolved = service
        .resolve_for_request(&mut ctx, user.id)
        .await
        .unwrap();
    assert_eq!(resolved.map(|t| t.id), Some(default.id));

    // Com seleção na sessão: a sessão vence
    service
        .switch_tenant(&mut ctx, user.id, chosen.id)
        .await
        .unwrap();
    let mut next_unit = TenantContext::new(store.clone(), ctx.session_id());
    let resolved = service
        .resolve_for_request(&mut next_unit, user.id)
        .await
        .unwrap();
    assert_eq!(resolved.map(|t| t.id), Some(chosen.id));
}

#[tokio::test]
async fn request_resolution_falls_back_to_first_membership() {
    let dir = MemoryDirectory::new();
    let service = TenancyService::new(dir.clone());
    let store = SessionStore::new();

    let first = make_tenant("primeira");
    let second = make_tenant("segunda");
    dir.add_tenant(&first).await;
    dir.add_tenant(&second).await;

    // Nenhum vínculo marcado como default
    let user = make_user("ana");
    dir.add_membership(user.id, first.id, false).await;
    dir.add_membership(user.id, second.id, false).await;

    let mut ctx = new_context(&store, user.id).await;
    let resolved = service
        .resolve_for_request(&mut ctx, user.id)
        .await
        .unwrap();
    assert_eq!(resolved.map(|t| t.id), Some(first.id));
}

#[tokio::test]
async fn user_without_tenants_resolves_to_none() {
    let dir = MemoryDirectory::new();
    let service = TenancyService::new(dir.clone());
    let store = SessionStore::new();

    let user = make_user("semloja");
    let mut ctx = new_context(&store, user.id).await;

    let resolved = service
        .resolve_for_request(&mut ctx, user.id)
        .await
        .unwrap();
    assert!(resolved.is_none());
    assert_eq!(ctx.current_id(), None);
}

#[tokio::test]
async fn get_current_rehydrates_the_override_from_the_session() {
    let dir = MemoryDirectory::new();
    let service = TenancyService::new(dir.clone());
    let store = SessionStore::new();

    let t1 = make_tenant("loja-um");
    dir.add_tenant(&t1).await;
    let user = make_user("ana");
    dir.add_membership(user.id, t1.id, true).await;

    let mut ctx = new_context(&store, user.id).await;
    service
        .switch_tenant(&mut ctx, user.id, t1.id)
        .await
        .unwrap();

    // Nova unidade de trabalho: o override morreu, a sessão sobreviveu
    let mut next_unit = TenantContext::new(store.clone(), ctx.session_id());
    assert_eq!(next_unit.current_id(), None);

    let current = service.get_current(&mut next_unit).await.unwrap();
    assert_eq!(current.map(|t| t.id), Some(t1.id));
    // E o override foi re-hidratado
    assert_eq!(next_unit.current_id(), Some(t1.id));
}

#[tokio::test]
async fn clear_resets_session_and_cache_key_namespace() {
    let dir = MemoryDirectory::new();
    let service = TenancyService::new(dir.clone());
    let store = SessionStore::new();

    let t1 = make_tenant("loja-um");
    dir.add_tenant(&t1).await;
    let user = make_user("ana");
    dir.add_membership(user.id, t1.id, true).await;

    let mut ctx = new_context(&store, user.id).await;
    assert_eq!(ctx.cache_key("relatorio"), "global:relatorio");

    service
        .switch_tenant(&mut ctx, user.id, t1.id)
        .await
        .unwrap();
    assert_eq!(
        ctx.cache_key("relatorio"),
        format!("tenant:{}:relatorio", t1.id)
    );

    service.clear(&mut ctx).await;
    assert_eq!(ctx.cache_key("relatorio"), "global:relatorio");

    // E a próxima unidade de trabalho não resolve mais nada pela sessão
    let mut next_unit = TenantContext::new(store.clone(), ctx.session_id());
    assert!(service.get_current(&mut next_unit).await.unwrap().is_none());
}
