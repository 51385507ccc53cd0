// src/policy/gates.rs
//
// Os gates de negócio: cada um combina a checagem crua de permissão com
// limites numéricos/por cargo/por horário vindos da configuração. Falha de
// regra de negócio NUNCA vira erro: vira `Deny` com uma razão legível,
// pronta para mostrar ao operador do caixa.

use chrono::{DateTime, Timelike, Utc};
use rust_decimal::Decimal;
use std::sync::{Arc, RwLock};

use crate::models::rbac::{permissions, roles};
use crate::policy::actor::Actor;
use crate::policy::config::PosConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum GateResult {
    Allow,
    Deny { reason: String },
}

impl GateResult {
    fn deny(reason: impl Into<String>) -> Self {
        GateResult::Deny {
            reason: reason.into(),
        }
    }

    pub fn allowed(&self) -> bool {
        matches!(self, GateResult::Allow)
    }

    pub fn denied(&self) -> bool {
        !self.allowed()
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            GateResult::Allow => None,
            GateResult::Deny { reason } => Some(reason),
        }
    }
}

#[derive(Clone)]
pub struct PolicyEngine {
    config: Arc<RwLock<PosConfig>>,
}

impl PolicyEngine {
    pub fn new(config: Arc<RwLock<PosConfig>>) -> Self {
        Self { config }
    }

    pub fn with_config(config: PosConfig) -> Self {
        Self::new(Arc::new(RwLock::new(config)))
    }

    // A configuração é relida a CADA avaliação: os limites podem mudar
    // entre requisições (endpoint de configurações).
    fn cfg(&self) -> PosConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn snapshot(&self) -> PosConfig {
        self.cfg()
    }

    /// Substitui a configuração em runtime (hot reload).
    pub fn replace(&self, new: PosConfig) {
        match self.config.write() {
            Ok(mut guard) => *guard = new,
            Err(poisoned) => *poisoned.into_inner() = new,
        }
    }

    // ---
    // Gates com limite de valor
    // ---

    /// create-return: caixas têm teto de valor; os demais cargos com a
    /// permissão não.
    pub fn create_return(&self, actor: &Actor, amount: Decimal) -> GateResult {
        if !actor.has_permission_to(permissions::CREATE_RETURN) {
            return GateResult::deny("Você não tem permissão para criar devoluções.");
        }

        let cfg = self.cfg();
        let max = cfg.constraints.cashier.max_return_amount;
        if actor.has_role(roles::CASHIER) && amount > max {
            return GateResult::deny(format!(
                "Caixas só podem processar devoluções até {}. Valor: {}",
                cfg.currency.format(max),
                cfg.currency.format(amount)
            ));
        }

        GateResult::Allow
    }

    /// adjust-stock: supervisores têm teto de quantidade (valor absoluto).
    pub fn adjust_stock(&self, actor: &Actor, quantity: i64) -> GateResult {
        if !actor.has_permission_to(permissions::ADJUST_STOCK) {
            return GateResult::deny("Você não tem permissão para ajustar o estoque.");
        }

        let cfg = self.cfg();
        let max = cfg.constraints.supervisor.max_stock_adjustment;
        if actor.has_role(roles::SUPERVISOR) && quantity.abs() > max {
            return GateResult::deny(format!(
                "Supervisores só podem ajustar o estoque em ±{} unidades. Solicitado: {}",
                max, quantity
            ));
        }

        GateResult::Allow
    }

    /// approve-discount: teto global de porcentagem para todos; acima do
    /// limiar de aprovação, só supervisor/admin.
    pub fn approve_discount(&self, actor: &Actor, percentage: Decimal) -> GateResult {
        if !actor.has_permission_to(permissions::APPROVE_DISCOUNT) {
            return GateResult::deny("Você não tem permissão para aprovar descontos.");
        }

        let cfg = self.cfg();
        let max = cfg.discounts.max_percentage;
        let threshold = cfg.discounts.require_approval_threshold;

        if percentage > max {
            return GateResult::deny(format!(
                "O desconto não pode exceder {}%.",
                max.normalize()
            ));
        }

        if percentage > threshold && !actor.has_any_role(&[roles::SUPERVISOR, roles::ADMIN]) {
            return GateResult::deny(format!(
                "Descontos acima de {}% exigem aprovação de um supervisor.",
                threshold.normalize()
            ));
        }

        GateResult::Allow
    }

    // ---
    // Gates simples de capacidade
    // ---

    /// void-sale: apenas quem tem a permissão.
    pub fn void_sale(&self, actor: &Actor) -> GateResult {
        if !actor.has_permission_to(permissions::VOID_SALE) {
            return GateResult::deny(
                "Você não tem permissão para cancelar vendas. Contacte o seu supervisor.",
            );
        }
        GateResult::Allow
    }

    /// requires-active-shift: por enquanto checa a capacidade de turno.
    /// TODO: consultar o estado real do turno quando o módulo de turnos
    /// existir.
    pub fn requires_active_shift(&self, actor: &Actor) -> GateResult {
        if !actor.has_permission_to(permissions::OPEN_SHIFT) {
            return GateResult::deny("Você precisa de permissão de gestão de turnos.");
        }
        GateResult::Allow
    }

    // ---
    // Gates por horário e por limiar
    // ---

    /// business-hours-only: janela [start, end) no fuso configurado.
    pub fn business_hours_only(&self, actor: &Actor) -> GateResult {
        self.business_hours_only_at(actor, Utc::now())
    }

    /// Variante com o instante explícito.
    pub fn business_hours_only_at(&self, _actor: &Actor, now: DateTime<Utc>) -> GateResult {
        let cfg = self.cfg();
        let hours = &cfg.business_hours;
        let current_hour = now.with_timezone(&hours.tz()).hour();

        if current_hour < hours.start || current_hour >= hours.end {
            return GateResult::deny(format!(
                "Operações de venda são permitidas apenas entre {}:00 e {}:00.",
                hours.start, hours.end
            ));
        }

        GateResult::Allow
    }

    /// supervisor-approval: transações acima do limiar exigem
    /// supervisor/admin.
    pub fn supervisor_approval(&self, actor: &Actor, amount: Decimal) -> GateResult {
        let cfg = self.cfg();
        let threshold = cfg.constraints.approval.supervisor_required_amount;

        if amount > threshold && !actor.has_any_role(&[roles::SUPERVISOR, roles::ADMIN]) {
            return GateResult::deny(format!(
                "Transações acima de {} exigem aprovação de um supervisor.",
                cfg.currency.format(threshold)
            ));
        }

        GateResult::Allow
    }

    /// allow-negative-stock: flag global de configuração.
    pub fn allow_negative_stock(&self, _actor: &Actor) -> GateResult {
        if !self.cfg().inventory.allow_negative_stock {
            return GateResult::deny("Estoque negativo não é permitido neste sistema.");
        }
        GateResult::Allow
    }

    /// accept-cash-variance: diferença de caixa acima do limite exige
    /// supervisor/admin.
    pub fn accept_cash_variance(&self, actor: &Actor, variance: Decimal) -> GateResult {
        let cfg = self.cfg();
        let threshold = cfg.shifts.cash_variance_threshold;

        if variance.abs() > threshold && !actor.has_any_role(&[roles::SUPERVISOR, roles::ADMIN]) {
            return GateResult::deny(format!(
                "A diferença de caixa de {} excede o limite de {}. Necessária aprovação de um supervisor.",
                cfg.currency.format(variance.abs()),
                cfg.currency.format(threshold)
            ));
        }

        GateResult::Allow
    }

    /// requires-opening-float: semântica INVERTIDA em relação aos demais
    /// gates: Allow significa "a exigência de fundo de abertura existe",
    /// Deny significa "não é exigido". Preservada exatamente assim; lê-se
    /// ao contrário de todos os outros.
    pub fn requires_opening_float(&self, _actor: &Actor) -> GateResult {
        if self.cfg().shifts.require_opening_float {
            return GateResult::Allow;
        }
        GateResult::deny("O fundo de abertura de caixa não é exigido nesta configuração.")
    }

    // ---
    // Gate composto
    // ---

    /// can-process-sale: permissão de venda E turno E horário comercial E
    /// aprovação de supervisor: curto-circuita na primeira negação.
    pub fn can_process_sale(&self, actor: &Actor, amount: Decimal) -> GateResult {
        self.can_process_sale_at(actor, amount, Utc::now())
    }

    /// Variante com o instante explícito.
    pub fn can_process_sale_at(
        &self,
        actor: &Actor,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> GateResult {
        if !actor.has_permission_to(permissions::CREATE_SALE) {
            return GateResult::deny("Você não tem permissão para registrar vendas.");
        }

        let shift = self.requires_active_shift(actor);
        if shift.denied() {
            return shift;
        }

        let hours = self.business_hours_only_at(actor, now);
        if hours.denied() {
            return hours;
        }

        self.supervisor_approval(actor, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::User;
    use crate::policy::config::{CurrencyConfig, PosConfig};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use uuid::Uuid;

    fn actor(role_list: &[&str], perm_list: &[&str]) -> Actor {
        let user = User {
            id: Uuid::new_v4(),
            name: "Operador".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        Actor::new(
            user,
            Some(Uuid::new_v4()),
            role_list.iter().map(|r| r.to_string()),
            perm_list.iter().map(|p| p.to_string()),
            false,
        )
    }

    fn engine() -> PolicyEngine {
        PolicyEngine::with_config(PosConfig::default())
    }

    #[test]
    fn create_return_requires_the_raw_permission() {
        let result = engine().create_return(&actor(&["cashier"], &[]), Decimal::new(100, 0));
        assert!(result.denied());
    }

    #[rstest]
    #[case(Decimal::new(500_000, 0), true)]
    #[case(Decimal::new(1_000_000, 0), true)]
    #[case(Decimal::new(1_500_000, 0), false)]
    fn cashier_return_is_capped_by_configuration(
        #[case] amount: Decimal,
        #[case] allowed: bool,
    ) {
        let cashier = actor(&["cashier"], &["create_return"]);
        assert_eq!(engine().create_return(&cashier, amount).allowed(), allowed);
    }

    #[test]
    fn admin_returns_are_not_capped() {
        let admin = actor(&["admin"], &["create_return"]);
        let result = engine().create_return(&admin, Decimal::new(50_000_000, 0));
        assert!(result.allowed());
    }

    #[test]
    fn return_denial_reason_carries_the_configured_currency() {
        let mut cfg = PosConfig::default();
        cfg.currency = CurrencyConfig {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            decimal_places: 0,
            cash_rounding: Decimal::ONE,
        };
        let engine = PolicyEngine::with_config(cfg);

        let cashier = actor(&["cashier"], &["create_return"]);
        let result = engine.create_return(&cashier, Decimal::new(2_000_000, 0));

        let reason = result.reason().expect("deveria negar");
        assert!(reason.contains("$1,000,000"));
        assert!(reason.contains("$2,000,000"));
    }

    #[rstest]
    #[case(-5, true)]
    #[case(3, true)]
    #[case(10, false)]
    #[case(-7, false)]
    fn supervisor_stock_adjustment_compares_absolute_value(
        #[case] quantity: i64,
        #[case] allowed: bool,
    ) {
        let supervisor = actor(&["supervisor"], &["adjust_stock"]);
        assert_eq!(
            engine().adjust_stock(&supervisor, quantity).allowed(),
            allowed
        );
    }

    #[test]
    fn non_supervisor_with_permission_has_no_quantity_cap() {
        let admin = actor(&["admin"], &["adjust_stock"]);
        assert!(engine().adjust_stock(&admin, 500).allowed());
    }

    #[rstest]
    // max 80, limiar de aprovação 30 (cenário clássico de configuração)
    #[case(&["cashier"], Decimal::new(25, 0), true)]
    #[case(&["cashier"], Decimal::new(50, 0), false)]
    #[case(&["supervisor"], Decimal::new(50, 0), true)]
    #[case(&["supervisor"], Decimal::new(90, 0), false)]
    fn discount_thresholds_are_role_sensitive(
        #[case] role_list: &[&str],
        #[case] percentage: Decimal,
        #[case] allowed: bool,
    ) {
        let mut cfg = PosConfig::default();
        cfg.discounts.max_percentage = Decimal::new(80, 0);
        cfg.discounts.require_approval_threshold = Decimal::new(30, 0);
        let engine = PolicyEngine::with_config(cfg);

        let user = actor(role_list, &["approve_discount"]);
        assert_eq!(engine.approve_discount(&user, percentage).allowed(), allowed);
    }

    #[test]
    fn void_sale_is_pure_permission() {
        assert!(engine().void_sale(&actor(&[], &["void_sale"])).allowed());
        assert!(engine().void_sale(&actor(&["supervisor"], &[])).denied());
    }

    #[rstest]
    #[case(7, false)] // antes da abertura
    #[case(8, true)] // abre às 8
    #[case(21, true)]
    #[case(22, false)] // janela é [start, end): 22:00 já está fora
    #[case(23, false)]
    fn business_hours_window_is_half_open(#[case] hour: u32, #[case] allowed: bool) {
        let mut cfg = PosConfig::default();
        cfg.business_hours.timezone = "UTC".to_string();
        let engine = PolicyEngine::with_config(cfg);

        let now = Utc.with_ymd_and_hms(2025, 11, 3, hour, 30, 0).unwrap();
        let result = engine.business_hours_only_at(&actor(&["cashier"], &[]), now);
        assert_eq!(result.allowed(), allowed);
    }

    #[test]
    fn business_hours_respect_the_configured_timezone() {
        let mut cfg = PosConfig::default();
        cfg.business_hours.timezone = "Asia/Jakarta".to_string(); // UTC+7
        let engine = PolicyEngine::with_config(cfg);

        // 02:00 UTC = 09:00 em Jakarta: dentro da janela
        let now = Utc.with_ymd_and_hms(2025, 11, 3, 2, 0, 0).unwrap();
        assert!(engine
            .business_hours_only_at(&actor(&[], &[]), now)
            .allowed());

        // 16:00 UTC = 23:00 em Jakarta: fora
        let now = Utc.with_ymd_and_hms(2025, 11, 3, 16, 0, 0).unwrap();
        assert!(engine.business_hours_only_at(&actor(&[], &[]), now).denied());
    }

    #[test]
    fn supervisor_approval_gate_uses_the_configured_threshold() {
        let mut cfg = PosConfig::default();
        cfg.constraints.approval.supervisor_required_amount = Decimal::new(10_000_000, 0);
        let engine = PolicyEngine::with_config(cfg);

        let cashier = actor(&["cashier"], &[]);
        let supervisor = actor(&["supervisor"], &[]);

        assert!(engine
            .supervisor_approval(&cashier, Decimal::new(8_000_000, 0))
            .allowed());
        assert!(engine
            .supervisor_approval(&supervisor, Decimal::new(8_000_000, 0))
            .allowed());
        assert!(engine
            .supervisor_approval(&cashier, Decimal::new(15_000_000, 0))
            .denied());
        assert!(engine
            .supervisor_approval(&supervisor, Decimal::new(15_000_000, 0))
            .allowed());
    }

    #[test]
    fn cash_variance_checks_absolute_value_against_threshold() {
        let cashier = actor(&["cashier"], &[]);
        let supervisor = actor(&["supervisor"], &[]);

        assert!(engine()
            .accept_cash_variance(&cashier, Decimal::new(-5_000, 0))
            .allowed());
        assert!(engine()
            .accept_cash_variance(&cashier, Decimal::new(-15_000, 0))
            .denied());
        assert!(engine()
            .accept_cash_variance(&supervisor, Decimal::new(50_000, 0))
            .allowed());
    }

    #[test]
    fn negative_stock_follows_the_configuration_flag() {
        assert!(engine()
            .allow_negative_stock(&actor(&["admin"], &[]))
            .denied());

        let mut cfg = PosConfig::default();
        cfg.inventory.allow_negative_stock = true;
        let engine = PolicyEngine::with_config(cfg);
        assert!(engine.allow_negative_stock(&actor(&[], &[])).allowed());
    }

    #[test]
    fn opening_float_gate_has_inverted_semantics() {
        // Allow = "a exigência existe"
        assert!(engine().requires_opening_float(&actor(&[], &[])).allowed());

        let mut cfg = PosConfig::default();
        cfg.shifts.require_opening_float = false;
        let engine = PolicyEngine::with_config(cfg);
        assert!(engine.requires_opening_float(&actor(&[], &[])).denied());
    }

    #[test]
    fn compound_sale_gate_requires_every_leg() {
        let engine = {
            let mut cfg = PosConfig::default();
            cfg.business_hours.timezone = "UTC".to_string();
            PolicyEngine::with_config(cfg)
        };
        let noon = Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2025, 11, 3, 0, 30, 0).unwrap();
        let amount = Decimal::new(100_000, 0);

        let full = actor(&["cashier"], &["create_sale", "open_shift"]);
        assert!(engine.can_process_sale_at(&full, amount, noon).allowed());

        // Sem permissão de venda
        let no_sale = actor(&["cashier"], &["open_shift"]);
        assert!(engine.can_process_sale_at(&no_sale, amount, noon).denied());

        // Sem capacidade de turno
        let no_shift = actor(&["cashier"], &["create_sale"]);
        assert!(engine.can_process_sale_at(&no_shift, amount, noon).denied());

        // Fora do horário comercial
        assert!(engine.can_process_sale_at(&full, amount, midnight).denied());

        // Acima do limiar de aprovação, sem cargo de supervisor
        let big = Decimal::new(6_000_000, 0);
        assert!(engine.can_process_sale_at(&full, big, noon).denied());
    }

    #[test]
    fn super_admin_satisfies_permissions_but_keeps_numeric_caps_off() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Root".to_string(),
            email: "root@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let root = Actor::new(user, None, Vec::new(), Vec::new(), true);

        // Sem cargo "cashier", logo sem teto de devolução
        assert!(engine()
            .create_return(&root, Decimal::new(999_000_000, 0))
            .allowed());
        assert!(engine().void_sale(&root).allowed());
    }

    #[test]
    fn configuration_is_reread_on_every_evaluation() {
        let engine = engine();
        let cashier = actor(&["cashier"], &["create_return"]);
        let amount = Decimal::new(1_500_000, 0);

        assert!(engine.create_return(&cashier, amount).denied());

        // Hot reload: o mesmo engine passa a aceitar o valor
        let mut cfg = engine.snapshot();
        cfg.constraints.cashier.max_return_amount = Decimal::new(2_000_000, 0);
        engine.replace(cfg);

        assert!(engine.create_return(&cashier, amount).allowed());
    }
}
