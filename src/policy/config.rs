// src/policy/config.rs
//
// As regras de negócio configuráveis do POS. Nada aqui é constante de
// compilação: os valores vêm do ambiente (variáveis POS_*) com defaults
// documentados, e podem ser substituídos em runtime pelo endpoint de
// configurações: os gates releem a configuração a cada avaliação.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PosConfig {
    pub constraints: ConstraintsConfig,
    pub business_hours: BusinessHoursConfig,
    pub currency: CurrencyConfig,
    pub inventory: InventoryConfig,
    pub shifts: ShiftsConfig,
    pub discounts: DiscountsConfig,
    pub tax: TaxConfig,
}

impl PosConfig {
    /// Carrega a configuração do ambiente, caindo nos defaults documentados
    /// quando uma variável está ausente ou ilegível: nunca falha.
    pub fn from_env() -> Self {
        let d = PosConfig::default();
        PosConfig {
            constraints: ConstraintsConfig {
                cashier: CashierConstraints {
                    max_return_amount: env_or(
                        "POS_CASHIER_MAX_RETURN",
                        d.constraints.cashier.max_return_amount,
                    ),
                },
                supervisor: SupervisorConstraints {
                    max_stock_adjustment: env_or(
                        "POS_SUPERVISOR_MAX_STOCK_ADJUSTMENT",
                        d.constraints.supervisor.max_stock_adjustment,
                    ),
                },
                approval: ApprovalConstraints {
                    supervisor_required_amount: env_or(
                        "POS_SUPERVISOR_APPROVAL_THRESHOLD",
                        d.constraints.approval.supervisor_required_amount,
                    ),
                },
            },
            business_hours: BusinessHoursConfig {
                start: env_or("POS_BUSINESS_HOURS_START", d.business_hours.start),
                end: env_or("POS_BUSINESS_HOURS_END", d.business_hours.end),
                timezone: env_or("POS_TIMEZONE", d.business_hours.timezone),
            },
            currency: CurrencyConfig {
                code: env_or("POS_CURRENCY_CODE", d.currency.code),
                symbol: env_or("POS_CURRENCY_SYMBOL", d.currency.symbol),
                decimal_places: env_or("POS_CURRENCY_DECIMAL_PLACES", d.currency.decimal_places),
                cash_rounding: env_or("POS_CASH_ROUNDING", d.currency.cash_rounding),
            },
            inventory: InventoryConfig {
                allow_negative_stock: env_or(
                    "POS_ALLOW_NEGATIVE_STOCK",
                    d.inventory.allow_negative_stock,
                ),
                low_stock_threshold: env_or(
                    "POS_LOW_STOCK_THRESHOLD",
                    d.inventory.low_stock_threshold,
                ),
            },
            shifts: ShiftsConfig {
                require_opening_float: env_or(
                    "POS_REQUIRE_OPENING_FLOAT",
                    d.shifts.require_opening_float,
                ),
                cash_variance_threshold: env_or(
                    "POS_CASH_VARIANCE_THRESHOLD",
                    d.shifts.cash_variance_threshold,
                ),
            },
            discounts: DiscountsConfig {
                max_percentage: env_or("POS_MAX_DISCOUNT_PERCENTAGE", d.discounts.max_percentage),
                require_approval_threshold: env_or(
                    "POS_DISCOUNT_APPROVAL_THRESHOLD",
                    d.discounts.require_approval_threshold,
                ),
            },
            tax: TaxConfig {
                default_rate: env_or("POS_DEFAULT_TAX_RATE", d.tax.default_rate),
                price_includes_tax: env_or("POS_PRICE_INCLUDES_TAX", d.tax.price_includes_tax),
            },
        }
    }
}

// ---
// Limites por cargo
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintsConfig {
    pub cashier: CashierConstraints,
    pub supervisor: SupervisorConstraints,
    pub approval: ApprovalConstraints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CashierConstraints {
    pub max_return_amount: Decimal,
}

impl Default for CashierConstraints {
    fn default() -> Self {
        Self {
            max_return_amount: Decimal::new(1_000_000, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SupervisorConstraints {
    // Em unidades, comparado pelo valor absoluto do ajuste
    pub max_stock_adjustment: i64,
}

impl Default for SupervisorConstraints {
    fn default() -> Self {
        Self {
            max_stock_adjustment: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ApprovalConstraints {
    pub supervisor_required_amount: Decimal,
}

impl Default for ApprovalConstraints {
    fn default() -> Self {
        Self {
            supervisor_required_amount: Decimal::new(5_000_000, 0),
        }
    }
}

// ---
// Horário comercial
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessHoursConfig {
    // Janela [start, end) em horas locais do fuso configurado
    pub start: u32,
    pub end: u32,
    #[schema(example = "Asia/Jakarta")]
    pub timezone: String,
}

impl Default for BusinessHoursConfig {
    fn default() -> Self {
        Self {
            start: 8,
            end: 22,
            timezone: "Asia/Jakarta".to_string(),
        }
    }
}

impl BusinessHoursConfig {
    /// O fuso configurado; um nome ilegível cai em UTC em vez de derrubar a
    /// requisição.
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::Tz::UTC)
    }
}

// ---
// Moeda
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrencyConfig {
    #[schema(example = "IDR")]
    pub code: String,
    #[schema(example = "Rp")]
    pub symbol: String,
    pub decimal_places: u32,
    // Arredondamento de caixa (ex: para os Rp100 mais próximos)
    pub cash_rounding: Decimal,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: "IDR".to_string(),
            symbol: "Rp".to_string(),
            decimal_places: 0,
            cash_rounding: Decimal::new(100, 0),
        }
    }
}

impl CurrencyConfig {
    /// Formata um valor com símbolo, separador de milhar e as casas
    /// decimais configuradas: é o texto que aparece nas razões de negação.
    pub fn format(&self, value: Decimal) -> String {
        let negative = value.is_sign_negative();
        let rounded = value.abs().round_dp(self.decimal_places);
        let text = rounded.to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text.as_str(), ""),
        };

        let digits: Vec<char> = int_part.chars().collect();
        let mut grouped = String::new();
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(*c);
        }

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&self.symbol);
        out.push_str(&grouped);
        if self.decimal_places > 0 {
            out.push('.');
            out.push_str(&format!(
                "{:0<width$}",
                frac_part,
                width = self.decimal_places as usize
            ));
        }
        out
    }
}

// ---
// Estoque
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryConfig {
    pub allow_negative_stock: bool,
    pub low_stock_threshold: i32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            allow_negative_stock: false,
            low_stock_threshold: 10,
        }
    }
}

// ---
// Turnos
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ShiftsConfig {
    pub require_opening_float: bool,
    pub cash_variance_threshold: Decimal,
}

impl Default for ShiftsConfig {
    fn default() -> Self {
        Self {
            require_opening_float: true,
            cash_variance_threshold: Decimal::new(10_000, 0),
        }
    }
}

// ---
// Descontos
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscountsConfig {
    // Porcentagens em [0, 100]
    pub max_percentage: Decimal,
    pub require_approval_threshold: Decimal,
}

impl Default for DiscountsConfig {
    fn default() -> Self {
        Self {
            max_percentage: Decimal::new(100, 0),
            require_approval_threshold: Decimal::new(50, 0),
        }
    }
}

// ---
// Impostos
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxConfig {
    // Fração (0.11 = 11%); a alíquota gravada no produto é em porcentagem
    pub default_rate: Decimal,
    pub price_includes_tax: bool,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            default_rate: Decimal::new(11, 2),
            price_includes_tax: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_groups_thousands_without_decimals() {
        let currency = CurrencyConfig::default();
        assert_eq!(currency.format(Decimal::new(1_500_000, 0)), "Rp1,500,000");
        assert_eq!(currency.format(Decimal::new(999, 0)), "Rp999");
        assert_eq!(currency.format(Decimal::ZERO), "Rp0");
    }

    #[test]
    fn format_honours_decimal_places_and_symbol() {
        let currency = CurrencyConfig {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            decimal_places: 2,
            cash_rounding: Decimal::new(1, 2),
        };
        assert_eq!(currency.format(Decimal::new(12345_65, 2)), "$12,345.65");
        assert_eq!(currency.format(Decimal::new(7, 0)), "$7.00");
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc() {
        let hours = BusinessHoursConfig {
            timezone: "Nusantara/Inexistente".to_string(),
            ..Default::default()
        };
        assert_eq!(hours.tz(), chrono_tz::Tz::UTC);
    }
}
