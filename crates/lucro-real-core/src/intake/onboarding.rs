use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::business::{FixedCost, UserBusiness, VariableCost};
use crate::intake::parse::{parse_currency, parse_currency_value};
use crate::types::Money;
use crate::LucroRealResult;

// ---------------------------------------------------------------------------
// Expense catalog
// ---------------------------------------------------------------------------

/// Form key, display name, category.
pub const EXPENSE_CATALOG: &[(&str, &str, &str)] = &[
    ("aluguel", "Aluguel", "estrutura"),
    ("funcionarios", "Funcionários", "pessoal"),
    ("impostos", "Impostos", "impostos"),
    ("energia", "Energia", "utilidades"),
    ("agua", "Água", "utilidades"),
    ("internetTelefone", "Internet e telefone", "utilidades"),
    ("contador", "Contador", "administrativo"),
    ("sistemas", "Sistemas", "administrativo"),
    ("marketing", "Marketing", "marketing"),
    ("taxasBancarias", "Taxas bancárias", "administrativo"),
    ("seguro", "Seguro", "administrativo"),
    ("transporte", "Transporte", "logistica"),
    ("alvaraLicencas", "Alvará e licenças", "administrativo"),
    ("consertosManutencaoValor", "Consertos e manutenção", "operacional"),
    ("ferramentasEquipamentosValor", "Ferramentas e equipamentos", "operacional"),
    ("multasJurosValor", "Multas e juros", "financeiro"),
    ("cursosConsultoriasValor", "Cursos e consultorias", "desenvolvimento"),
    ("assinaturasValor", "Assinaturas", "administrativo"),
    ("fretesCorreiosValor", "Fretes e correios", "logistica"),
    ("embalagensMaterialValor", "Embalagens e material", "operacional"),
    ("viagensTrabalhoValor", "Viagens de trabalho", "logistica"),
    ("outrosGastosValor", "Outros gastos", "outros"),
];

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// The onboarding form exactly as the front end stores it: every figure is
/// free text. Expense keys outside [`EXPENSE_CATALOG`] are kept as "outros".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingForm {
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub monthly_revenue: String,
    #[serde(default)]
    pub pro_labore: Option<String>,
    #[serde(default)]
    pub variable_cost_percentage: String,
    #[serde(flatten)]
    pub expenses: BTreeMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl OnboardingForm {
    /// Every non-zero expense as a categorized fixed cost, catalog order
    /// first, then unknown keys alphabetically.
    pub fn fixed_costs(&self) -> Vec<FixedCost> {
        let known = EXPENSE_CATALOG.iter().filter_map(|(key, name, category)| {
            let amount = parse_currency_value(self.expenses.get(*key)?);
            Some(((*key).to_string(), (*name).to_string(), (*category).to_string(), amount))
        });
        let unknown = self
            .expenses
            .iter()
            .filter(|(key, _)| !EXPENSE_CATALOG.iter().any(|(k, _, _)| k == key))
            .map(|(key, value)| {
                (key.clone(), key.clone(), "outros".to_string(), parse_currency_value(value))
            });

        known
            .chain(unknown)
            .filter(|(_, _, _, amount)| !amount.is_zero())
            .map(|(id, name, category, amount)| FixedCost {
                id,
                name,
                amount,
                category,
            })
            .collect()
    }

    pub fn monthly_revenue(&self) -> Money {
        parse_currency(&self.monthly_revenue)
    }

    pub fn pro_labore(&self) -> Money {
        self.pro_labore.as_deref().map(parse_currency).unwrap_or(Decimal::ZERO)
    }

    /// Convert into a validated [`UserBusiness`]. Unreadable figures count
    /// as zero; negative ones are rejected by validation.
    pub fn into_business(self, user_id: &str) -> LucroRealResult<UserBusiness> {
        let fixed_costs = self.fixed_costs();
        let percentage = parse_currency(&self.variable_cost_percentage);
        let variable_costs = if percentage.is_zero() {
            Vec::new()
        } else {
            vec![VariableCost {
                id: "variableCostPercentage".into(),
                name: "Custos variáveis".into(),
                percentage_of_revenue: percentage,
                category: "variavel".into(),
            }]
        };

        let now = Utc::now();
        let business = UserBusiness {
            id: String::new(),
            user_id: user_id.to_string(),
            monthly_revenue: self.monthly_revenue(),
            pro_labore: self.pro_labore(),
            business_name: self.business_name,
            business_type: self.business_type,
            fixed_costs,
            variable_costs,
            created_at: now,
            updated_at: now,
        };
        log::debug!(
            "intake '{}': {} fixed costs, {} variable",
            business.business_name,
            business.fixed_costs.len(),
            business.variable_costs.len()
        );

        business.validate()?;
        Ok(business)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LucroRealError;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn form(json: serde_json::Value) -> OnboardingForm {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_form_maps_to_business() {
        let f = form(serde_json::json!({
            "businessName": "Padaria Pão Quente",
            "businessType": "comercio",
            "monthlyRevenue": "20000",
            "aluguel": "3000",
            "funcionarios": "4.500,00",
            "energia": "",
            "proLabore": "3000",
            "variableCostPercentage": "15"
        }));
        let business = f.into_business("u1").unwrap();

        assert_eq!(business.monthly_revenue, dec!(20000));
        assert_eq!(business.pro_labore, dec!(3000));
        let names: Vec<&str> = business.fixed_costs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Aluguel", "Funcionários"]);
        assert_eq!(business.total_fixed_costs(), dec!(7500));
        assert_eq!(business.variable_costs[0].percentage_of_revenue, dec!(15));
        assert_eq!(business.total_variable_costs(), dec!(3000));
    }

    #[test]
    fn test_malformed_values_become_zero() {
        let f = form(serde_json::json!({
            "businessName": "Oficina",
            "monthlyRevenue": "muito",
            "aluguel": "abc",
            "seguro": 250,
            "variableCostPercentage": "?"
        }));
        let business = f.into_business("u1").unwrap();
        assert_eq!(business.monthly_revenue, Decimal::ZERO);
        assert_eq!(business.fixed_costs.len(), 1);
        assert_eq!(business.fixed_costs[0].category, "administrativo");
        assert!(business.variable_costs.is_empty());
    }

    #[test]
    fn test_unknown_expense_kept_as_outros() {
        let f = form(serde_json::json!({
            "businessName": "Loja",
            "monthlyRevenue": "1000",
            "estacionamento": "120"
        }));
        let costs = f.fixed_costs();
        assert_eq!(costs.len(), 1);
        assert_eq!(costs[0].id, "estacionamento");
        assert_eq!(costs[0].category, "outros");
        assert_eq!(costs[0].amount, dec!(120));
    }

    #[test]
    fn test_negative_expense_rejected() {
        let f = form(serde_json::json!({
            "businessName": "Loja",
            "monthlyRevenue": "1000",
            "aluguel": "-50"
        }));
        match f.into_business("u1").unwrap_err() {
            LucroRealError::InvalidInput { field, .. } => assert_eq!(field, "fixed_costs[Aluguel]"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
