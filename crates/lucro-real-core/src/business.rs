use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};
use crate::{LucroRealError, LucroRealResult};

/// A flat monthly expense (rent, payroll, accountant...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCost {
    pub id: String,
    pub name: String,
    pub amount: Money,
    pub category: String,
}

/// A cost proportional to revenue (card fees, commissions, taxes on sales...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableCost {
    pub id: String,
    pub name: String,
    pub percentage_of_revenue: Percent,
    pub category: String,
}

/// Sum of fixed-cost amounts.
pub fn total_fixed(fixed_costs: &[FixedCost]) -> Money {
    fixed_costs
        .iter()
        .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.amount))
}

/// Sum of variable-cost percentages, in points.
pub fn total_variable_percentage(variable_costs: &[VariableCost]) -> Percent {
    variable_costs
        .iter()
        .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.percentage_of_revenue))
}

/// Variable costs in currency for a given revenue.
pub fn total_variable(revenue: Money, variable_costs: &[VariableCost]) -> Money {
    variable_costs.iter().fold(Decimal::ZERO, |acc, c| {
        acc.saturating_add(revenue.saturating_mul(c.percentage_of_revenue) / Decimal::ONE_HUNDRED)
    })
}

/// The business as entered by its owner: the source of every snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBusiness {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub business_name: String,
    #[serde(default)]
    pub business_type: String,
    pub monthly_revenue: Money,
    #[serde(default)]
    pub fixed_costs: Vec<FixedCost>,
    #[serde(default)]
    pub variable_costs: Vec<VariableCost>,
    pub pro_labore: Money,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl UserBusiness {
    pub fn total_fixed_costs(&self) -> Money {
        total_fixed(&self.fixed_costs)
    }

    pub fn total_variable_costs(&self) -> Money {
        total_variable(self.monthly_revenue, &self.variable_costs)
    }

    /// Reject the figures a snapshot cannot be built from: negative revenue,
    /// negative costs or pró-labore.
    pub fn validate(&self) -> LucroRealResult<()> {
        if self.monthly_revenue < Decimal::ZERO {
            return Err(LucroRealError::InvalidInput {
                field: "monthly_revenue".into(),
                reason: "Revenue cannot be negative.".into(),
            });
        }
        if self.pro_labore < Decimal::ZERO {
            return Err(LucroRealError::InvalidInput {
                field: "pro_labore".into(),
                reason: "Pró-labore cannot be negative.".into(),
            });
        }
        if let Some(cost) = self.fixed_costs.iter().find(|c| c.amount < Decimal::ZERO) {
            return Err(LucroRealError::InvalidInput {
                field: format!("fixed_costs[{}]", cost.name),
                reason: "Fixed cost amounts cannot be negative.".into(),
            });
        }
        if let Some(cost) = self
            .variable_costs
            .iter()
            .find(|c| c.percentage_of_revenue < Decimal::ZERO)
        {
            return Err(LucroRealError::InvalidInput {
                field: format!("variable_costs[{}]", cost.name),
                reason: "Variable cost percentages cannot be negative.".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fixed(name: &str, amount: Money) -> FixedCost {
        FixedCost {
            id: name.into(),
            name: name.into(),
            amount,
            category: "fixed".into(),
        }
    }

    fn variable(name: &str, pct: Percent) -> VariableCost {
        VariableCost {
            id: name.into(),
            name: name.into(),
            percentage_of_revenue: pct,
            category: "variable".into(),
        }
    }

    fn sample_business() -> UserBusiness {
        UserBusiness {
            id: "b1".into(),
            user_id: "u1".into(),
            business_name: "Padaria".into(),
            business_type: "servicos".into(),
            monthly_revenue: dec!(10000),
            fixed_costs: vec![fixed("aluguel", dec!(2500)), fixed("funcionarios", dec!(3500))],
            variable_costs: vec![variable("taxas", dec!(4)), variable("insumos", dec!(6))],
            pro_labore: dec!(1000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_totals() {
        let b = sample_business();
        assert_eq!(b.total_fixed_costs(), dec!(6000));
        assert_eq!(b.total_variable_costs(), dec!(1000));
        assert_eq!(total_variable_percentage(&b.variable_costs), dec!(10));
    }

    #[test]
    fn test_negative_revenue_rejected() {
        let mut b = sample_business();
        b.monthly_revenue = dec!(-1);
        match b.validate().unwrap_err() {
            LucroRealError::InvalidInput { field, .. } => assert_eq!(field, "monthly_revenue"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_fixed_cost_names_the_entry() {
        let mut b = sample_business();
        b.fixed_costs.push(fixed("energia", dec!(-10)));
        match b.validate().unwrap_err() {
            LucroRealError::InvalidInput { field, .. } => assert_eq!(field, "fixed_costs[energia]"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_business_passes() {
        assert!(sample_business().validate().is_ok());
    }
}
