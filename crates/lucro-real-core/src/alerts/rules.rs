//! The rule battery, as an ordered table of predicate + template entries.
//!
//! Each entry looks at a shared [`RuleContext`] and yields at most one
//! [`Finding`]. Entries are independent except the two else-if pairs
//! (fixed-cost weight and pró-labore), which live in a single entry each.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::alerts::model::{Alert, AlertRule};
use crate::config::DiagnosisConfig;
use crate::format::MoneyFormatter;
use crate::metrics::break_even::{break_even_from_totals, BreakEven};
use crate::snapshot::FinancialSnapshot;
use crate::types::{Money, Percent};

/// Months-until-broke fallback when the loss is exactly zero.
const MONTHS_UNTIL_BROKE_FALLBACK: Decimal = dec!(3);

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

/// A ratio in points whose denominator may be zero.
///
/// A positive amount over a zero base is `Unbounded`: it exceeds every
/// threshold. A zero amount over a zero base is `Finite(0)`. A ratio too
/// large for `Decimal` saturates: `Unbounded` upwards, `Decimal::MIN` downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Share {
    Finite(Percent),
    Unbounded,
}

impl Share {
    pub fn of(amount: Decimal, base: Decimal) -> Self {
        if base.is_zero() {
            if amount > Decimal::ZERO {
                Share::Unbounded
            } else {
                Share::Finite(Decimal::ZERO)
            }
        } else {
            match amount
                .checked_div(base)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            {
                Some(p) => Share::Finite(p),
                None if amount.is_sign_negative() == base.is_sign_negative() => Share::Unbounded,
                None => Share::Finite(Decimal::MIN),
            }
        }
    }

    pub fn exceeds(&self, threshold: Percent) -> bool {
        match self {
            Share::Finite(p) => *p > threshold,
            Share::Unbounded => true,
        }
    }

    fn describe(&self, fmt: &MoneyFormatter, decimals: u32) -> String {
        match self {
            Share::Finite(p) => fmt.percent(*p, decimals),
            Share::Unbounded => "mais de 100%".into(),
        }
    }
}

/// Month-over-month movement, present only when a previous snapshot is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodComparison {
    /// Revenue change relative to the previous month, in points. `None`
    /// when neither month has revenue: there is no growth to measure.
    pub revenue_growth: Option<Share>,
    /// Absolute change in real profit.
    pub profit_change: Money,
    /// Change in profit margin, in points.
    pub margin_change: Percent,
}

impl PeriodComparison {
    pub fn between(current: &FinancialSnapshot, previous: &FinancialSnapshot) -> Self {
        let revenue_growth = if previous.revenue.is_zero() {
            (!current.revenue.is_zero()).then(|| Share::of(current.revenue, previous.revenue))
        } else {
            Some(Share::of(current.revenue.saturating_sub(previous.revenue), previous.revenue))
        };
        Self {
            revenue_growth,
            profit_change: current.real_profit.saturating_sub(previous.real_profit),
            margin_change: current.profit_margin.saturating_sub(previous.profit_margin),
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Everything a rule may read, derived once per evaluation.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    pub current: &'a FinancialSnapshot,
    pub comparison: Option<PeriodComparison>,
    pub fixed_share: Share,
    pub variable_share: Share,
    pub break_even: BreakEven,
    pub break_even_share: Share,
    pub minimum_wage: Money,
    pub fmt: MoneyFormatter,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        current: &'a FinancialSnapshot,
        previous: Option<&FinancialSnapshot>,
        config: &DiagnosisConfig,
    ) -> Self {
        let fixed_share = Share::of(current.total_fixed_costs, current.revenue);
        let variable_share = Share::of(current.total_variable_costs, current.revenue);

        // Break-even from the snapshot totals, with variable costs folded
        // back into a single percentage of revenue.
        let break_even = match variable_share {
            Share::Unbounded => BreakEven::Unreachable,
            Share::Finite(variable_pct) => break_even_from_totals(
                current.total_fixed_costs,
                variable_pct,
                current.pro_labore,
            ),
        };
        let break_even_share = match break_even {
            BreakEven::Reachable(be) => Share::of(be, current.revenue),
            BreakEven::Unreachable => Share::Unbounded,
        };

        let comparison = previous.map(|prev| PeriodComparison::between(current, prev));

        log::debug!(
            "rule context for {}: fixed={:?} variable={:?} break_even={:?} ({:?}) comparison={:?}",
            current.month,
            fixed_share,
            variable_share,
            break_even,
            break_even_share,
            comparison
        );

        Self {
            current,
            comparison,
            fixed_share,
            variable_share,
            break_even,
            break_even_share,
            minimum_wage: config.minimum_wage,
            fmt: config.formatter(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Message and insight produced by a fired rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub rule: AlertRule,
    pub message: String,
    pub insight: String,
}

impl Finding {
    fn new(rule: AlertRule, message: impl Into<String>, insight: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
            insight: insight.into(),
        }
    }

    /// Stamp the finding with its sequence number (`alert-N`).
    pub fn into_alert(self, sequence: usize) -> Alert {
        Alert {
            id: format!("alert-{sequence}"),
            alert_type: self.rule.alert_type(),
            title: self.rule.title().into(),
            message: self.message,
            insight: self.insight,
            priority: self.rule.priority(),
            rule: self.rule,
        }
    }
}

pub struct Rule {
    pub name: &'static str,
    pub evaluate: fn(&RuleContext<'_>) -> Option<Finding>,
}

/// Evaluation order matters: it numbers the alerts and breaks priority ties.
pub static RULES: &[Rule] = &[
    Rule { name: "real_loss", evaluate: real_loss },
    Rule { name: "critical_margin", evaluate: critical_margin },
    Rule { name: "pro_labore_below_minimum_wage", evaluate: pro_labore_below_minimum_wage },
    Rule { name: "growth_without_profit", evaluate: growth_without_profit },
    Rule { name: "revenue_freefall", evaluate: revenue_freefall },
    Rule { name: "margin_erosion", evaluate: margin_erosion },
    Rule { name: "fixed_cost_weight", evaluate: fixed_cost_weight },
    Rule { name: "thin_safety_margin", evaluate: thin_safety_margin },
    Rule { name: "pro_labore_level", evaluate: pro_labore_level },
    Rule { name: "tight_margin", evaluate: tight_margin },
    Rule { name: "variable_costs_high", evaluate: variable_costs_high },
    Rule { name: "profit_below_pro_labore", evaluate: profit_below_pro_labore },
    Rule { name: "stagnant_revenue", evaluate: stagnant_revenue },
    Rule { name: "healthy_margin", evaluate: healthy_margin },
    Rule { name: "excellent_margin", evaluate: excellent_margin },
    Rule { name: "investment_capacity", evaluate: investment_capacity },
];

/// `floor(revenue × 10% / |loss|)`, or 3 when there is no loss to divide by.
pub fn months_until_broke(snapshot: &FinancialSnapshot) -> Decimal {
    let loss = snapshot.real_profit.abs();
    if loss.is_zero() {
        return MONTHS_UNTIL_BROKE_FALLBACK;
    }
    (snapshot.revenue * dec!(0.1))
        .checked_div(loss)
        .unwrap_or(Decimal::MAX)
        .floor()
}

fn capitalize(text: String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => text,
    }
}

// --- Critical (10) ---

fn real_loss(ctx: &RuleContext<'_>) -> Option<Finding> {
    let s = ctx.current;
    if s.real_profit >= Decimal::ZERO {
        return None;
    }
    let months = months_until_broke(s);
    Some(Finding::new(
        AlertRule::RealLoss,
        format!(
            "Você está perdendo {} por mês.",
            ctx.fmt.currency(s.real_profit.abs())
        ),
        format!(
            "Se continuar assim, em {months} meses você vai trabalhar no prejuízo total. Ação urgente necessária."
        ),
    ))
}

fn critical_margin(ctx: &RuleContext<'_>) -> Option<Finding> {
    let s = ctx.current;
    if !(s.profit_margin < dec!(5) && s.real_profit >= Decimal::ZERO) {
        return None;
    }
    Some(Finding::new(
        AlertRule::CriticalMargin,
        format!(
            "De cada {} que entram, sobram apenas {}.",
            ctx.fmt.currency(Decimal::ONE_HUNDRED),
            ctx.fmt.currency(s.profit_margin)
        ),
        "Qualquer imprevisto te joga no vermelho. Seu negócio não aguenta nem um mês ruim.",
    ))
}

fn pro_labore_below_minimum_wage(ctx: &RuleContext<'_>) -> Option<Finding> {
    let s = ctx.current;
    if s.pro_labore >= ctx.minimum_wage {
        return None;
    }
    Some(Finding::new(
        AlertRule::ProLaboreBelowMinimumWage,
        format!(
            "Você tira {} por mês. Salário mínimo é {}.",
            ctx.fmt.currency(s.pro_labore),
            ctx.fmt.currency(ctx.minimum_wage)
        ),
        "Você ganharia mais trabalhando para outra pessoa. Isso não é sustentável.",
    ))
}

// --- Trend (needs previous month) ---

fn growth_without_profit(ctx: &RuleContext<'_>) -> Option<Finding> {
    let cmp = ctx.comparison?;
    let growth = cmp.revenue_growth?;
    if !(growth.exceeds(dec!(10)) && cmp.profit_change < Decimal::ZERO) {
        return None;
    }
    Some(Finding::new(
        AlertRule::GrowthWithoutProfit,
        format!(
            "Faturamento subiu {}, mas lucro caiu {}.",
            growth.describe(&ctx.fmt, 1),
            ctx.fmt.currency(cmp.profit_change.abs())
        ),
        "Esse crescimento é uma armadilha. Você está vendendo mais para ganhar menos. Volume sem margem quebra.",
    ))
}

fn revenue_freefall(ctx: &RuleContext<'_>) -> Option<Finding> {
    let cmp = ctx.comparison?;
    let Some(Share::Finite(growth)) = cmp.revenue_growth else {
        return None;
    };
    if growth >= dec!(-20) {
        return None;
    }
    Some(Finding::new(
        AlertRule::RevenueFreefall,
        format!(
            "Você faturou {} menos que o mês passado.",
            ctx.fmt.percent(growth.abs(), 1)
        ),
        "Isso é uma sangria. Revise urgentemente sua estratégia de vendas e retenção.",
    ))
}

fn margin_erosion(ctx: &RuleContext<'_>) -> Option<Finding> {
    let cmp = ctx.comparison?;
    if cmp.margin_change >= dec!(-5) {
        return None;
    }
    Some(Finding::new(
        AlertRule::MarginErosion,
        format!(
            "Margem caiu {} pontos percentuais.",
            ctx.fmt.number(cmp.margin_change.abs(), 1)
        ),
        "Seus custos estão crescendo mais rápido que sua receita. Isso é insustentável.",
    ))
}

// --- Danger (8-9) ---

fn fixed_cost_weight(ctx: &RuleContext<'_>) -> Option<Finding> {
    let share = ctx.fixed_share;
    let message = || {
        format!(
            "{} do faturamento vai para custos fixos.",
            capitalize(share.describe(&ctx.fmt, 1))
        )
    };
    if share.exceeds(dec!(50)) {
        Some(Finding::new(
            AlertRule::FixedCostsSuffocating,
            message(),
            format!(
                "Você precisa faturar {} só para pagar as contas. Corte ou morra.",
                ctx.fmt.currency(ctx.current.total_fixed_costs)
            ),
        ))
    } else if share.exceeds(dec!(40)) {
        Some(Finding::new(
            AlertRule::FixedCostsHigh,
            message(),
            "Zona de perigo. Qualquer queda nas vendas te joga no vermelho.",
        ))
    } else {
        None
    }
}

fn thin_safety_margin(ctx: &RuleContext<'_>) -> Option<Finding> {
    if !ctx.break_even_share.exceeds(dec!(80)) {
        return None;
    }
    let finding = match ctx.break_even {
        BreakEven::Reachable(be) => Finding::new(
            AlertRule::ThinSafetyMargin,
            format!(
                "Precisa faturar {} só para não ter prejuízo.",
                ctx.fmt.currency(be)
            ),
            format!(
                "Isso é {} do seu faturamento atual. Margem de segurança muito baixa.",
                ctx.break_even_share.describe(&ctx.fmt, 0)
            ),
        ),
        BreakEven::Unreachable => Finding::new(
            AlertRule::ThinSafetyMargin,
            "Nenhum faturamento cobre seus custos: os custos variáveis consomem toda a receita.",
            "Cada venda aumenta o prejuízo. Reveja preços e custos variáveis antes de vender mais.",
        ),
    };
    Some(finding)
}

// --- Attention (6-7) ---

fn pro_labore_level(ctx: &RuleContext<'_>) -> Option<Finding> {
    let pro_labore = ctx.current.pro_labore;
    if pro_labore.is_zero() {
        Some(Finding::new(
            AlertRule::NoProLabore,
            "Pró-labore zero. Você não está se pagando.",
            "Isso não é sustentável. Você precisa tirar um salário do negócio. Sempre.",
        ))
    } else if pro_labore < ctx.minimum_wage.saturating_mul(dec!(2)) {
        Some(Finding::new(
            AlertRule::LowProLabore,
            format!("Você tira {} por mês.", ctx.fmt.currency(pro_labore)),
            "Você merece mais. Se o negócio não consegue te pagar bem, algo está errado.",
        ))
    } else {
        None
    }
}

fn tight_margin(ctx: &RuleContext<'_>) -> Option<Finding> {
    let margin = ctx.current.profit_margin;
    if !(margin >= dec!(5) && margin < dec!(15)) {
        return None;
    }
    Some(Finding::new(
        AlertRule::TightMargin,
        format!("Margem de {} é muito baixa.", ctx.fmt.percent(margin, 1)),
        "Você não tem gordura para queimar. Qualquer crise te derruba.",
    ))
}

fn variable_costs_high(ctx: &RuleContext<'_>) -> Option<Finding> {
    if !ctx.variable_share.exceeds(dec!(60)) {
        return None;
    }
    Some(Finding::new(
        AlertRule::VariableCostsHigh,
        format!(
            "{} do faturamento vai para custos variáveis.",
            capitalize(ctx.variable_share.describe(&ctx.fmt, 1))
        ),
        "Você está vendendo caro ou comprando caro demais. Negocie melhor ou aumente preços.",
    ))
}

fn profit_below_pro_labore(ctx: &RuleContext<'_>) -> Option<Finding> {
    let s = ctx.current;
    if !(s.real_profit > Decimal::ZERO && s.real_profit < s.pro_labore) {
        return None;
    }
    Some(Finding::new(
        AlertRule::ProfitBelowProLabore,
        "Seu lucro é menor que seu pró-labore.",
        "Você trabalha para se pagar. Não sobra nada para crescer ou investir.",
    ))
}

fn stagnant_revenue(ctx: &RuleContext<'_>) -> Option<Finding> {
    let cmp = ctx.comparison?;
    let Some(Share::Finite(growth)) = cmp.revenue_growth else {
        return None;
    };
    if growth.abs() >= dec!(2) {
        return None;
    }
    Some(Finding::new(
        AlertRule::StagnantRevenue,
        "Faturamento praticamente igual ao mês passado.",
        "Estagnação é o primeiro passo para o declínio. Hora de testar algo novo.",
    ))
}

// --- Informative (4-5) ---

fn healthy_margin(ctx: &RuleContext<'_>) -> Option<Finding> {
    let margin = ctx.current.profit_margin;
    if !(margin >= dec!(15) && margin < dec!(25)) {
        return None;
    }
    Some(Finding::new(
        AlertRule::HealthyMargin,
        format!("Margem de {} é boa.", ctx.fmt.percent(margin, 1)),
        "Mas ainda dá para melhorar. Foque em aumentar margem, não só volume.",
    ))
}

fn excellent_margin(ctx: &RuleContext<'_>) -> Option<Finding> {
    let margin = ctx.current.profit_margin;
    if margin < dec!(25) {
        return None;
    }
    Some(Finding::new(
        AlertRule::ExcellentMargin,
        format!("Margem de {} é excelente.", ctx.fmt.percent(margin, 1)),
        "Agora foque em escalar com inteligência. Não sacrifique margem por volume.",
    ))
}

fn investment_capacity(ctx: &RuleContext<'_>) -> Option<Finding> {
    let s = ctx.current;
    if s.real_profit <= s.pro_labore * dec!(0.5) {
        return None;
    }
    Some(Finding::new(
        AlertRule::InvestmentCapacity,
        format!("Sobram {} por mês.", ctx.fmt.currency(s.real_profit)),
        "Use esse dinheiro para crescer: marketing, estoque, contratação ou reserva de emergência.",
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
