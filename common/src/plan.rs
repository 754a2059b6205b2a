//! Plan catalog shared by the checkout endpoint, the webhook and the
//! dashboard. Prices are in minor units (cents).

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::error::AppError;

/// Subscription days granted by one billing period.
pub const BILLING_PERIOD_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plan {
    Monthly50,
    Monthly125,
    MonthlyUnlimited,
    PayPerOrder,
}

impl Plan {
    pub const ALL: [Plan; 4] = [
        Plan::Monthly50,
        Plan::Monthly125,
        Plan::MonthlyUnlimited,
        Plan::PayPerOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly50 => "monthly_50",
            Plan::Monthly125 => "monthly_125",
            Plan::MonthlyUnlimited => "monthly_unlimited",
            Plan::PayPerOrder => "pay_per_order",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Monthly50 => "50 Orders Plan",
            Plan::Monthly125 => "125 Orders Plan",
            Plan::MonthlyUnlimited => "Unlimited Plan",
            Plan::PayPerOrder => "Pay Per Order",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Plan::Monthly50 => "Perfect for small restaurants. 50 orders per month.",
            Plan::Monthly125 => "Great for growing restaurants. 125 orders per month.",
            Plan::MonthlyUnlimited => "Best for busy restaurants. Unlimited orders per month.",
            Plan::PayPerOrder => "No monthly fee. Pay only for orders processed.",
        }
    }

    /// Monthly price charged through hosted checkout. `None` for plans that
    /// are not sold as a subscription.
    pub fn monthly_price(&self) -> Option<i64> {
        match self {
            Plan::Monthly50 => Some(4900),
            Plan::Monthly125 => Some(9900),
            Plan::MonthlyUnlimited => Some(19900),
            Plan::PayPerOrder => None,
        }
    }

    pub fn per_order_price(&self) -> Option<i64> {
        match self {
            Plan::PayPerOrder => Some(200),
            _ => None,
        }
    }

    /// `None` means unbounded.
    pub fn order_limit(&self) -> Option<i32> {
        match self {
            Plan::Monthly50 => Some(50),
            Plan::Monthly125 => Some(125),
            Plan::MonthlyUnlimited | Plan::PayPerOrder => None,
        }
    }

    /// Resolves a plan that can be bought through hosted checkout.
    pub fn checkout(plan_id: &str) -> Option<Plan> {
        plan_id
            .parse::<Plan>()
            .ok()
            .filter(|plan| plan.monthly_price().is_some())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Plan::ALL
            .into_iter()
            .find(|plan| plan.as_str() == s)
            .ok_or_else(|| AppError::InvalidArgument("Invalid plan selected".to_string()))
    }
}

/// Catalog entry as exposed to the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub monthly_price: Option<i64>,
    pub per_order_price: Option<i64>,
    pub order_limit: Option<i32>,
}

impl From<Plan> for PlanOption {
    fn from(plan: Plan) -> Self {
        PlanOption {
            id: plan.as_str(),
            name: plan.display_name(),
            description: plan.description(),
            monthly_price: plan.monthly_price(),
            per_order_price: plan.per_order_price(),
            order_limit: plan.order_limit(),
        }
    }
}

pub fn catalog() -> Vec<PlanOption> {
    Plan::ALL.into_iter().map(PlanOption::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_prices_match_catalog() {
        assert_eq!(Plan::checkout("monthly_50").and_then(|p| p.monthly_price()), Some(4900));
        assert_eq!(Plan::checkout("monthly_125").and_then(|p| p.monthly_price()), Some(9900));
        assert_eq!(
            Plan::checkout("monthly_unlimited").and_then(|p| p.monthly_price()),
            Some(19900)
        );
    }

    #[test]
    fn pay_per_order_is_not_sold_through_checkout() {
        assert!("pay_per_order".parse::<Plan>().is_ok());
        assert_eq!(Plan::checkout("pay_per_order"), None);
    }

    #[test]
    fn unknown_plan_ids_are_rejected() {
        for id in ["", "monthly_49", "MONTHLY_50", "monthly_50 ", "free"] {
            assert_eq!(Plan::checkout(id), None, "{id:?} should not resolve");
            assert!(matches!(id.parse::<Plan>(), Err(AppError::InvalidArgument(_))));
        }
    }

    #[test]
    fn quotas() {
        assert_eq!(Plan::Monthly50.order_limit(), Some(50));
        assert_eq!(Plan::Monthly125.order_limit(), Some(125));
        assert_eq!(Plan::MonthlyUnlimited.order_limit(), None);
        assert_eq!(catalog().len(), 4);
    }
}
