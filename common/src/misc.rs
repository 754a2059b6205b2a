use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestaurantStatus {
    Active,
    Inactive,
}
impl fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RestaurantStatus::Active => "active",
            RestaurantStatus::Inactive => "inactive",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}
impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Succeeded,
    Pending,
    Failed,
    Refunded,
}
impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        })
    }
}
impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "succeeded" => Some(PaymentStatus::Succeeded),
            "pending" => Some(PaymentStatus::Pending),
            "failed" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

/// Payment state of an order as shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPaymentStatus {
    Unpaid,
    Paid,
}
impl fmt::Display for OrderPaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderPaymentStatus::Unpaid => "unpaid",
            OrderPaymentStatus::Paid => "paid",
        })
    }
}

pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_PAYMENT_METHOD: &str = "cash_pickup";
pub const GATEWAY_PAYMENT_METHOD: &str = "stripe";
