//! Data types for orders and payments as the engine sees them.
//!
//! Order persistence belongs to the store (see [`crate::traits::OrderStore`]); these are the values that cross that
//! boundary.
use std::fmt::Display;

use chrono::{DateTime, Utc};
use paysera_common::MinorUnits;
use serde::{Deserialize, Serialize};

//--------------------------------------     BillingAddress    ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    pub firstname: String,
    pub lastname: String,
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub zipcode: String,
}

impl BillingAddress {
    /// Both street lines, separated by a space. A missing second line leaves no trailing space.
    pub fn street(&self) -> String {
        match self.address2.as_deref().map(str::trim) {
            Some(line2) if !line2.is_empty() => format!("{} {line2}", self.address1),
            _ => self.address1.clone(),
        }
    }
}

//--------------------------------------       OrderState      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// The order is still being put together by the buyer.
    Cart,
    /// The order is waiting for the buyer to pay.
    Payment,
    /// Payment has been taken and the order is complete.
    Complete,
    /// The order was cancelled and will not be paid.
    Canceled,
}

impl Default for OrderState {
    fn default() -> Self {
        Self::Payment
    }
}

impl OrderState {
    /// The state an order moves to once its payment has been captured.
    pub fn next(self) -> Self {
        match self {
            OrderState::Cart => OrderState::Payment,
            OrderState::Payment => OrderState::Complete,
            s => s,
        }
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderState::Cart => write!(f, "cart"),
            OrderState::Payment => write!(f, "payment"),
            OrderState::Complete => write!(f, "complete"),
            OrderState::Canceled => write!(f, "canceled"),
        }
    }
}

//--------------------------------------      PaymentState     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Less than the order total has been paid.
    BalanceDue,
    /// Exactly the order total has been paid.
    Paid,
    /// More than the order total has been paid; the store owes the buyer the difference.
    CreditOwed,
}

impl Default for PaymentState {
    fn default() -> Self {
        Self::BalanceDue
    }
}

impl PaymentState {
    /// Derives the payment state from the sum of completed payments and the order total.
    pub fn derive(paid: MinorUnits, total: MinorUnits) -> Self {
        match paid.cmp(&total) {
            std::cmp::Ordering::Less => Self::BalanceDue,
            std::cmp::Ordering::Equal => Self::Paid,
            std::cmp::Ordering::Greater => Self::CreditOwed,
        }
    }

    pub fn is_paid_or_credited(&self) -> bool {
        matches!(self, Self::Paid | Self::CreditOwed)
    }
}

impl Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentState::BalanceDue => write!(f, "balance_due"),
            PaymentState::Paid => write!(f, "paid"),
            PaymentState::CreditOwed => write!(f, "credit_owed"),
        }
    }
}

//--------------------------------------      OrderSnapshot    ---------------------------------------------------------
/// A read-only view of an order, sufficient to build a payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// The store's order number, e.g. `R123456789`. Sent to the provider as `orderid`.
    pub number: String,
    /// The order total, in minor units
    pub total: MinorUnits,
    pub currency: String,
    #[serde(default)]
    pub bill_address: Option<BillingAddress>,
    #[serde(default)]
    pub state: OrderState,
    #[serde(default)]
    pub payment_state: PaymentState,
}

impl OrderSnapshot {
    pub fn new<S: Into<String>>(number: S, total: MinorUnits, currency: &str) -> Self {
        Self {
            number: number.into(),
            total,
            currency: currency.to_string(),
            bill_address: None,
            state: OrderState::Payment,
            payment_state: PaymentState::BalanceDue,
        }
    }

    pub fn with_bill_address(mut self, address: BillingAddress) -> Self {
        self.bill_address = Some(address);
        self
    }

    pub fn is_paid_or_credited(&self) -> bool {
        self.payment_state.is_paid_or_credited()
    }
}

//--------------------------------------      PaymentRecord    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRecordState {
    Checkout,
    Completed,
}

pub const PAYSERA_PAYMENT_SOURCE: &str = "paysera";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub order_number: String,
    /// The full amount received from the provider, in minor units
    pub amount: MinorUnits,
    pub source: String,
    pub state: PaymentRecordState,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(id: i64, order_number: &str, amount: MinorUnits) -> Self {
        Self {
            id,
            order_number: order_number.to_string(),
            amount,
            source: PAYSERA_PAYMENT_SOURCE.to_string(),
            state: PaymentRecordState::Checkout,
            created_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == PaymentRecordState::Completed
    }
}
