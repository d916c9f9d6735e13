use std::collections::HashSet;

use crate::constants::{CASH_PAYMENT_ID, E_PAYMENT_IDS, UNKNOWN};
use crate::domain::{EventType, PaymentStatus, RawOrder, ShippingStatus};

/// Payment method classes recognized by the purchase scoring matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentClass {
    Cod,
    Epayment,
    Unknown,
}

/// Outcome of scoring a purchase: the matrix either produces a weight or
/// declines the combination. The caller decides what an undefined
/// combination is worth; the scorer never defaults silently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    Scored(f64),
    Unscored,
}

impl ScoreOutcome {
    pub fn value_or(self, default: f64) -> f64 {
        match self {
            ScoreOutcome::Scored(value) => value,
            ScoreOutcome::Unscored => default,
        }
    }

    pub fn is_unscored(self) -> bool {
        matches!(self, ScoreOutcome::Unscored)
    }
}

/// Classifies payment-method ids and computes interaction weights for the
/// training feed. The id sets are fixed per pipeline run.
pub struct EventValueScorer {
    cash_id: String,
    epayment_ids: HashSet<String>,
}

impl Default for EventValueScorer {
    fn default() -> Self {
        Self {
            cash_id: CASH_PAYMENT_ID.to_string(),
            epayment_ids: E_PAYMENT_IDS.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl EventValueScorer {
    pub fn new(cash_id: String, epayment_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            cash_id,
            epayment_ids: epayment_ids.into_iter().collect(),
        }
    }

    pub fn classify_payment(&self, payment_method_id: &str) -> PaymentClass {
        if payment_method_id == self.cash_id {
            PaymentClass::Cod
        } else if self.epayment_ids.contains(payment_method_id) {
            PaymentClass::Epayment
        } else {
            PaymentClass::Unknown
        }
    }

    /// Human-readable payment method name exported on interaction rows.
    pub fn payment_method_name(&self, payment_method_id: &str) -> &'static str {
        match self.classify_payment(payment_method_id) {
            PaymentClass::Cod => "cash",
            PaymentClass::Epayment => "epay",
            PaymentClass::Unknown => UNKNOWN,
        }
    }

    /// Fixed weight table for behavioral events; anything outside the
    /// tracked vocabulary carries no signal.
    pub fn behavioral_value(event_type: EventType) -> f64 {
        match event_type {
            EventType::View => 1.0,
            EventType::Favorite => 2.0,
            EventType::AddToCart => 2.5,
            _ => 0.0,
        }
    }

    /// Review weight is the star rating verbatim.
    pub fn review_value(vote_star: u8) -> f64 {
        f64::from(vote_star)
    }

    /// The purchase decision matrix over payment class, shipping status and
    /// payment status.
    pub fn purchase_outcome(&self, order: &RawOrder) -> ScoreOutcome {
        match self.classify_payment(&order.payment_method_id) {
            PaymentClass::Cod => cod_value(order.shipping_status, order.payment_status),
            PaymentClass::Epayment => epayment_value(order.shipping_status, order.payment_status),
            PaymentClass::Unknown => ScoreOutcome::Scored(0.5),
        }
    }
}

fn cod_value(shipping: ShippingStatus, payment: PaymentStatus) -> ScoreOutcome {
    use PaymentStatus as Pay;
    use ShippingStatus::*;

    match (shipping, payment) {
        (Pending, Pay::Pending) => ScoreOutcome::Scored(3.0),
        (WaitToPick | Shipping | Shipped, Pay::Paid | Pay::Pending) => ScoreOutcome::Scored(5.0),
        (Canceling | Canceled, Pay::Pending) => ScoreOutcome::Scored(0.5),
        (Canceling | Canceled, Pay::Paid) => ScoreOutcome::Scored(1.5),
        (Return | Returning, Pay::Paid | Pay::Pending) => ScoreOutcome::Scored(1.5),
        _ => ScoreOutcome::Unscored,
    }
}

fn epayment_value(shipping: ShippingStatus, payment: PaymentStatus) -> ScoreOutcome {
    use PaymentStatus as Pay;
    use ShippingStatus::*;

    match (shipping, payment) {
        (WaitToPick | Shipping | Shipped, Pay::Paid) => ScoreOutcome::Scored(5.0),
        (Pending, Pay::Pending) => ScoreOutcome::Scored(1.0),
        (Canceling | Canceled, Pay::Paid) => ScoreOutcome::Scored(2.0),
        (Return | Returning, Pay::Paid) => ScoreOutcome::Scored(1.5),
        _ => ScoreOutcome::Unscored,
    }
}
