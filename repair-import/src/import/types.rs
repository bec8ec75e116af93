//! Entities written to the shop database

/// A customer row. `address` is never filled by the import; the legacy
/// sheets do not carry one.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: String,
}

/// Order state derived from the sheet's delivery marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Delivered => "delivered",
        }
    }
}

/// A repair order row. `dealer_id`, `device_owner_name` and `notes` are
/// never filled by the import.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOrder {
    pub id: String,
    pub serial_code: String,
    pub customer_id: String,
    pub dealer_id: Option<String>,
    pub device_owner_name: Option<String>,
    pub laptop_type: String,
    pub problem_description: String,
    pub total_cost: f64,
    pub paid_amount: f64,
    pub status: OrderStatus,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub delivered_at: Option<String>,
    pub notes: Option<String>,
}

/// The opening payment synthesized from the sheet's already-paid amount
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount: f64,
    pub payment_date: String,
    pub notes: Option<String>,
}

/// One sheet row transformed into its database entities. The payment is
/// present only when the paid amount came out positive.
#[derive(Debug, Clone)]
pub struct TransformedRow {
    pub customer: Customer,
    pub order: RepairOrder,
    pub payment: Option<Payment>,
}
