//! Sale request types and data structures
//!
//! All structs serialize to the gateway's PascalCase wire form; optional
//! fields are omitted from the JSON body when unset.

use serde::{Deserialize, Serialize};

/// A sale request: order reference, buyer, and payment node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Sale {
    /// Merchant-side order reference
    pub merchant_order_id: String,
    /// Buyer data; required for bank-slip sales
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    /// Payment node; required for every sale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
}

impl Sale {
    /// Create a sale for the given order reference
    pub fn new(merchant_order_id: impl Into<String>) -> Self {
        Self {
            merchant_order_id: merchant_order_id.into(),
            customer: None,
            payment: None,
        }
    }

    /// With buyer data
    pub fn customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    /// With payment node
    pub fn payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }
}

/// Buyer data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Customer {
    /// Buyer name
    pub name: String,
    /// Fiscal document (CPF/CNPJ); required for bank-slip sales
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Document kind, `CPF` or `CNPJ`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Customer {
    /// Create a customer with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set fiscal document and kind
    pub fn identity(mut self, identity: impl Into<String>, kind: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self.identity_type = Some(kind.into());
        self
    }

    /// Set email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set billing address
    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }
}

/// Buyer address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Address {
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Payment method selector on the payment node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    CreditCard,
    DebitCard,
    Boleto,
}

impl PaymentType {
    /// Wire literal for this method
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "CreditCard",
            Self::DebitCard => "DebitCard",
            Self::Boleto => "Boleto",
        }
    }
}

/// Payment node of a sale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Payment {
    /// Payment method; must match the operation used to send the sale
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    /// Amount in minor units (cents)
    pub amount: i64,
    /// Number of installments; the gateway assumes 1 when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<i32>,
    /// Auto-capture on authorization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<bool>,
    /// Run issuer authentication; the gateway assumes false when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticate: Option<bool>,
    /// Text shown on the card statement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_descriptor: Option<String>,
    /// Where authenticated debit flows return the buyer to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit_card: Option<Card>,

    // Bank-slip (boleto) fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boleto_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<String>,
    /// Slip due date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demonstrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Recurrence block for recurring sales
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrent_payment: Option<RecurrentPayment>,
}

impl Payment {
    /// Credit-card payment
    pub fn credit(amount: i64, card: Card) -> Self {
        Self {
            payment_type: Some(PaymentType::CreditCard),
            amount,
            installments: Some(1),
            credit_card: Some(card),
            ..Default::default()
        }
    }

    /// Debit-card payment
    pub fn debit(amount: i64, card: Card) -> Self {
        Self {
            payment_type: Some(PaymentType::DebitCard),
            amount,
            debit_card: Some(card),
            ..Default::default()
        }
    }

    /// Bank-slip payment
    pub fn boleto(amount: i64) -> Self {
        Self {
            payment_type: Some(PaymentType::Boleto),
            amount,
            ..Default::default()
        }
    }

    /// Set installment count
    pub fn installments(mut self, installments: i32) -> Self {
        self.installments = Some(installments);
        self
    }

    /// Request issuer authentication
    pub fn authenticate(mut self, authenticate: bool) -> Self {
        self.authenticate = Some(authenticate);
        self
    }

    /// Set statement text
    pub fn soft_descriptor(mut self, text: impl Into<String>) -> Self {
        self.soft_descriptor = Some(text.into());
        self
    }

    /// Attach a recurrence block
    pub fn recurrent(mut self, recurrence: RecurrentPayment) -> Self {
        self.recurrent_payment = Some(recurrence);
        self
    }
}

/// Card data shared by credit and debit payments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Card {
    pub card_number: String,
    pub holder: String,
    /// `MM/YYYY`
    pub expiration_date: String,
    pub security_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_card: Option<bool>,
}

impl Card {
    /// Create a card
    pub fn new(
        number: impl Into<String>,
        holder: impl Into<String>,
        expiration: impl Into<String>,
        security_code: impl Into<String>,
    ) -> Self {
        Self {
            card_number: number.into(),
            holder: holder.into(),
            expiration_date: expiration.into(),
            security_code: security_code.into(),
            brand: None,
            save_card: None,
        }
    }

    /// Set card brand
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }
}

/// Recurrence block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RecurrentPayment {
    /// Billing interval, e.g. `Monthly`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    /// Authorize the first charge immediately
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorize_now: Option<bool>,
    /// First charge date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Last charge date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl RecurrentPayment {
    /// Create a recurrence with the given interval
    pub fn new(interval: impl Into<String>) -> Self {
        Self {
            interval: Some(interval.into()),
            authorize_now: Some(true),
            start_date: None,
            end_date: None,
        }
    }

    /// Set the last charge date
    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }
}
