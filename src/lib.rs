//! Client SDK for the Cielo E-Commerce payment gateway
//!
//! Thin request/response glue over the gateway's REST API: payloads are
//! validated against the gateway's field rules before any network call,
//! resource endpoints are built from fixed templates, and every response
//! is normalized into one result shape.
//!
//! ## Overview
//!
//! ```text
//! caller ──▶ Cielo (dispatcher) ──▶ validate(kind, payload)
//!                │                        │ invalid → FieldErrors tree
//!                ▼
//!          endpoint template + path substitution
//!                │
//!                ▼
//!          Transport::send(method, path, body) ──▶ gateway
//!                │
//!                ▼
//!          Ok(body) | Gateway {Code, Message} | TransportError
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cielo::{Card, Cielo, Payment, Sale};
//!
//! let gateway = Cielo::sandbox("merchant-id", "merchant-key");
//!
//! let sale = Sale::new("order-1234").payment(Payment::credit(
//!     15700,
//!     Card::new("4111111111111111", "ANA SOUZA", "12/2030", "123"),
//! ));
//!
//! let created = gateway.credit(&sale).await?;
//! let payment_id = created["Payment"]["PaymentId"].as_str().unwrap();
//!
//! gateway.capture(payment_id, None).await?;
//! gateway.cancel_payment(payment_id, Some(5700)).await?;
//! ```

pub mod endpoint;
pub mod error;
pub mod transport;
pub mod types;
pub mod validate;

pub use endpoint::*;
pub use error::*;
pub use transport::*;
pub use types::*;
pub use validate::*;

use serde_json::Value;
use std::sync::Arc;

/// Gateway client and transaction dispatcher
///
/// Stateless per call and cheaply cloneable; the transport collaborator
/// sits behind an `Arc`.
pub struct Cielo<T: Transport = HttpTransport> {
    transport: Arc<T>,
    endpoints: Endpoints,
}

impl Cielo<HttpTransport> {
    /// Client against the production environment
    pub fn new(merchant_id: impl Into<String>, merchant_key: impl Into<String>) -> Self {
        Self::with_transport(HttpTransport::new(merchant_id, merchant_key))
    }

    /// Client against the sandbox environment
    pub fn sandbox(merchant_id: impl Into<String>, merchant_key: impl Into<String>) -> Self {
        Self::with_transport(HttpTransport::sandbox(merchant_id, merchant_key))
    }
}

impl<T: Transport> Cielo<T> {
    /// Client over a caller-supplied transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            endpoints: Endpoints::default(),
        }
    }

    /// Replace the endpoint template set
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Create a credit-card sale
    pub async fn credit(&self, sale: &Sale) -> CieloResult<Value> {
        self.create(TransactionKind::Credit, sale).await
    }

    /// Create a debit-card sale
    pub async fn debit(&self, sale: &Sale) -> CieloResult<Value> {
        self.create(TransactionKind::Debit, sale).await
    }

    /// Create a bank-slip (boleto) sale
    pub async fn bank_slip(&self, sale: &Sale) -> CieloResult<Value> {
        self.create(TransactionKind::BankSlip, sale).await
    }

    /// Create a recurring card sale
    pub async fn recurrent_payment(&self, sale: &Sale) -> CieloResult<Value> {
        self.create(TransactionKind::Recurrent, sale).await
    }

    /// Create a recurring card sale
    #[deprecated(since = "0.1.0", note = "use `recurrent_payment`")]
    pub async fn recurrent(&self, sale: &Sale) -> CieloResult<Value> {
        self.recurrent_payment(sale).await
    }

    /// Look up a sale by payment id
    pub async fn get_sale(&self, payment_id: &str) -> CieloResult<Value> {
        ensure_guid(payment_id)?;
        let path = endpoint::substitute(
            self.endpoints.query,
            &[("payment_id", payment_id.to_string())],
        );
        let raw = self.transport.send(Method::Get, &path, None).await?;
        map_response(raw)
    }

    /// Capture an authorized sale, optionally for a partial amount
    ///
    /// The amount travels as a query argument, never in a body.
    pub async fn capture(&self, payment_id: &str, amount: Option<i64>) -> CieloResult<Value> {
        ensure_guid(payment_id)?;
        let mut path = endpoint::substitute(
            self.endpoints.capture,
            &[("payment_id", payment_id.to_string())],
        );
        if let Some(amount) = amount {
            path.push_str(&format!("?amount={}", amount));
        }
        let raw = self.transport.send(Method::Put, &path, None).await?;
        map_response(raw)
    }

    /// Void a sale; presence of `amount` selects a partial void
    pub async fn cancel_payment(&self, payment_id: &str, amount: Option<i64>) -> CieloResult<Value> {
        ensure_guid(payment_id)?;
        let path = match amount {
            None => endpoint::substitute(
                self.endpoints.void,
                &[("payment_id", payment_id.to_string())],
            ),
            Some(amount) => endpoint::substitute(
                self.endpoints.void_partial,
                &[
                    ("payment_id", payment_id.to_string()),
                    ("amount", amount.to_string()),
                ],
            ),
        };
        let raw = self.transport.send(Method::Put, &path, None).await?;
        map_response(raw)
    }

    /// Deactivate a recurring payment
    pub async fn deactivate_recurrent_payment(&self, payment_id: &str) -> CieloResult<Value> {
        ensure_guid(payment_id)?;
        let path = endpoint::substitute(
            self.endpoints.deactivate_recurrent,
            &[("payment_id", payment_id.to_string())],
        );
        let raw = self.transport.send(Method::Put, &path, None).await?;
        map_response(raw)
    }

    async fn create(&self, kind: TransactionKind, sale: &Sale) -> CieloResult<Value> {
        validate::validate(kind, sale).map_err(CieloError::Validation)?;
        let body = serde_json::to_value(sale)
            .map_err(|err| CieloError::InvalidArgument(format!("unserializable payload: {}", err)))?;
        tracing::debug!(kind = ?kind, order = %sale.merchant_order_id, "creating sale");
        let raw = self
            .transport
            .send(Method::Post, self.endpoints.create, Some(&body))
            .await?;
        map_response(raw)
    }
}

impl<T: Transport> Clone for Cielo<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            endpoints: self.endpoints.clone(),
        }
    }
}

fn ensure_guid(payment_id: &str) -> CieloResult<()> {
    if validate::is_valid_guid(payment_id) {
        Ok(())
    } else {
        Err(CieloError::InvalidArgument(format!(
            "payment id is not a valid GUID: {}",
            payment_id
        )))
    }
}

fn map_response(raw: RawResponse) -> CieloResult<Value> {
    if (200..300).contains(&raw.status) {
        if raw.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&raw.body).map_err(|err| {
            TransportError::Malformed(format!("unparseable success body: {}", err)).into()
        });
    }

    match StatusKind::from_status(raw.status) {
        Some(kind) => match serde_json::from_str::<Vec<GatewayError>>(&raw.body) {
            Ok(errors) => {
                tracing::warn!(status = raw.status, errors = errors.len(), "gateway rejected request");
                Err(CieloError::Gateway {
                    kind,
                    status: raw.status,
                    errors,
                })
            }
            Err(err) => Err(TransportError::Malformed(format!(
                "unparseable error body for status {}: {}",
                raw.status, err
            ))
            .into()),
        },
        None => Err(TransportError::Malformed(format!("unexpected status {}", raw.status)).into()),
    }
}
