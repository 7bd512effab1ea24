//! Endpoint templates and path substitution
//!
//! Templates carry `:<name>` placeholder tokens. Substitution is a pure
//! function over an ordered list of `(token, value)` pairs; each token's
//! first literal occurrence is replaced, id before amount.

/// Sale creation
pub const CREATE_SALE: &str = "sales/";
/// Sale lookup by payment id
pub const QUERY_SALE: &str = "sales/:payment_id";
/// Capture of an authorized sale; a partial amount travels as a query arg
pub const CAPTURE_SALE: &str = "sales/:payment_id/capture";
/// Full void
pub const VOID_SALE: &str = "sales/:payment_id/void";
/// Partial void
pub const VOID_SALE_PARTIAL: &str = "sales/:payment_id/void?amount=:amount";
/// Recurrence deactivation
pub const DEACTIVATE_RECURRENT: &str = "RecurrentPayment/:payment_id/Deactivate";

/// The template set a dispatcher works against
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub create: &'static str,
    pub query: &'static str,
    pub capture: &'static str,
    pub void: &'static str,
    pub void_partial: &'static str,
    pub deactivate_recurrent: &'static str,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            create: CREATE_SALE,
            query: QUERY_SALE,
            capture: CAPTURE_SALE,
            void: VOID_SALE,
            void_partial: VOID_SALE_PARTIAL,
            deactivate_recurrent: DEACTIVATE_RECURRENT,
        }
    }
}

/// Replace each token's first occurrence with its value, in order
pub fn substitute(template: &str, params: &[(&str, String)]) -> String {
    let mut path = template.to_string();
    for (token, value) in params {
        path = path.replacen(&format!(":{}", token), value, 1);
    }
    path
}
