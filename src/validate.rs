//! Client-side payload validation
//!
//! Each transaction kind has a declarative rule table: an ordered list of
//! (field path, check) pairs evaluated by one generic walker over the
//! payload's JSON tree. Errors come back as a tree mirroring the payload's
//! nesting, keyed by the wire field names. All branches are checked and
//! merged; when a required sub-object is missing, its own fields are not
//! also reported.

use crate::types::Sale;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Message for a missing or empty required field
pub const BLANK: &str = "can't be blank";
/// Message for a value of the wrong type or out of range
pub const INVALID: &str = "is invalid";
/// Message for a failed format check (dates, GUIDs)
pub const INVALID_FORMAT: &str = "has invalid format";

static GUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Whether `s` is a canonical 8-4-4-4-12 GUID (case-insensitive, full match)
pub fn is_valid_guid(s: &str) -> bool {
    GUID_REGEX.is_match(s)
}

fn is_iso_date(s: &str) -> bool {
    ISO_DATE_REGEX.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Transaction kind a payload is validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Credit,
    Debit,
    BankSlip,
    /// Recurring card sale; validated like credit plus the recurrence block
    Recurrent,
}

impl TransactionKind {
    /// Wire literal `Payment.Type` must carry for this kind
    pub fn expected_type(&self) -> &'static str {
        match self {
            Self::Credit | Self::Recurrent => "CreditCard",
            Self::Debit => "DebitCard",
            Self::BankSlip => "Boleto",
        }
    }
}

/// Error tree for one validation run; keys are wire field names
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, FieldError>);

/// One node of the error tree
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldError {
    /// Leaf message for a single field
    Message(String),
    /// Errors of a nested object
    Nested(FieldErrors),
}

impl FieldErrors {
    /// True when no field failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entry at a field path, if present
    pub fn get(&self, path: &[&str]) -> Option<&FieldError> {
        let (first, rest) = path.split_first()?;
        let entry = self.0.get(*first)?;
        if rest.is_empty() {
            Some(entry)
        } else if let FieldError::Nested(nested) = entry {
            nested.get(rest)
        } else {
            None
        }
    }

    /// Leaf message at a field path, if present
    pub fn message_at(&self, path: &[&str]) -> Option<&str> {
        match self.get(path)? {
            FieldError::Message(message) => Some(message),
            FieldError::Nested(_) => None,
        }
    }

    fn insert(&mut self, path: &[&str], message: &str) {
        match path {
            [] => {}
            [leaf] => {
                self.0
                    .entry((*leaf).to_string())
                    .or_insert_with(|| FieldError::Message(message.to_string()));
            }
            [head, rest @ ..] => {
                let entry = self
                    .0
                    .entry((*head).to_string())
                    .or_insert_with(|| FieldError::Nested(FieldErrors::default()));
                if let FieldError::Nested(nested) = entry {
                    nested.insert(rest, message);
                }
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn walk(prefix: &str, errors: &FieldErrors, out: &mut Vec<String>) {
            for (field, entry) in &errors.0 {
                let path = if prefix.is_empty() {
                    field.clone()
                } else {
                    format!("{}.{}", prefix, field)
                };
                match entry {
                    FieldError::Message(message) => out.push(format!("{} {}", path, message)),
                    FieldError::Nested(nested) => walk(&path, nested, out),
                }
            }
        }
        let mut out = Vec::new();
        walk("", self, &mut out);
        write!(f, "{}", out.join("; "))
    }
}

#[derive(Debug, Clone)]
enum Check {
    /// Present, non-null, non-blank string
    Required,
    /// Required string equal to the literal
    TypeLiteral(&'static str),
    /// Required integer ≥ 0
    NonNegativeInt,
    /// Integer ≥ n when present
    MinInt(i64),
    /// Required `YYYY-MM-DD` date
    IsoDate,
    /// `YYYY-MM-DD` date when present
    OptionalIsoDate,
    /// Boolean when present
    OptionalBool,
}

#[derive(Debug, Clone)]
struct Rule {
    path: Vec<&'static str>,
    check: Check,
}

fn rule(path: &[&'static str], check: Check) -> Rule {
    Rule {
        path: path.to_vec(),
        check,
    }
}

fn card_rules(container: &'static str, with_installments: bool) -> Vec<Rule> {
    let mut rules = vec![
        rule(&["Payment", container], Check::Required),
        rule(&["Payment", container, "CardNumber"], Check::Required),
        rule(&["Payment", container, "Holder"], Check::Required),
        rule(&["Payment", container, "ExpirationDate"], Check::Required),
        rule(&["Payment", container, "SecurityCode"], Check::Required),
    ];
    if with_installments {
        rules.push(rule(&["Payment", "Installments"], Check::MinInt(1)));
    }
    rules
}

fn rules_for(kind: TransactionKind) -> Vec<Rule> {
    let mut rules = vec![
        rule(&["MerchantOrderId"], Check::Required),
        rule(&["Payment"], Check::Required),
        rule(&["Payment", "Type"], Check::TypeLiteral(kind.expected_type())),
        rule(&["Payment", "Amount"], Check::NonNegativeInt),
    ];
    match kind {
        TransactionKind::Credit => rules.extend(card_rules("CreditCard", true)),
        TransactionKind::Debit => {
            rules.extend(card_rules("DebitCard", false));
            rules.push(rule(&["Payment", "Authenticate"], Check::OptionalBool));
        }
        TransactionKind::BankSlip => {
            rules.push(rule(&["Customer"], Check::Required));
            rules.push(rule(&["Customer", "Name"], Check::Required));
            rules.push(rule(&["Customer", "Identity"], Check::Required));
            rules.push(rule(&["Payment", "Identification"], Check::Required));
            rules.push(rule(&["Payment", "ExpirationDate"], Check::IsoDate));
            rules.push(rule(&["Payment", "Address"], Check::Required));
        }
        TransactionKind::Recurrent => {
            rules.extend(card_rules("CreditCard", true));
            rules.push(rule(&["Payment", "RecurrentPayment"], Check::Required));
            rules.push(rule(&["Payment", "RecurrentPayment", "Interval"], Check::Required));
            rules.push(rule(
                &["Payment", "RecurrentPayment", "EndDate"],
                Check::OptionalIsoDate,
            ));
        }
    }
    rules
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

fn is_blank(node: Option<&Value>) -> bool {
    match node {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_value(node: Option<&Value>, check: &Check) -> Result<(), &'static str> {
    match check {
        Check::Required => {
            if is_blank(node) {
                return Err(BLANK);
            }
            Ok(())
        }
        Check::TypeLiteral(expected) => {
            if is_blank(node) {
                return Err(BLANK);
            }
            match node {
                Some(Value::String(s)) if s == *expected => Ok(()),
                _ => Err(INVALID),
            }
        }
        Check::NonNegativeInt => {
            if is_blank(node) {
                return Err(BLANK);
            }
            match node.and_then(Value::as_i64) {
                Some(n) if n >= 0 => Ok(()),
                _ => Err(INVALID),
            }
        }
        Check::MinInt(min) => match node {
            None | Some(Value::Null) => Ok(()),
            _ => match node.and_then(Value::as_i64) {
                Some(n) if n >= *min => Ok(()),
                _ => Err(INVALID),
            },
        },
        Check::IsoDate => {
            if is_blank(node) {
                return Err(BLANK);
            }
            match node {
                Some(Value::String(s)) => {
                    if is_iso_date(s) {
                        Ok(())
                    } else {
                        Err(INVALID_FORMAT)
                    }
                }
                _ => Err(INVALID),
            }
        }
        Check::OptionalIsoDate => match node {
            None | Some(Value::Null) => Ok(()),
            Some(Value::String(s)) => {
                if is_iso_date(s) {
                    Ok(())
                } else {
                    Err(INVALID_FORMAT)
                }
            }
            _ => Err(INVALID),
        },
        Check::OptionalBool => match node {
            None | Some(Value::Null) | Some(Value::Bool(_)) => Ok(()),
            _ => Err(INVALID),
        },
    }
}

/// Validate a payload against the field rules of the given kind
pub fn validate(kind: TransactionKind, sale: &Sale) -> Result<(), FieldErrors> {
    let tree = serde_json::to_value(sale).unwrap_or(Value::Null);
    let mut errors = FieldErrors::default();
    // paths whose Required check failed; their descendants are skipped
    let mut dead: Vec<Vec<&'static str>> = Vec::new();

    for rule in rules_for(kind) {
        if dead
            .iter()
            .any(|d| rule.path.len() > d.len() && rule.path[..d.len()] == d[..])
        {
            continue;
        }
        let node = lookup(&tree, &rule.path);
        if let Err(message) = check_value(node, &rule.check) {
            if matches!(rule.check, Check::Required) {
                dead.push(rule.path.clone());
            }
            errors.insert(&rule.path, message);
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
