use crate::models;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_valid::validation::Errors;
use serde_valid::Validate;

const NAME_REQUIRED: &str = "Name is required";
const PRICE_NOT_NUMERIC: &str = "Price must be a number";
const PRICE_NEGATIVE: &str = "Price must be a non-negative number";

/// Raw item payload as posted by clients. Every field is optional so the same
/// form serves create and partial update.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemForm {
    pub name: Option<String>,
    pub description: Option<String>,
    // numbers and numeric strings are both accepted
    pub price: Option<Value>,
    pub category: Option<String>,
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

lazy_static! {
    // a plain decimal: optional sign, optional integer part, no exponent
    static ref NUMERIC: Regex = Regex::new(r"^[+-]?([0-9]*\.)?[0-9]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Validate)]
struct ItemDraft {
    #[validate(min_length = 1)]
    name: Option<String>,
    description: Option<String>,
    #[validate(minimum = 0.0)]
    price: Option<f64>,
    category: Option<String>,
}

impl ItemForm {
    /// Trims, coerces and validates the form as a new item.
    pub fn into_fields(self) -> Result<models::ItemFields, Vec<FieldViolation>> {
        let draft = self.into_draft(true)?;

        Ok(models::ItemFields {
            name: draft.name.unwrap_or_default(),
            description: draft.description,
            price: draft.price,
            category: draft.category,
        })
    }

    /// Trims, coerces and validates the form as a partial update.
    ///
    /// Only the supplied fields are checked: a stored item is already valid,
    /// so applying a valid patch keeps it valid. Absent and `null` fields are
    /// left out of the patch.
    pub fn into_patch(self) -> Result<models::ItemPatch, Vec<FieldViolation>> {
        let draft = self.into_draft(false)?;

        Ok(models::ItemPatch {
            name: draft.name,
            description: draft.description,
            price: draft.price,
            category: draft.category,
        })
    }

    fn into_draft(self, name_required: bool) -> Result<ItemDraft, Vec<FieldViolation>> {
        let mut price_violation = None;
        let price = self.price.and_then(|value| {
            parse_price(&value).unwrap_or_else(|| {
                price_violation = Some(FieldViolation::new("price", PRICE_NOT_NUMERIC));
                None
            })
        });

        let mut name = trimmed(self.name);
        if name_required && name.is_none() {
            name = Some(String::new());
        }

        let draft = ItemDraft {
            name,
            description: trimmed(self.description),
            price,
            category: trimmed(self.category),
        };

        let mut violations = match draft.validate() {
            Ok(()) => vec![],
            Err(errors) => collect_violations(errors),
        };
        violations.extend(price_violation);

        if violations.is_empty() {
            Ok(draft)
        } else {
            tracing::debug!("Invalid item data received {:?}", violations);
            Err(violations)
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string())
}

/// `None` when the value is not a finite number or a string holding a plain
/// decimal.
fn parse_price(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(number) => number.as_f64().map(Some),
        Value::String(text) if NUMERIC.is_match(text) => text
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite())
            .map(Some),
        _ => None,
    }
}

fn collect_violations(errors: Errors) -> Vec<FieldViolation> {
    match errors {
        Errors::Object(object) => object
            .errors
            .iter()
            .map(|err| FieldViolation::new("body", err.to_string()))
            .chain(
                object
                    .properties
                    .keys()
                    .map(|field| FieldViolation::new(field.as_str(), message_for(field))),
            )
            .collect(),
        other => vec![FieldViolation::new("body", other.to_string())],
    }
}

fn message_for(field: &str) -> &'static str {
    match field {
        "name" => NAME_REQUIRED,
        "price" => PRICE_NEGATIVE,
        _ => "Invalid value",
    }
}
