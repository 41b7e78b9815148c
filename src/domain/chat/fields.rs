//! Intake field map and the override-merge rule.
//!
//! Intake forms are free-form: each insurance line adds its own fields and
//! several lines use their own name for the same demographic (`lifeAge`,
//! `savingsAge`, ...). Field lookups therefore go through explicit, ordered
//! alias lists where the first non-empty hit wins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::catalog::InsuranceCategory;

/// Keys probed, in order, for the insurance category.
pub const CATEGORY_FIELD_ALIASES: &[&str] =
    &["insuranceType", "insurance_type", "insuranceCategory", "category"];

/// Keys probed, in order, for the applicant's age.
pub const AGE_FIELD_ALIASES: &[&str] = &[
    "age",
    "lifeAge",
    "termAge",
    "healthAge",
    "savingsAge",
    "investmentAge",
    "autoAge",
    "carAge",
    "homeAge",
    "driverAge",
    "applicantAge",
];

/// Keys probed, in order, for the applicant's gender.
pub const GENDER_FIELD_ALIASES: &[&str] = &[
    "gender",
    "lifeGender",
    "termGender",
    "healthGender",
    "savingsGender",
    "investmentGender",
    "autoGender",
    "carGender",
    "homeGender",
    "driverGender",
    "applicantGender",
];

/// Keys probed, in order, for the customer's name.
pub const NAME_FIELD_ALIASES: &[&str] = &["name", "fullName", "customerName", "firstName"];

/// Keys probed, in order, for the customer's location.
pub const LOCATION_FIELD_ALIASES: &[&str] =
    &["zipCode", "zip_code", "pincode", "pinCode", "location", "city"];

/// Keys probed, in order, for a requested cover amount.
pub const COVERAGE_FIELD_ALIASES: &[&str] =
    &["coverageAmount", "coverage_amount", "sumInsured", "coverAmount"];

/// Fields whose change invalidates cached recommendations.
pub fn is_discriminating_field(key: &str) -> bool {
    CATEGORY_FIELD_ALIASES.contains(&key)
        || AGE_FIELD_ALIASES.contains(&key)
        || GENDER_FIELD_ALIASES.contains(&key)
}

/// Whether a value counts as "not supplied".
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// A bag of intake fields keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakeFields(Map<String, Value>);

impl IntakeFields {
    /// Creates an empty field map.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a raw JSON object as-is.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Copies only the non-empty entries of `map`.
    pub fn non_empty_from(map: &Map<String, Value>) -> Self {
        let mut fields = Self::new();
        fields.merge(map);
        fields
    }

    /// Applies `patch` under the override rule: non-empty incoming values
    /// replace existing ones, empty incoming values are ignored.
    ///
    /// Returns the keys whose stored value actually changed.
    pub fn merge(&mut self, patch: &Map<String, Value>) -> Vec<String> {
        let mut changed = Vec::new();
        for (key, value) in patch {
            if is_empty_value(value) {
                continue;
            }
            if self.0.get(key) != Some(value) {
                self.0.insert(key.clone(), value.clone());
                changed.push(key.clone());
            }
        }
        changed
    }

    /// Raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields are stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Text rendering of a scalar field, if present and non-empty.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(scalar_text)
    }

    /// First non-empty value among `aliases`, in order.
    pub fn probe(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !is_empty_value(value))
    }

    /// Text of the first non-empty value among `aliases`.
    pub fn probe_text(&self, aliases: &[&str]) -> Option<String> {
        self.probe(aliases).and_then(scalar_text)
    }

    /// Insurance category, if the form named one.
    pub fn insurance_category(&self) -> Option<InsuranceCategory> {
        self.probe_text(CATEGORY_FIELD_ALIASES)
            .map(|raw| InsuranceCategory::from_form_value(&raw))
    }

    /// Age from the first non-empty age alias.
    ///
    /// The first hit decides even when it does not parse; later aliases are
    /// not consulted in that case.
    pub fn age(&self) -> Option<u32> {
        self.probe(AGE_FIELD_ALIASES).and_then(parse_age)
    }

    /// Lower-cased gender from the first non-empty gender alias.
    pub fn gender(&self) -> Option<String> {
        self.probe_text(GENDER_FIELD_ALIASES)
            .map(|g| g.to_lowercase())
    }

    /// Customer name.
    pub fn name(&self) -> Option<String> {
        self.probe_text(NAME_FIELD_ALIASES)
    }

    /// Zip code or free-text location.
    pub fn location(&self) -> Option<String> {
        self.probe_text(LOCATION_FIELD_ALIASES)
    }

    /// Requested cover amount.
    pub fn coverage_amount(&self) -> Option<f64> {
        self.probe(COVERAGE_FIELD_ALIASES).and_then(parse_amount)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_age(value: &Value) -> Option<u32> {
    parse_amount(value)
        .filter(|age| *age >= 0.0 && *age <= u32::MAX as f64)
        .map(|age| age.round() as u32)
}

fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}
