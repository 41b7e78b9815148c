//! Customer intake data and validation.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::InsuranceCategory;
use crate::domain::foundation::{CustomerId, SessionId, Timestamp, ValidationError};

/// Youngest insurable applicant.
pub const MIN_AGE: i64 = 18;
/// Oldest insurable applicant.
pub const MAX_AGE: i64 = 80;

/// Quote-form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerData {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    pub zip_code: String,
    pub insurance_type: String,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub vehicle_model: Option<String>,
    #[serde(default)]
    pub vehicle_year: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub coverage_amount: Option<f64>,
    #[serde(default)]
    pub monthly_investment: Option<f64>,
    #[serde(default)]
    pub investment_goal: Option<String>,
    #[serde(default)]
    pub current_provider: Option<String>,
}

impl CustomerData {
    /// Validates and normalizes the submission.
    ///
    /// Required text fields must be non-blank, the age must be insurable,
    /// the gender is lower-cased and the insurance type is mapped to its
    /// catalog product type.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("zip_code", &self.zip_code),
            ("insurance_type", &self.insurance_type),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::empty_field(field));
            }
        }

        if !is_plausible_email(self.email.trim()) {
            return Err(ValidationError::invalid_format(
                "email",
                "expected an address like name@example.com",
            ));
        }

        if let Some(age) = self.age {
            if !(MIN_AGE..=MAX_AGE).contains(&age) {
                return Err(ValidationError::out_of_range("age", MIN_AGE, MAX_AGE, age));
            }
        }

        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self.phone.trim().to_string();
        self.zip_code = self.zip_code.trim().to_string();
        self.gender = self
            .gender
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty());
        self.insurance_type = InsuranceCategory::from_form_value(&self.insurance_type)
            .product_type()
            .to_string();
        Ok(self)
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: CustomerId,
    #[serde(flatten)]
    pub data: CustomerData,
    pub created_at: Timestamp,
}

/// One logged exchange between a customer and the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub customer_id: CustomerId,
    pub session_id: SessionId,
    pub message: String,
    pub response: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
}

fn default_message_type() -> String {
    "user".to_string()
}
