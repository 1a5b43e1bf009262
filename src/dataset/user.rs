//! User records

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// A user row as served by the users endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub is_active: bool,
}

impl Record for User {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Number(self.id as f64)),
            "firstName" => Some(FieldValue::Text(Cow::Borrowed(&self.first_name))),
            "lastName" => Some(FieldValue::Text(Cow::Borrowed(&self.last_name))),
            "phone" => self
                .phone
                .as_deref()
                .map(|p| FieldValue::Text(Cow::Borrowed(p))),
            "dateOfBirth" => self.date_of_birth.map(FieldValue::Date),
            "isActive" => Some(FieldValue::Bool(self.is_active)),
            _ => None,
        }
    }
}
