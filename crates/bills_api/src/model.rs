use std::fmt;

use serde::{Deserialize, Serialize};

/// Expense categories offered by the new bill form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseType {
    #[serde(rename = "Transports")]
    Transports,
    #[serde(rename = "Restaurants et bars")]
    Restaurants,
    #[serde(rename = "Hôtel et logement")]
    Lodging,
    #[serde(rename = "Services en ligne")]
    OnlineServices,
    #[serde(rename = "IT et électronique")]
    Electronics,
    #[serde(rename = "Equipement et matériel")]
    Equipment,
    #[serde(rename = "Fournitures de bureau")]
    OfficeSupplies,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 7] = [
        ExpenseType::Transports,
        ExpenseType::Restaurants,
        ExpenseType::Lodging,
        ExpenseType::OnlineServices,
        ExpenseType::Electronics,
        ExpenseType::Equipment,
        ExpenseType::OfficeSupplies,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Transports => "Transports",
            ExpenseType::Restaurants => "Restaurants et bars",
            ExpenseType::Lodging => "Hôtel et logement",
            ExpenseType::OnlineServices => "Services en ligne",
            ExpenseType::Electronics => "IT et électronique",
            ExpenseType::Equipment => "Equipement et matériel",
            ExpenseType::OfficeSupplies => "Fournitures de bureau",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.label() == label)
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl Default for BillStatus {
    fn default() -> Self {
        BillStatus::Pending
    }
}

/// An expense record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub name: String,
    /// Raw date as entered, normally `YYYY-MM-DD`.
    pub date: String,
    pub amount: f64,
    pub vat: f64,
    /// Share of the employee's salary, in percent.
    pub pct: u32,
    #[serde(default)]
    pub commentary: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
}

/// A proof file sent ahead of the bill it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Base64 encoded on the wire.
    #[serde(with = "content")]
    pub content: Vec<u8>,
}

/// Where the backend stored an upload, and the bill key it reserved for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub file_url: String,
    pub key: String,
}

/// Update payload for the bills resource.
///
/// `data` carries the JSON serialized [`Bill`]. Without a `selector` the
/// backend creates a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub selector: Option<String>,
    pub data: String,
}

mod content {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&base64::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        base64::decode(encoded.as_bytes()).map_err(D::Error::custom)
    }
}
