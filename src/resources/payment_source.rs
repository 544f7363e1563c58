//! Payment sources: a polymorphic family selected by the `object` field.

use crate::codec::{decode_variant, discriminator};
use crate::types::{Extra, Metadata, Object, UnknownObject};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    pub id: String,
    pub object: String,
    pub brand: Option<String>,
    pub country: Option<String>,
    pub customer: Option<String>,
    pub cvc_check: Option<String>,
    pub exp_month: Option<u32>,
    pub exp_year: Option<u32>,
    pub fingerprint: Option<String>,
    pub funding: Option<String>,
    pub last4: Option<String>,
    pub name: Option<String>,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankAccount {
    pub id: String,
    pub object: String,
    pub account_holder_name: Option<String>,
    pub account_holder_type: Option<String>,
    pub bank_name: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub customer: Option<String>,
    pub fingerprint: Option<String>,
    pub last4: Option<String>,
    pub routing_number: Option<String>,
    pub status: Option<String>,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A `source` object (the multi-method sources API).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    pub id: String,
    pub object: String,
    pub amount: Option<i64>,
    pub client_secret: Option<String>,
    pub currency: Option<String>,
    pub flow: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    pub usage: Option<String>,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub extra: Extra,
}

macro_rules! impl_object {
    ($($t:ty),*) => {
        $(impl Object for $t {
            fn id(&self) -> &str {
                &self.id
            }

            fn object(&self) -> &str {
                &self.object
            }
        })*
    };
}

impl_object!(Card, BankAccount, Source);

/// Whatever was used to pay: card, bank account, source, or a kind this
/// client does not model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PaymentSource {
    Card(Card),
    BankAccount(BankAccount),
    Source(Source),
    Unknown(UnknownObject),
}

impl PaymentSource {
    pub fn as_card(&self) -> Option<&Card> {
        match self {
            PaymentSource::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_bank_account(&self) -> Option<&BankAccount> {
        match self {
            PaymentSource::BankAccount(account) => Some(account),
            _ => None,
        }
    }

    pub fn as_source(&self) -> Option<&Source> {
        match self {
            PaymentSource::Source(source) => Some(source),
            _ => None,
        }
    }
}

impl Object for PaymentSource {
    fn id(&self) -> &str {
        match self {
            PaymentSource::Card(v) => v.id(),
            PaymentSource::BankAccount(v) => v.id(),
            PaymentSource::Source(v) => v.id(),
            PaymentSource::Unknown(v) => v.id(),
        }
    }

    fn object(&self) -> &str {
        match self {
            PaymentSource::Card(v) => v.object(),
            PaymentSource::BankAccount(v) => v.object(),
            PaymentSource::Source(v) => v.object(),
            PaymentSource::Unknown(v) => v.object(),
        }
    }
}

impl<'de> Deserialize<'de> for PaymentSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match discriminator(&value) {
            Some("card") => decode_variant(value).map(PaymentSource::Card),
            Some("bank_account") => decode_variant(value).map(PaymentSource::BankAccount),
            Some("source") => decode_variant(value).map(PaymentSource::Source),
            _ => decode_variant(value).map(PaymentSource::Unknown),
        }
    }
}
