use std::collections::BTreeMap;

use paysera_common::MinorUnits;
use serde::{Deserialize, Serialize};

use crate::errors::PayseraError;

/// Query parameters of a callback or confirmation request, exactly as received. Any of them may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationParams {
    pub data: Option<String>,
    pub ss1: Option<String>,
    pub ss2: Option<String>,
}

/// A notification with all three transport fields present. Nothing in it has been checked yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundNotification {
    pub data: String,
    pub ss1: String,
    pub ss2: String,
}

impl InboundNotification {
    pub fn new<S: Into<String>>(data: S, ss1: S, ss2: S) -> Self {
        Self { data: data.into(), ss1: ss1.into(), ss2: ss2.into() }
    }
}

impl TryFrom<NotificationParams> for InboundNotification {
    type Error = PayseraError;

    fn try_from(params: NotificationParams) -> Result<Self, Self::Error> {
        let require = |value: Option<String>, name: &str| {
            value.filter(|v| !v.trim().is_empty()).ok_or_else(|| PayseraError::MissingField(name.to_string()))
        };
        Ok(Self {
            data: require(params.data, "data")?,
            ss1: require(params.ss1, "ss1")?,
            ss2: require(params.ss2, "ss2")?,
        })
    }
}

/// The decoded notification payload. It is only ever constructed after both signatures have been verified.
///
/// Values are kept as the strings the provider sent; conversion (amounts, for instance) happens at the point of use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifiedPayload(BTreeMap<String, String>);

impl VerifiedPayload {
    pub(crate) fn new(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn require(&self, field: &str) -> Result<&str, PayseraError> {
        self.get(field).ok_or_else(|| PayseraError::MissingField(field.to_string()))
    }

    pub fn project_id(&self) -> Result<&str, PayseraError> {
        self.require("projectid")
    }

    pub fn order_id(&self) -> Result<&str, PayseraError> {
        self.require("orderid")
    }

    /// The amount actually paid, `payamount`, which the provider already expresses in minor units.
    pub fn pay_amount(&self) -> Result<MinorUnits, PayseraError> {
        self.require("payamount")?
            .parse::<MinorUnits>()
            .map_err(|e| PayseraError::ParseError(format!("payamount: {e}")))
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.0
    }
}
