//! Request payloads for the booking email functions.
//!
//! Only the JSON body is produced here; delivery belongs to the email
//! service. `origin` and `destination` are opaque form values, normally the
//! output of [`crate::value_of`] but possibly free text typed by the user.

use crate::error::AirportError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const DEFAULT_CUSTOMER_NAME: &str = "Valued Customer";
pub const DEFAULT_CUSTOMER_PHONE: &str = "Not provided";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelBooking {
    pub origin: String,
    pub destination: String,
    pub departure: String,
    #[serde(rename = "return")]
    pub return_date: String,
    pub travelers: String,
    pub class: String,
    pub preferences: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogisticsBooking {
    pub origin: String,
    pub destination: String,
    pub cargo_type: String,
    pub weight: String,
    pub dimensions: String,
    pub value: String,
    pub shipping: String,
    pub urgency: String,
    pub description: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

/// Customer contact block shared by every booking kind.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Contact<'a> {
    email: &'a str,
    name: &'a str,
    phone: &'a str,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contact<'a>(
    email: &'a Option<String>,
    name: &'a Option<String>,
    phone: &'a Option<String>,
) -> Result<Contact<'a>, AirportError> {
    let email = non_empty(email)
        .ok_or_else(|| AirportError::InvalidBooking("Customer email is required".to_string()))?;

    Ok(Contact {
        email,
        name: non_empty(name).unwrap_or(DEFAULT_CUSTOMER_NAME),
        phone: non_empty(phone).unwrap_or(DEFAULT_CUSTOMER_PHONE),
    })
}

impl TravelBooking {
    pub const FUNCTION: &'static str = "send-travel-booking-email";

    pub fn function_path(&self) -> String {
        format!("/functions/v1/{}", Self::FUNCTION)
    }

    /// `{"bookingData": {...}}` body for the travel email function.
    pub fn to_request_payload(&self) -> Result<Value, AirportError> {
        let contact = contact(&self.customer_email, &self.customer_name, &self.customer_phone)?;

        Ok(json!({
            "bookingData": {
                "origin": self.origin,
                "destination": self.destination,
                "departure": self.departure,
                "return": self.return_date,
                "travelers": self.travelers,
                "class": self.class,
                "preferences": self.preferences,
                "customerName": contact.name,
                "customerEmail": contact.email,
                "customerPhone": contact.phone,
            }
        }))
    }

    /// `ORIGIN → DESTINATION`, as shown in confirmation mails.
    pub fn route(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

impl LogisticsBooking {
    pub const FUNCTION: &'static str = "send-logistics-booking-email";

    pub fn function_path(&self) -> String {
        format!("/functions/v1/{}", Self::FUNCTION)
    }

    /// `{"bookingData": {...}}` body for the logistics email function.
    pub fn to_request_payload(&self) -> Result<Value, AirportError> {
        let contact = contact(&self.customer_email, &self.customer_name, &self.customer_phone)?;

        Ok(json!({
            "bookingData": {
                "origin": self.origin,
                "destination": self.destination,
                "cargoType": self.cargo_type,
                "weight": self.weight,
                "dimensions": self.dimensions,
                "value": self.value,
                "shipping": self.shipping,
                "urgency": self.urgency,
                "description": self.description,
                "customerName": contact.name,
                "customerEmail": contact.email,
                "customerPhone": contact.phone,
            }
        }))
    }

    pub fn route(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_payload_defaults() {
        let booking = TravelBooking {
            origin: "JFK".to_string(),
            destination: "EGKB".to_string(),
            departure: "2026-11-02".to_string(),
            travelers: "2".to_string(),
            class: "economy".to_string(),
            customer_email: Some("traveler@example.com".to_string()),
            customer_name: Some("   ".to_string()),
            ..Default::default()
        };

        let payload = booking.to_request_payload().unwrap();
        let data = &payload["bookingData"];
        assert_eq!(data["origin"], "JFK");
        assert_eq!(data["destination"], "EGKB");
        assert_eq!(data["return"], "");
        assert_eq!(data["customerEmail"], "traveler@example.com");
        assert_eq!(data["customerName"], DEFAULT_CUSTOMER_NAME);
        assert_eq!(data["customerPhone"], DEFAULT_CUSTOMER_PHONE);
        assert_eq!(booking.route(), "JFK → EGKB");
        assert_eq!(booking.function_path(), "/functions/v1/send-travel-booking-email");
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let booking = LogisticsBooking {
            origin: "DXB".to_string(),
            destination: "NBO".to_string(),
            customer_email: Some(String::new()),
            ..Default::default()
        };

        match booking.to_request_payload() {
            Err(AirportError::InvalidBooking(msg)) => assert_eq!(msg, "Customer email is required"),
            other => panic!("Expected InvalidBooking, got {:?}", other),
        }
    }

    #[test]
    fn test_logistics_payload_fields() {
        let booking = LogisticsBooking {
            origin: "DXB".to_string(),
            destination: "Mogadishu".to_string(),
            cargo_type: "electronics".to_string(),
            weight: "120".to_string(),
            customer_email: Some("shipper@example.com".to_string()),
            customer_phone: Some("+1 555 0100".to_string()),
            ..Default::default()
        };

        let payload = booking.to_request_payload().unwrap();
        let data = &payload["bookingData"];
        assert_eq!(data["cargoType"], "electronics");
        assert_eq!(data["weight"], "120");
        assert_eq!(data["destination"], "Mogadishu");
        assert_eq!(data["customerPhone"], "+1 555 0100");
        assert_eq!(booking.function_path(), "/functions/v1/send-logistics-booking-email");
    }

    #[test]
    fn test_form_json_uses_camel_case() {
        let booking: TravelBooking = serde_json::from_str(
            r#"{"origin":"LHR","destination":"HND","return":"2026-12-01","customerEmail":"a@b.c"}"#,
        )
        .unwrap();
        assert_eq!(booking.return_date, "2026-12-01");
        assert_eq!(booking.customer_email.as_deref(), Some("a@b.c"));
    }
}
