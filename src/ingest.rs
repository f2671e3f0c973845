//! Boundary normalization for loosely-shaped upstream rows.
//!
//! The screens feeding this engine never agreed on field names: the same
//! property record arrives with `monthlyRent`, `rent`, or a nested
//! `rent.amount` depending on which form last touched it. Aliases are
//! resolved here, at the boundary, so the engine itself only ever sees the
//! canonical shapes in [`crate::schemas`]. Nothing in this module panics on
//! any JSON shape.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use tracing::warn;

use crate::schemas::{
    ChargeSchedule, ChargeType, Payment, Period, Property, PropertyKind, SettlementStatus, Tenant,
};

/// Normalize a batch of property rows, dropping the unusable ones.
pub fn properties_from_rows(rows: &[Value]) -> Vec<Property> {
    rows.iter()
        .filter_map(|row| {
            let property = property_from_row(row);
            if property.is_none() {
                warn!("Dropped property row without a usable id");
            }
            property
        })
        .collect()
}

/// Normalize one property row. Only the identifier is required; every other
/// field degrades to a zero/default.
pub fn property_from_row(row: &Value) -> Option<Property> {
    let id = first_str(row, &["id", "propertyId", "flatId"])?;
    let name = first_str(row, &["name", "propertyName", "flatName"]).unwrap_or_else(|| id.clone());

    let property_type = match first_str(row, &["propertyType", "type"])
        .map(|kind| kind.to_ascii_lowercase())
        .as_deref()
    {
        Some("shop") => PropertyKind::Shop,
        Some("plot") => PropertyKind::Plot,
        _ => PropertyKind::Flat,
    };

    let schedule = ChargeSchedule {
        monthly_rent: charge_amount(row, &["monthlyRent", "rent"]),
        monthly_maintenance: charge_amount(row, &["monthlyMaintenance", "maintenance"]),
        electricity_unit_rate: charge_amount(row, &["unitRate", "electricityUnitRate"]),
        last_unit_reading: charge_amount(row, &["lastUnit", "lastReading", "lastUnitReading"]),
        advance_amount: first_number(row, &["advance", "advanceAmount"]),
    };

    Some(Property {
        id,
        name,
        property_type,
        schedule,
        tenant: row.get("tenant").and_then(tenant_from_row),
    })
}

/// Normalize one tenant row. A row without an id or a parseable start date
/// describes no occupancy and is dropped.
pub fn tenant_from_row(row: &Value) -> Option<Tenant> {
    let id = first_str(row, &["id", "tenantId"])?;
    let start_date = first_date(row, &["startDate", "moveInDate"])?;

    Some(Tenant {
        name: first_str(row, &["name", "tenantName"]).unwrap_or_else(|| id.clone()),
        id,
        property_id: first_str(row, &["propertyId", "flatId"]),
        start_date,
        end_date: first_date(row, &["endDate", "moveOutDate"]),
        rent_status: status_from(row, "rentStatus"),
        maintenance_status: status_from(row, "maintenanceStatus"),
        light_bill_status: status_from(row, "lightBillStatus"),
    })
}

/// Normalize a batch of payment rows, dropping the unusable ones.
pub fn payments_from_rows(rows: &[Value]) -> Vec<Payment> {
    let mut payments = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;
    for row in rows {
        match payment_from_row(row) {
            Some(payment) => payments.push(payment),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(dropped, "Dropped payment rows without a usable amount or billing period");
    }
    payments
}

/// Normalize one payment row. A payment must carry a positive amount and a
/// valid billing period to mean anything; rows without them are dropped. A
/// missing payment date falls back to the billing period's first day.
pub fn payment_from_row(row: &Value) -> Option<Payment> {
    let amount = first_number(row, &["amount", "amountPaid"]).filter(|amount| *amount > 0.0)?;
    let year = first_int(row, &["year"])?;
    let month = first_int(row, &["month"])?;
    let period = Period::new(year as i32, month as u32).ok()?;

    let charge_type = match first_str(row, &["type", "paymentType"])
        .map(|charge| charge.to_ascii_lowercase())
        .as_deref()
    {
        Some("maintenance") => ChargeType::Maintenance,
        Some("light") => ChargeType::Light,
        Some("advance") => ChargeType::Advance,
        _ => ChargeType::Rent,
    };

    Some(Payment {
        property_id: first_str(row, &["propertyId", "flatId"]).unwrap_or_default(),
        tenant_id: first_str(row, &["tenantId"]).unwrap_or_default(),
        charge_type,
        amount,
        year: period.year,
        month: period.month,
        paid_on: first_date(row, &["paidOn", "paymentDate", "date"])
            .unwrap_or_else(|| period.first_day()),
    })
}

fn first_str(row: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        row.as_object()
            .and_then(|obj| obj.get(*key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
    })
}

/// First alias that parses as a number; nested `{ "amount": ... }` objects
/// are unwrapped, string-encoded numbers parse, anything else is skipped.
fn first_number(row: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| {
        let value = row.as_object()?.get(*key)?;
        number_of(value).or_else(|| value.get("amount").and_then(number_of))
    })
}

fn charge_amount(row: &Value, keys: &[&str]) -> f64 {
    first_number(row, keys).unwrap_or(0.0)
}

fn first_int(row: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| {
        let value = row.as_object()?.get(*key)?;
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()))
    })
}

fn first_date(row: &Value, keys: &[&str]) -> Option<NaiveDate> {
    keys.iter().find_map(|key| {
        row.as_object()
            .and_then(|obj| obj.get(*key))
            .and_then(Value::as_str)
            .and_then(parse_date)
    })
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|value| value.is_finite()),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}

fn status_from(row: &Value, key: &str) -> SettlementStatus {
    let paid = row
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("paid"));
    if paid {
        SettlementStatus::Paid
    } else {
        SettlementStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rent_aliases_normalize_to_the_same_property() {
        let flat_field = json!({
            "id": "p-1",
            "name": "Flat 2B",
            "propertyType": "flat",
            "monthlyRent": 10000,
        });
        let bare_field = json!({
            "flatId": "p-1",
            "flatName": "Flat 2B",
            "rent": 10000,
        });
        let nested_field = json!({
            "id": "p-1",
            "name": "Flat 2B",
            "rent": { "amount": 10000 },
        });

        let first = property_from_row(&flat_field).expect("property");
        let second = property_from_row(&bare_field).expect("property");
        let third = property_from_row(&nested_field).expect("property");
        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(first.schedule.monthly_rent, 10000.0);
    }

    #[test]
    fn string_encoded_numbers_parse() {
        let row = json!({
            "id": "p-1",
            "monthlyRent": "9500.50",
            "unitRate": "8",
            "lastUnit": 120,
        });
        let property = property_from_row(&row).expect("property");
        assert_eq!(property.schedule.monthly_rent, 9500.5);
        assert_eq!(property.schedule.light_bill(), 960.0);
    }

    #[test]
    fn row_without_an_id_is_dropped() {
        let rows = vec![json!({ "name": "No id" }), json!({ "id": "p-1" })];
        let properties = properties_from_rows(&rows);
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].id, "p-1");
    }

    #[test]
    fn embedded_tenant_normalizes_with_statuses() {
        let row = json!({
            "id": "p-1",
            "tenant": {
                "id": "t-1",
                "name": "Meera",
                "propertyId": "p-1",
                "startDate": "2024-01-15",
                "rentStatus": "paid",
                "maintenanceStatus": "pending",
            },
        });
        let property = property_from_row(&row).expect("property");
        let tenant = property.tenant.expect("tenant");
        assert_eq!(tenant.rent_status, SettlementStatus::Paid);
        assert_eq!(tenant.maintenance_status, SettlementStatus::Pending);
        assert_eq!(tenant.light_bill_status, SettlementStatus::Pending);
        assert_eq!(
            tenant.start_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
        );
    }

    #[test]
    fn tenant_without_a_start_date_is_dropped() {
        let row = json!({ "id": "t-1", "startDate": "not a date" });
        assert!(tenant_from_row(&row).is_none());
    }

    #[test]
    fn payment_rows_require_amount_and_period() {
        let rows = vec![
            json!({
                "propertyId": "p-1",
                "tenantId": "t-1",
                "type": "rent",
                "amount": "4000",
                "year": 2024,
                "month": 1,
                "paidOn": "2024-01-05",
            }),
            // Non-numeric amount.
            json!({ "propertyId": "p-1", "amount": "soon", "year": 2024, "month": 1 }),
            // Month out of range.
            json!({ "propertyId": "p-1", "amount": 500, "year": 2024, "month": 13 }),
            // Negative amount.
            json!({ "propertyId": "p-1", "amount": -10, "year": 2024, "month": 2 }),
        ];

        let payments = payments_from_rows(&rows);
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, 4000.0);
        assert_eq!(payments[0].charge_type, ChargeType::Rent);
    }

    #[test]
    fn missing_paid_on_falls_back_to_the_period_start() {
        let row = json!({
            "propertyId": "p-1",
            "tenantId": "t-1",
            "type": "light",
            "amount": 800,
            "year": 2024,
            "month": 3,
        });
        let payment = payment_from_row(&row).expect("payment");
        assert_eq!(
            payment.paid_on,
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
        );
    }

    #[test]
    fn rfc3339_timestamps_parse_as_dates() {
        let row = json!({
            "propertyId": "p-1",
            "amount": 800,
            "year": 2024,
            "month": 3,
            "paidOn": "2024-03-09T10:30:00+05:30",
        });
        let payment = payment_from_row(&row).expect("payment");
        assert_eq!(
            payment.paid_on,
            NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date")
        );
    }
}
