use chrono::NaiveDate;

use crate::schemas::{sanitize_amount, DueItem, Period, Property, RiskLevel, SettlementStatus};

/// The next unpaid rent due date and its severity for one property.
/// Vacant properties have nothing due.
///
/// Billing anchors to the 1st of the calendar month regardless of the
/// actual move-in day; the next due date is the first month-start strictly
/// after `today`. A date equal to `today` has already become current, so it
/// never counts as "next".
pub fn next_due(property: &Property, today: NaiveDate) -> Option<DueItem> {
    let tenant = property.occupant()?;

    let due_date = next_due_date(tenant.start_date, today);
    let days_until_or_overdue = (due_date - today).num_days();

    // The status flag and the date arithmetic are independent overdue
    // signals; either one triggers.
    let overdue =
        days_until_or_overdue < 0 || tenant.rent_status == SettlementStatus::Pending;
    let risk = classify(overdue, days_until_or_overdue);

    Some(DueItem {
        property_id: property.id.clone(),
        property_name: property.name.clone(),
        tenant_name: tenant.name.clone(),
        due_date,
        days_until_or_overdue,
        amount: sanitize_amount(property.schedule.monthly_rent),
        overdue,
        risk,
    })
}

/// Due rows for every occupied property, overdue first, nearest due date
/// next. This is the order the upcoming-payments table renders in.
pub fn due_items(properties: &[Property], today: NaiveDate) -> Vec<DueItem> {
    let mut items: Vec<DueItem> = properties
        .iter()
        .filter_map(|property| next_due(property, today))
        .collect();
    items.sort_by(|left, right| {
        right
            .overdue
            .cmp(&left.overdue)
            .then(left.days_until_or_overdue.cmp(&right.days_until_or_overdue))
    });
    items
}

fn next_due_date(occupancy_start: NaiveDate, today: NaiveDate) -> NaiveDate {
    let mut period = Period::from_date(occupancy_start);
    while period.first_day() <= today {
        period = period.next();
    }
    period.first_day()
}

/// High must be checked first: every High case also satisfies the Medium
/// predicate, so swapping the order would misfile badly overdue tenancies.
fn classify(overdue: bool, days_until_or_overdue: i64) -> RiskLevel {
    if overdue && days_until_or_overdue < -7 {
        RiskLevel::High
    } else if overdue || days_until_or_overdue <= 5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
