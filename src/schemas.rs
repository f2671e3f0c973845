use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use validator::Validate;

use crate::error::LedgerError;

pub fn validate_input<T: Validate>(input: &T) -> Result<(), LedgerError> {
    input
        .validate()
        .map_err(|errors| LedgerError::Validation(format!("{errors}")))
}

/// Leasable unit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Shop,
    Flat,
    Plot,
}

impl Default for PropertyKind {
    fn default() -> Self {
        Self::Flat
    }
}

/// One of the four charge buckets a tenancy accrues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeType {
    Rent,
    Maintenance,
    Light,
    Advance,
}

impl ChargeType {
    pub const ALL: [ChargeType; 4] = [
        ChargeType::Rent,
        ChargeType::Maintenance,
        ChargeType::Light,
        ChargeType::Advance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChargeType::Rent => "rent",
            ChargeType::Maintenance => "maintenance",
            ChargeType::Light => "light",
            ChargeType::Advance => "advance",
        }
    }
}

/// Per-charge-type settlement flag carried on the tenant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Paid,
    Pending,
}

impl Default for SettlementStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A (year, month) billing cycle. Ordering is calendar order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, serde::Serialize,
)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidPeriod(format!(
                "month must be 1-12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The billing cycle a calendar date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First calendar day of the cycle. Falls back for a malformed month
    /// rather than panicking.
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Inclusive range of billing cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct PeriodRange {
    pub from: Period,
    pub to: Period,
}

impl PeriodRange {
    pub fn new(from: Period, to: Period) -> Result<Self, LedgerError> {
        if from > to {
            return Err(LedgerError::InvalidPeriod(format!(
                "range start {} is after range end {}",
                from.label(),
                to.label()
            )));
        }
        Ok(Self { from, to })
    }

    /// January through December of one calendar year.
    pub fn for_year(year: i32) -> Self {
        Self {
            from: Period { year, month: 1 },
            to: Period { year, month: 12 },
        }
    }

    pub fn contains(&self, period: Period) -> bool {
        self.from <= period && period <= self.to
    }

    pub fn periods(&self) -> Vec<Period> {
        let mut periods = Vec::new();
        let mut current = self.from;
        while current <= self.to {
            periods.push(current);
            current = current.next();
        }
        periods
    }
}

/// The charge amounts a property bills per cycle.
///
/// The light bill is a snapshot: the most recent meter reading priced at the
/// unit rate, carried as one flat monthly charge until the next reading is
/// recorded upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeSchedule {
    pub monthly_rent: f64,
    pub monthly_maintenance: f64,
    pub electricity_unit_rate: f64,
    pub last_unit_reading: f64,
    pub advance_amount: Option<f64>,
}

impl ChargeSchedule {
    pub fn light_bill(&self) -> f64 {
        sanitize_amount(self.last_unit_reading) * sanitize_amount(self.electricity_unit_rate)
    }
}

/// An occupancy record. A tenant with no `property_id` is inactive and
/// contributes no obligations.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub property_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub rent_status: SettlementStatus,
    #[serde(default)]
    pub maintenance_status: SettlementStatus,
    #[serde(default)]
    pub light_bill_status: SettlementStatus,
}

impl Tenant {
    pub fn is_active(&self) -> bool {
        self.property_id.is_some()
    }
}

/// A leasable unit plus its charge schedule and current occupant, treated as
/// an immutable snapshot for the duration of one computation.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub property_type: PropertyKind,
    #[serde(flatten)]
    pub schedule: ChargeSchedule,
    pub tenant: Option<Tenant>,
}

impl Property {
    /// The active occupant, if any.
    pub fn occupant(&self) -> Option<&Tenant> {
        self.tenant.as_ref().filter(|tenant| tenant.is_active())
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant().is_some()
    }
}

/// An immutable, append-only payment fact. `year`/`month` name the billing
/// period the payment is attributed to, which is distinct from `paid_on`.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub property_id: String,
    pub tenant_id: String,
    #[serde(rename = "type")]
    pub charge_type: ChargeType,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    pub paid_on: NaiveDate,
}

impl Payment {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }
}

/// Conjunctive filter over the payment collection. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilter {
    pub property_id: Option<String>,
    pub tenant_id: Option<String>,
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
    #[serde(rename = "type")]
    pub charge_type: Option<ChargeType>,
}

/// Optional restrictions applied by the portfolio aggregator. `year`/`month`
/// restrict payments by billing period, not by payment date.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SummaryFilter {
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
    pub property_id: Option<String>,
}

/// One amount per charge type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeAmounts {
    pub rent: f64,
    pub maintenance: f64,
    pub light: f64,
    pub advance: f64,
}

impl ChargeAmounts {
    pub fn get(&self, charge: ChargeType) -> f64 {
        match charge {
            ChargeType::Rent => self.rent,
            ChargeType::Maintenance => self.maintenance,
            ChargeType::Light => self.light,
            ChargeType::Advance => self.advance,
        }
    }

    pub fn set(&mut self, charge: ChargeType, amount: f64) {
        match charge {
            ChargeType::Rent => self.rent = amount,
            ChargeType::Maintenance => self.maintenance = amount,
            ChargeType::Light => self.light = amount,
            ChargeType::Advance => self.advance = amount,
        }
    }

    pub fn total(&self) -> f64 {
        self.rent + self.maintenance + self.light + self.advance
    }
}

/// One outstanding-payments table row: a (property, period) pair with at
/// least one charge type still pending. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingEntry {
    pub property_id: String,
    pub property_name: String,
    pub tenant_name: String,
    pub period: Period,
    pub rent_pending: f64,
    pub maintenance_pending: f64,
    pub light_pending: f64,
    pub advance_pending: f64,
    pub total_outstanding: f64,
}

/// Coarse overdue severity used for visual triage in dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, serde::Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// One upcoming/overdue-payments table row per occupied property.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueItem {
    pub property_id: String,
    pub property_name: String,
    pub tenant_name: String,
    pub due_date: NaiveDate,
    /// Signed: positive = days remaining, negative = days overdue.
    pub days_until_or_overdue: i64,
    pub amount: f64,
    pub overdue: bool,
    pub risk: RiskLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    pub total: f64,
    pub by_type: ChargeAmounts,
    pub count: i64,
}

/// Maintenance-specific spend view: dues across occupied properties vs.
/// maintenance payments actually received.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spends {
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRentDetail {
    pub property_id: String,
    pub property_name: String,
    pub tenant_name: String,
    pub amount: f64,
}

/// Status-flag-driven pending rent view. Deliberately coarser than the
/// per-period reconciliation behind [`OutstandingEntry`]; both views are
/// preserved as distinct outputs because existing dashboards rely on each.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRent {
    pub total: f64,
    pub count: i64,
    pub details: Vec<PendingRentDetail>,
}

/// Dashboard and analytics aggregate for a filtered portfolio slice.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub earnings: Earnings,
    pub spends: Spends,
    pub pending_rent: PendingRent,
    pub net_amount: f64,
    /// Whole percent, 0 when there are no earnings.
    pub profit_margin: f64,
    /// Whole percent, 0 when the portfolio is empty.
    pub occupancy_rate: f64,
    /// Whole percent, 100 for an all-vacant or fully-collected portfolio.
    pub collection_efficiency: f64,
}

/// One row of the trailing analytics series.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub period: Period,
    pub earnings: f64,
    pub maintenance_due: f64,
    pub net: f64,
    pub payment_count: i64,
    /// Fraction of billed tenancies whose rent cleared, 0.0-1.0.
    pub collection_rate: f64,
}

/// Non-finite amounts from loosely validated upstream data count as zero.
pub(crate) fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_ordering_is_calendar_order() {
        let december = Period {
            year: 2023,
            month: 12,
        };
        let january = Period {
            year: 2024,
            month: 1,
        };
        assert!(december < january);
        assert_eq!(december.next(), january);
        assert_eq!(january.prev(), december);
    }

    #[test]
    fn period_label_is_zero_padded() {
        let period = Period {
            year: 2024,
            month: 3,
        };
        assert_eq!(period.label(), "2024-03");
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(Period::new(2024, 0).is_err());
        assert!(Period::new(2024, 13).is_err());
        assert!(Period::new(2024, 12).is_ok());
    }

    #[test]
    fn range_enumerates_inclusive_periods() {
        let range = PeriodRange::new(
            Period {
                year: 2023,
                month: 11,
            },
            Period {
                year: 2024,
                month: 2,
            },
        )
        .expect("valid range");
        let labels: Vec<String> = range.periods().iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn rejects_inverted_range() {
        let result = PeriodRange::new(
            Period {
                year: 2024,
                month: 5,
            },
            Period {
                year: 2024,
                month: 4,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn charge_amounts_round_trip_by_type() {
        let mut amounts = ChargeAmounts::default();
        for (index, charge) in ChargeType::ALL.into_iter().enumerate() {
            amounts.set(charge, (index + 1) as f64);
        }
        assert_eq!(amounts.get(ChargeType::Rent), 1.0);
        assert_eq!(amounts.get(ChargeType::Advance), 4.0);
        assert_eq!(amounts.total(), 10.0);
    }

    #[test]
    fn light_bill_is_reading_times_rate() {
        let schedule = ChargeSchedule {
            electricity_unit_rate: 8.0,
            last_unit_reading: 120.0,
            ..ChargeSchedule::default()
        };
        assert_eq!(schedule.light_bill(), 960.0);
    }

    #[test]
    fn tenant_without_property_is_inactive() {
        let tenant = Tenant {
            id: "t-1".to_string(),
            name: "Asha".to_string(),
            property_id: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            end_date: None,
            rent_status: SettlementStatus::Pending,
            maintenance_status: SettlementStatus::Pending,
            light_bill_status: SettlementStatus::Pending,
        };
        assert!(!tenant.is_active());
    }

    #[test]
    fn filter_validation_rejects_bad_month() {
        let filter = SummaryFilter {
            month: Some(13),
            ..SummaryFilter::default()
        };
        assert!(validate_input(&filter).is_err());
    }
}
