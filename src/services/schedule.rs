use tracing::debug;

use crate::{
    error::{LedgerError, LedgerResult},
    schemas::{sanitize_amount, ChargeAmounts, Period, PeriodRange, Property, Tenant},
};

/// Expected charges for one property+tenant pair: the billing cycles the
/// tenant is liable for and the amounts due in each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSchedule {
    pub active_periods: Vec<Period>,
    /// Amounts billed every cycle. `advance` here is always zero; the
    /// advance is a one-off tracked separately.
    pub recurring: ChargeAmounts,
    /// One-time advance, due in the tenancy's first billed cycle only.
    pub advance_due: f64,
    /// The tenancy's first billed cycle, independent of any requested range.
    pub tenancy_start: Option<Period>,
}

impl ResolvedSchedule {
    /// Amounts due in one cycle. The advance is included only for the
    /// tenancy's first billed cycle and is zero everywhere else.
    pub fn due_for(&self, period: Period) -> ChargeAmounts {
        let mut due = self.recurring;
        if self.tenancy_start == Some(period) {
            due.advance = self.advance_due;
        }
        due
    }
}

/// Derive the billed cycles and per-cycle dues for a property+tenant pair.
///
/// A cycle is billed when the occupancy start is on or before the cycle's
/// first day and the occupancy end (if any) is not before it. An inactive or
/// absent tenant yields an empty schedule. An open-ended tenancy requires an
/// explicit `range`; without one the enumeration would never terminate, so
/// the call fails instead of guessing a bound.
pub fn resolve_schedule(
    property: &Property,
    tenant: Option<&Tenant>,
    range: Option<&PeriodRange>,
) -> LedgerResult<ResolvedSchedule> {
    let Some(tenant) = tenant.filter(|tenant| tenant.is_active()) else {
        return Ok(ResolvedSchedule::default());
    };

    let tenancy_start = first_billed_period(tenant);

    let tenancy_end = tenant.end_date.map(Period::from_date);
    let last = match (tenancy_end, range) {
        (Some(end), Some(range)) => end.min(range.to),
        (Some(end), None) => end,
        (None, Some(range)) => range.to,
        (None, None) => {
            return Err(LedgerError::UnboundedSchedule(format!(
                "tenant {} has no end date; supply a period range",
                tenant.id
            )));
        }
    };

    let first = match range {
        Some(range) => tenancy_start.max(range.from),
        None => tenancy_start,
    };

    let active_periods = if first <= last {
        PeriodRange { from: first, to: last }.periods()
    } else {
        Vec::new()
    };

    let schedule = &property.schedule;
    let recurring = ChargeAmounts {
        rent: sanitize_amount(schedule.monthly_rent),
        maintenance: sanitize_amount(schedule.monthly_maintenance),
        light: schedule.light_bill(),
        advance: 0.0,
    };

    debug!(
        property_id = %property.id,
        tenant_id = %tenant.id,
        periods = active_periods.len(),
        "resolved charge schedule"
    );

    Ok(ResolvedSchedule {
        active_periods,
        recurring,
        advance_due: schedule.advance_amount.map(sanitize_amount).unwrap_or(0.0),
        tenancy_start: Some(tenancy_start),
    })
}

/// First cycle whose opening day falls inside the occupancy window. A
/// mid-month move-in starts billing with the following cycle.
fn first_billed_period(tenant: &Tenant) -> Period {
    let candidate = Period::from_date(tenant.start_date);
    if candidate.first_day() >= tenant.start_date {
        candidate
    } else {
        candidate.next()
    }
}
