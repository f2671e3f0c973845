use tracing::debug;

use crate::{
    error::LedgerResult,
    schemas::{
        ChargeAmounts, ChargeType, OutstandingEntry, Payment, PaymentFilter, PeriodRange, Property,
    },
    services::{ledger, schedule},
};

/// Due vs. paid breakdown for one (property, period) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodReconciliation {
    pub paid: ChargeAmounts,
    pub pending: ChargeAmounts,
    /// Sum of pending across all charge types. Zero means fully settled.
    pub total_pending: f64,
}

impl PeriodReconciliation {
    pub fn is_settled(&self) -> bool {
        self.total_pending == 0.0
    }
}

/// Net one period's dues against the payments attributed to it.
///
/// Pending is floored at zero per charge type: an overpayment is absorbed
/// silently and does not carry forward, because each period is reconciled
/// independently. That is a documented limitation of the billing model, not
/// something to correct here.
pub fn reconcile_period(due: &ChargeAmounts, payments: &[&Payment]) -> PeriodReconciliation {
    let mut paid = ChargeAmounts::default();
    let mut pending = ChargeAmounts::default();

    for charge in ChargeType::ALL {
        let collected = ledger::sum_by_type(payments.iter().copied(), charge);
        paid.set(charge, collected);
        pending.set(charge, (due.get(charge) - collected).max(0.0));
    }

    PeriodReconciliation {
        total_pending: pending.total(),
        paid,
        pending,
    }
}

/// The outstanding-payments table: one row per (property, period) with any
/// charge still pending inside `range`. Fully settled periods are omitted.
pub fn outstanding_entries(
    properties: &[Property],
    payments: &[Payment],
    range: &PeriodRange,
) -> LedgerResult<Vec<OutstandingEntry>> {
    let mut entries = Vec::new();

    for property in properties {
        let Some(tenant) = property.occupant() else {
            continue;
        };
        let resolved = schedule::resolve_schedule(property, Some(tenant), Some(range))?;

        for period in &resolved.active_periods {
            let filter = PaymentFilter {
                property_id: Some(property.id.clone()),
                tenant_id: Some(tenant.id.clone()),
                year: Some(period.year),
                month: Some(period.month),
                charge_type: None,
            };
            let matched = ledger::payments_for(payments, &filter);
            let reconciled = reconcile_period(&resolved.due_for(*period), &matched);
            if reconciled.is_settled() {
                continue;
            }

            entries.push(OutstandingEntry {
                property_id: property.id.clone(),
                property_name: property.name.clone(),
                tenant_name: tenant.name.clone(),
                period: *period,
                rent_pending: reconciled.pending.rent,
                maintenance_pending: reconciled.pending.maintenance,
                light_pending: reconciled.pending.light,
                advance_pending: reconciled.pending.advance,
                total_outstanding: reconciled.total_pending,
            });
        }
    }

    debug!(
        properties = properties.len(),
        rows = entries.len(),
        from = %range.from.label(),
        to = %range.to.label(),
        "computed outstanding entries"
    );

    Ok(entries)
}
