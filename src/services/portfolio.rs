use tracing::debug;

use crate::{
    error::{LedgerError, LedgerResult},
    schemas::{
        sanitize_amount, validate_input, ChargeAmounts, ChargeType, Earnings, MonthlySummary,
        Payment, PaymentFilter, PendingRent, PendingRentDetail, Period, PeriodRange,
        PortfolioSummary, Property, SettlementStatus, Spends, SummaryFilter,
    },
    services::{ledger, reconcile, schedule},
};

/// Fold the filtered portfolio slice into the dashboard summary.
///
/// `year`/`month` select payments by the billing period they are attributed
/// to, never by the date they were paid. Every payment type counts toward
/// earnings, advances included; the upstream product has always reported
/// advance receipts as earnings and dashboards rely on those numbers.
pub fn aggregate(
    properties: &[Property],
    payments: &[Payment],
    filter: &SummaryFilter,
) -> LedgerResult<PortfolioSummary> {
    validate_input(filter)?;

    let considered: Vec<&Property> = properties
        .iter()
        .filter(|property| match &filter.property_id {
            Some(property_id) => &property.id == property_id,
            None => true,
        })
        .collect();

    let payment_filter = PaymentFilter {
        property_id: filter.property_id.clone(),
        tenant_id: None,
        year: filter.year,
        month: filter.month,
        charge_type: None,
    };
    let matched = ledger::payments_for(payments, &payment_filter);

    let mut by_type = ChargeAmounts::default();
    for charge in ChargeType::ALL {
        by_type.set(
            charge,
            round2(ledger::sum_by_type(matched.iter().copied(), charge)),
        );
    }
    let earnings = Earnings {
        total: round2(by_type.total()),
        by_type,
        count: matched.len() as i64,
    };

    let occupied: Vec<&Property> = considered
        .iter()
        .copied()
        .filter(|property| property.is_occupied())
        .collect();

    // A month filter scopes dues to one cycle, a bare year filter to twelve.
    // With no period filter the dashboard shows a single-cycle snapshot.
    let cycles = match (filter.year, filter.month) {
        (_, Some(_)) => 1.0,
        (Some(_), None) => 12.0,
        (None, None) => 1.0,
    };

    let maintenance_due: f64 = occupied
        .iter()
        .map(|property| sanitize_amount(property.schedule.monthly_maintenance))
        .sum();
    let maintenance_paid = ledger::sum_by_type(matched.iter().copied(), ChargeType::Maintenance);
    let spends = Spends {
        total: round2(maintenance_due * cycles),
        paid: round2(maintenance_paid),
        pending: round2((maintenance_due * cycles - maintenance_paid).max(0.0)),
    };

    let details: Vec<PendingRentDetail> = occupied
        .iter()
        .filter_map(|property| {
            let tenant = property.occupant()?;
            if tenant.rent_status != SettlementStatus::Pending {
                return None;
            }
            Some(PendingRentDetail {
                property_id: property.id.clone(),
                property_name: property.name.clone(),
                tenant_name: tenant.name.clone(),
                amount: sanitize_amount(property.schedule.monthly_rent),
            })
        })
        .collect();
    let pending_rent = PendingRent {
        total: round2(details.iter().map(|detail| detail.amount).sum()),
        count: details.len() as i64,
        details,
    };

    let net_amount = round2(earnings.total - spends.total);
    let profit_margin = if earnings.total > 0.0 {
        round_percent(net_amount / earnings.total * 100.0)
    } else {
        0.0
    };

    let occupancy_rate = if considered.is_empty() {
        0.0
    } else {
        round_percent(occupied.len() as f64 / considered.len() as f64 * 100.0)
    };

    let expected_rent: f64 = occupied
        .iter()
        .map(|property| sanitize_amount(property.schedule.monthly_rent))
        .sum();
    // An all-vacant or fully collected portfolio is 100% efficient, never
    // 0% or NaN.
    let collection_efficiency = if expected_rent > 0.0 {
        round_percent((expected_rent - pending_rent.total) / expected_rent * 100.0)
    } else {
        100.0
    };

    debug!(
        properties = considered.len(),
        occupied = occupied.len(),
        payments = matched.len(),
        "portfolio aggregated"
    );

    Ok(PortfolioSummary {
        earnings,
        spends,
        pending_rent,
        net_amount,
        profit_margin,
        occupancy_rate,
        collection_efficiency,
    })
}

/// Trailing per-month analytics series ending at `end`, oldest row first.
/// Months with no activity produce zero rows rather than gaps so the charts
/// stay dense.
pub fn monthly_series(
    properties: &[Property],
    payments: &[Payment],
    end: Period,
    months: u32,
) -> LedgerResult<Vec<MonthlySummary>> {
    if months == 0 {
        return Err(LedgerError::InvalidPeriod(
            "series length must be at least one month".to_string(),
        ));
    }

    let mut periods = Vec::with_capacity(months as usize);
    let mut cursor = end;
    for _ in 0..months {
        periods.push(cursor);
        cursor = cursor.prev();
    }
    periods.reverse();

    let mut series = Vec::with_capacity(periods.len());
    for period in periods {
        let matched = ledger::payments_for(
            payments,
            &PaymentFilter {
                year: Some(period.year),
                month: Some(period.month),
                ..PaymentFilter::default()
            },
        );
        let earnings: f64 = matched
            .iter()
            .map(|payment| sanitize_amount(payment.amount))
            .sum();

        let single = PeriodRange {
            from: period,
            to: period,
        };
        let mut maintenance_due = 0.0;
        let mut billed = 0_i64;
        let mut collected = 0_i64;
        for property in properties {
            let Some(tenant) = property.occupant() else {
                continue;
            };
            let resolved = schedule::resolve_schedule(property, Some(tenant), Some(&single))?;
            if !resolved.active_periods.contains(&period) {
                continue;
            }

            let due = resolved.due_for(period);
            maintenance_due += due.maintenance;
            billed += 1;

            let paid = ledger::payments_for(
                payments,
                &PaymentFilter {
                    property_id: Some(property.id.clone()),
                    tenant_id: Some(tenant.id.clone()),
                    year: Some(period.year),
                    month: Some(period.month),
                    charge_type: None,
                },
            );
            if reconcile::reconcile_period(&due, &paid).pending.rent == 0.0 {
                collected += 1;
            }
        }

        let collection_rate = if billed > 0 {
            round4(collected as f64 / billed as f64)
        } else {
            0.0
        };

        series.push(MonthlySummary {
            period,
            earnings: round2(earnings),
            maintenance_due: round2(maintenance_due),
            net: round2(earnings - maintenance_due),
            payment_count: matched.len() as i64,
            collection_rate,
        });
    }

    Ok(series)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10000.0).round() / 10000.0
}

fn round_percent(value: f64) -> f64 {
    value.round()
}
