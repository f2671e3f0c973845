use crate::schemas::{sanitize_amount, ChargeType, Payment, PaymentFilter};

/// Pure conjunctive filter over the in-memory payment collection. Input
/// order is preserved; callers wanting a presentation sort layer it on top.
pub fn payments_for<'a>(payments: &'a [Payment], filter: &PaymentFilter) -> Vec<&'a Payment> {
    payments
        .iter()
        .filter(|payment| matches_filter(payment, filter))
        .collect()
}

/// The payment-history view: the filtered collection sorted by payment date
/// descending, ties keeping input order.
pub fn payment_history<'a>(payments: &'a [Payment], filter: &PaymentFilter) -> Vec<&'a Payment> {
    let mut history = payments_for(payments, filter);
    history.sort_by(|left, right| right.paid_on.cmp(&left.paid_on));
    history
}

/// Sum of amounts for one charge type. Non-finite amounts count as zero so
/// a malformed record cannot poison a whole total.
pub fn sum_by_type<'a>(
    payments: impl IntoIterator<Item = &'a Payment>,
    charge: ChargeType,
) -> f64 {
    payments
        .into_iter()
        .filter(|payment| payment.charge_type == charge)
        .map(|payment| sanitize_amount(payment.amount))
        .sum()
}

fn matches_filter(payment: &Payment, filter: &PaymentFilter) -> bool {
    if let Some(property_id) = &filter.property_id {
        if &payment.property_id != property_id {
            return false;
        }
    }
    if let Some(tenant_id) = &filter.tenant_id {
        if &payment.tenant_id != tenant_id {
            return false;
        }
    }
    if let Some(year) = filter.year {
        if payment.year != year {
            return false;
        }
    }
    if let Some(month) = filter.month {
        if payment.month != month {
            return false;
        }
    }
    if let Some(charge) = filter.charge_type {
        if payment.charge_type != charge {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn test_payment(
        property_id: &str,
        charge: ChargeType,
        amount: f64,
        year: i32,
        month: u32,
        paid_on: NaiveDate,
    ) -> Payment {
        Payment {
            property_id: property_id.to_string(),
            tenant_id: "t-1".to_string(),
            charge_type: charge,
            amount,
            year,
            month,
            paid_on,
        }
    }

    #[test]
    fn filters_are_conjunctive() {
        let payments = vec![
            test_payment("p-1", ChargeType::Rent, 5000.0, 2024, 1, date(2024, 1, 5)),
            test_payment("p-1", ChargeType::Rent, 5000.0, 2024, 2, date(2024, 2, 5)),
            test_payment("p-2", ChargeType::Rent, 7000.0, 2024, 1, date(2024, 1, 6)),
            test_payment(
                "p-1",
                ChargeType::Maintenance,
                500.0,
                2024,
                1,
                date(2024, 1, 5),
            ),
        ];

        let filter = PaymentFilter {
            property_id: Some("p-1".to_string()),
            year: Some(2024),
            month: Some(1),
            ..PaymentFilter::default()
        };
        let matched = payments_for(&payments, &filter);
        assert_eq!(matched.len(), 2);
        assert!(matched
            .iter()
            .all(|payment| payment.property_id == "p-1" && payment.month == 1));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let payments = vec![
            test_payment("p-1", ChargeType::Rent, 5000.0, 2024, 1, date(2024, 1, 5)),
            test_payment("p-2", ChargeType::Light, 800.0, 2024, 3, date(2024, 3, 2)),
        ];
        let matched = payments_for(&payments, &PaymentFilter::default());
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn sum_by_type_ignores_other_types() {
        let payments = vec![
            test_payment("p-1", ChargeType::Rent, 4000.0, 2024, 1, date(2024, 1, 5)),
            test_payment("p-1", ChargeType::Rent, 2000.0, 2024, 1, date(2024, 1, 20)),
            test_payment(
                "p-1",
                ChargeType::Maintenance,
                500.0,
                2024,
                1,
                date(2024, 1, 5),
            ),
        ];
        assert_eq!(sum_by_type(&payments, ChargeType::Rent), 6000.0);
        assert_eq!(sum_by_type(&payments, ChargeType::Advance), 0.0);
    }

    #[test]
    fn sum_by_type_treats_non_finite_amounts_as_zero() {
        let payments = vec![
            test_payment("p-1", ChargeType::Rent, f64::NAN, 2024, 1, date(2024, 1, 5)),
            test_payment("p-1", ChargeType::Rent, 3000.0, 2024, 1, date(2024, 1, 9)),
        ];
        assert_eq!(sum_by_type(&payments, ChargeType::Rent), 3000.0);
    }

    #[test]
    fn history_sorts_by_paid_on_descending() {
        let payments = vec![
            test_payment("p-1", ChargeType::Rent, 1.0, 2024, 1, date(2024, 1, 5)),
            test_payment("p-1", ChargeType::Rent, 2.0, 2024, 1, date(2024, 1, 20)),
            test_payment("p-1", ChargeType::Rent, 3.0, 2024, 1, date(2024, 1, 12)),
        ];
        let history = payment_history(&payments, &PaymentFilter::default());
        let amounts: Vec<f64> = history.iter().map(|payment| payment.amount).collect();
        assert_eq!(amounts, vec![2.0, 3.0, 1.0]);
    }
}
