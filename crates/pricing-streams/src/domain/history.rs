//! Price history projection.
//!
//! The enrollment event is modeled as a chain-level baseline rather than a
//! price at any particular shop, so its entry carries no shop id. Every
//! later entry is a per-shop revision. Entries stay in log order.

use chrono::NaiveDate;
use pricing_core::clock::calendar_date;
use pricing_core::error::DomainError;
use pricing_core::projection::{Projection, replay};
use pricing_core::stream::StreamPosition;
use rust_decimal::Decimal;
use serde::Serialize;

use super::events::{PricingEvent, PricingEventKind};

/// A materialized point in a product's price history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceEntry {
    /// Calendar date (UTC) on which the price took effect.
    pub date: NaiveDate,
    /// The price.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub value: Decimal,
    /// Shop that set the price; `None` for the chain baseline.
    pub shop_id: Option<i64>,
}

/// Price history of one product within one shop chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceHistory {
    /// Chain named by the enrollment event, once seen.
    pub shop_chain_id: Option<i64>,
    /// Price entries in log order.
    pub prices: Vec<PriceEntry>,
    /// Number of events folded.
    pub version: u64,
}

impl PriceHistory {
    fn malformed(&self, event: &PricingEvent, reason: &str) -> DomainError {
        DomainError::MalformedEvent {
            stream_key: event.metadata.stream_key.to_string(),
            position: event
                .metadata
                .position
                .map_or(self.version, StreamPosition::value),
            reason: reason.to_owned(),
        }
    }
}

impl Projection for PriceHistory {
    type Event = PricingEvent;

    fn apply(&mut self, event: &PricingEvent) -> Result<(), DomainError> {
        let date = calendar_date(event.metadata.occurred_at);
        match &event.kind {
            PricingEventKind::ProductAddedToShop(added) => {
                if self.shop_chain_id.is_some() {
                    return Err(self.malformed(event, "stream is enrolled more than once"));
                }
                self.shop_chain_id = Some(added.shop_chain_id);
                self.prices.push(PriceEntry {
                    date,
                    value: added.initial_price,
                    shop_id: None,
                });
            }
            PricingEventKind::ProductPriceChanged(changed) => {
                if self.shop_chain_id.is_none() {
                    return Err(self.malformed(event, "price change precedes enrollment"));
                }
                self.prices.push(PriceEntry {
                    date,
                    value: changed.new_price,
                    shop_id: Some(changed.shop_id),
                });
            }
        }
        self.version += 1;
        Ok(())
    }
}

/// Folds a complete stream, oldest event first, into its price history.
///
/// # Errors
///
/// Returns `DomainError::MalformedEvent` if the stream does not start with
/// exactly one enrollment.
pub fn fold(events: &[PricingEvent]) -> Result<PriceHistory, DomainError> {
    replay(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{ProductAddedToShop, ProductPriceChanged};
    use chrono::{DateTime, TimeZone, Utc};
    use pricing_core::event::EventMetadata;
    use pricing_core::stream::StreamKey;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, 10, 0, 0).unwrap()
    }

    fn event(occurred_at: DateTime<Utc>, kind: PricingEventKind) -> PricingEvent {
        PricingEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: String::new(),
                stream_key: StreamKey::new("7-3"),
                correlation_id: Uuid::new_v4(),
                occurred_at,
                position: None,
            },
            kind,
        }
    }

    fn enrolled(day: u32, price: Decimal) -> PricingEvent {
        event(
            at(day),
            PricingEventKind::ProductAddedToShop(ProductAddedToShop {
                shop_chain_id: 3,
                initial_price: price,
            }),
        )
    }

    fn changed(day: u32, shop_id: i64, price: Decimal) -> PricingEvent {
        event(
            at(day),
            PricingEventKind::ProductPriceChanged(ProductPriceChanged {
                shop_id,
                new_price: price,
            }),
        )
    }

    #[test]
    fn test_enrollment_seeds_baseline_entry() {
        let history = fold(&[enrolled(15, dec!(9.99))]).unwrap();

        assert_eq!(history.shop_chain_id, Some(3));
        assert_eq!(history.version, 1);
        assert_eq!(
            history.prices,
            vec![PriceEntry {
                date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
                value: dec!(9.99),
                shop_id: None,
            }]
        );
    }

    #[test]
    fn test_price_changes_append_in_log_order() {
        // Dates deliberately out of order: the log decides, not the clock.
        let events = [
            enrolled(15, dec!(9.99)),
            changed(20, 1, dec!(8.49)),
            changed(17, 2, dec!(8.99)),
        ];

        let history = fold(&events).unwrap();

        let values: Vec<Decimal> = history.prices.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(9.99), dec!(8.49), dec!(8.99)]);
        assert_eq!(history.prices[1].shop_id, Some(1));
        assert_eq!(history.prices[2].shop_id, Some(2));
        assert_eq!(
            history.prices[2].date,
            NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()
        );
        assert_eq!(history.version, 3);
    }

    #[test]
    fn test_n_changes_yield_n_plus_one_entries() {
        for n in 0..8u32 {
            let mut events = vec![enrolled(1, dec!(10))];
            events.extend((0..n).map(|i| changed(2 + i, 1, Decimal::from(i))));

            let history = fold(&events).unwrap();

            assert_eq!(history.prices.len(), n as usize + 1);
        }
    }

    #[test]
    fn test_fold_is_repeatable() {
        let events = [enrolled(15, dec!(9.99)), changed(16, 1, dec!(8.49))];

        assert_eq!(fold(&events).unwrap(), fold(&events).unwrap());
    }

    #[test]
    fn test_price_change_before_enrollment_is_malformed() {
        let result = fold(&[changed(15, 1, dec!(8.49))]);

        match result {
            Err(DomainError::MalformedEvent {
                position, reason, ..
            }) => {
                assert_eq!(position, 0);
                assert!(reason.contains("precedes enrollment"));
            }
            other => panic!("expected MalformedEvent, got {other:?}"),
        }
    }

    #[test]
    fn test_second_enrollment_is_malformed() {
        let result = fold(&[enrolled(15, dec!(9.99)), enrolled(16, dec!(7.99))]);

        match result {
            Err(DomainError::MalformedEvent { position, .. }) => assert_eq!(position, 1),
            other => panic!("expected MalformedEvent, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_event_reports_its_log_position() {
        let mut first = enrolled(15, dec!(9.99));
        first.metadata.position = Some(StreamPosition::new(12));
        let mut second = enrolled(16, dec!(7.99));
        second.metadata.position = Some(StreamPosition::new(13));

        let result = fold(&[first, second]);

        match result {
            Err(DomainError::MalformedEvent { position, .. }) => assert_eq!(position, 13),
            other => panic!("expected MalformedEvent, got {other:?}"),
        }
    }

    #[test]
    fn test_entry_serializes_price_as_number() {
        let entry = PriceEntry {
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            value: dec!(9.99),
            shop_id: None,
        };

        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"date":"2026-01-15","value":9.99,"shop_id":null}"#
        );
    }
}
