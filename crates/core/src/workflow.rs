#![forbid(unsafe_code)]

use crate::model::{Item, ItemStatus, LastCount};

/// Minimum length (in characters) of a divergence description.
pub const MIN_DIVERGENCE_REASON_CHARS: usize = 15;

/// A confirmation coming out of the entry flow. Quantities are taken
/// verbatim: the stepper floors at 1 but typed free entry may be zero or
/// negative, and the confirmed quantity is never compared against the
/// expected balance (divergence detection is manual).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountEvent {
    ConfirmCount { qty: i64, location_validated: bool },
    ConfirmNotLocated,
    ConfirmDivergence { qty: i64, reason: String },
}

/// Accepted transition: the terminal status plus the values to record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountOutcome {
    pub status: ItemStatus,
    pub qty: i64,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionRejected {
    LocationNotValidated,
    ReasonTooShort { len: usize },
}

/// Pure transition function for the per-item counting state machine.
///
/// Every accepted event yields a terminal status; there is no event that
/// yields `Pending`, so once an item leaves `Pending` it can only move
/// between terminal states (re-edits). The current status therefore does
/// not gate any transition and is not an input.
pub fn apply(event: &CountEvent) -> Result<CountOutcome, TransitionRejected> {
    match event {
        CountEvent::ConfirmCount {
            qty,
            location_validated,
        } => {
            if !location_validated {
                return Err(TransitionRejected::LocationNotValidated);
            }
            Ok(CountOutcome {
                status: ItemStatus::Counted,
                qty: *qty,
                reason: None,
            })
        }
        CountEvent::ConfirmNotLocated => Ok(CountOutcome {
            status: ItemStatus::NotLocated,
            qty: 0,
            reason: None,
        }),
        CountEvent::ConfirmDivergence { qty, reason } => {
            let len = reason.chars().count();
            if len < MIN_DIVERGENCE_REASON_CHARS {
                return Err(TransitionRejected::ReasonTooShort { len });
            }
            Ok(CountOutcome {
                status: ItemStatus::DivergenceInfo,
                qty: *qty,
                reason: Some(reason.clone()),
            })
        }
    }
}

/// Writes an accepted outcome onto the item and overwrites the last-count
/// echo with the acting user and the caller's now token.
pub fn record(item: &mut Item, outcome: &CountOutcome, actor: &str, now_token: &str) {
    item.status = outcome.status;
    item.counted_qty = Some(outcome.qty);
    item.divergence_reason = outcome.reason.clone();
    item.last_count = Some(LastCount {
        user: actor.to_string(),
        date: now_token.to_string(),
        qty: outcome.qty,
    });
}

/// Quantity parsing for typed free entry: an optional sign followed by
/// leading digits, anything else (including an empty string) counts as 0.
pub fn parse_quantity(text: &str) -> i64 {
    let text = text.trim();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, text.strip_prefix('+').unwrap_or(text)),
    };
    let leading: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    match leading.parse::<i64>() {
        Ok(value) => sign * value,
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{BlockId, ItemId};

    fn pending_item() -> Item {
        Item {
            id: ItemId::compose(BlockId::new(1), 1),
            name: "FILTRO DE ÓLEO".to_string(),
            sku: "PSL 55".to_string(),
            brand: "TECFIL".to_string(),
            balance: 100,
            last_count: None,
            status: ItemStatus::Pending,
            counted_qty: None,
            divergence_reason: None,
        }
    }

    #[test]
    fn count_requires_validated_location() {
        let rejected = apply(&CountEvent::ConfirmCount {
            qty: 3,
            location_validated: false,
        });
        assert_eq!(rejected, Err(TransitionRejected::LocationNotValidated));

        let outcome = apply(&CountEvent::ConfirmCount {
            qty: 3,
            location_validated: true,
        })
        .expect("validated count");
        assert_eq!(outcome.status, ItemStatus::Counted);
        assert_eq!(outcome.qty, 3);
    }

    #[test]
    fn not_located_forces_zero_quantity() {
        let outcome = apply(&CountEvent::ConfirmNotLocated).expect("not located");
        assert_eq!(outcome.status, ItemStatus::NotLocated);
        assert_eq!(outcome.qty, 0);
        assert_eq!(outcome.reason, None);
    }

    #[test]
    fn divergence_reason_boundary_is_fifteen_chars() {
        let short = apply(&CountEvent::ConfirmDivergence {
            qty: 2,
            reason: "A".repeat(14),
        });
        assert_eq!(short, Err(TransitionRejected::ReasonTooShort { len: 14 }));

        let ok = apply(&CountEvent::ConfirmDivergence {
            qty: 2,
            reason: "A".repeat(15),
        })
        .expect("long enough reason");
        assert_eq!(ok.status, ItemStatus::DivergenceInfo);
        assert_eq!(ok.reason.as_deref(), Some("A".repeat(15).as_str()));
    }

    #[test]
    fn record_overwrites_last_count_echo() {
        let mut item = pending_item();
        let outcome = apply(&CountEvent::ConfirmCount {
            qty: 98,
            location_validated: true,
        })
        .expect("count");
        record(&mut item, &outcome, "Carlos Silva", "Agora");

        assert_eq!(item.status, ItemStatus::Counted);
        assert_eq!(item.counted_qty, Some(98));
        let last = item.last_count.expect("echo written");
        assert_eq!(last.user, "Carlos Silva");
        assert_eq!(last.date, "Agora");
        assert_eq!(last.qty, 98);
    }

    #[test]
    fn re_edit_moves_between_terminal_states_only() {
        let mut item = pending_item();
        let counted = apply(&CountEvent::ConfirmCount {
            qty: 5,
            location_validated: true,
        })
        .expect("count");
        record(&mut item, &counted, "Mariana Santos", "Agora");
        assert!(item.status.is_terminal());

        let re_edited = apply(&CountEvent::ConfirmNotLocated).expect("re-edit");
        record(&mut item, &re_edited, "Mariana Santos", "Agora");
        assert_eq!(item.status, ItemStatus::NotLocated);
        assert_eq!(item.counted_qty, Some(0));
        assert!(item.status.is_terminal());
    }

    #[test]
    fn free_entry_quantities_parse_with_zero_fallback() {
        assert_eq!(parse_quantity("12"), 12);
        assert_eq!(parse_quantity("  7 "), 7);
        assert_eq!(parse_quantity("-3"), -3);
        assert_eq!(parse_quantity("12abc"), 12);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity(""), 0);
    }
}
