//! Re-resolving client selections against live carrier data.
//!
//! Clients only ever send identity keys. The authoritative record is
//! always the one just fetched from the carrier, matched by exact key
//! equality. There is no nearest-time fallback.

use crate::domain::{Booking, BookingKind, TrainKey, TrainRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("no record matches the key")]
    NotFound,

    /// More than one record matches; the key is too loose to pick one
    #[error("{0} records match the key")]
    Ambiguous(usize),
}

/// Find the unique train whose identity key matches `key`.
///
/// `record` maps each native row to its canonical form.
pub fn find_train<'a, T>(
    trains: &'a [T],
    key: &TrainKey,
    record: impl Fn(&T) -> TrainRecord,
) -> Result<&'a T, MatchError> {
    unique(trains.iter().filter(|&t| key.matches(&record(t))))
}

/// Find the unique booking with confirmation number `pnr_no`.
///
/// `kind` only breaks ties: when a carrier lists a hold and a ticket
/// under the same number, the one of the requested kind wins. It never
/// hides a lone match of the other kind, so acting on the wrong kind is
/// reported rather than silently not found.
pub fn find_booking<'a, T>(
    items: &'a [T],
    pnr_no: &str,
    kind: Option<BookingKind>,
    booking: impl Fn(&T) -> Booking,
) -> Result<&'a T, MatchError> {
    let candidates: Vec<(&T, BookingKind)> = items
        .iter()
        .filter_map(|item| {
            let b = booking(item);
            b.has_pnr(pnr_no).then_some((item, b.kind))
        })
        .collect();

    match (candidates.len(), kind) {
        (0, _) => Err(MatchError::NotFound),
        (1, _) => Ok(candidates[0].0),
        (_, Some(kind)) => unique(
            candidates
                .iter()
                .filter(|(_, k)| *k == kind)
                .map(|(item, _)| *item),
        ),
        (n, None) => Err(MatchError::Ambiguous(n)),
    }
}

fn unique<'a, T>(mut matches: impl Iterator<Item = &'a T>) -> Result<&'a T, MatchError> {
    let first = matches.next().ok_or(MatchError::NotFound)?;
    match matches.count() {
        0 => Ok(first),
        rest => Err(MatchError::Ambiguous(rest + 1)),
    }
}
