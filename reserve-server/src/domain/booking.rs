//! Canonical reservation records.

use std::fmt;

use super::TrainType;
use super::time::{display_hhmm, display_month_day};

/// Whether a booking has been paid for.
///
/// Only paid tickets are refundable; unpaid holds are cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingKind {
    /// Seats held but not yet paid
    Hold,
    /// Paid and issued
    Ticket,
}

/// A booked item owned by the remote carrier.
///
/// This is a snapshot of the carrier's list at the time it was fetched;
/// every operation that acts on a booking fetches the list again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub train_type: TrainType,
    /// Carrier confirmation number (SRT reservation number, KTX `rsv_id`
    /// for holds or `pnr_no` for tickets)
    pub pnr_no: String,
    pub kind: BookingKind,
    pub train_name: String,
    pub train_number: String,
    pub dep_station_name: String,
    pub arr_station_name: String,
    /// `YYYYMMDD`
    pub dep_date: String,
    /// `HHMMSS`
    pub dep_time: String,
    /// `HHMMSS`
    pub arr_time: String,
    pub seat_count: u32,
    /// Total price in won
    pub total_cost: u32,
    /// Payment deadline as (`YYYYMMDD`, `HHMMSS`), unpaid holds only
    pub payment_deadline: Option<(String, String)>,
}

impl Booking {
    pub fn is_ticket(&self) -> bool {
        self.kind == BookingKind::Ticket
    }

    /// Exact confirmation-number comparison.
    pub fn has_pnr(&self, pnr_no: &str) -> bool {
        self.pnr_no == pnr_no
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}] {}, {}~{}({}~{}) {}석, {}원",
            self.train_name,
            self.train_number,
            display_month_day(&self.dep_date),
            self.dep_station_name,
            self.arr_station_name,
            display_hhmm(&self.dep_time),
            display_hhmm(&self.arr_time),
            self.seat_count,
            group_thousands(self.total_cost),
        )?;
        match (&self.kind, &self.payment_deadline) {
            (BookingKind::Ticket, _) => write!(f, " (결제완료)"),
            (BookingKind::Hold, Some((date, time))) => write!(
                f,
                ", 구입기한 {} {}",
                display_month_day(date),
                display_hhmm(time)
            ),
            (BookingKind::Hold, None) => write!(f, " (미결제)"),
        }
    }
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Card details for settling a held reservation.
///
/// Never logged: `Debug` redacts the number and password.
#[derive(Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    /// First two digits of the card password
    pub password: String,
    /// Birth date (`YYMMDD`) or business registration number
    pub validation_number: String,
    /// `YYMM`
    pub expire_date: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tail: String = self
            .number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        f.debug_struct("CardDetails")
            .field("number", &format_args!("****{tail}"))
            .field("password", &"**")
            .field("expire_date", &self.expire_date)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::booking;
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(103800), "103,800");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn hold_summary_shows_deadline() {
        let b = booking(TrainType::Srt, "R1", BookingKind::Hold);
        assert_eq!(
            b.to_string(),
            "[SRT 123] 03월 01일, 수서~부산(09:00~11:30) 2석, 103,800원, 구입기한 02월 28일 23:59"
        );
        assert!(!b.is_ticket());
    }

    #[test]
    fn ticket_summary_marks_paid() {
        let b = booking(TrainType::Ktx, "P1", BookingKind::Ticket);
        assert!(b.to_string().ends_with("(결제완료)"));
        assert!(b.is_ticket());
        assert!(b.has_pnr("P1"));
        assert!(!b.has_pnr("p1"));
    }

    #[test]
    fn card_debug_is_redacted() {
        let card = CardDetails {
            number: "1234567812345678".into(),
            password: "12".into(),
            validation_number: "900101".into(),
            expire_date: "2912".into(),
        };
        let debug = format!("{card:?}");
        assert!(debug.contains("****5678"));
        assert!(!debug.contains("12345678"));
        assert!(!debug.contains("900101"));
    }
}
