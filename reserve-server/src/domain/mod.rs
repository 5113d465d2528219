//! Domain types for the reservation service.
//!
//! Everything the carriers return is mapped into these carrier-neutral
//! types at the adapter boundary. Request input is validated into them
//! once, so code that receives these types can trust their validity.

mod booking;
mod criteria;
mod error;
mod time;
mod train;
mod train_type;

pub use booking::{Booking, BookingKind, CardDetails};
pub use criteria::{MAX_PASSENGERS, PassengerCategory, Passengers, SearchCriteria};
pub use error::DomainError;
pub use time::{DepartureTime, TravelDate, display_hhmm, display_month_day};
pub use train::{SeatAvailability, TrainKey, TrainRecord};
pub use train_type::{SeatClass, TrainType};
