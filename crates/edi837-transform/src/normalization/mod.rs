//! Element-level normalization: dates, addresses, people, amounts and text.

pub mod address;
pub mod date;
pub mod numeric;
pub mod person;
pub mod text;

pub use address::{ParsedAddress, PostalAddress, parse_address};
pub use date::{DateFormat, convert_date, format_date, parse_date};
pub use numeric::{format_amount, format_phone, format_quantity, format_zip};
pub use person::{Gender, PersonName, derive_gender, split_name};
pub use text::{Clamp, truncate};
