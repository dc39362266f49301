mod log_details;
mod ticket_details;

pub use log_details::*;
pub use ticket_details::*;
