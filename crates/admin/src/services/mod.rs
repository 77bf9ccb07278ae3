//! Background services.

pub mod review_poll;
