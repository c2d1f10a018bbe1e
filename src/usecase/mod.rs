pub mod contracts;
pub mod error;
pub mod fcm;
pub mod notify;
