pub mod club;
pub mod event;
pub mod notification;
