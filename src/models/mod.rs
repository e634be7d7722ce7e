pub mod child;
pub mod donation;
pub mod event;
pub mod parent;
pub mod payment;
pub mod video;
