pub mod children;
pub mod donations;
pub mod events;
pub mod parents;
pub mod payments;
pub mod videos;
