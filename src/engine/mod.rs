pub mod lifecycle;
pub mod tracking_number;
