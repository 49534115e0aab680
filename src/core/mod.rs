pub mod adjustment;
pub mod currency;
pub mod index;
