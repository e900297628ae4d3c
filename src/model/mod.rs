/// Destinations and the immutable route list.
pub mod destination;
