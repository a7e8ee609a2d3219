pub mod publisher;

pub use publisher::AmqpEscalation;
