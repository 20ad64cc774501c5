// src/application/ports/mod.rs
pub mod events;
pub mod time;
pub mod validation;

pub type ClockPort = dyn time::Clock;
pub type EventBusPort = dyn events::EventBus;
pub type PropertyValidatorPort = dyn validation::PropertyValidator;
