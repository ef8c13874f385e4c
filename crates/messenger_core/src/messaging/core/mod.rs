//! Stateful building blocks shared by the services.

pub mod registry;
