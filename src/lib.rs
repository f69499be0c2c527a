pub mod bootstrap;
pub mod configs;
pub mod dispatcher;
pub mod error;
pub mod fixture;
pub mod gate;
pub mod interface;
pub mod jobs;
pub mod message;
pub mod rdkafka_impl;

#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate log;
