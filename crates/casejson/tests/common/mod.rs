//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Once;

use casejson::TaggedUnion;
use serde::{Deserialize, Serialize};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq, TaggedUnion)]
pub enum CustomerEvent {
    CustomerRegistered { company_name: String, number: String },
    CustomerDeleted(String),
}

/// Single case with two fields
#[derive(Debug, Clone, PartialEq, TaggedUnion)]
pub enum Registration {
    Registered(String, String),
}

/// Two single-field cases, only told apart by the discriminator
#[derive(Debug, Clone, PartialEq, TaggedUnion)]
pub enum Reading {
    Celsius(f64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, TaggedUnion)]
pub enum Lookup {
    Missing,
    Found(u32),
}

#[derive(Debug, Clone, PartialEq, TaggedUnion)]
pub enum Span {
    Unbounded,
    Range { start: i64, end: i64 },
}

#[derive(Debug, Clone, PartialEq, TaggedUnion)]
pub enum Wrapper {
    Wrapped(Address),
}

#[derive(Debug, Clone, PartialEq, TaggedUnion)]
pub enum Switch {
    On,
    Off,
}

#[derive(Debug, Clone, PartialEq, TaggedUnion)]
pub enum Lonely {
    Only,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
}
