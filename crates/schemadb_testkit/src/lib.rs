//! # SchemaDB Testkit
//!
//! Test fixtures and store helpers for SchemaDB.
//!
//! Provides a small automation-platform domain (projects, environments,
//! inventories, repositories, templates, schedules) with hand-written
//! [`schemadb_core::Record`] implementations, exercising every
//! descriptor feature: global and scoped kinds, integer and string
//! primary keys, system-assigned inverted-sequence keys, optional
//! reference fields, and embedded structures.
//!
//! The end-to-end scenario tests for the mapping layer live in this
//! crate's `tests/` directory and run against these fixtures.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fixtures;

pub use fixtures::{
    platform_referrers, platform_store, AccessToken, Environment, Event, Inventory, Project,
    Repository, RepositoryAuth, Schedule, Template, ACCESS_TOKEN, ENVIRONMENT, EVENT, INVENTORY,
    PROJECT, REPOSITORY, SCHEDULE, TEMPLATE,
};
