//! argoeks: developer CLI for ArgoEKS workflows
//!
//! Translates `env` and `docs` verbs into `make` targets, a freshness-check
//! script and a pager, with dry-run and verbose echoing.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
