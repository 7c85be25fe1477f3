#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Shared test helpers for the Vantage action suites.
//! Layout: mocks.rs (recording capability fakes), fixtures.rs (descriptor,
//! snapshot and reply builders plus an assembled context).

pub mod fixtures;
pub mod mocks;
