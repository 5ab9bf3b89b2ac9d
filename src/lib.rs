//! ccimport: cost-center chart importer.
//!
//! Turns a flat CSV chart (id, name, parent reference, group flag) into a
//! validated forest and replaces a company's tree in the persistent store.
//! Layered like its architecture: `domain` holds the validation and tree
//! logic, `application` the orchestration services, `infrastructure` the
//! store/decoder seams and wiring, `cli` the user surface.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
