//! Comptree - component dependency tree extractor for Angular-style projects
//!
//! Comptree is a CLI tool and library that scans `*.component.ts` declaration
//! files and `*.component.html` markup files, works out which component renders
//! which, and writes the resulting tree as a JSON document.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (metadata scan, usage scan, tree assembly)
//! - `issues`: Issue type definitions and reporting

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
