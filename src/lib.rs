//! Client-side workflow for building LLM prompt indexes over the databases of
//! a BI application, and for turning natural-language questions into SQL.
//!
//! All of the heavy lifting (LLM prompting, vector storage, SQL generation)
//! happens server-side; this crate orchestrates the REST calls in order and
//! tracks the state of each run.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
