//! Component extraction from NiFi flow status.
//!
//! A process-group status response is a deeply nested JSON document. This
//! crate walks it and produces either a flat, filtered listing of the
//! components it contains or an ownership tree that can be drawn with
//! box-drawing characters.
//!
//! ```ignore
//! use flowscope_core::{Flow, HttpClient, KindSet};
//!
//! let flow = Flow::connect(HttpClient::new("https://nifi:8443").with_token(token)).await?;
//! let status = flow.status("root", true).await?;
//! let processors = status.flatten(&flow.traversal().with_kinds(KindSet::PROCESSOR))?;
//! print!("{}", status.tree(&flow.traversal())?);
//! ```

pub mod client;
pub mod component;
pub mod config;
pub mod traversal;
pub mod tree;

pub use client::{
    flatten_all, tree_all, ApiError, Flow, HttpClient, NifiApi, RootGroup, RunState, StatusDocument,
};
pub use component::{Component, ComponentKind, KindSet};
pub use config::{Config, ConfigError, ServerConfig, TraversalConfig};
pub use traversal::{flatten, unwrap_snapshot, ComponentFilter, Traversal, TraversalError};
pub use tree::{build_tree, render, NodeKey, OwnershipTree, TreeNode};
