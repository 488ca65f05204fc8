//! Workflow-engine abstraction seam.

pub mod client;

pub use client::{
    verify_interface, EngineClient, EngineOperation, ListExecutionsFilter, ListWorkflowsFilter,
};
