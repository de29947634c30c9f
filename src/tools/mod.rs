// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tool handlers and the registry agents dispatch through.

pub mod registry;
pub mod search;

pub use registry::{DispatchResult, ToolHandler, ToolRegistry, ToolRegistryBuilder};
pub use search::GoogleSearchHandler;
