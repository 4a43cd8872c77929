//! ezstart core
//!
//! Azure のサブスクリプション → リソースグループ → リソース種別 → リソース名を
//! 段階的に選択し、GitHub Actions の workflow dispatch を起動するための
//! 中核ロジックを提供します。
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            ezstart (CLI / TUI form)          │
//! └──────────────────┬───────────────────────────┘
//!                    │ Event
//! ┌──────────────────▼───────────────────────────┐
//! │                 ezstart-core                 │
//! │  ┌────────────────┐    ┌──────────────────┐  │
//! │  │   Selection    │───▶│     Session      │  │
//! │  │ (pure reducer) │    │ (effect runtime) │  │
//! │  └────────────────┘    └────────┬─────────┘  │
//! │   trait CloudInventory / trait AutomationClient
//! └───────┬─────────────────────────┬────────────┘
//!         │                         │
//! ┌───────▼───────┐         ┌───────▼───────┐
//! │ ezstart-azure │         │ezstart-github │
//! └───────────────┘         └───────────────┘
//! ```

pub mod adapter;
pub mod error;
pub mod model;
pub mod selection;
pub mod session;
pub mod submit;

// Re-exports
pub use adapter::{AutomationClient, CloudInventory};
pub use error::{CoreError, Result};
pub use model::{
    IdentifiedName, Resource, ResourceKind, filter_resource_names, get_subscription_id_by_name,
    get_subscription_names, resource_type_for_label,
};
pub use selection::{Effect, Event, Phase, RequestId, SUBMITTED_BANNER, Selection};
pub use session::Session;
pub use submit::{SubmitRequest, SubmitSettings, SubmitTask, Submission, TaskStatus};
