//! Azure provider for ezstart
//!
//! This crate implements the `CloudInventory` trait on top of the Azure
//! Resource Manager REST API, plus the credentials used to authorize it.
//!
//! # Features
//!
//! - Subscription, resource group and resource listing (paged via `nextLink`)
//! - Interactive browser sign-in (authorization code + PKCE)
//! - Device code sign-in for headless terminals
//! - Azure CLI and static token credentials
//!
//! # Example
//!
//! ```ignore
//! use ezstart_azure::{AzureInventory, BrowserCredential};
//! use ezstart_core::CloudInventory;
//! use std::sync::Arc;
//!
//! let credential = BrowserCredential::new("client-id", "tenant-id", "http://localhost:3000")?;
//! let inventory = AzureInventory::new(Arc::new(credential))?;
//!
//! for sub in inventory.list_subscriptions().await? {
//!     println!("{:?} {:?}", sub.id, sub.name);
//! }
//! ```

pub mod browser;
pub mod client;
pub mod credential;
pub mod device_code;
pub mod error;
pub mod inventory;
pub mod types;

pub use browser::BrowserCredential;
pub use client::ArmClient;
pub use credential::{
    ARM_SCOPE, AccessToken, AzureCliCredential, StaticTokenCredential, TokenCredential,
};
pub use device_code::{DeviceCodeCredential, DeviceCodeInfo};
pub use error::{AzureError, Result};
pub use inventory::AzureInventory;
