//! TUI (Terminal User Interface) モジュール
//!
//! ratatui を使用した 4 段階選択フォーム

pub mod form;
pub mod terminal;

pub use form::run;
