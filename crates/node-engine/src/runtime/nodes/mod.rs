//! Node behaviors, one module per category
//!
//! Each module adds `exec_*` (exec-pin arm) and/or `eval_*` (data-pin arm)
//! methods to the runtime for the kinds in its category.

mod action;
mod api;
mod data;
mod event;
mod function;
mod hardware;
mod logic;
mod storage;
