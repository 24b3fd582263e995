//! 数据层 - 角色快照存储
//!
//! # 模块结构
//!
//! - [`RoleStore`] - 进程内角色存储
//! - [`StoreError`] - 存储层错误

pub mod role_store;

pub use role_store::{RoleStore, StoreError, StoreResult};
