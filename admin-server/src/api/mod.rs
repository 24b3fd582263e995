//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`role`] - 角色管理、组织架构接口
//! - [`permission`] - 权限校验接口

pub mod health;
pub mod permission;
pub mod role;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
