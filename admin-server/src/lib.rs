//! CRM Admin Server - 角色与权限管理后端
//!
//! # 架构概述
//!
//! 本模块是 Admin Server 的主入口，提供以下核心功能：
//!
//! - **角色管理** (`api::role`): 角色 CRUD、组织架构树、下属查询
//! - **权限校验** (`api::permission`): 多形态 payload 的规范化评估
//! - **数据层** (`db`): 进程内角色快照存储
//!
//! # 模块结构
//!
//! ```text
//! admin-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 角色存储
//! └── utils/         # 错误、日志等工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState, build_app};
pub use db::RoleStore;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
