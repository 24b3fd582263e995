use admin_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载配置
    let config = Config::from_env();

    // 2. 初始化日志
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!("CRM admin server starting...");

    // 3. 初始化服务器状态 (seed 默认角色)
    let state = ServerState::initialize(&config);

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
