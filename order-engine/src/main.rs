use order_engine::{EngineState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 配置, 日志)
    let config = setup_environment()?;

    tracing::info!("Order engine starting...");

    // 2. 初始化引擎状态
    let state = EngineState::initialize(&config);

    // 3. 启动后台任务
    let tasks = state.start_background_tasks();

    // 4. 等待退出信号
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    if tasks.check_health() > 0 {
        tracing::warn!("Some background tasks had already stopped");
    }
    tasks.shutdown(config.shutdown_timeout()).await;

    tracing::info!(
        orders = state.orders.all_orders().len(),
        last_sequence = state.orders.current_sequence(),
        "Order engine stopped"
    );
    Ok(())
}
