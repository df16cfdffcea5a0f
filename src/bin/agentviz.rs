use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use agentviz::cli::{history_sink, load_config, load_history_file, topology_rows};
use agentviz::logging::LoggingConfig;
use agentviz::{
    LocalEchoProcessor, Session, SubmissionReply, TracingSurface, Visualization,
    VisualizationEngine,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agentviz", version, about = "Agent interaction visualization CLI", author)]
struct Cli {
    /// 配置文件（JSON）
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 列出拓扑节点与相邻节点
    Topology {
        #[arg(long)]
        json: bool,
    },
    /// 解析两个名称并给出可绘制的路径
    Route { from: String, to: String },
    /// 回放历史文件
    Replay { file: PathBuf },
    /// 无界面运行一个会话
    Simulate {
        #[arg(long, default_value_t = 30)]
        seconds: u64,
        #[arg(long, default_value = "check ETH whale transfers over 500")]
        request: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let engine = Arc::new(VisualizationEngine::new(config.clone(), history_sink(&config))?);

    match cli.command {
        Command::Topology { json } => handle_topology(&engine, json)?,
        Command::Route { from, to } => handle_route(&engine, &from, &to),
        Command::Replay { file } => handle_replay(&engine, file).await?,
        Command::Simulate { seconds, request } => {
            handle_simulate(engine, seconds, &request).await?
        }
    }
    Ok(())
}

fn handle_topology(engine: &VisualizationEngine, json: bool) -> anyhow::Result<()> {
    let rows = topology_rows(engine.topology());
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<24} {:<18} {:<18} {}", "Id", "Name", "Category", "Neighbors");
    for row in rows {
        println!(
            "{:<24} {:<18} {:<18} {}",
            row.id,
            row.name,
            row.category,
            row.neighbors.join(", ")
        );
    }
    Ok(())
}

fn handle_route(engine: &VisualizationEngine, from: &str, to: &str) {
    let resolver = engine.resolver();
    let (Some(source), Some(target)) = (resolver.resolve(from), resolver.resolve(to)) else {
        println!("Cannot map `{from}` -> `{to}` onto topology nodes");
        return;
    };

    match engine.router().find_path(&source, &target) {
        Some(path) => println!("{}", path.join(" -> ")),
        None => println!("No path between `{source}` and `{target}`"),
    }
}

async fn handle_replay(engine: &VisualizationEngine, file: PathBuf) -> anyhow::Result<()> {
    let items = load_history_file(&file)?;
    engine.attach_surface(Arc::new(TracingSurface));

    let results = engine.load_snapshot(items);
    let animated = results.iter().filter(|result| result.is_animated()).count();
    let unresolved = results
        .iter()
        .filter(|result| matches!(result, Visualization::Unresolved { .. }))
        .count();
    let no_path = results
        .iter()
        .filter(|result| matches!(result, Visualization::NoPath { .. }))
        .count();

    // 等待所有数据流、接续跳与外部回传播放完毕
    while !engine.scheduler().is_idle() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    println!(
        "Replayed {} interactions: {animated} animated, {unresolved} unresolved, {no_path} without path",
        results.len()
    );
    Ok(())
}

async fn handle_simulate(
    engine: Arc<VisualizationEngine>,
    seconds: u64,
    request: &str,
) -> anyhow::Result<()> {
    engine.attach_surface(Arc::new(TracingSurface));
    let session = Session::new(Arc::clone(&engine), Arc::new(LocalEchoProcessor));

    match session.submit(request).await? {
        SubmissionReply::Error(error) => println!("error: {error}"),
        SubmissionReply::Formatted(text) | SubmissionReply::Raw(text) => println!("{text}"),
    }

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
        _ = tokio::signal::ctrl_c() => {}
    }

    session.teardown();
    println!(
        "Simulation finished: {} alarm cycles, {} interactions recorded",
        session.driver().completed_cycles(),
        engine.log().len()
    );
    Ok(())
}
