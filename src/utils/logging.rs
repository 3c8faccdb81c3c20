use tracing_subscriber::EnvFilter;

/// 初始化诊断日志，`RUST_LOG`优先，`verbose`将默认级别提升为debug
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "deepresearch_rs=debug,info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
