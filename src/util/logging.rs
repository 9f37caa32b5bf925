use std::io::Write;

use chrono::Local;
use log::LevelFilter;

/// 初始化全局日志，输出到 stderr，带时间戳与模块路径。
/// 重复调用时静默忽略（测试中多次初始化不会报错）。
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                record.level(),
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.module_path().unwrap_or("-"),
                record.args()
            )
        })
        .try_init();
}
