// ==========================================
// 军人勤务排班系统 - 控制台入口
// ==========================================
// 技术栈: Rust + SQLite
// 用途: 加载当前周的排班视图并打印概览
// ==========================================

use chrono::Local;
use duty_roster::api::RosterOrchestrator;
use duty_roster::app::{get_default_db_path, AppState};
use duty_roster::domain::CalendarWindow;
use duty_roster::repository::normalize_duty_date;

#[tokio::main]
async fn main() {
    // 初始化日志系统
    duty_roster::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 周勤务分配引擎", duty_roster::APP_NAME);
    tracing::info!("系统版本: {}", duty_roster::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径 (参数1),可选参考日期 (参数2,YYYY-MM-DD)
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let reference = match std::env::args().nth(2) {
        Some(raw) => match normalize_duty_date(&raw) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!("参考日期参数无效: {}", e);
                std::process::exit(1);
            }
        },
        None => Local::now().date_naive(),
    };

    // 创建AppState
    let app_state = match AppState::new(db_path).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    // 定位到包含参考日期的一周并加载
    let controller = RosterOrchestrator::new(app_state.roster_api.clone(), reference);
    if let Err(e) = controller.load().await {
        tracing::error!("排班视图加载失败: {}", e);
        std::process::exit(1);
    }

    print_week_overview(&controller).await;
}

/// 打印当前周概览: 每个勤务类型一行,逐日列出占用人
async fn print_week_overview(controller: &RosterOrchestrator) {
    let Ok(Some(grid)) = controller.grid() else {
        tracing::warn!("网格为空,无内容可打印");
        return;
    };
    let Ok(window) = controller.window() else {
        return;
    };

    tracing::info!("本周: {}", window.range_label());
    let headers: Vec<String> = window
        .days()
        .iter()
        .map(|day| CalendarWindow::day_label(*day))
        .collect();
    tracing::info!("          {}", headers.join(" | "));

    for duty_type in grid.duty_types() {
        let row: Vec<String> = window
            .days()
            .iter()
            .map(|day| {
                grid.cell_at(&duty_type.duty_type_id, *day)
                    .map(|a| a.person_label())
                    .unwrap_or_else(|| "(空)".to_string())
            })
            .collect();
        tracing::info!("{}: {}", duty_type.name, row.join(" | "));
    }

    // 建议浮层: 整窗扇出,失败格子为空列表
    match controller.suggestions_overlay().await {
        Ok(overlay) => {
            let filled = overlay.values().filter(|v| !v.is_empty()).count();
            tracing::info!("建议浮层: {}/{} 格有建议", filled, overlay.len());
        }
        Err(e) => tracing::warn!("建议浮层获取失败: {}", e),
    }
}
