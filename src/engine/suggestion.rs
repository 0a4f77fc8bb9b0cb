// ==========================================
// 军人勤务排班系统 - 排班建议消费引擎
// ==========================================
// 职责: 向排名协作方逐格请求建议列表,整窗并发扇出后聚合
// 红线: 建议是辅助信息 - 任何失败 (含未找到) 降级为空列表,
//       绝不阻断排班主流程;各格子请求相互独立,互不影响
// 红线: 不重算排名,列表按接收顺序消费,至多保留配置条数
// ==========================================

use crate::domain::{CalendarWindow, DutyType, SuggestionEntry};
use crate::repository::traits::RankingProvider;
use chrono::NaiveDate;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// 每格建议条数默认值
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

// ==========================================
// SuggestionFetcher - 建议消费引擎
// ==========================================
pub struct SuggestionFetcher {
    provider: Arc<dyn RankingProvider>,
    limit: usize,
}

impl SuggestionFetcher {
    /// 创建新的建议消费引擎 (默认每格 3 条)
    pub fn new(provider: Arc<dyn RankingProvider>) -> Self {
        Self::with_limit(provider, DEFAULT_SUGGESTION_LIMIT)
    }

    /// 指定每格条数上限
    pub fn with_limit(provider: Arc<dyn RankingProvider>, limit: usize) -> Self {
        Self { provider, limit }
    }

    /// 查询单个格子的建议列表
    ///
    /// 失败降级为空列表并告警,不向上传播错误。
    pub async fn suggestions_for(
        &self,
        duty_type_id: &str,
        duty_date: NaiveDate,
    ) -> Vec<SuggestionEntry> {
        match self.provider.suggest(duty_type_id, duty_date, self.limit).await {
            Ok(mut entries) => {
                // 协作方多给的条数截断,顺序保持接收顺序
                entries.truncate(self.limit);
                entries
            }
            Err(e) => {
                warn!(
                    duty_type_id,
                    duty_date = %duty_date,
                    error = %e,
                    "建议获取失败,降级为空列表"
                );
                Vec::new()
            }
        }
    }

    /// 整窗扇出: 并发请求 勤务类型 × 7 天 的全部格子并聚合
    ///
    /// 各格子之间无顺序保证;单格失败不影响兄弟格子。
    pub async fn fetch_window(
        &self,
        duty_types: &[DutyType],
        window: &CalendarWindow,
    ) -> HashMap<(String, NaiveDate), Vec<SuggestionEntry>> {
        let requests: Vec<_> = duty_types
            .iter()
            .flat_map(|duty_type| {
                window.days().iter().map(move |day| {
                    let duty_type_id = duty_type.duty_type_id.clone();
                    let day = *day;
                    async move {
                        let entries = self.suggestions_for(&duty_type_id, day).await;
                        ((duty_type_id, day), entries)
                    }
                })
            })
            .collect();

        join_all(requests).await.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Person, NEVER_SERVED_IDLE_DAYS};
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use chrono::{Utc, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn person(id: &str, name: &str) -> Person {
        Person {
            person_id: id.to_string(),
            name: name.to_string(),
            rank: "中士".to_string(),
            qualification: None,
            entry_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn entry(id: &str, idle_days: i64) -> SuggestionEntry {
        SuggestionEntry {
            person: person(id, id),
            last_duty_date: None,
            idle_days,
            total_in_duty_type: 0,
        }
    }

    fn duty(id: &str) -> DutyType {
        DutyType {
            duty_type_id: id.to_string(),
            name: id.to_string(),
            description: None,
            display_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // ==========================================
    // Mock 排名协作方
    // ==========================================
    // FAIL 开头的勤务类型一律返回错误,其余返回固定列表
    struct MockRankingProvider {
        entries: Vec<SuggestionEntry>,
    }

    #[async_trait]
    impl RankingProvider for MockRankingProvider {
        async fn suggest(
            &self,
            duty_type_id: &str,
            _duty_date: NaiveDate,
            _limit: usize,
        ) -> RepositoryResult<Vec<SuggestionEntry>> {
            if duty_type_id.starts_with("FAIL") {
                return Err(RepositoryError::NotFound {
                    entity: "Suggestion".to_string(),
                    id: duty_type_id.to_string(),
                });
            }
            Ok(self.entries.clone())
        }
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_list() {
        let provider = Arc::new(MockRankingProvider {
            entries: vec![entry("P1", 5)],
        });
        let fetcher = SuggestionFetcher::new(provider);

        let suggestions = fetcher.suggestions_for("FAIL_GUARD", date(2024, 6, 3)).await;
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_order_preserved_and_truncated() {
        // 协作方多给了 4 条: 截断到 3 条,顺序不变
        let provider = Arc::new(MockRankingProvider {
            entries: vec![
                entry("P1", NEVER_SERVED_IDLE_DAYS),
                entry("P2", 30),
                entry("P3", 7),
                entry("P4", 1),
            ],
        });
        let fetcher = SuggestionFetcher::new(provider);

        let suggestions = fetcher.suggestions_for("GUARD", date(2024, 6, 3)).await;
        assert_eq!(suggestions.len(), 3);
        let ids: Vec<&str> = suggestions
            .iter()
            .map(|s| s.person.person_id.as_str())
            .collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);
    }

    #[tokio::test]
    async fn test_window_fanout_isolates_failures() {
        let provider = Arc::new(MockRankingProvider {
            entries: vec![entry("P1", 10)],
        });
        let fetcher = SuggestionFetcher::new(provider);
        let window = CalendarWindow::containing(date(2024, 6, 3), Weekday::Mon);
        let duty_types = vec![duty("GUARD"), duty("FAIL_ESCORT")];

        let all = fetcher.fetch_window(&duty_types, &window).await;

        // 2 种勤务 × 7 天 = 14 个格子全部有结果
        assert_eq!(all.len(), 14);
        for day in *window.days() {
            // 失败勤务的格子为空列表,不影响正常勤务的格子
            assert_eq!(all[&("GUARD".to_string(), day)].len(), 1);
            assert!(all[&("FAIL_ESCORT".to_string(), day)].is_empty());
        }
    }

    #[tokio::test]
    async fn test_idle_label_rendering() {
        assert_eq!(entry("P1", NEVER_SERVED_IDLE_DAYS).idle_label(), "∞");
        assert_eq!(entry("P2", 12).idle_label(), "12d");
    }
}
