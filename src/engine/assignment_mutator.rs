// ==========================================
// 军人勤务排班系统 - 勤务变更引擎
// ==========================================
// 职责: 对单个格子执行 创建/更换/清空 操作,先经持久化协作方确认
// 红线: 悲观更新 - 确认成功前不触碰内存网格;失败原样返回,不重试
// 红线: 同一格子的并发变更由调用方串行化 (格子忙碌标记),本引擎不加锁
// ==========================================

use crate::domain::{Assignment, MutationKind, Person};
use crate::repository::error::RepositoryResult;
use crate::repository::traits::AssignmentPersistence;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// AssignOutcome - 变更结果
// ==========================================
// 确认后的权威结果,由调用方据此逐项落位到网格
#[derive(Debug, Clone)]
pub enum AssignOutcome {
    /// 空格子创建了新安排 (携带持久化层分配的 id)
    Created(Assignment),
    /// 既有安排更换了人员
    Updated(Assignment),
    /// 既有安排被清空删除
    Removed { assignment_id: String },
    /// 空格子且未选择人员,未发出外部调用
    NoChange,
}

impl AssignOutcome {
    /// 对应的变更类型
    pub fn kind(&self) -> MutationKind {
        match self {
            AssignOutcome::Created(_) => MutationKind::Create,
            AssignOutcome::Updated(_) => MutationKind::Update,
            AssignOutcome::Removed { .. } => MutationKind::Remove,
            AssignOutcome::NoChange => MutationKind::NoChange,
        }
    }
}

// ==========================================
// AssignmentMutator - 勤务变更引擎
// ==========================================
pub struct AssignmentMutator {
    persistence: Arc<dyn AssignmentPersistence>,
}

impl AssignmentMutator {
    /// 创建新的变更引擎实例
    pub fn new(persistence: Arc<dyn AssignmentPersistence>) -> Self {
        Self { persistence }
    }

    /// 对格子执行变更
    ///
    /// 四种情形,由"当前安排是否存在"与"目标人员是否为空"组合选择:
    /// 1. 清空: current 存在 + person_id 为空 → 删除
    /// 2. 更换: current 存在 + person_id 非空 → 更新人员
    /// 3. 创建: current 不存在 + person_id 非空 → 新建
    /// 4. 无变化: current 不存在 + person_id 为空 → 不发外部调用
    ///
    /// # 失败语义
    /// 外部调用失败时原样返回错误,网格不受影响;由调用方决定是否重发。
    #[instrument(skip(self, current, all_persons), fields(duty_type_id = %duty_type_id, duty_date = %duty_date))]
    pub async fn assign(
        &self,
        duty_type_id: &str,
        duty_date: NaiveDate,
        person_id: Option<&str>,
        current: Option<&Assignment>,
        all_persons: &[Person],
    ) -> RepositoryResult<AssignOutcome> {
        match (current, person_id) {
            // 情形 1: 清空既有安排
            (Some(existing), None) => {
                self.persistence
                    .delete_assignment(&existing.assignment_id)
                    .await?;
                info!(
                    assignment_id = %existing.assignment_id,
                    kind = MutationKind::Remove.to_db_str(),
                    "勤务安排已清空"
                );
                Ok(AssignOutcome::Removed {
                    assignment_id: existing.assignment_id.clone(),
                })
            }

            // 情形 2: 更换人员
            (Some(existing), Some(person_id)) => {
                let updated = self
                    .persistence
                    .update_assignment(&existing.assignment_id, person_id)
                    .await?;
                let updated = Self::resolve_person(updated, all_persons);
                info!(
                    assignment_id = %updated.assignment_id,
                    person_id,
                    kind = MutationKind::Update.to_db_str(),
                    "勤务安排已更换人员"
                );
                Ok(AssignOutcome::Updated(updated))
            }

            // 情形 3: 空格子创建
            (None, Some(person_id)) => {
                let created = self
                    .persistence
                    .create_assignment(duty_type_id, person_id, duty_date)
                    .await?;
                let created = Self::resolve_person(created, all_persons);
                info!(
                    assignment_id = %created.assignment_id,
                    person_id,
                    kind = MutationKind::Create.to_db_str(),
                    "勤务安排已创建"
                );
                Ok(AssignOutcome::Created(created))
            }

            // 情形 4: 无变化,不发外部调用
            (None, None) => {
                info!(kind = MutationKind::NoChange.to_db_str(), "未选择人员,无变化");
                Ok(AssignOutcome::NoChange)
            }
        }
    }

    /// 补充人员快照: 优先用调用方提供的名单解析,
    /// 名单里没有时保留持久化层返回的快照
    fn resolve_person(mut assignment: Assignment, all_persons: &[Person]) -> Assignment {
        if let Some(person_id) = assignment.person_id.as_deref() {
            if let Some(person) = all_persons.iter().find(|p| p.person_id == person_id) {
                assignment.person = Some(person.clone());
            }
        }
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::error::RepositoryError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    // ==========================================
    // Mock 持久化协作方
    // ==========================================
    #[derive(Default)]
    struct MockPersistence {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MockPersistence {
        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn recorded_calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn check_fail(&self) -> RepositoryResult<()> {
            if self.fail {
                Err(RepositoryError::DatabaseQueryError(
                    "database is locked".to_string(),
                ))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl AssignmentPersistence for MockPersistence {
        async fn list_assignments(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> RepositoryResult<Vec<Assignment>> {
            Ok(Vec::new())
        }

        async fn create_assignment(
            &self,
            duty_type_id: &str,
            person_id: &str,
            duty_date: NaiveDate,
        ) -> RepositoryResult<Assignment> {
            self.record(format!("create:{}:{}:{}", duty_type_id, person_id, duty_date));
            self.check_fail()?;
            Ok(Assignment {
                assignment_id: "SRV-1".to_string(),
                duty_type_id: duty_type_id.to_string(),
                person_id: Some(person_id.to_string()),
                person: None,
                duty_date,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        }

        async fn update_assignment(
            &self,
            assignment_id: &str,
            person_id: &str,
        ) -> RepositoryResult<Assignment> {
            self.record(format!("update:{}:{}", assignment_id, person_id));
            self.check_fail()?;
            Ok(Assignment {
                assignment_id: assignment_id.to_string(),
                duty_type_id: "GUARD".to_string(),
                person_id: Some(person_id.to_string()),
                person: None,
                duty_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        }

        async fn delete_assignment(&self, assignment_id: &str) -> RepositoryResult<()> {
            self.record(format!("delete:{}", assignment_id));
            self.check_fail()?;
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn person(id: &str, name: &str) -> Person {
        Person {
            person_id: id.to_string(),
            name: name.to_string(),
            rank: "上士".to_string(),
            qualification: None,
            entry_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn existing_assignment(id: &str, person_id: &str) -> Assignment {
        Assignment {
            assignment_id: id.to_string(),
            duty_type_id: "GUARD".to_string(),
            person_id: Some(person_id.to_string()),
            person: None,
            duty_date: date(2024, 6, 3),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_clear_existing_cell() {
        let persistence = Arc::new(MockPersistence::default());
        let mutator = AssignmentMutator::new(persistence.clone());
        let current = existing_assignment("A1", "P1");

        let outcome = mutator
            .assign("GUARD", date(2024, 6, 3), None, Some(&current), &[])
            .await
            .unwrap();

        match outcome {
            AssignOutcome::Removed { assignment_id } => assert_eq!(assignment_id, "A1"),
            other => panic!("期望 Removed,得到 {:?}", other),
        }
        assert_eq!(persistence.recorded_calls(), vec!["delete:A1"]);
    }

    #[tokio::test]
    async fn test_reassign_existing_cell() {
        let persistence = Arc::new(MockPersistence::default());
        let mutator = AssignmentMutator::new(persistence.clone());
        let current = existing_assignment("A1", "P1");
        let persons = vec![person("P1", "张伟"), person("P2", "李强")];

        let outcome = mutator
            .assign("GUARD", date(2024, 6, 3), Some("P2"), Some(&current), &persons)
            .await
            .unwrap();

        match outcome {
            AssignOutcome::Updated(updated) => {
                assert_eq!(updated.assignment_id, "A1");
                assert_eq!(updated.person_id.as_deref(), Some("P2"));
                // 人员快照已从名单解析
                assert_eq!(updated.person.unwrap().name, "李强");
            }
            other => panic!("期望 Updated,得到 {:?}", other),
        }
        assert_eq!(persistence.recorded_calls(), vec!["update:A1:P2"]);
    }

    #[tokio::test]
    async fn test_create_in_empty_cell() {
        let persistence = Arc::new(MockPersistence::default());
        let mutator = AssignmentMutator::new(persistence.clone());
        let persons = vec![person("P1", "张伟")];

        let outcome = mutator
            .assign("GUARD", date(2024, 6, 3), Some("P1"), None, &persons)
            .await
            .unwrap();

        match outcome {
            AssignOutcome::Created(created) => {
                // 持久化层分配的 id
                assert_eq!(created.assignment_id, "SRV-1");
                assert_eq!(created.person.unwrap().person_id, "P1");
            }
            other => panic!("期望 Created,得到 {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_change_issues_no_external_call() {
        let persistence = Arc::new(MockPersistence::default());
        let mutator = AssignmentMutator::new(persistence.clone());

        let outcome = mutator
            .assign("GUARD", date(2024, 6, 3), None, None, &[])
            .await
            .unwrap();

        assert!(matches!(outcome, AssignOutcome::NoChange));
        assert!(persistence.recorded_calls().is_empty());
        assert_eq!(outcome.kind(), MutationKind::NoChange);
    }

    #[tokio::test]
    async fn test_persistence_failure_surfaces_as_error() {
        let persistence = Arc::new(MockPersistence::failing());
        let mutator = AssignmentMutator::new(persistence.clone());
        let persons = vec![person("P1", "张伟")];

        let result = mutator
            .assign("GUARD", date(2024, 6, 3), Some("P1"), None, &persons)
            .await;

        assert!(result.is_err());
        // 调用已发出但失败,不产生结果,不重试
        assert_eq!(persistence.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_person_missing_from_roster_keeps_persistence_snapshot() {
        let persistence = Arc::new(MockPersistence::default());
        let mutator = AssignmentMutator::new(persistence);

        let outcome = mutator
            .assign("GUARD", date(2024, 6, 3), Some("P9"), None, &[])
            .await
            .unwrap();

        match outcome {
            AssignOutcome::Created(created) => {
                assert_eq!(created.person_id.as_deref(), Some("P9"));
                // 名单里没有也不报错,快照保持持久化层返回值
                assert!(created.person.is_none());
            }
            other => panic!("期望 Created,得到 {:?}", other),
        }
    }
}
