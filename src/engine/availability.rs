// ==========================================
// 军人勤务排班系统 - 可用性解析引擎
// ==========================================
// 职责: 计算指定 (勤务类型, 日期) 格子的可指派人员集合
// 红线: 同日互斥 - 当日已被任何勤务占用的人员不可再指派;
//       例外: 被查询格子自己的占用人加回结果,编辑时可保留或清除
// 红线: 纯计算,无 I/O,可在每次渲染时调用
// ==========================================

use crate::domain::Person;
use crate::engine::roster_grid::RosterGrid;
use chrono::NaiveDate;

// ==========================================
// AvailabilityResolver - 可用性解析
// ==========================================
pub struct AvailabilityResolver;

impl AvailabilityResolver {
    /// 计算格子的可指派人员列表
    ///
    /// 算法:
    /// 1. 取当日全部已占用人员 id 集合 (跨所有勤务类型)
    /// 2. 全员名单中剔除已占用者
    /// 3. 若被查询格子已有占用人,将其加回
    /// 4. 按 (姓名, 人员id) 升序排序,保证结果确定
    pub fn available_for(
        grid: &RosterGrid,
        duty_type_id: &str,
        duty_date: NaiveDate,
        all_persons: &[Person],
    ) -> Vec<Person> {
        let occupied = grid.assigned_person_ids_on(duty_date);

        let mut result: Vec<Person> = all_persons
            .iter()
            .filter(|p| !occupied.contains(p.person_id.as_str()))
            .cloned()
            .collect();

        let current = grid.cell_at(duty_type_id, duty_date);
        if let Some(occupant_id) = current.and_then(|a| a.person_id.as_deref()) {
            if !result.iter().any(|p| p.person_id == occupant_id) {
                if let Some(person) = all_persons.iter().find(|p| p.person_id == occupant_id) {
                    result.push(person.clone());
                } else if let Some(person) = current.and_then(|a| a.person.clone()) {
                    // 目录里已查不到的人,退回安排里的快照
                    result.push(person);
                }
            }
        }

        result.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.person_id.cmp(&b.person_id))
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Assignment, CalendarWindow, DutyType};
    use chrono::{Utc, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn person(id: &str, name: &str) -> Person {
        Person {
            person_id: id.to_string(),
            name: name.to_string(),
            rank: "三级军士长".to_string(),
            qualification: None,
            entry_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn duty(id: &str, name: &str) -> DutyType {
        DutyType {
            duty_type_id: id.to_string(),
            name: name.to_string(),
            description: None,
            display_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assignment(id: &str, duty_type_id: &str, person_id: &str, d: NaiveDate) -> Assignment {
        Assignment {
            assignment_id: id.to_string(),
            duty_type_id: duty_type_id.to_string(),
            person_id: Some(person_id.to_string()),
            person: None,
            duty_date: d,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_grid() -> RosterGrid {
        // 周一: P1 在岗哨; 其余格子空
        RosterGrid::build(
            vec![duty("GUARD", "岗哨"), duty("ESCORT", "护卫")],
            CalendarWindow::containing(date(2024, 6, 3), Weekday::Mon),
            vec![assignment("A1", "GUARD", "P1", date(2024, 6, 3))],
        )
    }

    #[test]
    fn test_same_day_exclusivity_across_duty_types() {
        let grid = sample_grid();
        let persons = vec![person("P1", "张伟"), person("P2", "李强")];

        // 周一护卫格子: P1 已在岗哨服勤,必须排除
        let available =
            AvailabilityResolver::available_for(&grid, "ESCORT", date(2024, 6, 3), &persons);
        let ids: Vec<&str> = available.iter().map(|p| p.person_id.as_str()).collect();
        assert_eq!(ids, vec!["P2"]);
    }

    #[test]
    fn test_unassigned_day_offers_everyone() {
        let grid = sample_grid();
        let persons = vec![person("P1", "张伟"), person("P2", "李强")];

        // 周二无人占用: P1 可指派
        let available =
            AvailabilityResolver::available_for(&grid, "GUARD", date(2024, 6, 4), &persons);
        assert_eq!(available.len(), 2);
    }

    #[test]
    fn test_own_occupant_added_back() {
        let grid = sample_grid();
        let persons = vec![person("P1", "张伟"), person("P2", "李强")];

        // 查询 P1 自己的格子: P1 出现在结果中 (编辑时可保留)
        let available =
            AvailabilityResolver::available_for(&grid, "GUARD", date(2024, 6, 3), &persons);
        let ids: Vec<&str> = available.iter().map(|p| p.person_id.as_str()).collect();
        assert!(ids.contains(&"P1"));
        assert!(ids.contains(&"P2"));
    }

    #[test]
    fn test_occupant_missing_from_directory_falls_back_to_snapshot() {
        let mut occupied = assignment("A1", "GUARD", "P9", date(2024, 6, 3));
        occupied.person = Some(person("P9", "王军"));
        let grid = RosterGrid::build(
            vec![duty("GUARD", "岗哨")],
            CalendarWindow::containing(date(2024, 6, 3), Weekday::Mon),
            vec![occupied],
        );
        let persons = vec![person("P2", "李强")];

        let available =
            AvailabilityResolver::available_for(&grid, "GUARD", date(2024, 6, 3), &persons);
        let ids: Vec<&str> = available.iter().map(|p| p.person_id.as_str()).collect();
        assert!(ids.contains(&"P9"));
    }

    #[test]
    fn test_deterministic_name_ordering() {
        let grid = sample_grid();
        let persons = vec![
            person("P3", "赵云龙"),
            person("P2", "李强"),
            person("P4", "李强"),
        ];

        let available =
            AvailabilityResolver::available_for(&grid, "GUARD", date(2024, 6, 4), &persons);
        let ids: Vec<&str> = available.iter().map(|p| p.person_id.as_str()).collect();
        // 姓名升序,同名按 id
        assert_eq!(ids, vec!["P2", "P4", "P3"]);
    }
}
