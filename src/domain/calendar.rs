// ==========================================
// 军人勤务排班系统 - 周历窗口
// ==========================================
// 职责: 由参考日期确定可见周 (周一起始约定), 支持前后翻周
// 红线: 纯函数,无 I/O;导航时整体重建,不原地修改
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// 一周天数
pub const DAYS_PER_WEEK: usize = 7;

// ==========================================
// CalendarWindow - 周历窗口
// ==========================================
// 恰好 7 个连续日历日,首日落在配置的周起始日
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWindow {
    week_start: Weekday,
    days: [NaiveDate; DAYS_PER_WEEK],
}

impl CalendarWindow {
    /// 构造包含 `reference` 的周窗口
    ///
    /// 首日为不晚于 `reference` 的最近一个 `week_start` 周日 (可为同日),
    /// 末日为首日之后第 6 天。
    pub fn containing(reference: NaiveDate, week_start: Weekday) -> Self {
        let first = reference.week(week_start).first_day();
        let mut days = [first; DAYS_PER_WEEK];
        for (offset, day) in days.iter_mut().enumerate() {
            *day = first + Duration::days(offset as i64);
        }
        Self { week_start, days }
    }

    /// 相邻窗口: 正数向未来,负数向过去
    ///
    /// `shifted(1)` 再 `shifted(-1)` 回到原窗口。
    pub fn shifted(&self, weeks: i32) -> Self {
        let reference = self.days[0] + Duration::weeks(weeks as i64);
        Self::containing(reference, self.week_start)
    }

    /// 窗口首日
    pub fn first_day(&self) -> NaiveDate {
        self.days[0]
    }

    /// 窗口末日
    pub fn last_day(&self) -> NaiveDate {
        self.days[DAYS_PER_WEEK - 1]
    }

    /// 周起始日约定
    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// 按序遍历 7 个日历日
    pub fn days(&self) -> &[NaiveDate; DAYS_PER_WEEK] {
        &self.days
    }

    /// 日期是否落在窗口内
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    /// 周范围标签,用于视图标题
    pub fn range_label(&self) -> String {
        format!("{} ~ {}", self.first_day(), self.last_day())
    }

    /// 列头标签: 星期 + 月-日
    pub fn day_label(date: NaiveDate) -> String {
        let weekday = match date.weekday() {
            Weekday::Mon => "周一",
            Weekday::Tue => "周二",
            Weekday::Wed => "周三",
            Weekday::Thu => "周四",
            Weekday::Fri => "周五",
            Weekday::Sat => "周六",
            Weekday::Sun => "周日",
        };
        format!("{} {}", weekday, date.format("%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_containing_monday_reference() {
        // 2024-06-03 本身是周一
        let window = CalendarWindow::containing(date(2024, 6, 3), Weekday::Mon);
        assert_eq!(window.first_day(), date(2024, 6, 3));
        assert_eq!(window.last_day(), date(2024, 6, 9));
    }

    #[test]
    fn test_containing_midweek_reference() {
        // 周四回退到本周一
        let window = CalendarWindow::containing(date(2024, 6, 6), Weekday::Mon);
        assert_eq!(window.first_day(), date(2024, 6, 3));
    }

    #[test]
    fn test_containing_sunday_reference() {
        // 周日属于上一个周一开始的那一周
        let window = CalendarWindow::containing(date(2024, 6, 9), Weekday::Mon);
        assert_eq!(window.first_day(), date(2024, 6, 3));
        assert_eq!(window.last_day(), date(2024, 6, 9));
    }

    #[test]
    fn test_seven_consecutive_days_first_on_week_start() {
        // 任意参考日期: 7 个连续日,首日星期等于配置起始日
        let mut reference = date(2023, 12, 25);
        for _ in 0..60 {
            let window = CalendarWindow::containing(reference, Weekday::Mon);
            assert_eq!(window.days().len(), 7);
            assert_eq!(window.first_day().weekday(), Weekday::Mon);
            for pair in window.days().windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
            assert!(window.contains(reference));
            reference = reference + Duration::days(1);
        }
    }

    #[test]
    fn test_shift_round_trip() {
        let window = CalendarWindow::containing(date(2024, 6, 5), Weekday::Mon);
        assert_eq!(window.shifted(1).shifted(-1), window);
        assert_eq!(window.shifted(-3).shifted(3), window);
    }

    #[test]
    fn test_shift_adjacent() {
        let window = CalendarWindow::containing(date(2024, 6, 3), Weekday::Mon);
        let next = window.shifted(1);
        assert_eq!(next.first_day(), date(2024, 6, 10));
        let prev = window.shifted(-1);
        assert_eq!(prev.first_day(), date(2024, 5, 27));
    }

    #[test]
    fn test_shift_crosses_year_boundary() {
        let window = CalendarWindow::containing(date(2024, 12, 30), Weekday::Mon);
        assert_eq!(window.first_day(), date(2024, 12, 30));
        assert_eq!(window.last_day(), date(2025, 1, 5));
        assert_eq!(window.shifted(1).first_day(), date(2025, 1, 6));
    }

    #[test]
    fn test_custom_week_start() {
        // 周日起始约定下,周一回退到前一天
        let window = CalendarWindow::containing(date(2024, 6, 3), Weekday::Sun);
        assert_eq!(window.first_day(), date(2024, 6, 2));
        assert_eq!(window.first_day().weekday(), Weekday::Sun);
    }

    #[test]
    fn test_range_label() {
        let window = CalendarWindow::containing(date(2024, 6, 3), Weekday::Mon);
        assert_eq!(window.range_label(), "2024-06-03 ~ 2024-06-09");
    }
}
