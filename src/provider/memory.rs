use chrono::NaiveDate;

use super::{group_by_day, DayPosts, PostSummary, ScheduleProvider, Uid};
use crate::calendar::MonthIndex;

/// Posts handed over during the running session. Nothing is written to disk.
#[derive(Default)]
pub struct MemorySchedule {
    posts: Vec<(NaiveDate, PostSummary)>,
}

impl MemorySchedule {
    pub fn new() -> Self {
        MemorySchedule::default()
    }

    pub fn insert(&mut self, date: NaiveDate, post: PostSummary) {
        log::debug!("Keeping post {} for {}", post.id, date);
        self.posts.push((date, post));
    }

    pub fn remove(&mut self, id: &Uid) -> bool {
        let before = self.posts.len();
        self.posts.retain(|(_, post)| &post.id != id);
        before != self.posts.len()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl ScheduleProvider for MemorySchedule {
    fn name(&self) -> &str {
        "session"
    }

    fn posts_of_month(&self, month: MonthIndex) -> DayPosts {
        group_by_day(month, self.posts.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Platform;

    #[test]
    fn inserted_posts_keep_order() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let mut schedule = MemorySchedule::new();
        schedule.insert(date, PostSummary::new("a", Platform::Twitter, "10:00").with_id("a"));
        schedule.insert(date, PostSummary::new("b", Platform::Facebook, "09:00").with_id("b"));

        let posts = schedule.posts_of_day(&date);
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let other = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        assert!(schedule.posts_of_day(&other).is_empty());

        assert!(schedule.remove(&Uid::from("a")));
        assert!(!schedule.remove(&Uid::from("a")));
        assert_eq!(schedule.len(), 1);
    }
}
