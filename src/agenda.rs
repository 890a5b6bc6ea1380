use chrono::NaiveDate;
use std::sync::mpsc;

use crate::calendar::{compose, compose_padded, CalendarCell, MonthContext, MonthIndex};
use crate::config::Config;
use crate::events::Event;
use crate::provider::*;

/// All schedule providers of a session, queried in order.
pub struct Agenda {
    providers: Vec<Box<dyn ScheduleProvider>>,
    session: MemorySchedule,
    _watchers: Vec<notify::RecommendedWatcher>,
}

impl Agenda {
    pub fn new(providers: Vec<Box<dyn ScheduleProvider>>) -> Self {
        Agenda {
            providers,
            session: MemorySchedule::new(),
            _watchers: Vec::new(),
        }
    }

    pub fn from_config(
        config: &Config,
        month: MonthIndex,
        event_sink: Option<&mpsc::Sender<Event>>,
    ) -> Result<Self> {
        let mut agenda = Agenda::new(Vec::new());

        if config.sample_data {
            agenda.push(Box::new(SampleSchedule::new(month)));
        }

        if let Some(path) = &config.schedule_file {
            match FileSchedule::load(path) {
                Ok(schedule) => {
                    if let Some(sink) = event_sink {
                        match schedule.watch(sink.clone()) {
                            Ok(watcher) => agenda._watchers.push(watcher),
                            Err(e) => log::warn!("Not watching '{}': {}", path.display(), e),
                        }
                    }
                    agenda.push(Box::new(schedule));
                }
                Err(e) => log::warn!("Skipping schedule '{}': {}", path.display(), e),
            }
        }

        Ok(agenda)
    }

    pub fn push(&mut self, provider: Box<dyn ScheduleProvider>) {
        self.providers.push(provider);
    }

    /// Re-reads external datasets. Providers that fail keep their old posts.
    pub fn reload(&mut self) {
        for provider in self.providers.iter_mut() {
            if let Err(e) = provider.reload() {
                log::error!("Could not reload '{}': {}", provider.name(), e);
            }
        }
    }

    pub fn session(&self) -> &MemorySchedule {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut MemorySchedule {
        &mut self.session
    }

    /// Posts of `month` from every provider, session posts last.
    pub fn posts_of_month(&self, month: MonthIndex) -> DayPosts {
        fn merge_into(merged: &mut DayPosts, posts: DayPosts) {
            for (day, posts) in posts {
                merged.entry(day).or_insert_with(Vec::new).extend(posts);
            }
        }

        let mut merged = DayPosts::new();
        for provider in self.providers.iter() {
            merge_into(&mut merged, provider.posts_of_month(month));
        }
        merge_into(&mut merged, self.session.posts_of_month(month));
        merged
    }

    pub fn posts_of_day(&self, date: &NaiveDate) -> Vec<PostSummary> {
        use chrono::Datelike;
        self.posts_of_month(MonthIndex::from(*date))
            .remove(&(date.day() as u8))
            .unwrap_or_default()
    }

    pub fn cells_of_month(&self, month: MonthIndex) -> Result<Vec<CalendarCell>> {
        Ok(compose(
            &MonthContext::for_month(month)?,
            &self.posts_of_month(month),
        ))
    }

    pub fn grid_of_month(&self, month: MonthIndex) -> Result<Vec<CalendarCell>> {
        Ok(compose_padded(
            &MonthContext::for_month(month)?,
            &self.posts_of_month(month),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;

    struct Fixed(&'static str, Vec<(u8, &'static str)>);

    impl ScheduleProvider for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn posts_of_month(&self, _month: MonthIndex) -> DayPosts {
            let mut days = DayPosts::new();
            for (day, id) in &self.1 {
                days.entry(*day)
                    .or_insert_with(Vec::new)
                    .push(PostSummary::new(id, Platform::Twitter, "10:00").with_id(*id));
            }
            days
        }
    }

    fn ids(posts: &[PostSummary]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn providers_are_concatenated_in_order() {
        let june = MonthIndex::new(Month::June, 2025);
        let mut agenda = Agenda::new(vec![
            Box::new(Fixed("a", vec![(3, "a1"), (3, "a2")])),
            Box::new(Fixed("b", vec![(3, "b1"), (9, "b2")])),
        ]);
        agenda.session_mut().insert(
            june.date(3).unwrap(),
            PostSummary::new("s", Platform::Facebook, "11:00").with_id("s1"),
        );

        let posts = agenda.posts_of_month(june);
        assert_eq!(ids(&posts[&3]), vec!["a1", "a2", "b1", "s1"]);
        assert_eq!(ids(&posts[&9]), vec!["b2"]);
        assert_eq!(
            ids(&agenda.posts_of_day(&june.date(3).unwrap())),
            vec!["a1", "a2", "b1", "s1"]
        );
    }

    #[test]
    fn cells_follow_the_real_calendar() {
        let june = MonthIndex::new(Month::June, 2025);
        let agenda = Agenda::new(vec![Box::new(SampleSchedule::new(june))]);

        let cells = agenda.cells_of_month(june).unwrap();
        assert_eq!(cells.len(), 36);
        assert_eq!(cells[0].day, 26);
        assert_eq!(cells[9].day, 4);
        assert_eq!(cells[9].posts.len(), 1);

        assert_eq!(agenda.grid_of_month(june).unwrap().len(), 42);
    }
}
