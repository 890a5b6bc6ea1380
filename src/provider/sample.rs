use once_cell::sync::Lazy;

use super::{DayPosts, Platform, PostSummary, ScheduleProvider};
use crate::calendar::MonthIndex;

static SAMPLE_POSTS: Lazy<Vec<(u8, PostSummary)>> = Lazy::new(|| {
    vec![
        (
            4,
            PostSummary::new(
                "New summer collection is here! Discover light fabrics and bright colors.",
                Platform::Instagram,
                "10:00 AM",
            )
            .with_id("sample-1")
            .with_image("https://images.unsplash.com/photo-1523381210434-271e8be1f52b"),
        ),
        (
            10,
            PostSummary::new(
                "We are hiring: join our team as a product designer.",
                Platform::Linkedin,
                "09:00 AM",
            )
            .with_id("sample-2"),
        ),
        (
            18,
            PostSummary::new(
                "Flash sale today only. 30% off everything in store.",
                Platform::Twitter,
                "12:30 PM",
            )
            .with_id("sample-3"),
        ),
        (
            18,
            PostSummary::new(
                "Behind the scenes of our latest photo shoot.",
                Platform::Facebook,
                "03:00 PM",
            )
            .with_id("sample-4")
            .with_image("https://images.unsplash.com/photo-1492724441997-5dc865305da7"),
        ),
        (
            25,
            PostSummary::new(
                "Thank you for 10k followers! Giveaway details in bio.",
                Platform::Instagram,
                "06:00 PM",
            )
            .with_id("sample-5"),
        ),
    ]
});

/// Fixed demo dataset placed into a single month.
pub struct SampleSchedule {
    month: MonthIndex,
}

impl SampleSchedule {
    pub fn new(month: MonthIndex) -> Self {
        SampleSchedule { month }
    }
}

impl ScheduleProvider for SampleSchedule {
    fn name(&self) -> &str {
        "sample"
    }

    fn posts_of_month(&self, month: MonthIndex) -> DayPosts {
        let mut days = DayPosts::new();
        if month != self.month {
            return days;
        }

        for (day, post) in SAMPLE_POSTS.iter() {
            if *day <= month.days() {
                days.entry(*day).or_insert_with(Vec::new).push(post.clone());
            }
        }
        days
    }
}
