use magpie::calendar::{compose, Membership, MonthContext};
use magpie::compose::{ComposeForm, ScheduleRequest};
use magpie::provider::{DayPosts, Platform, PostSummary};

fn post(id: &str, platform: Platform) -> PostSummary {
    PostSummary::new(id, platform, "09:00 AM").with_id(id)
}

fn june_mapping() -> DayPosts {
    let mut mapping = DayPosts::new();
    mapping.insert(4, vec![post("p1", Platform::Instagram)]);
    mapping.insert(
        18,
        vec![post("p2", Platform::Twitter), post("p3", Platform::Facebook)],
    );
    // Out of range days never show up.
    mapping.insert(31, vec![post("stray", Platform::Linkedin)]);
    mapping
}

#[test]
fn grid_has_filler_then_month_days() {
    let ctx = MonthContext::new(30, 6, 31).unwrap();
    let cells = compose(&ctx, &june_mapping());

    assert_eq!(cells.len(), 36);
    assert!(cells[..6]
        .iter()
        .all(|c| c.membership == Membership::Previous && c.posts.is_empty()));
    assert_eq!(
        cells[..6].iter().map(|c| c.day).collect::<Vec<_>>(),
        vec![26, 27, 28, 29, 30, 31]
    );

    for (k, cell) in cells[6..].iter().enumerate() {
        let day = k as u8 + 1;
        assert_eq!(cell.day, day);
        assert_eq!(cell.membership, Membership::Current);
        let expected = june_mapping().remove(&day).unwrap_or_default();
        assert_eq!(cell.posts, expected);
    }
}

#[test]
fn posts_land_on_their_day_in_order() {
    let ctx = MonthContext::new(30, 6, 31).unwrap();
    let cells = compose(&ctx, &june_mapping());

    assert_eq!(cells[9].day, 4);
    assert_eq!(cells[9].posts[0].id.as_str(), "p1");

    let day18: Vec<&str> = cells[23].posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(cells[23].day, 18);
    assert_eq!(day18, vec!["p2", "p3"]);

    assert_eq!(cells[0].day, 26);
    assert!(cells[0].posts.is_empty());
    assert!(cells.iter().all(|c| c.posts.iter().all(|p| p.id.as_str() != "stray")));
}

#[test]
fn composing_twice_gives_equal_grids() {
    let ctx = MonthContext::new(28, 0, 31).unwrap();
    let mapping = june_mapping();
    let first = compose(&ctx, &mapping);
    assert_eq!(first, compose(&ctx, &mapping));
    assert_eq!(first.len(), 28);
}

#[test]
fn form_submits_exactly_what_was_entered() {
    let mut calls = Vec::new();
    let mut form = ComposeForm::default()
        .content("Hello")
        .scheduled_date("2025-06-10")
        .scheduled_time("10:00")
        .image_url("");
    form.submit(|req| calls.push(req));

    assert_eq!(
        calls,
        vec![ScheduleRequest {
            platform: Platform::Instagram,
            content: "Hello".to_owned(),
            image_url: String::new(),
            scheduled_date: "2025-06-10".to_owned(),
            scheduled_time: "10:00".to_owned(),
        }]
    );
    assert_eq!(calls[0].platform.to_string(), "instagram");

    let mut empty = ComposeForm::default()
        .scheduled_date("2025-06-10")
        .scheduled_time("10:00");
    let mut fired = false;
    empty.submit(|_| fired = true);
    assert!(!fired);
}
