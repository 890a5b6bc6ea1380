use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use super::*;
use crate::calendar::MonthIndex;
use crate::events::Event;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Deserialize)]
struct ScheduleFile {
    #[serde(default, rename = "post")]
    posts: Vec<FilePost>,
}

#[derive(Deserialize)]
struct FilePost {
    date: String,
    id: Option<Uid>,
    content: String,
    platform: Platform,
    time: String,
    image: Option<String>,
    #[serde(default)]
    status: PostStatus,
}

impl FilePost {
    fn into_dated(self) -> Result<(NaiveDate, PostSummary)> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            Error::new(
                ErrorKind::DateParse,
                &format!("'{}' of post '{}': {}", self.date, self.content, e),
            )
        })?;

        Ok((
            date,
            PostSummary {
                id: self.id.unwrap_or_else(Uid::generate),
                content: self.content,
                platform: self.platform,
                time: self.time,
                image: self.image.filter(|url| !url.trim().is_empty()),
                status: self.status,
            },
        ))
    }
}

/// Read-only schedule dataset stored as TOML:
///
/// ```toml
/// [[post]]
/// date = "2025-06-04"
/// content = "New summer collection"
/// platform = "instagram"
/// time = "10:00 AM"
/// image = "https://example.com/summer.jpg"
/// ```
pub struct FileSchedule {
    path: PathBuf,
    name: String,
    posts: Vec<(NaiveDate, PostSummary)>,
}

impl FileSchedule {
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_owned());

        let mut schedule = FileSchedule {
            path: path.to_owned(),
            name,
            posts: Vec::new(),
        };
        schedule.read()?;
        Ok(schedule)
    }

    fn read(&mut self) -> Result<()> {
        let content = fs::read_to_string(&self.path)?;
        let file: ScheduleFile = toml::from_str(&content)?;

        self.posts = file
            .posts
            .into_iter()
            .map(FilePost::into_dated)
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "Loaded {} posts from '{}'",
            self.posts.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Watches the dataset file and reports changes to `event_sink`.
    /// The parent directory is watched so that saves by rename are seen too.
    /// Dropping the returned watcher stops watching.
    #[must_use]
    pub fn watch(&self, event_sink: mpsc::Sender<Event>) -> Result<notify::RecommendedWatcher> {
        use notify::{RecursiveMode, Watcher};

        let target = fs::canonicalize(&self.path)?;
        let dir = target
            .parent()
            .map(Path::to_owned)
            .ok_or(std::io::ErrorKind::NotFound)?;

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    if touches(&event, &target) {
                        let _ = event_sink.send(Event::ExternalModification);
                    }
                }
                Err(e) => log::error!("watch error: {:?}", e),
            })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(watcher)
    }
}

/// Whether `event` changed the contents of `target` or replaced it.
fn touches(event: &notify::Event, target: &Path) -> bool {
    use notify::event::{EventKind, ModifyKind};

    let relevant = matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Modify(ModifyKind::Any)
    );
    relevant && event.paths.iter().any(|path| path == target)
}

impl ScheduleProvider for FileSchedule {
    fn name(&self) -> &str {
        &self.name
    }

    fn posts_of_month(&self, month: MonthIndex) -> DayPosts {
        group_by_day(month, self.posts.iter())
    }

    fn reload(&mut self) -> Result<()> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;
    use std::io::Write;

    fn write_schedule(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn groups_posts_by_day_in_file_order() {
        let file = write_schedule(
            r#"
[[post]]
date = "2025-06-18"
id = "first"
content = "Flash sale"
platform = "twitter"
time = "12:30 PM"

[[post]]
date = "2025-06-04"
content = "Summer collection"
platform = "Instagram"
time = "10:00 AM"
image = "https://example.com/summer.jpg"

[[post]]
date = "2025-06-18"
id = "second"
content = "Behind the scenes"
platform = "facebook"
time = "03:00 PM"
image = ""
"#,
        );

        let schedule = FileSchedule::load(file.path()).unwrap();
        let june = schedule.posts_of_month(MonthIndex::new(Month::June, 2025));

        assert_eq!(june.keys().copied().collect::<Vec<u8>>(), vec![4, 18]);
        let ids: Vec<&str> = june[&18].iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
        assert_eq!(june[&18][1].image, None);
        assert_eq!(
            june[&4][0].image.as_deref(),
            Some("https://example.com/summer.jpg")
        );
        assert!(!june[&4][0].id.as_str().is_empty());

        assert!(schedule
            .posts_of_month(MonthIndex::new(Month::July, 2025))
            .is_empty());
    }

    #[test]
    fn bad_date_is_reported() {
        let file = write_schedule(
            r#"
[[post]]
date = "2025-06-31"
content = "Nope"
platform = "twitter"
time = "10:00"
"#,
        );

        assert!(matches!(
            FileSchedule::load(file.path()),
            Err(Error {
                kind: ErrorKind::DateParse,
                ..
            })
        ));
    }

    #[test]
    fn unknown_platform_is_a_parse_error() {
        let file = write_schedule(
            r#"
[[post]]
date = "2025-06-01"
content = "Nope"
platform = "myspace"
time = "10:00"
"#,
        );

        assert!(matches!(
            FileSchedule::load(file.path()),
            Err(Error {
                kind: ErrorKind::ScheduleParse,
                ..
            })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            FileSchedule::load(Path::new("/nonexistent/magpie/schedule.toml")),
            Err(Error {
                kind: ErrorKind::IOError(_),
                ..
            })
        ));
    }

    #[test]
    fn only_changes_of_the_schedule_count() {
        use notify::event::{CreateKind, DataChange, EventKind, ModifyKind, RenameMode};

        let target = Path::new("/home/me/posts.toml");
        let data = notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(target.to_owned());
        let renamed = notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To)))
            .add_path(target.to_owned());
        let sibling = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/home/me/posts.toml~"));
        let access = notify::Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(target.to_owned());

        assert!(touches(&data, target));
        assert!(touches(&renamed, target));
        assert!(!touches(&sibling, target));
        assert!(!touches(&access, target));
    }

    #[test]
    fn watching_a_vanished_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.toml");
        fs::write(&path, "").unwrap();
        let schedule = FileSchedule::load(&path).unwrap();
        drop(dir);

        let (tx, _rx) = mpsc::channel();
        assert!(matches!(
            schedule.watch(tx),
            Err(Error {
                kind: ErrorKind::IOError(_),
                ..
            })
        ));
    }

    #[test]
    fn empty_file_has_no_posts() {
        let file = write_schedule("");
        let schedule = FileSchedule::load(file.path()).unwrap();
        assert!(schedule
            .posts_of_month(MonthIndex::new(Month::June, 2025))
            .is_empty());
    }
}
