// src/scrape/scrape.rs
use std::{
    error::Error,
    fs,
    path::{Component, Path, PathBuf},
    thread,
    time::Duration,
};

use encoding_rs::UTF_8;
use uuid::Uuid;

use crate::{
    code::ErrorCode,
    config::{
        consts::{APP_INFO_PATH, RECORD_FILE, SITE_URL},
        options::ScrapeOptions,
    },
    core::{fsx::{self, ensure_directory}, net::{self, Fetch}},
    progress::Progress,
    store::{self, KeyedJsonDocument},
};

use super::appids::extract_appids;
use super::badges::{BadgeRecord, parse_showcase};

/// Key path of the "pages finished" counter inside the state file.
pub const DONE_KEY: [&str; 2] = ["scrape", "done"];

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub pages: usize,
    pub images: usize,
    pub failed: Vec<u32>,
    pub dirs: Vec<PathBuf>,
    /// The `done` counter could not be written at least once, so a later
    /// `resume` may start too early.
    pub state_unsaved: bool,
}

pub fn page_url(appid: u32) -> String {
    join!(SITE_URL, &APP_INFO_PATH.replace("{appid}", &appid.to_string()))
}

/// Scrape every game listed in `opts.appid_source`.
///
/// A page that fails is logged and skipped. The counter at [`DONE_KEY`]
/// advances after every page, failed or not, so `resume` continues from the
/// next unvisited appid.
pub fn run(
    opts: &ScrapeOptions,
    fetch: &dyn Fetch,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error>> {
    fsx::convert_file_encoding(&opts.appid_source, UTF_8)?;
    let text = fs::read_to_string(&opts.appid_source)?;
    let appids = extract_appids(&text);
    let total = appids.len();

    if let Some(parent) = opts.state_file.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let mut summary = RunSummary::default();
    let mut done = KeyedJsonDocument::new(DONE_KEY, 0, &opts.state_file);
    let start = if opts.resume {
        store::as_integer(done.get()).unwrap_or(0).clamp(0, total as i64) as usize
    } else {
        summary.state_unsaved = !done.set(0, true);
        0
    };

    let end = match opts.limit {
        Some(n) => total.min(start.saturating_add(n)),
        None => total,
    };

    if let Some(p) = progress.as_deref_mut() {
        p.begin(end - start);
        if start > 0 {
            p.log(&format!("Resuming at {start}/{total}"));
        }
    }
    logf!("Scraping {} of {total} games", end - start);
    for (i, &appid) in appids.iter().enumerate().take(end).skip(start) {
        match scrape_one(opts, fetch, appid, i, total) {
            Ok((record, dir, saved)) => {
                summary.pages += 1;
                summary.images += saved;
                summary.dirs.push(dir);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(appid, &record.title);
                }
            }
            Err(e) => {
                loge!("{i}/{total} appid {appid}\n{e}");
                summary.failed.push(appid);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(appid, &e.to_string());
                }
            }
        }
        if !done.increment(true, 1) {
            summary.state_unsaved = true;
        }

        if i + 1 < end && opts.pause_ms > 0 {
            thread::sleep(Duration::from_millis(opts.pause_ms)); // be polite
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        if summary.state_unsaved {
            p.log(&format!(
                "Progress was not saved to {}; --resume will not pick up from here",
                opts.state_file.display()
            ));
        }
        p.finish();
    }
    Ok(summary)
}

/// One game: page -> directory of `level{n}.png` + `data.json`.
fn scrape_one(
    opts: &ScrapeOptions,
    fetch: &dyn Fetch,
    appid: u32,
    i: usize,
    total: usize,
) -> Result<(BadgeRecord, PathBuf, usize), Box<dyn Error>> {
    let html = fetch.get_text(&page_url(appid))?;
    let showcase = parse_showcase(&html)?;

    let dir = make_game_dir(&opts.image_dir, &showcase.title)?;
    logf!("{i}/{total} {}", dir.display());

    let mut saved = 0;
    for (j, src) in showcase.images.iter().enumerate() {
        let dst = dir.join(format!("level{}.png", j + 1));
        if net::download_file(fetch, src, &dst, true) == ErrorCode::Success {
            saved += 1;
        }
        logf!("{src}");
    }

    let record = BadgeRecord {
        title: showcase.title,
        appid,
        img_num: showcase.images.len(),
    };
    fs::write(dir.join(RECORD_FILE), store::to_pretty_string(&record)?)?;
    Ok((record, dir, saved))
}

/// `image_dir/<title>`, or `image_dir/<uuid>` when the title is not a usable
/// directory name. Titles that would leave `image_dir` (absolute, `..`,
/// drive prefixes) are never used.
fn make_game_dir(image_dir: &Path, title: &str) -> Result<PathBuf, Box<dyn Error>> {
    if stays_inside(title) {
        let named = image_dir.join(title);
        match fs::create_dir_all(&named) {
            Ok(()) => return Ok(named),
            Err(e) => {
                logd!("Cannot create {} ({e})", named.display());
            }
        }
    } else {
        logd!("Title `{title}` is not a plain relative path");
    }

    let fallback = image_dir.join(Uuid::new_v4().to_string());
    logd!("Using {}", fallback.display());
    fs::create_dir_all(&fallback)?;
    Ok(fallback)
}

fn stays_inside(title: &str) -> bool {
    let mut parts = Path::new(title).components().peekable();
    parts.peek().is_some() && parts.all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::net::fake::{FakeFetch, Reply};
    use crate::progress::NullProgress;
    use serde_json::{Value, json};

    fn page(title: &str, imgs: &[&str]) -> Reply {
        let tags: String = imgs.iter().map(|s| format!(r#"<div><img src="{s}"></div>"#)).collect();
        Reply::Body(
            format!(
                r#"<html><head><title>Showcase :: {title}</title></head>
                <body><div class="showcase-element-container badge">{tags}</div></body></html>"#
            )
            .into_bytes(),
        )
    }

    fn opts(root: &Path, ids: &[u32]) -> ScrapeOptions {
        let listing: String = ids
            .iter()
            .map(|id| format!("<a href=\"index.php?gamepage-appid-{id}\">x</a>\n"))
            .collect();
        let source = root.join("tbody.txt");
        fs::write(&source, listing).unwrap();
        ScrapeOptions {
            appid_source: source,
            image_dir: root.join("images"),
            state_file: root.join("data").join("state.json"),
            pause_ms: 0,
            resume: false,
            limit: None,
        }
    }

    fn done_count(path: &Path) -> Value {
        let doc: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        doc["scrape"]["done"].clone()
    }

    #[test]
    fn writes_images_and_record_per_game() {
        let dir = tempfile::tempdir().unwrap();
        let o = opts(dir.path(), &[10, 20]);
        let fetch = FakeFetch::default()
            .on(&page_url(10), page("Alpha", &["https://cdn.test/a1.png", "https://cdn.test/a2.png"]))
            .on("https://cdn.test/a1.png", Reply::Body(b"1".to_vec()))
            .on("https://cdn.test/a2.png", Reply::Body(b"2".to_vec()))
            .on(&page_url(20), Reply::Status(500));

        let summary = run(&o, &fetch, None).unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.images, 2);
        assert_eq!(summary.failed, [20]);

        let game = o.image_dir.join("Alpha");
        assert_eq!(fs::read(game.join("level2.png")).unwrap(), b"2");
        let record: Value = serde_json::from_str(&fs::read_to_string(game.join(RECORD_FILE)).unwrap()).unwrap();
        assert_eq!(record, json!({"title": "Alpha", "appid": 10, "img_num": 2}));

        assert_eq!(done_count(&o.state_file), json!(2));
    }

    #[test]
    fn resume_skips_finished_pages() {
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts(dir.path(), &[1, 2, 3]);
        fs::create_dir_all(o.state_file.parent().unwrap()).unwrap();
        fs::write(&o.state_file, r#"{"scrape": {"done": 2}, "other": true}"#).unwrap();
        o.resume = true;

        let fetch = FakeFetch::default().on(&page_url(3), page("Gamma", &[]));
        let summary = run(&o, &fetch, None).unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(*fetch.calls.borrow(), [page_url(3)]);
        assert_eq!(done_count(&o.state_file), json!(3));
        let state: Value = serde_json::from_str(&fs::read_to_string(&o.state_file).unwrap()).unwrap();
        assert_eq!(state["other"], json!(true));
    }

    #[test]
    fn limit_caps_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts(dir.path(), &[1, 2, 3]);
        o.limit = Some(1);
        let fetch = FakeFetch::default().on(&page_url(1), page("One", &[]));

        let summary = run(&o, &fetch, Some(&mut NullProgress)).unwrap();
        assert_eq!(summary.pages, 1);
        assert_eq!(fetch.calls.borrow().len(), 1);
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts(dir.path(), &[]);
        o.appid_source = dir.path().join("nope.txt");
        assert!(run(&o, &FakeFetch::default(), None).is_err());
    }

    #[test]
    fn huge_limit_on_resume_runs_to_the_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts(dir.path(), &[1, 2, 3]);
        fs::create_dir_all(o.state_file.parent().unwrap()).unwrap();
        fs::write(&o.state_file, r#"{"scrape": {"done": 1}}"#).unwrap();
        o.resume = true;
        o.limit = Some(usize::MAX);

        let fetch = FakeFetch::default()
            .on(&page_url(2), page("Two", &[]))
            .on(&page_url(3), page("Three", &[]));
        let summary = run(&o, &fetch, None).unwrap();

        assert_eq!(summary.pages, 2);
        assert_eq!(done_count(&o.state_file), json!(3));
    }

    #[derive(Default)]
    struct Notes(Vec<String>);

    impl Progress for Notes {
        fn log(&mut self, msg: &str) {
            self.0.push(msg.to_string());
        }
    }

    #[test]
    fn broken_state_file_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts(dir.path(), &[1, 2]);
        fs::create_dir_all(o.state_file.parent().unwrap()).unwrap();
        fs::write(&o.state_file, "{ not json").unwrap();
        o.resume = true;

        let fetch = FakeFetch::default()
            .on(&page_url(1), page("One", &[]))
            .on(&page_url(2), page("Two", &[]));
        let mut notes = Notes::default();
        let summary = run(&o, &fetch, Some(&mut notes)).unwrap();

        assert_eq!(summary.pages, 2);
        assert!(summary.state_unsaved);
        assert_eq!(notes.0.iter().filter(|m| m.contains("not saved")).count(), 1);
        assert_eq!(fs::read_to_string(&o.state_file).unwrap(), "{ not json");
    }

    #[test]
    fn healthy_run_saves_state() {
        let dir = tempfile::tempdir().unwrap();
        let o = opts(dir.path(), &[1]);
        let fetch = FakeFetch::default().on(&page_url(1), page("One", &[]));
        assert!(!run(&o, &fetch, None).unwrap().state_unsaved);
    }

    #[test]
    fn shift_jis_listing_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let o = opts(dir.path(), &[]);
        let listing = "<tr><td><a href=\"index.php?gamepage-appid-42\">日本語のゲーム</a></td></tr>\n\
            これは日本語で書かれたゲームの一覧ページを保存したファイルです。\n"
            .repeat(4);
        let (sjis, _, _) = encoding_rs::SHIFT_JIS.encode(&listing);
        fs::write(&o.appid_source, &sjis).unwrap();

        let fetch = FakeFetch::default().on(&page_url(42), page("Answer", &[]));
        let summary = run(&o, &fetch, None).unwrap();
        // one link per repetition
        assert_eq!(summary.pages, 4);
        assert!(summary.failed.is_empty());
        assert_eq!(fs::read_to_string(&o.appid_source).unwrap(), listing);
    }

    #[test]
    fn escaping_titles_stay_inside_image_dir() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir_all(&images).unwrap();
        let outside = dir.path().join("escaped");

        for title in [outside.to_str().unwrap(), "../pwned", "a/../../b", ".", ""] {
            let got = make_game_dir(&images, title).unwrap();
            assert_eq!(got.parent(), Some(images.as_path()), "title {title:?}");
            assert!(Uuid::parse_str(got.file_name().unwrap().to_str().unwrap()).is_ok());
        }
        assert!(!outside.exists());
        assert!(!dir.path().join("pwned").exists());
        assert!(!dir.path().join("b").exists());

        // nested but relative is fine
        assert_eq!(make_game_dir(&images, "Series/Part 2").unwrap(), images.join("Series/Part 2"));
    }

    #[test]
    fn unusable_title_falls_back_to_uuid_dir() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir_all(&images).unwrap();
        // a plain file where the game directory would go
        fs::write(images.join("Taken"), "").unwrap();

        let got = make_game_dir(&images, "Taken").unwrap();
        assert_ne!(got, images.join("Taken"));
        assert!(got.is_dir());
        assert!(Uuid::parse_str(got.file_name().unwrap().to_str().unwrap()).is_ok());
    }
}
