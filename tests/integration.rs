//! Integration tests for trellis.
//!
//! These tests drive the public API from outside the crate: stacks and their
//! history, table refreshes racing through oneshot channels, and the wire
//! shape of the data protocol.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::oneshot;
use trellis::render::{dump_root, dump_widget, Headless};
use trellis::*;

fn headless(ui: &Ui) -> &Headless {
    ui.backend_as::<Headless>().unwrap()
}

// ---------------------------------------------------------------------------
// Stacks
// ---------------------------------------------------------------------------

#[test]
fn test_stack_display_and_close_round_trip() {
    let mut ui = Ui::new(Headless::new());
    let app = ui.new_app(Some("demo"));
    let a = ui.stack(app, Some("A")).unwrap();
    let b = ui.stack(app, Some("B")).unwrap();
    ui.mount(app).unwrap();
    insta::assert_snapshot!(dump_root(headless(&ui)), @r#"app#w1 "demo" (window#w0 "A")"#);

    assert!(ui.display(app, b).unwrap());
    assert!(ui.is_displayed(b).unwrap());
    assert!(ui.is_hidden(a).unwrap());
    let history = vec![ui.identity(a).unwrap(), ui.identity(b).unwrap()];
    assert_eq!(ui.history(app).unwrap(), history.as_slice());
    ui.flush().unwrap();
    insta::assert_snapshot!(dump_root(headless(&ui)), @r#"app#w1 "demo" (window#w2 "B")"#);

    ui.close_current(app).unwrap();
    assert!(ui.is_displayed(a).unwrap());
    assert!(ui.is_hidden(b).unwrap());
    assert_eq!(ui.history(app).unwrap(), &history[..1]);
    ui.flush().unwrap();
    insta::assert_snapshot!(dump_root(headless(&ui)), @r#"app#w1 "demo" (window#w0 "A")"#);

    assert!(matches!(ui.close_current(app), Err(UiError::LastHistoryEntry(_))));
}

#[test]
fn test_dispose_current_releases_the_window() {
    let mut ui = Ui::new(Headless::new());
    let app = ui.new_app(None);
    let home = ui.stack(app, Some("Home")).unwrap();
    let details = ui.stack(app, Some("Details")).unwrap();
    let text = ui.new_label("more");
    ui.add_child(details, text, None, None, None).unwrap();
    ui.mount(app).unwrap();

    ui.display(app, details).unwrap();
    ui.flush().unwrap();
    ui.dispose_current(app).unwrap();
    ui.flush().unwrap();

    assert!(!ui.contains(details));
    assert!(!ui.contains(text));
    assert_eq!(ui.current(app).unwrap(), Some(home));
    assert_eq!(ui.child_keys(app).unwrap(), vec![home]);
    let id_app = ui.identity(app).unwrap();
    let id_home = ui.identity(home).unwrap();
    assert_eq!(
        dump_root(headless(&ui)),
        format!(r#"app#{id_app} (window#{id_home} "Home")"#)
    );
}

#[test]
fn test_exclusive_display_holds_after_every_operation() {
    let mut ui = Ui::new(Headless::new());
    let notebook = ui.new_notebook();
    let pages: Vec<_> = (0..4)
        .map(|i| ui.stack(notebook, Some(&format!("p{i}"))).unwrap())
        .collect();
    let shown = |ui: &Ui| {
        ui.child_keys(notebook)
            .unwrap()
            .into_iter()
            .filter(|&page| ui.is_displayed(page).unwrap())
            .count()
    };

    assert_eq!(shown(&ui), 1);
    ui.display(notebook, 2usize).unwrap();
    assert_eq!(shown(&ui), 1);
    ui.remove_child(notebook, pages[2]).unwrap();
    assert_eq!(shown(&ui), 1);
    ui.materialized(notebook).unwrap();
    assert_eq!(shown(&ui), 1);
    let id = ui.identity(pages[3]).unwrap();
    ui.display(notebook, id).unwrap();
    assert_eq!(ui.current(notebook).unwrap(), Some(pages[3]));
    assert_eq!(shown(&ui), 1);
}

#[test]
fn test_button_click_navigates() {
    let mut ui = Ui::new(Headless::new());
    let app = ui.new_app(None);
    let first = ui.stack(app, Some("First")).unwrap();
    let second = ui.stack(app, Some("Second")).unwrap();
    let next = ui.new_button("Next");
    ui.add_child(first, next, None, None, None).unwrap();
    ui.connect(
        next,
        Signal::Clicked,
        handler(move |ui, _| {
            ui.display(app, second).unwrap();
        }),
    )
    .unwrap();
    ui.mount(app).unwrap();

    assert!(ui.click(next).unwrap());
    assert_eq!(ui.current(app).unwrap(), Some(second));
    assert_eq!(ui.flush().unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Answers each page once, when the test sends it.
struct Deferred {
    answers: RefCell<HashMap<u32, oneshot::Receiver<Vec<&'static str>>>>,
}

fn deferred(pages: &[u32]) -> (Rc<Deferred>, HashMap<u32, oneshot::Sender<Vec<&'static str>>>) {
    let mut answers = HashMap::new();
    let mut senders = HashMap::new();
    for &page in pages {
        let (tx, rx) = oneshot::channel();
        answers.insert(page, rx);
        senders.insert(page, tx);
    }
    let provider = Deferred {
        answers: RefCell::new(answers),
    };
    (Rc::new(provider), senders)
}

impl TableDataProvider for Deferred {
    type Item = &'static str;

    fn query(&self, query: DataQuery) -> impl Future<Output = Result<DataResponse<&'static str>, ProviderError>> {
        let answer = self.answers.borrow_mut().remove(&query.effective_page());
        async move {
            let answer = answer.ok_or_else(|| ProviderError::Unavailable("no answer scheduled".into()))?;
            let items = answer
                .await
                .map_err(|_| ProviderError::Unavailable("answer dropped".into()))?;
            Ok::<_, ProviderError>(DataResponse::new(items).with_page(query.effective_page()))
        }
    }

    fn column_spec(&self) -> Vec<DataColumnSpec> {
        vec![DataColumnSpec::new("name").sortable()]
    }

    fn create_row(&self, ui: &mut Ui, row: WidgetKey, item: &&'static str) -> Result<(), UiError> {
        let label = ui.new_label(*item);
        ui.add_child(row, label, Some(CellSizing::Expand), None, None)?;
        Ok(())
    }
}

fn row_texts(ui: &Ui, table: WidgetKey) -> Vec<String> {
    ui.child_keys(table)
        .unwrap()
        .into_iter()
        .map(|row| {
            let cell = ui.child_keys(row).unwrap()[0];
            ui.label(cell).unwrap().unwrap_or_default().to_owned()
        })
        .collect()
}

#[tokio::test]
async fn test_late_answer_to_older_refresh_is_discarded() {
    let (provider, mut senders) = deferred(&[1, 2]);
    let mut ui = Ui::new(Headless::new());
    let table = ui.new_table(provider, DataQuery::new());

    let mut older = ui.refresh(table, DataQuery::new().with_page(1)).unwrap();
    let newer = ui.refresh(table, DataQuery::new().with_page(2)).unwrap();
    // The older query is in flight but unanswered.
    assert!(tokio::time::timeout(Duration::from_millis(10), &mut older).await.is_err());

    senders.remove(&2).unwrap().send(vec!["page two"]).unwrap();
    let outcome = ui.apply_refresh(newer.await).unwrap();
    assert_eq!(outcome, RefreshOutcome::Applied { rows: 1 });

    senders.remove(&1).unwrap().send(vec!["one", "uno"]).unwrap();
    let outcome = ui.apply_refresh(older.await).unwrap();
    assert_eq!(outcome, RefreshOutcome::Discarded { seq: 1, latest: 2 });
    assert_eq!(row_texts(&ui, table), vec!["page two"]);
    assert_eq!(ui.current_response(table).unwrap().unwrap().current_page(), 2);
}

#[tokio::test]
async fn test_latest_resolved_policy_never_mixes_rows() {
    let (provider, mut senders) = deferred(&[1, 2]);
    let config = UiConfig::new().with_refresh_policy(RefreshPolicy::LatestResolved);
    let mut ui = Ui::with_config(Headless::new(), config);
    let table = ui.new_table(provider, DataQuery::new());

    let older = ui.refresh(table, DataQuery::new().with_page(1)).unwrap();
    let newer = ui.refresh(table, DataQuery::new().with_page(2)).unwrap();
    senders.remove(&2).unwrap().send(vec!["b1", "b2"]).unwrap();
    senders.remove(&1).unwrap().send(vec!["a1"]).unwrap();

    ui.apply_refresh(newer.await).unwrap();
    assert_eq!(row_texts(&ui, table), vec!["b1", "b2"]);
    ui.apply_refresh(older.await).unwrap();
    assert_eq!(row_texts(&ui, table), vec!["a1"]);
}

#[tokio::test]
async fn test_provider_failure_leaves_table_empty_without_repaint() {
    let (provider, mut senders) = deferred(&[1, 2]);
    let mut ui = Ui::new(Headless::new());
    let table = ui.new_table(provider, DataQuery::new());

    senders.remove(&1).unwrap().send(vec!["x", "y"]).unwrap();
    ui.refresh_now(table, DataQuery::new()).await.unwrap();
    let node = ui.mount(table).unwrap();
    let created = headless(&ui).created_count();

    drop(senders.remove(&2));
    let err = ui
        .refresh_now(table, DataQuery::new().with_page(2))
        .await
        .unwrap_err();
    assert!(matches!(err, UiError::Fetch(ProviderError::Unavailable(_))));
    assert!(ui.children(table).unwrap().is_empty());
    assert_eq!(headless(&ui).created_count(), created);
    assert_eq!(headless(&ui).root(), Some(node));
}

#[tokio::test]
async fn test_refresh_timeout() {
    let (provider, _senders) = deferred(&[1]);
    let config = UiConfig::new().with_refresh_timeout(Duration::from_millis(20));
    let mut ui = Ui::with_config(Headless::new(), config);
    let table = ui.new_table(provider, DataQuery::new());

    let err = ui.refresh_now(table, DataQuery::new()).await.unwrap_err();
    assert!(matches!(err, UiError::Fetch(ProviderError::TimedOut(_))));
}

#[tokio::test]
async fn test_status_label_follows_refresh() {
    let (provider, mut senders) = deferred(&[3]);
    let mut ui = Ui::new(Headless::new());
    let window = ui.new_container(Flavor::Window, Some("Colors"));
    let bar = ui.new_container(Flavor::ActionBar, None);
    let status = ui.new_label("not loaded yet");
    ui.add_child(bar, status, None, None, None).unwrap();
    ui.add_child(window, bar, None, None, None).unwrap();
    let table = ui.new_table(provider, DataQuery::new().with_limit(2));
    ui.add_child(window, table, None, None, None).unwrap();
    ui.connect(
        table,
        Signal::TableDataRefreshed,
        handler(move |ui, table| {
            let text = match ui.current_response(table).unwrap() {
                Some(meta) => format!("{} items, page {}", meta.count, meta.current_page()),
                None => "empty".to_owned(),
            };
            ui.set_label(status, text).unwrap();
        }),
    )
    .unwrap();
    ui.mount(window).unwrap();

    senders.remove(&3).unwrap().send(vec!["red", "blue"]).unwrap();
    ui.refresh_now(table, DataQuery::new().with_page(3)).await.unwrap();
    assert_eq!(ui.label(status).unwrap(), Some("2 items, page 3"));
    assert_eq!(ui.pending_repaints(), 1);
    ui.flush().unwrap();

    let dumped = dump_widget(&mut ui, window).unwrap();
    assert!(dumped.contains(r#"label#"#), "{dumped}");
    assert!(dumped.contains(r#""2 items, page 3""#), "{dumped}");
    assert!(dumped.contains(r#""blue""#), "{dumped}");
}

#[test]
fn test_block_on_refresh() {
    let (provider, mut senders) = deferred(&[1]);
    let mut ui = Ui::new(Headless::new());
    let table = ui.new_table(provider, DataQuery::new());
    senders.remove(&1).unwrap().send(vec!["only"]).unwrap();
    let pending = ui.refresh(table, DataQuery::new()).unwrap();
    let resolved = tokio_test::block_on(pending);
    assert!(resolved.is_ok());
    assert_eq!(ui.apply_refresh(resolved).unwrap(), RefreshOutcome::Applied { rows: 1 });
}

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

#[test]
fn test_query_serializes_camel_case() {
    let query = DataQuery::new()
        .with_page(2)
        .with_sort("name", SortOrder::Desc)
        .with_filter("tag", vec!["a".to_owned(), "b".to_owned()])
        .with_filter("q", "red");
    let value = serde_json::to_value(&query).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "page": 2,
            "sortColumn": "name",
            "sortOrder": "desc",
            "query": { "q": "red", "tag": ["a", "b"] }
        })
    );
    let back: DataQuery = serde_json::from_value(value).unwrap();
    assert_eq!(back, query);
}

#[test]
fn test_response_deserializes_and_validates() {
    let json = r#"{"page":1,"limit":2,"total":10,"count":2,"sortColumn":"name","sortOrder":"asc","items":["x","y"]}"#;
    let response: DataResponse<String> = serde_json::from_str(json).unwrap();
    assert!(response.validate().is_ok());
    let (meta, items) = response.into_parts();
    assert_eq!(items, vec!["x", "y"]);
    assert_eq!(meta.sort_order, Some(SortOrder::Asc));
    assert_eq!(meta.page_count(), Some(5));

    let broken: DataResponse<String> = serde_json::from_str(r#"{"count":3,"items":["x"]}"#).unwrap();
    assert!(broken.validate().is_err());
}
