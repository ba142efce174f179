//! Table view demo: a color table with sortable columns, driven from a
//! current-thread tokio runtime and rendered through the headless backend.
//!
//! Run with `RUST_LOG=trellis=debug cargo run --example tableview` to see the
//! engine's lifecycle events.

use std::error::Error;
use std::rc::Rc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use trellis::render::{dump_root, Headless};
use trellis::*;

struct Color {
    name: &'static str,
    hexcode: &'static str,
}

const COLORS: &[Color] = &[
    Color { name: "AliceBlue", hexcode: "F0F8FF" },
    Color { name: "Coral", hexcode: "FF7F50" },
    Color { name: "DarkOrchid", hexcode: "9932CC" },
    Color { name: "Gold", hexcode: "FFD700" },
    Color { name: "SeaGreen", hexcode: "2E8B57" },
    Color { name: "Tomato", hexcode: "FF6347" },
];

struct ColorProvider {
    latency: Duration,
}

impl TableDataProvider for ColorProvider {
    type Item = &'static Color;

    async fn query(&self, query: DataQuery) -> Result<DataResponse<&'static Color>, ProviderError> {
        tokio::time::sleep(self.latency).await;

        let mut items: Vec<&'static Color> = COLORS.iter().collect();
        match query.sort_column.as_deref() {
            Some("hexcode") => items.sort_by_key(|color| color.hexcode),
            _ => items.sort_by_key(|color| color.name),
        }
        if query.sort_order == Some(SortOrder::Desc) {
            items.reverse();
        }

        let total = items.len() as u64;
        let page = query.effective_page();
        let limit = query.limit.unwrap_or(0);
        if limit > 0 {
            let start = ((page - 1) * limit) as usize;
            items = items.into_iter().skip(start).take(limit as usize).collect();
        }

        let mut response = DataResponse::new(items)
            .with_page(page)
            .with_total(total)
            .with_sort(
                query.sort_column.unwrap_or_else(|| "name".to_owned()),
                query.sort_order.unwrap_or(SortOrder::Asc),
            );
        if limit > 0 {
            response = response.with_limit(limit);
        }
        Ok(response)
    }

    fn column_spec(&self) -> Vec<DataColumnSpec> {
        vec![
            DataColumnSpec::new("name").with_label("Color name").sortable(),
            DataColumnSpec::new("hexcode").with_label("CSS hexcode").sortable(),
            DataColumnSpec::new("display").with_label("Sample"),
        ]
    }

    fn create_row(&self, ui: &mut Ui, row: WidgetKey, item: &&'static Color) -> Result<(), UiError> {
        let name = ui.new_label(item.name);
        ui.add_child(row, name, Some(CellSizing::Expand), Some(CellAlignment::Start), None)?;
        let code = ui.new_label(format!("#{}", item.hexcode));
        ui.add_child(row, code, Some(CellSizing::Expand), Some(CellAlignment::Center), None)?;
        let sample = ui.new_label("■");
        ui.add_child(row, sample, Some(CellSizing::Shrink), Some(CellAlignment::Center), None)?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run())
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = UiConfig::new()
        .with_default_page_limit(4)
        .with_refresh_timeout(Duration::from_secs(2));
    let mut ui = Ui::with_config(Headless::new(), config);

    let app = ui.new_app(Some("trellis demo"));
    let home = ui.stack(app, Some("Home"))?;
    let welcome = ui.new_label("Press the button to open the table.");
    ui.add_child(home, welcome, None, None, None)?;

    let window = ui.stack(app, Some("TableView example"))?;
    let bar = ui.new_container(Flavor::ActionBar, None);
    let status = ui.new_label("This table is not loaded yet.");
    ui.add_child(bar, status, Some(CellSizing::Expand), None, None)?;
    let close = ui.new_button("Close");
    ui.add_child(bar, close, None, None, None)?;
    ui.add_child(window, bar, None, None, None)?;

    let provider = Rc::new(ColorProvider {
        latency: Duration::from_millis(30),
    });
    let table = ui.new_table(provider, DataQuery::new());
    ui.add_child(window, table, Some(CellSizing::Expand), None, None)?;

    ui.connect(
        table,
        Signal::TableDataRefreshed,
        handler(move |ui, table| {
            let text = match ui.current_response(table) {
                Ok(Some(meta)) => format!(
                    "This table displays {} / {} items, in page {} / {}",
                    meta.count,
                    meta.total.unwrap_or(meta.count as u64),
                    meta.current_page(),
                    meta.page_count().unwrap_or(1),
                ),
                _ => "No data.".to_owned(),
            };
            if let Err(err) = ui.set_label(status, text) {
                tracing::warn!(%err, "status label update failed");
            }
        }),
    )?;
    ui.connect(
        close,
        Signal::Clicked,
        handler(move |ui, _| {
            if let Err(err) = ui.dispose_current(app) {
                tracing::warn!(%err, "cannot close window");
            }
        }),
    )?;

    ui.mount(app)?;
    println!("{}\n", dump_root(headless(&ui)));

    ui.display(app, window)?;
    ui.refresh_now(table, DataQuery::new()).await?;
    ui.flush()?;
    println!("{}\n", dump_root(headless(&ui)));

    let pending = ui.toggle_sort(table, "name")?;
    let pending_second_page = ui.refresh(table, DataQuery::new().with_page(2))?;
    // The first answer is stale by the time it arrives.
    let outcome = ui.apply_refresh(pending.await)?;
    println!("first answer: {outcome:?}");
    let outcome = ui.apply_refresh(pending_second_page.await)?;
    println!("second answer: {outcome:?}");
    ui.flush()?;
    println!("{}\n", dump_root(headless(&ui)));

    ui.click(close)?;
    ui.flush()?;
    println!("{}", dump_root(headless(&ui)));
    Ok(())
}

fn headless(ui: &Ui) -> &Headless {
    ui.backend_as::<Headless>().expect("demo renders headless")
}
