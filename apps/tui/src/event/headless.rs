use color_eyre::Result;
use marketing_dashboard::calculations::{
    aggregate_by_channel, aggregate_by_region, spend_range, top_performers, total_by_field,
    DimensionAggregate,
};
use marketing_dashboard::config::AppConfig;
use marketing_dashboard::domain::{ChartDataPoint, ComputedMetrics, MarketingRecord, SortField};
use marketing_dashboard::format::{format_count, format_currency, format_percentage};
use marketing_dashboard::pipeline::DerivedViews;
use marketing_dashboard::preprocess::{DatasetMetadata, PreprocessWorker};
use marketing_dashboard::session::load_dataset;
use marketing_dashboard::store::{Action, MarketingState, Store};
use serde::Serialize;
use std::fmt::Write as _;

const TOP_RECORDS: usize = 5;

/// Run the dashboard without a terminal UI: load, apply the requested view
/// and print a report.
pub async fn run_headless(config: &AppConfig, actions: Vec<Action>, json: bool) -> Result<()> {
    let mut store = Store::new(MarketingState::with_page_size(config.page_size));
    let mut worker = PreprocessWorker::spawn()?;
    let metadata = load_dataset(&mut store, &mut worker, &config.data_path).await?;
    worker.terminate();

    for action in actions {
        store.dispatch(action);
    }

    let mut views = DerivedViews::new();
    let report = build_headless_report(&mut store, &mut views, metadata, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_headless_text(&report));
    }

    Ok(())
}

fn build_headless_report(
    store: &mut Store,
    views: &mut DerivedViews,
    metadata: DatasetMetadata,
    config: &AppConfig,
) -> HeadlessReport {
    let (total_pages, total_records) = views.pagination_meta(store.state());
    store.dispatch(Action::UpdatePaginationMeta {
        total_pages,
        total_records,
    });

    let state = store.state();
    let filtered = views.filtered(state);
    let pagination = state.pagination;
    let (first_record, last_record) = pagination.record_span();
    let records = views.paginated(state).to_vec();

    HeadlessReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        data_path: config.data_path.display().to_string(),
        metadata,
        filters: HeadlessFilters {
            channels: state.filters.channels.iter().cloned().collect(),
            regions: state.filters.regions.iter().cloned().collect(),
            search: state.filters.search_query.clone(),
            spend_range: state.filters.spend_range.map(|range| (range.min, range.max)),
        },
        sorting: state
            .sorting
            .field
            .map(|field| format!("{} {}", field.as_str(), state.sorting.direction.as_str())),
        metrics: views.metrics(state),
        top_channels: views.chart_data(state).to_vec(),
        channels: aggregate_by_channel(&filtered),
        regions: aggregate_by_region(&filtered),
        top_spenders: top_performers(&filtered, SortField::Spend, TOP_RECORDS),
        page: HeadlessPage {
            current_page: pagination.current_page,
            page_size: pagination.page_size,
            total_pages,
            total_records,
            first_record,
            last_record,
            spend: total_by_field(&records, SortField::Spend),
            spend_range: spend_range(&records),
        },
        records,
    }
}

fn render_headless_text(report: &HeadlessReport) -> String {
    let mut out = String::new();
    let metrics = &report.metrics;

    let _ = writeln!(out, "\nMarketing Dashboard");
    let _ = writeln!(out, "===================");
    let _ = writeln!(out, "Source: {}", report.data_path);
    let _ = writeln!(out, "Generated: {}", report.generated_at);
    let _ = writeln!(
        out,
        "Records: {} loaded, {} matching",
        format_count(report.metadata.total_records as u64),
        format_count(report.page.total_records as u64)
    );
    if let Some((min, max)) = report.metadata.spend_range {
        let _ = writeln!(
            out,
            "Spend range: {} - {}",
            format_currency(min),
            format_currency(max)
        );
    }
    if let Some(sorting) = &report.sorting {
        let _ = writeln!(out, "Sorted by: {sorting}");
    }

    let _ = writeln!(out, "\nMetrics:");
    let _ = writeln!(out, "- Total spend: {}", format_currency(metrics.total_spend));
    let _ = writeln!(out, "- Impressions: {}", format_count(metrics.total_impressions));
    let _ = writeln!(out, "- Clicks: {}", format_count(metrics.total_clicks));
    let _ = writeln!(out, "- Conversions: {}", format_count(metrics.total_conversions));
    let _ = writeln!(out, "- CTR: {}", format_percentage(metrics.overall_ctr));
    let _ = writeln!(out, "- CPA: {}", format_currency(metrics.overall_cpa));
    let _ = writeln!(out, "- ROI: {}", format_percentage(metrics.average_roi));

    let _ = writeln!(out, "\nTop Channels by Spend:");
    for point in &report.top_channels {
        let _ = writeln!(
            out,
            "- {} | {} | {} conversions | CTR {}",
            point.name,
            format_currency(point.spend),
            format_count(point.conversions),
            format_percentage(point.ctr)
        );
    }

    let _ = writeln!(out, "\nRegions:");
    for region in &report.regions {
        let _ = writeln!(
            out,
            "- {} | {} records | {} | CTR {} | CPA {}",
            region.name,
            region.count,
            format_currency(region.spend),
            format_percentage(region.ctr),
            format_currency(region.cpa)
        );
    }

    let _ = writeln!(out, "\nTop Spenders:");
    for record in &report.top_spenders {
        let _ = writeln!(
            out,
            "- #{} | {} | {} | {}",
            record.id,
            record.channel,
            record.region,
            format_currency(record.spend)
        );
    }

    let page = &report.page;
    let _ = writeln!(
        out,
        "\nPage {} of {} ({}-{} of {}):",
        page.current_page, page.total_pages, page.first_record, page.last_record, page.total_records
    );
    if report.records.is_empty() {
        let _ = writeln!(out, "- no records on this page");
    }
    if let Some((min, max)) = page.spend_range {
        let _ = writeln!(
            out,
            "Page spend: {} ({} - {})",
            format_currency(page.spend),
            format_currency(min),
            format_currency(max)
        );
    }
    for record in &report.records {
        let _ = writeln!(
            out,
            "- #{} | {} | {} | {} | {} clicks | {} conversions",
            record.id,
            record.channel,
            record.region,
            format_currency(record.spend),
            format_count(record.clicks),
            format_count(record.conversions)
        );
    }

    out
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeadlessReport {
    generated_at: String,
    data_path: String,
    metadata: DatasetMetadata,
    filters: HeadlessFilters,
    sorting: Option<String>,
    metrics: ComputedMetrics,
    top_channels: Vec<ChartDataPoint>,
    channels: Vec<DimensionAggregate>,
    regions: Vec<DimensionAggregate>,
    top_spenders: Vec<MarketingRecord>,
    page: HeadlessPage,
    records: Vec<MarketingRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeadlessFilters {
    channels: Vec<String>,
    regions: Vec<String>,
    search: String,
    spend_range: Option<(f64, f64)>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeadlessPage {
    current_page: usize,
    page_size: usize,
    total_pages: usize,
    total_records: usize,
    first_record: usize,
    last_record: usize,
    spend: f64,
    spend_range: Option<(f64, f64)>,
}
