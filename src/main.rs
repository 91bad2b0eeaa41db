use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use care_credits::config::AppConfig;
use care_credits::credits::{
    credit_router, CourseCategory, CreditReportView, CreditService, CreditSheet, CsvRoster,
    CsvUsageLog, LoggingNotifier, RuleSet, StaticCatalog, UnconfiguredExtractor,
};
use care_credits::error::AppError;
use care_credits::telemetry;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Care Credits",
    about = "Compute and serve continuing-education credit eligibility for long-term-care professionals",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute an eligibility report from a credit sheet JSON file
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Member roster CSV (columns: National Id, Name, Email)
    #[arg(long)]
    roster: Option<PathBuf>,
    /// CSV file receiving one row per delivered result
    #[arg(long)]
    usage_log: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Credit sheet as JSON (see CreditSheet for the field names)
    #[arg(long)]
    sheet: PathBuf,
    /// List suggested courses for unmet requirements
    #[arg(long)]
    list_courses: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Report(args) => run_report(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(roster) = args.roster.take() {
        config.members.roster_path = Some(roster);
    }
    if let Some(usage_log) = args.usage_log.take() {
        config.members.usage_log_path = Some(usage_log);
    }

    telemetry::init(&config.telemetry)?;

    let service = build_service(&config)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(credit_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credit eligibility service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_service(
    config: &AppConfig,
) -> Result<Arc<CreditService<CsvRoster, LoggingNotifier, CsvUsageLog>>, AppError> {
    let roster = match &config.members.roster_path {
        Some(path) => CsvRoster::from_path(path).map_err(care_credits::credits::CreditServiceError::from)?,
        None => CsvRoster::empty(),
    };

    let usage_log_path = config
        .members
        .usage_log_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("care-credits-usage.csv"));

    Ok(Arc::new(CreditService::new(
        RuleSet::current(),
        Arc::new(roster),
        Arc::new(LoggingNotifier),
        Arc::new(CsvUsageLog::new(usage_log_path)),
        Arc::new(UnconfiguredExtractor),
        Arc::new(StaticCatalog::standard()),
    )))
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let sheet = load_sheet(&args.sheet)?;

    let rules = RuleSet::current();
    let calculator = care_credits::credits::EligibilityCalculator::new(rules);
    let summary = calculator.summarize(&sheet);
    let view = CreditReportView::from_summary(&summary, calculator.rules());

    render_report(&view);

    if args.list_courses && !view.recommended_categories.is_empty() {
        use care_credits::credits::CourseCatalog;
        let catalog = StaticCatalog::standard();
        let courses = catalog
            .courses()
            .map_err(care_credits::credits::CreditServiceError::from)?;

        println!("\nSuggested courses");
        for category in &view.recommended_categories {
            println!("- {}:", category_heading(*category));
            for course in courses.iter().filter(|course| course.category == *category) {
                println!("    {} ({})", course.name, course.url);
            }
        }
    }

    Ok(())
}

fn load_sheet(path: &Path) -> Result<CreditSheet, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn category_heading(category: CourseCategory) -> &'static str {
    match category {
        CourseCategory::Professional => "Professional courses",
        CourseCategory::QualityEthicsRegulations => "Quality / Ethics / Regulations",
        CourseCategory::Core => "Core categories",
        CourseCategory::CulturalNew => "Cultural sensitivity",
    }
}

fn render_report(view: &CreditReportView) {
    println!("Credit eligibility report");
    println!(
        "Total: {:.2} / {:.0} points ({}%){}",
        view.total.points,
        view.total.goal,
        view.total.percent,
        if view.total.met {
            " - goal met"
        } else {
            ""
        }
    );
    if view.total.remaining > 0.0 {
        println!("Still missing {:.2} points", view.total.remaining);
    }

    println!("\nProfessional courses: {:.2} points", view.professional_points);

    println!("\nQuality / Ethics / Regulations");
    if view.qer.met {
        println!(
            "- {:.2} points, threshold {:.0} met",
            view.qer.points, view.qer.threshold
        );
    } else {
        println!(
            "- {:.2} points, {:.2} short of the {:.0} threshold",
            view.qer.points, view.qer.shortfall, view.qer.threshold
        );
    }
    println!(
        "- counted toward total: {:.2} (cap {:.0})",
        view.qer.counted_toward_total, view.qer.cap
    );

    println!("\nCore categories (fire / emergency / infection / gender)");
    if view.core.met {
        println!(
            "- {:.2} points, threshold {:.0} met, every category taken",
            view.core.points, view.core.threshold
        );
    } else {
        println!(
            "- {:.2} points (threshold {:.0}), sum met: {}, every category taken: {}",
            view.core.points, view.core.threshold, view.core.sum_met, view.core.all_categories_taken
        );
    }
    if let Some(reminder) = view.core.per_category_reminder {
        println!("  note: {reminder}");
    }

    println!("\nCultural sensitivity (cutover {})", view.cultural.cutover_date);
    println!(
        "- legacy rule: {:.2} / {:.0} points",
        view.cultural.legacy_capped, view.cultural.legacy_cap
    );
    println!("- current rule: {:.2} points", view.cultural.current_total);
    println!("  note: {}", view.cultural.annual_minimum_reminder);

    println!(
        "\nOnline credit counted: {:.2} / {:.0} (raw online total {:.2})",
        view.online_points_counted, view.online_cap, view.total_online_sum
    );
    println!("Certificate validity: {}", view.expiry_note);
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
