//! CLI demo for the category slice.
//!
//! Runs every operation once against the in-memory backend, or against a
//! REST backend when `CATEGORY_API_BASE_URL` is set (in the environment or a
//! `.env` file), then prints the Prometheus metrics the run produced.

use anyhow::Context;
use shopadmin_category::{
    Category, CategoryAction, CategoryRequest, CategoryService, CategoryState, CategoryStore,
    HttpCategoryService, InMemoryCategoryService, NewCategory,
};
use shopadmin_runtime::metrics::MetricsRecorder;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const WAIT: Duration = Duration::from_secs(10);

fn print_state(label: &str, state: &CategoryState) {
    println!("\n{label}:");
    for category in &state.categories {
        println!("  [{}] {}", category.id, category.name);
    }
    if let Some(selected) = &state.category {
        println!("  selected: [{}] {}", selected.id, selected.name);
    }
    println!(
        "  loading={} error={} success={} message={:?}",
        state.status.is_loading,
        state.status.is_error,
        state.status.is_success,
        state.status.message.text()
    );
}

fn describe(action: &CategoryAction) -> String {
    match action {
        CategoryAction::Fulfilled(response) => format!("{} fulfilled", response.operation()),
        CategoryAction::Rejected { operation, payload } => format!("{operation} rejected: {payload}"),
        CategoryAction::Requested(request) => format!("{} requested", request.operation()),
        CategoryAction::Reset => "reset".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut recorder = MetricsRecorder::new();
    recorder.install().context("installing metrics recorder")?;

    println!("=== Category Slice Demo ===");

    let service: Arc<dyn CategoryService> = if std::env::var_os("CATEGORY_API_BASE_URL").is_some() {
        let http = HttpCategoryService::from_env().context("loading CATEGORY_API_* configuration")?;
        tracing::info!(base_url = %http.base_url(), "Using REST category backend");
        Arc::new(http)
    } else {
        tracing::info!("Using in-memory category backend");
        Arc::new(InMemoryCategoryService::with_categories(vec![
            Category::new(1, "Fruit"),
            Category::new(2, "Dairy"),
        ]))
    };

    let store = CategoryStore::new(service);

    let listed = store.request_and_wait(CategoryRequest::List, WAIT).await?;
    println!("\n{}", describe(&listed));
    print_state("After list", &store.snapshot().await);

    let created = store
        .request_and_wait(CategoryRequest::Create(NewCategory::new("Bakery")), WAIT)
        .await?;
    println!("\n{}", describe(&created));

    let fetched = store
        .request_and_wait(CategoryRequest::GetOne(1.into()), WAIT)
        .await?;
    println!("{}", describe(&fetched));

    let updated = store
        .request_and_wait(CategoryRequest::Update(Category::new(2, "Dairy & Eggs")), WAIT)
        .await?;
    println!("{}", describe(&updated));

    let deleted = store
        .request_and_wait(CategoryRequest::Delete(1.into()), WAIT)
        .await?;
    println!("{}", describe(&deleted));
    print_state("After create, get, update and delete", &store.snapshot().await);

    let missing = store
        .request_and_wait(CategoryRequest::GetOne(999.into()), WAIT)
        .await?;
    println!("\n{}", describe(&missing));
    print_state("After failed get", &store.snapshot().await);

    store.reset().await?;
    print_state("After reset", &store.snapshot().await);

    store.shutdown(WAIT).await?;

    if let Some(rendered) = recorder.render() {
        println!("\nMetrics:");
        for line in rendered.lines().filter(|line| line.starts_with("slice_requests")) {
            println!("  {line}");
        }
    }

    Ok(())
}
