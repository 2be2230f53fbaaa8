//! Variant Studio - Product Variant Administration Service

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use validator::Validate;

use variant_studio::domain::{
    validate_template, BulkPricing, NewVariant, StepOutcome, SubmissionReport, TemplateCatalog,
    TemplateCategory, TemplateDraft, TemplateValidation, ValueDraft, VariantEvent, VariantTemplate,
    WizardSession,
};
use variant_studio::store::{self, PgVariantWriter, ProductVariant, VariantPatch};
use variant_studio::Error;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub nats: Option<async_nats::Client>,
    pub catalog: Arc<TemplateCatalog>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = PgPoolOptions::new().max_connections(10).connect(&std::env::var("DATABASE_URL")?).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    let nats = match std::env::var("NATS_URL") {
        Ok(url) => match async_nats::connect(&url).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("NATS unavailable, events disabled: {e}");
                None
            }
        },
        Err(_) => None,
    };
    let state = AppState { db, nats, catalog: Arc::new(TemplateCatalog::builtin()) };

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "variant-studio"})) }))
        .route("/api/v1/variant-templates", get(list_templates))
        .route("/api/v1/variant-templates/validate", post(validate_draft))
        .route("/api/v1/variant-templates/:id", get(get_template))
        .route("/api/v1/products/:product_id/variants", get(list_variants).post(create_variant))
        .route("/api/v1/products/:product_id/variants/generate", post(generate_variants))
        .route("/api/v1/variants/:id", put(update_variant).delete(delete_variant))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    tracing::info!("🚀 Variant Studio listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct TemplateParams {
    pub category: Option<TemplateCategory>,
}

async fn list_templates(State(s): State<AppState>, Query(p): Query<TemplateParams>) -> Json<Vec<VariantTemplate>> {
    let templates = match p.category {
        Some(category) => s.catalog.by_category(category).into_iter().cloned().collect(),
        None => s.catalog.all().to_vec(),
    };
    Json(templates)
}

async fn get_template(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<VariantTemplate>, (StatusCode, String)> {
    s.catalog.get(&id).cloned().map(Json).ok_or((StatusCode::NOT_FOUND, Error::TemplateNotFound(id).to_string()))
}

async fn validate_draft(Json(draft): Json<TemplateDraft>) -> Json<TemplateValidation> {
    Json(validate_template(&draft))
}

async fn list_variants(State(s): State<AppState>, Path(product_id): Path<String>) -> Result<Json<Vec<ProductVariant>>, (StatusCode, String)> {
    let variants = store::list_for_product(&s.db, &product_id).await.map_err(storage_error)?;
    Ok(Json(variants))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVariantRequest {
    #[validate(length(min = 1))]
    pub variant_name: String,
    #[validate(length(min = 1))]
    pub variant_value: String,
    #[serde(default)]
    pub price_adjustment: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock_quantity: i64,
}

async fn create_variant(State(s): State<AppState>, Path(product_id): Path<String>, Json(r): Json<CreateVariantRequest>) -> Result<(StatusCode, Json<ProductVariant>), (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let record = NewVariant {
        product_id,
        variant_name: r.variant_name,
        variant_value: r.variant_value,
        price_adjustment: r.price_adjustment,
        stock_quantity: r.stock_quantity,
        is_active: true,
    };
    let row = store::insert_variant(&s.db, &record).await.map_err(storage_error)?;
    publish_event(&s, VariantEvent::Created {
        product_id: row.product_id.clone(),
        variant_name: row.variant_name.clone(),
        variant_value: row.variant_value.clone(),
    })
    .await;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Wizard submission payload: a catalog template id or custom values, with
/// optional name/value overrides and an optional bulk pricing pass.
#[derive(Debug, Deserialize)]
pub struct GenerateVariantsRequest {
    pub template_id: Option<String>,
    pub variant_name: Option<String>,
    pub values: Option<Vec<ValueDraft>>,
    pub bulk_pricing: Option<BulkPricing>,
}

async fn generate_variants(State(s): State<AppState>, Path(product_id): Path<String>, Json(r): Json<GenerateVariantsRequest>) -> Result<(StatusCode, Json<SubmissionReport>), (StatusCode, String)> {
    let mut session = WizardSession::new();
    match r.template_id.as_deref() {
        Some(id) => {
            let template = s.catalog.get(id).ok_or((StatusCode::NOT_FOUND, Error::TemplateNotFound(id.to_string()).to_string()))?;
            session.select_template(template);
        }
        None => session.enable_custom(),
    }
    if let Some(name) = r.variant_name {
        session.set_variant_name(name);
    }
    if let Some(drafts) = &r.values {
        let draft = TemplateDraft {
            name: Some(session.variant_name().to_string()),
            default_values: Some(drafts.clone()),
        };
        let validation = validate_template(&draft);
        if !validation.is_valid {
            return Err((StatusCode::UNPROCESSABLE_ENTITY, validation.errors.join("; ")));
        }
        session.set_values(drafts.iter().enumerate().map(|(i, d)| d.into_value(i as i32 + 1)).collect());
    }

    if !session.next() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "select a template or provide custom values".to_string()));
    }
    if !session.next() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "variant name and every value label and code are required".to_string()));
    }
    if let Some(pricing) = r.bulk_pricing {
        session.apply_bulk_pricing(pricing);
    }
    if !session.next() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "stock quantities must be non-negative".to_string()));
    }

    let writer = PgVariantWriter::new(s.db.clone());
    let report = session.submit(&product_id, &writer).await.map_err(|e| (StatusCode::CONFLICT, e.to_string()))?;

    for step in &report.steps {
        if step.outcome == StepOutcome::Created {
            publish_event(&s, VariantEvent::Created {
                product_id: step.record.product_id.clone(),
                variant_name: step.record.variant_name.clone(),
                variant_value: step.record.variant_value.clone(),
            })
            .await;
        }
    }

    if report.is_complete() {
        Ok((StatusCode::CREATED, Json(report)))
    } else {
        Err((StatusCode::INTERNAL_SERVER_ERROR, format!(
            "created {} of {} variants: {}",
            report.created(),
            report.total(),
            report.failure().unwrap_or("storage error"),
        )))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVariantRequest {
    #[validate(length(min = 1))]
    pub variant_value: Option<String>,
    pub price_adjustment: Option<i64>,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i64>,
    pub is_active: Option<bool>,
}

async fn update_variant(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<UpdateVariantRequest>) -> Result<Json<ProductVariant>, (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let patch = VariantPatch {
        variant_value: r.variant_value,
        price_adjustment: r.price_adjustment,
        stock_quantity: r.stock_quantity,
        is_active: r.is_active,
    };
    let row = store::update_variant(&s.db, id, &patch).await.map_err(storage_error)?;
    publish_event(&s, VariantEvent::Updated { variant_id: row.id.to_string() }).await;
    Ok(Json(row))
}

async fn delete_variant(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, (StatusCode, String)> {
    store::delete_variant(&s.db, id).await.map_err(storage_error)?;
    publish_event(&s, VariantEvent::Deleted { variant_id: id.to_string() }).await;
    Ok(StatusCode::NO_CONTENT)
}

fn storage_error(e: Error) -> (StatusCode, String) {
    match e {
        Error::VariantNotFound => (StatusCode::NOT_FOUND, e.to_string()),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

async fn publish_event(s: &AppState, event: VariantEvent) {
    let Some(nats) = &s.nats else { return };
    match serde_json::to_vec(&event) {
        Ok(payload) => {
            if let Err(e) = nats.publish(event.subject().to_string(), payload.into()).await {
                tracing::warn!("failed to publish {}: {e}", event.subject());
            }
        }
        Err(e) => tracing::warn!("failed to encode {}: {e}", event.subject()),
    }
}
