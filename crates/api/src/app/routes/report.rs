use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};
use serde_json::json;

use crate::app::services::AppService;
use crate::app::{dto, errors};

/// Balance matrix plus the ordered product and location lists for rendering.
///
/// `balance[product_id][location_id]` holds the net quantity; every pair is
/// present. `rows` repeats the matrix in display order.
pub async fn balance_report(Extension(service): Extension<Arc<AppService>>) -> axum::response::Response {
    let report = match service.report().await {
        Ok(r) => r,
        Err(e) => return errors::store_error_to_response(e),
    };

    let rows: Vec<_> = report
        .products()
        .iter()
        .map(|p| {
            let cells: Vec<_> = report
                .row(p.product_id())
                .unwrap_or_default()
                .into_iter()
                .map(|(l, qty)| json!({ "location_id": l.location_id().as_str(), "qty": qty }))
                .collect();
            json!({
                "product_id": p.product_id().as_str(),
                "name": p.name().as_str(),
                "cells": cells,
                "total": report.product_total(p.product_id()).unwrap_or(0),
            })
        })
        .collect();

    Json(json!({
        "products": report.products().iter().map(dto::product_to_json).collect::<Vec<_>>(),
        "locations": report.locations().iter().map(dto::location_to_json).collect::<Vec<_>>(),
        "balance": report.matrix(),
        "rows": rows,
    }))
    .into_response()
}
