use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Extension,
};

use crate::cache::organization_examples_path;
use crate::database::models::Example;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::repositories::RepositoryError;
use crate::state::AppState;

const CSV_HEADER: &str = "id,name,value,is_active,created_at,updated_at";

/// GET /downloads/examples.csv - active examples of the caller's organization
pub async fn examples_csv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let ctx = user.context();
    let org = state
        .actions
        .get_current_organization(&ctx)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;

    let path = format!("{}/export.csv", organization_examples_path(org.id));
    let actions = &state.actions;
    let org_id = org.id;
    let view = actions
        .cache()
        .get_or_render(&path, move || async move {
            let rows = actions.get_examples(&ctx, org_id).await?;
            Ok::<_, RepositoryError>(render_csv(&rows))
        })
        .await?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"examples.csv\""),
        ],
        view.body.to_string(),
    )
        .into_response())
}

pub fn render_csv(rows: &[Example]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let line = [
            row.id.to_string(),
            csv_field(&row.name),
            row.value.to_string(),
            row.is_active.to_string(),
            row.created_at.to_rfc3339(),
            row.updated_at.to_rfc3339(),
        ]
        .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// RFC 4180 quoting
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
