use diesel::prelude::*;
use diesel_async::RunQueryDsl;

pub fn router() -> axum::Router {
    axum::Router::new()
        .route("/code", axum::routing::post(login))
        .route("/status", axum::routing::get(status))
}

#[derive(Debug, serde::Deserialize)]
struct CodeLogin {
    code: String,
}

/// Consumes an already issued access code. Issuing codes is an operator
/// concern and has no endpoint here.
#[tracing::instrument(skip(session, payload))]
async fn login(
    mut session: crate::UserSession,
    axum::Json(payload): axum::Json<CodeLogin>,
) -> Result<axum::response::Json<common::SessionStatus>, (axum::http::StatusCode, &'static str)> {
    let code = payload.code.trim().to_uppercase();
    if code.is_empty() {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Please enter an access code",
        ));
    }

    let query = crate::schema::access_codes::dsl::access_codes
        .filter(crate::schema::access_codes::dsl::code.eq(&code))
        .select(crate::models::AccessCode::as_select());

    let mut db_con = crate::db_connection().await;

    let mut result: Vec<crate::models::AccessCode> = match query.load(&mut db_con).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Querying access codes: {:?}", e);
            return Err((
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to validate access code",
            ));
        }
    };

    let entry = match result.pop() {
        Some(entry) => entry,
        None => {
            return Err((axum::http::StatusCode::UNAUTHORIZED, "Invalid access code"));
        }
    };

    let role = match crate::Role::from_str(&entry.role) {
        Some(role) => role,
        None => {
            tracing::error!("Unknown role {:?} on access code", entry.role);
            return Err((
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Access code is misconfigured",
            ));
        }
    };

    let team_id = entry.team_id;
    session
        .modify_data(|data| {
            data.role = Some(role);
            data.team_id = team_id;
            data.code_used = Some(code);
        })
        .await;

    Ok(axum::Json(common::SessionStatus {
        role: role.as_str().to_string(),
        team_id: team_id.map(|id| id.to_string()),
    }))
}

#[tracing::instrument(skip(session))]
async fn status(
    session: crate::UserSession,
) -> Result<axum::response::Json<common::SessionStatus>, axum::http::StatusCode> {
    match session.data().role {
        Some(role) => Ok(axum::Json(common::SessionStatus {
            role: role.as_str().to_string(),
            team_id: session.data().team_id.map(|id| id.to_string()),
        })),
        None => Err(axum::http::StatusCode::UNAUTHORIZED),
    }
}
