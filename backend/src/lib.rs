pub mod models;
pub mod schema;

mod usersession;
pub use usersession::{Role, SessionData, UserSession};

pub mod diesel_sessionstore;

pub mod admission;
pub mod analyzer;
pub mod archive;
pub mod scheduler;
pub mod standings;
pub mod storage;

pub async fn db_connection() -> diesel_async::AsyncPgConnection {
    use diesel_async::AsyncConnection;

    let database_url = std::env::var("DATABASE_URL").expect("'DATABASE_URL' must be set");

    diesel_async::AsyncPgConnection::establish(&database_url)
        .await
        .unwrap_or_else(|e| panic!("Error connecting to {} - {:?}", database_url, e))
}

#[derive(Debug)]
pub struct UploadedScreenshot {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: axum::body::Bytes,
}

#[derive(Debug)]
pub struct UploadForm {
    pub team: uuid::Uuid,
    pub day: i32,
    pub match_number: i32,
    pub screenshots: Vec<UploadedScreenshot>,
}

pub async fn collect_upload_form(
    mut form: axum::extract::Multipart,
) -> Result<UploadForm, String> {
    let mut team = None;
    let mut day = None;
    let mut match_number = None;
    let mut screenshots = Vec::new();

    while let Ok(field) = form.next_field().await {
        let field = match field {
            Some(f) => f,
            None => break,
        };

        let field_name = field.name().map(|n| n.to_string());

        match field_name.as_deref() {
            Some("team") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| format!("Reading team field: {:?}", e))?;
                team = Some(
                    text.parse::<uuid::Uuid>()
                        .map_err(|e| format!("Parsing team id: {:?}", e))?,
                );
            }
            Some("day") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| format!("Reading day field: {:?}", e))?;
                day = Some(
                    text.parse::<i32>()
                        .map_err(|e| format!("Parsing day: {:?}", e))?,
                );
            }
            Some("match_number") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| format!("Reading match_number field: {:?}", e))?;
                match_number = Some(
                    text.parse::<i32>()
                        .map_err(|e| format!("Parsing match_number: {:?}", e))?,
                );
            }
            Some("screenshot") => {
                let file_name = field.file_name().unwrap_or("screenshot").to_string();
                let content_type = field.content_type().map(|c| c.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Reading screenshot data: {:?}", e))?;

                screenshots.push(UploadedScreenshot {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(UploadForm {
        team: team.ok_or_else(|| "Missing team field".to_string())?,
        day: day.ok_or_else(|| "Missing day field".to_string())?,
        match_number: match_number.ok_or_else(|| "Missing match_number field".to_string())?,
        screenshots,
    })
}

pub mod api;
