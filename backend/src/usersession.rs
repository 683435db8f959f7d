#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum Role {
    Admin,
    Player,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Player => "player",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "player" => Some(Self::Player),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct SessionData {
    pub role: Option<Role>,
    pub team_id: Option<uuid::Uuid>,
    pub code_used: Option<String>,
}

pub struct UserSession {
    pub session: tower_sessions::Session,
    data: SessionData,
}

impl UserSession {
    pub const KEY: &'static str = "user.data";

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub async fn modify_data<F>(&mut self, func: F)
    where
        F: FnOnce(&mut SessionData),
    {
        let mut entry = &mut self.data;
        func(&mut entry);

        self.session.insert(Self::KEY, entry).await.unwrap();
    }

    pub fn require_admin(&self) -> Result<(), (axum::http::StatusCode, &'static str)> {
        match self.data.role {
            Some(Role::Admin) => Ok(()),
            _ => Err((axum::http::StatusCode::UNAUTHORIZED, "Admin access required")),
        }
    }

    /// Players and admins may submit screenshots.
    pub fn require_participant(&self) -> Result<Role, (axum::http::StatusCode, &'static str)> {
        self.data
            .role
            .ok_or((axum::http::StatusCode::UNAUTHORIZED, "Not logged in"))
    }
}

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for UserSession
where
    S: Send + Sync,
{
    type Rejection = (axum::http::StatusCode, &'static str);

    async fn from_request_parts(
        req: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let session = tower_sessions::Session::from_request_parts(req, state).await?;

        let guest_data: SessionData = session.get(Self::KEY).await.unwrap().unwrap_or_default();

        Ok(Self {
            session,
            data: guest_data,
        })
    }
}
