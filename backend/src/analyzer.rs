use futures::FutureExt;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyzedPlayer {
    pub name: String,
    #[serde(default)]
    pub kills: i32,
    #[serde(default)]
    pub damage: i32,
}

/// What the vision endpoint extracted from one screenshot. A null placement
/// or kill count means the value could not be read from the image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalyzedScreenshot {
    #[serde(default)]
    pub placement: Option<i32>,
    #[serde(default)]
    pub kills: Option<i32>,
    #[serde(default)]
    pub players: Option<Vec<AnalyzedPlayer>>,
    #[serde(default)]
    pub error: Option<String>,
}

pub trait ScreenshotAnalyzer: Send + Sync {
    fn duplicate(&self) -> Box<dyn ScreenshotAnalyzer>;

    fn analyze<'f, 'own>(
        &'own self,
        image_url: String,
    ) -> futures::future::BoxFuture<'f, Result<AnalyzedScreenshot, String>>
    where
        'own: 'f;
}

pub struct HttpAnalyzer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpAnalyzer {
    pub fn new<IS>(endpoint: IS, api_key: IS) -> Self
    where
        IS: Into<String>,
    {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

impl ScreenshotAnalyzer for HttpAnalyzer {
    fn duplicate(&self) -> Box<dyn ScreenshotAnalyzer> {
        Box::new(Self {
            http: self.http.clone(),
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
        })
    }

    fn analyze<'f, 'own>(
        &'own self,
        image_url: String,
    ) -> futures::future::BoxFuture<'f, Result<AnalyzedScreenshot, String>>
    where
        'own: 'f,
    {
        async move {
            let response = self
                .http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&serde_json::json!({ "imageUrl": image_url }))
                .send()
                .await
                .map_err(|e| format!("Sending analysis request: {:?}", e))?;

            if !response.status().is_success() {
                return Err(format!("Analysis endpoint returned {}", response.status()));
            }

            let result: AnalyzedScreenshot = response
                .json()
                .await
                .map_err(|e| format!("Decoding analysis response: {:?}", e))?;

            match result.error {
                Some(error) => Err(error),
                None => Ok(result),
            }
        }
        .boxed()
    }
}
