//! HTTP client for the orphanages backend.
//!
//! Wraps the two endpoints this client consumes: `GET /orphanages` for
//! the map listing and `POST /orphanages` for registrations, the latter
//! as a multipart form with one file part per selected photo. The
//! payload is assembled as a plain list of named fields first, so the
//! exact wire shape can be tested without a server, then lowered into a
//! [`reqwest::multipart::Form`].

use serde::Deserialize;

use crate::state::draft::OrphanageDraft;
use crate::state::gallery::Photo;

/// Backend base URL when `HAPPY_API_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// One record of the map listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrphanageSummary {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

/// Errors from the backend API layer
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code
    #[error("backend error ({status}): {body}")]
    Status {
        status: u16,
        /// Raw response body for the log
        body: String,
    },
}

/// HTTP client for the orphanages API
#[derive(Debug, Clone)]
pub struct Api {
    client: reqwest::Client,
    base_url: String,
}

impl Api {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build the client from the environment, falling back to the
    /// default local backend
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("HAPPY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        tracing::info!(%base_url, "backend configured");
        Self::new(base_url)
    }

    /// The underlying pooled client, reused for tile downloads
    pub fn http_client(&self) -> reqwest::Client {
        self.client.clone()
    }

    /// Fetch every registered orphanage
    pub async fn fetch_orphanages(&self) -> Result<Vec<OrphanageSummary>, ApiError> {
        let response = self
            .client
            .get(format!("{}/orphanages", self.base_url))
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Register a new orphanage
    ///
    /// Any 2xx response counts as success; the response body is not
    /// inspected.
    pub async fn create_orphanage(
        &self,
        draft: &OrphanageDraft,
        photos: &[Photo],
    ) -> Result<(), ApiError> {
        let form = build_form(draft_fields(draft, photos));

        let response = self
            .client
            .post(format!("{}/orphanages", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// One entry of the registration payload
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FormField {
    pub name: &'static str,
    pub value: FormValue,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FormValue {
    Text(String),
    File { filename: String, bytes: Vec<u8> },
}

/// Flatten a draft plus its photos into the multipart field list
///
/// Field order and names mirror what the backend expects, including the
/// misspelled `openig_hours`; the backend reads exactly that name.
pub(crate) fn draft_fields(draft: &OrphanageDraft, photos: &[Photo]) -> Vec<FormField> {
    let mut fields = vec![
        FormField {
            name: "name",
            value: FormValue::Text(draft.name.clone()),
        },
        FormField {
            name: "about",
            value: FormValue::Text(draft.about.clone()),
        },
        FormField {
            name: "instructions",
            value: FormValue::Text(draft.instructions.clone()),
        },
        FormField {
            name: "openig_hours",
            value: FormValue::Text(draft.opening_hours.clone()),
        },
        FormField {
            name: "open_on_weekends",
            value: FormValue::Text(draft.open_on_weekends.to_string()),
        },
        FormField {
            name: "latitude",
            value: FormValue::Text(draft.position.latitude.to_string()),
        },
        FormField {
            name: "longitude",
            value: FormValue::Text(draft.position.longitude.to_string()),
        },
    ];

    for photo in photos {
        fields.push(FormField {
            name: "images",
            value: FormValue::File {
                filename: photo.filename.clone(),
                bytes: photo.bytes.clone(),
            },
        });
    }

    fields
}

fn build_form(fields: Vec<FormField>) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();

    for field in fields {
        form = match field.value {
            FormValue::Text(value) => form.text(field.name, value),
            FormValue::File { filename, bytes } => form.part(
                field.name,
                reqwest::multipart::Part::bytes(bytes).file_name(filename),
            ),
        };
    }

    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::mercator::Coordinate;

    fn photo(filename: &str) -> Photo {
        Photo {
            filename: filename.to_string(),
            bytes: vec![1, 2, 3],
            preview: iced::widget::image::Handle::from_bytes(vec![1, 2, 3]),
        }
    }

    fn text_field<'a>(fields: &'a [FormField], name: &str) -> &'a str {
        match fields.iter().find(|f| f.name == name) {
            Some(FormField {
                value: FormValue::Text(value),
                ..
            }) => value,
            other => panic!("missing text field {}: {:?}", name, other),
        }
    }

    #[test]
    fn test_payload_matches_the_backend_contract() {
        let mut draft = OrphanageDraft::new();
        draft.set_name("Shelter A".to_string());
        draft.set_about("desc".to_string());
        draft.set_open_on_weekends(true);
        draft.set_position(Coordinate::new(-28.45, -52.20));

        let photos = vec![photo("a.png"), photo("b.png")];
        let fields = draft_fields(&draft, &photos);

        assert_eq!(fields.len(), 9);
        assert_eq!(text_field(&fields, "name"), "Shelter A");
        assert_eq!(text_field(&fields, "about"), "desc");
        assert_eq!(text_field(&fields, "instructions"), "");
        assert_eq!(text_field(&fields, "openig_hours"), "");
        assert_eq!(text_field(&fields, "open_on_weekends"), "true");
        assert_eq!(text_field(&fields, "latitude"), "-28.45");
        assert_eq!(text_field(&fields, "longitude"), "-52.2");

        let images: Vec<_> = fields.iter().filter(|f| f.name == "images").collect();
        assert_eq!(images.len(), 2);
        assert_eq!(
            images[0].value,
            FormValue::File {
                filename: "a.png".to_string(),
                bytes: vec![1, 2, 3],
            }
        );
        assert_eq!(
            images[1].value,
            FormValue::File {
                filename: "b.png".to_string(),
                bytes: vec![1, 2, 3],
            }
        );
    }

    #[test]
    fn test_weekend_flag_serializes_as_text() {
        let mut draft = OrphanageDraft::new();
        draft.set_open_on_weekends(false);

        let fields = draft_fields(&draft, &[]);
        assert_eq!(text_field(&fields, "open_on_weekends"), "false");
    }

    #[test]
    fn test_unpicked_position_is_sent_as_zero() {
        // (0, 0) doubles as "unset" and goes out as-is; the backend owns
        // the judgement call
        let fields = draft_fields(&OrphanageDraft::new(), &[]);
        assert_eq!(text_field(&fields, "latitude"), "0");
        assert_eq!(text_field(&fields, "longitude"), "0");
    }

    #[test]
    fn test_listing_deserializes() {
        let json = r#"[{"id":1,"latitude":1.0,"longitude":2.0,"name":"X"}]"#;
        let list: Vec<OrphanageSummary> = serde_json::from_str(json).unwrap();

        assert_eq!(
            list,
            vec![OrphanageSummary {
                id: 1,
                latitude: 1.0,
                longitude: 2.0,
                name: "X".to_string(),
            }]
        );
    }
}
