//! HTTP client for the catalog REST API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use shared::{ApiResponse, Product, ProductPayload};

/// Multipart field carrying the JSON-shaped product fields
pub const PRODUCT_FIELD: &str = "product";
/// Multipart field repeated once per pending image
pub const IMAGES_FIELD: &str = "images";
/// Multipart field listing persisted images to delete
pub const REMOVED_IMAGES_FIELD: &str = "removedImages";

/// HTTP client for making network requests to the catalog API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.delete(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with a multipart body
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> ClientResult<T> {
        let request = self.authorize(self.client.post(self.url(path)).multipart(form));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with a multipart body
    pub async fn put_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> ClientResult<T> {
        let request = self.authorize(self.client.put(self.url(path)).multipart(form));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            // Prefer the structured envelope when the server sent one
            if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
                && !envelope.is_success()
                && status != StatusCode::UNAUTHORIZED
            {
                return Err(ClientError::Api(envelope.to_error()));
            }
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::Validation(text))
                }
                // Bare status: keep whatever the status tells us
                _ => match ErrorCode::from_http_status(status) {
                    ErrorCode::InternalError => Err(ClientError::Internal(text)),
                    code => Err(ClientError::Api(AppError::with_message(code, text))),
                },
            };
        }

        response.json().await.map_err(Into::into)
    }

    fn unwrap_product(envelope: ApiResponse<Product>) -> ClientResult<Product> {
        envelope
            .into_result()
            .map_err(ClientError::Api)?
            .ok_or_else(|| ClientError::InvalidResponse("Missing product data".to_string()))
    }

    // ========== Product API ==========

    /// Fetch a single product
    pub async fn fetch_product(&self, id: &str) -> ClientResult<Product> {
        let envelope = self
            .get::<ApiResponse<Product>>(&format!("/api/products/{}", id))
            .await?;
        Self::unwrap_product(envelope)
    }

    /// Create a product; the server assigns every missing id
    pub async fn create_product(&self, payload: &ProductPayload) -> ClientResult<Product> {
        let form = product_form(payload, &[])?;
        tracing::debug!(
            pending_images = payload.pending_image_count(),
            "Creating product"
        );
        let envelope = self
            .post_multipart::<ApiResponse<Product>>("/api/products", form)
            .await?;
        Self::unwrap_product(envelope)
    }

    /// Update a product, deleting `removed_images` server-side
    pub async fn update_product(
        &self,
        id: &str,
        payload: &ProductPayload,
        removed_images: &[String],
    ) -> ClientResult<Product> {
        let form = product_form(payload, removed_images)?;
        tracing::debug!(
            product_id = %id,
            pending_images = payload.pending_image_count(),
            removed_images = removed_images.len(),
            "Updating product"
        );
        let envelope = self
            .put_multipart::<ApiResponse<Product>>(&format!("/api/products/{}", id), form)
            .await?;
        Self::unwrap_product(envelope)
    }

    /// Delete a product
    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        let envelope = self
            .delete::<ApiResponse<serde_json::Value>>(&format!("/api/products/{}", id))
            .await?;
        if !envelope.is_success() {
            return Err(ClientError::Api(envelope.to_error()));
        }
        Ok(())
    }
}

/// JSON fields of the multipart body
///
/// Pending images are removed from `images`; persisted ones are listed under
/// `existingImages` and kept by reference.
pub fn product_fields(payload: &ProductPayload) -> ClientResult<serde_json::Value> {
    let mut fields = serde_json::to_value(payload)?;
    let obj = fields
        .as_object_mut()
        .ok_or_else(|| ClientError::InvalidResponse("Product payload is not an object".into()))?;
    obj.remove("images");
    obj.insert(
        "existingImages".to_string(),
        serde_json::to_value(payload.existing_images())?,
    );
    Ok(fields)
}

/// Build the multipart body: JSON fields, one binary part per pending image
/// (draft order) and the removed-image list.
pub fn product_form(payload: &ProductPayload, removed_images: &[String]) -> ClientResult<Form> {
    let fields = product_fields(payload)?;
    let mut form = Form::new().text(PRODUCT_FIELD, fields.to_string());

    for (index, image) in payload.images.iter().filter_map(|img| img.as_inline()).enumerate() {
        let bytes = image
            .to_bytes()
            .map_err(|e| ClientError::InvalidImage(e.to_string()))?;
        let part = Part::bytes(bytes)
            .file_name(format!("image-{}.{}", index, image.extension()))
            .mime_str(&image.mime)
            .map_err(|e| ClientError::InvalidImage(e.to_string()))?;
        form = form.part(IMAGES_FIELD, part);
    }

    if !removed_images.is_empty() {
        form = form.text(REMOVED_IMAGES_FIELD, serde_json::to_string(removed_images)?);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::{ImageRef, InlineImage, SizePayload, VariantPayload};

    fn payload(images: Vec<ImageRef>) -> ProductPayload {
        ProductPayload {
            id: None,
            name: "Trench".to_string(),
            product_type: "coat".to_string(),
            price: Decimal::new(19900, 2),
            producer: "Atelier".to_string(),
            description: "Water resistant".to_string(),
            material: "cotton".to_string(),
            images,
            variants: vec![VariantPayload {
                id: None,
                color: "beige".to_string(),
                sizes: vec![SizePayload {
                    id: None,
                    label: "M".to_string(),
                    stock: 2,
                }],
            }],
        }
    }

    #[test]
    fn test_product_fields_split_images() {
        let p = payload(vec![
            ImageRef::remote("https://cdn.example.com/1.jpg"),
            InlineImage::from_bytes("image/png", b"new").into(),
        ]);
        let fields = product_fields(&p).unwrap();
        assert!(fields.get("images").is_none());
        assert_eq!(fields["existingImages"][0], "https://cdn.example.com/1.jpg");
        assert_eq!(fields["existingImages"].as_array().unwrap().len(), 1);
        assert!(fields.get("_id").is_none());
        assert_eq!(fields["variants"][0]["sizes"][0]["size"], "M");
    }

    #[test]
    fn test_product_form_rejects_corrupt_inline_image() {
        let broken = ImageRef::Inline(InlineImage {
            mime: "image/png".to_string(),
            data: "!!not base64!!".to_string(),
        });
        let result = product_form(&payload(vec![broken]), &[]);
        assert!(matches!(result, Err(ClientError::InvalidImage(_))));
    }

    #[test]
    fn test_url_join() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(client.url("/api/products"), "http://localhost:8080/api/products");
        assert_eq!(client.url("api/products/p1"), "http://localhost:8080/api/products/p1");
        assert!(client.token().is_none());
        assert_eq!(client.with_token("t").token(), Some("t"));
    }
}
