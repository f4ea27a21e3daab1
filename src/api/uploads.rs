//! Multipart uploads: ingredient recognition and recipe images

use reqwest::multipart::{Form, Part};

use super::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{RecognizedIngredients, UploadedImage};

/// A file picked in the browser, already read into memory
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    fn into_part(self) -> Result<Part, ApiError> {
        let mime = if self.mime.is_empty() {
            "application/octet-stream".to_string()
        } else {
            self.mime
        };
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&mime)
            .map_err(|e| ApiError::Validation(format!("invalid image type: {}", e)))
    }
}

impl ApiClient {
    /// Names of the ingredients visible in a photo
    pub async fn recognize_ingredients(&self, image: ImageUpload) -> Result<Vec<String>, ApiError> {
        let form = Form::new().part("image", image.into_part()?);
        let request = self.http.post(self.url("/recognize-ingredients")).multipart(form);
        let recognized: RecognizedIngredients = self.send(request, Auth::Optional).await?;
        Ok(recognized.ingredients)
    }

    /// Store a recipe image and return its public URL
    pub async fn upload_image(&self, image: ImageUpload) -> Result<String, ApiError> {
        let form = Form::new().part("file", image.into_part()?);
        let request = self.http.post(self.url("/upload-image")).multipart(form);
        let uploaded: UploadedImage = self.send(request, Auth::Optional).await?;
        Ok(uploaded.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::client;

    fn photo() -> ImageUpload {
        ImageUpload {
            file_name: "dish.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8, 0xff],
        }
    }

    #[test]
    fn test_missing_mime_defaults_to_octet_stream() {
        let upload = ImageUpload { mime: String::new(), ..photo() };
        assert!(upload.into_part().is_ok());
    }
}
