//! Input validation for admin payloads

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{AmenitiesInput, NewPlace, PlacePayload};

/// Longest accepted place name, in characters
const MAX_NAME_LENGTH: usize = 200;

/// Highest accepted rating
const MAX_RATING: f64 = 5.0;

/// Trim a text field; blank becomes `None`
fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn non_negative_int(field: &str, value: Option<i32>) -> Result<Option<i32>, String> {
    match value {
        Some(v) if v < 0 => Err(format!("{} must not be negative", field)),
        other => Ok(other),
    }
}

fn non_negative_float(field: &str, value: Option<f64>) -> Result<Option<f64>, String> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(format!("{} must be a non-negative number", field))
        }
        other => Ok(other),
    }
}

/// Validate place name
pub fn validate_name(name: &str) -> Result<String, String> {
    let name = name.trim();

    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must be at most {} characters long",
            MAX_NAME_LENGTH
        ));
    }

    Ok(name.to_string())
}

/// Split amenities into trimmed, non-empty labels
pub fn parse_amenities(input: Option<AmenitiesInput>) -> Vec<String> {
    let labels = match input {
        None => return Vec::new(),
        Some(AmenitiesInput::List(list)) => list,
        Some(AmenitiesInput::Text(text)) => text.split(',').map(str::to_string).collect(),
    };

    labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Validate and normalize a place payload
pub fn validate_place(payload: PlacePayload) -> Result<NewPlace, String> {
    let name = validate_name(&payload.name)?;

    let rating = non_negative_float("rating", payload.rating)?;
    if rating.is_some_and(|r| r > MAX_RATING) {
        return Err(format!("rating must be between 0 and {}", MAX_RATING));
    }

    let images = payload.images.map(|images| {
        images
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect()
    });

    Ok(NewPlace {
        name,
        description: clean_text(payload.description),
        address: clean_text(payload.address),
        city: clean_text(payload.city),
        country: clean_text(payload.country),
        price_per_night: non_negative_float("price_per_night", payload.price_per_night)?,
        max_guests: non_negative_int("max_guests", payload.max_guests)?,
        bedrooms: non_negative_int("bedrooms", payload.bedrooms)?,
        bathrooms: non_negative_int("bathrooms", payload.bathrooms)?,
        image_url: clean_text(payload.image_url),
        images,
        amenities: parse_amenities(payload.amenities),
        rating,
        review_count: non_negative_int("review_count", payload.review_count)?,
        is_active: payload.is_active,
    })
}

/// Lowercased extension of an image file name
pub fn image_extension(file_name: &str) -> Result<String, String> {
    static IMAGE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = IMAGE_NAME_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[\w\-. ]+\.(jpe?g|png|webp|gif)$")
            .expect("Failed to compile image name regex")
    });

    regex
        .captures(file_name.trim())
        .and_then(|captures| captures.get(1))
        .map(|ext| ext.as_str().to_ascii_lowercase())
        .ok_or_else(|| "File must be a jpg, jpeg, png, webp or gif image".to_string())
}

/// Validate an upload's declared content type
pub fn validate_content_type(content_type: &str) -> Result<(), String> {
    let content_type = content_type.trim().to_ascii_lowercase();

    match content_type.strip_prefix("image/") {
        Some(subtype) if !subtype.is_empty() => Ok(()),
        _ => Err("Content type must be an image".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> PlacePayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Sea Loft ").unwrap(), "Sea Loft");
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(200)).is_ok());
        assert!(validate_name(&"a".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_place_normalizes() {
        let place = validate_place(payload(
            r#"{
                "name": " Sea Loft ",
                "description": "   ",
                "city": " Miami ",
                "price_per_night": 120.0,
                "max_guests": 4,
                "amenities": "WiFi, , Pool ,",
                "images": [" https://cdn/1.jpg ", ""]
            }"#,
        ))
        .unwrap();

        assert_eq!(place.name, "Sea Loft");
        assert_eq!(place.description, None);
        assert_eq!(place.city.as_deref(), Some("Miami"));
        assert_eq!(place.amenities, vec!["WiFi", "Pool"]);
        assert_eq!(place.images, Some(vec!["https://cdn/1.jpg".to_string()]));
        assert!(place.is_active);
    }

    #[test]
    fn test_validate_place_rejects_bad_numbers() {
        assert!(validate_place(payload(r#"{"name": "Loft", "price_per_night": -1}"#)).is_err());
        assert!(validate_place(payload(r#"{"name": "Loft", "max_guests": -2}"#)).is_err());
        assert!(validate_place(payload(r#"{"name": "Loft", "bedrooms": -1}"#)).is_err());
        assert!(validate_place(payload(r#"{"name": "Loft", "rating": 5.5}"#)).is_err());
        assert!(validate_place(payload(r#"{"name": "Loft", "rating": 4.8}"#)).is_ok());
        assert!(validate_place(payload(r#"{"name": ""}"#)).is_err());
    }

    #[test]
    fn test_parse_amenities() {
        assert!(parse_amenities(None).is_empty());
        assert_eq!(
            parse_amenities(Some(AmenitiesInput::List(vec![
                " Parking ".into(),
                "".into(),
                "Sea view".into()
            ]))),
            vec!["Parking", "Sea view"]
        );
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("beach.JPG").unwrap(), "jpg");
        assert_eq!(image_extension("my villa-2.webp").unwrap(), "webp");
        assert_eq!(image_extension("cover.jpeg").unwrap(), "jpeg");
        assert!(image_extension("notes.pdf").is_err());
        assert!(image_extension("png").is_err());
        assert!(image_extension("../etc/passwd.png").is_err());
    }

    #[test]
    fn test_validate_content_type() {
        assert!(validate_content_type("image/png").is_ok());
        assert!(validate_content_type("Image/JPEG").is_ok());
        assert!(validate_content_type("application/pdf").is_err());
        assert!(validate_content_type("image/").is_err());
    }
}
