use crate::shared::types::Coordinates;
use crate::shared::validation::sanitize_text;

/// Raw report input whose photo is already stored elsewhere
#[derive(Debug, Clone)]
pub struct NewReport {
    pub coordinates: Coordinates,
    /// Unparsed severity label, validated strictly by the service
    pub criticality: String,
    pub description: String,
    pub photo_url: Option<String>,
}

/// Photo bytes received from a multipart form
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Structured details collected by the report form
#[derive(Debug, Clone, Default)]
pub struct ReportDetails {
    pub street_address: String,
    pub zone: Option<String>,
    pub site_type: Option<String>,
    pub proximity: Option<String>,
    pub access_info: Option<String>,
    pub observations: Option<String>,
}

impl ReportDetails {
    /// Compose the single description line stored on the report.
    ///
    /// `ai_confidence` is set when the location was moved by the vision assistant.
    pub fn compose(&self, ai_confidence: Option<f64>) -> String {
        let mut description = sanitize_text(&self.street_address);

        if let Some(zone) = non_empty(&self.zone) {
            description.push_str(&format!(" - {}", zone));
        }
        if let Some(site_type) = non_empty(&self.site_type) {
            description.push_str(&format!(" | Tipo: {}", site_type));
        }
        if let Some(proximity) = non_empty(&self.proximity) {
            description.push_str(&format!(" | Cerca de: {}", proximity));
        }
        if let Some(access) = non_empty(&self.access_info) {
            description.push_str(&format!(" | Acceso: {}", access));
        }
        if let Some(obs) = non_empty(&self.observations) {
            description.push_str(&format!(" | Obs: {}", obs));
        }
        if let Some(confidence) = ai_confidence {
            description.push_str(&format!(
                " | Ubicación ajustada por IA ({}% confianza)",
                (confidence * 100.0).round() as i64
            ));
        }

        description
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(sanitize_text)
        .filter(|v| !v.is_empty())
}

/// Full photo submission as received from the report form
#[derive(Debug, Clone)]
pub struct ReportSubmission {
    pub photo: PhotoUpload,
    pub coordinates: Coordinates,
    pub criticality: String,
    pub details: ReportDetails,
    pub refine_location: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_full_description() {
        let details = ReportDetails {
            street_address: "  Av. Uruguay 1234 ".to_string(),
            zone: Some("Villa Sarita".to_string()),
            site_type: Some("Neumático".to_string()),
            proximity: Some("Escuela".to_string()),
            access_info: Some("Acceso libre".to_string()),
            observations: Some("Agua estancada".to_string()),
        };

        assert_eq!(
            details.compose(Some(0.953)),
            "Av. Uruguay 1234 - Villa Sarita | Tipo: Neumático | Cerca de: Escuela \
             | Acceso: Acceso libre | Obs: Agua estancada \
             | Ubicación ajustada por IA (95% confianza)"
        );
    }

    #[test]
    fn test_compose_skips_blank_segments() {
        let details = ReportDetails {
            street_address: "Calle 1".to_string(),
            observations: Some("   ".to_string()),
            ..Default::default()
        };

        assert_eq!(details.compose(None), "Calle 1");
    }
}
