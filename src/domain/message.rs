use super::types::{format_float, ClassificationResult, Verdict};

pub const RESULT_SUBJECT: &str = "Résultat de la prédiction";

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl NotificationRequest {
    pub fn for_result(recipient: &str, url: &str, result: &ClassificationResult) -> Self {
        Self {
            recipient: recipient.to_string(),
            subject: RESULT_SUBJECT.to_string(),
            body: result_body(url, result),
        }
    }
}

fn result_body(url: &str, result: &ClassificationResult) -> String {
    let percent = format_float(round_to(result.probability * 100.0, 3));
    match result.verdict {
        Verdict::Safe => format!("Selon notre analyse le site {url} est sûr à {percent}%"),
        Verdict::Malicious => {
            format!("Selon notre analyse le site {url} est malveillant à {percent}%")
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_template_embeds_url_and_percentage() {
        let result = ClassificationResult {
            verdict: Verdict::Safe,
            probability: 0.87,
        };
        let request = NotificationRequest::for_result("a@b.com", "https://example.com", &result);
        assert_eq!(request.recipient, "a@b.com");
        assert_eq!(request.subject, RESULT_SUBJECT);
        assert_eq!(
            request.body,
            "Selon notre analyse le site https://example.com est sûr à 87.0%"
        );
    }

    #[test]
    fn malicious_template_rounds_to_three_decimals() {
        let result = ClassificationResult {
            verdict: Verdict::Malicious,
            probability: 0.123456789,
        };
        let request = NotificationRequest::for_result("a@b.com", "http://bad.test", &result);
        assert_eq!(
            request.body,
            "Selon notre analyse le site http://bad.test est malveillant à 12.346%"
        );
    }
}
