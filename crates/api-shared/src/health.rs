use crate::types::HealthRes;

/// Simple health service for the REST API and the CLI
///
/// Provides a standardised liveness answer for the patient records service.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Patient records service is alive".into(),
        }
    }
}
