use crate::app_env::DataServiceConfig;
use crate::domain::session::Session;

/// Provides access to the clients and connection details needed to reach external systems,
/// scoped to whoever is making the current request
pub trait ExternalConnectivity {
    /// HTTP client used to talk to the hosted data/auth service
    fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware;

    /// Location and public key of the hosted data/auth service
    fn data_service(&self) -> &DataServiceConfig;

    /// The session stored in the requester's browser, if they have one
    fn session(&self) -> Option<&Session>;
}
