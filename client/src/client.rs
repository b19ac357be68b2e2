//! Reqwest-backed implementation of the booking API

use crate::api::{ApiFuture, ApiResult, BookingApi};
use crate::error::ApiError;
use crate::types::{
    AvailabilityRequest, AvailabilityResponse, CreateReservationRequest, CreateTicketRequest,
    PaymentRequest, PaymentResponse,
};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Base URL used when `BOOKING_API_URL` is unset
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Per-request timeout in seconds used when `BOOKING_API_TIMEOUT_SECS` is unset
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error body shape the backend uses for non-success responses
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Booking API client backed by `reqwest`
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone)]
pub struct HttpBookingApi {
    client: Client,
    base_url: String,
}

impl HttpBookingApi {
    /// Create a client configured from environment variables
    ///
    /// Reads `BOOKING_API_URL` (default [`DEFAULT_BASE_URL`]) and
    /// `BOOKING_API_TIMEOUT_SECS` (default [`DEFAULT_TIMEOUT_SECS`]).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("BOOKING_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = std::env::var("BOOKING_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::with_timeout(base_url, Duration::from_secs(timeout_secs))
    }

    /// Create a client for the given base URL with the default timeout
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit per-request timeout
    ///
    /// The timeout belongs to the transport layer; the orchestration core
    /// itself never times a call out.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Wrap the client in an `Arc<dyn BookingApi>` for an environment
    #[must_use]
    pub fn shared(self) -> Arc<dyn BookingApi> {
        Arc::new(self)
    }

    /// The configured base URL (without a trailing slash)
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST a JSON body and decode the 200 response body
    async fn post_expecting_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string())),
            status => Err(Self::status_error(status, response).await),
        }
    }

    /// POST a JSON body and require a 201 response
    async fn post_expecting_created<B>(&self, path: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + Sync,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            status => Err(Self::status_error(status, response).await),
        }
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> ApiError {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error);

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

impl BookingApi for HttpBookingApi {
    fn check_availability(&self, request: AvailabilityRequest) -> ApiFuture<AvailabilityResponse> {
        let client = self.clone();
        Box::pin(async move {
            tracing::debug!(
                date = %request.reservation_date,
                time = %request.reservation_time,
                guests = request.guests,
                "Checking availability"
            );
            client
                .post_expecting_json("/api/omakase/availability", &request)
                .await
        })
    }

    fn authorize_payment(&self, request: PaymentRequest) -> ApiFuture<PaymentResponse> {
        let client = self.clone();
        Box::pin(async move {
            // Card fields stay out of the logs
            tracing::debug!(amount = %request.amount, "Authorizing payment");
            client.post_expecting_json("/api/payment/process", &request).await
        })
    }

    fn create_reservation(&self, request: CreateReservationRequest) -> ApiFuture<()> {
        let client = self.clone();
        Box::pin(async move {
            tracing::debug!(
                date = %request.reservation_date,
                time = %request.reservation_time,
                guests = request.guests,
                "Creating reservation"
            );
            client.post_expecting_created("/api/omakase/create", &request).await
        })
    }

    fn create_ticket(&self, request: CreateTicketRequest) -> ApiFuture<()> {
        let client = self.clone();
        Box::pin(async move {
            tracing::debug!(
                event = %request.event_type,
                guests = request.guests,
                "Creating ticket booking"
            );
            client.post_expecting_created("/api/tickets/create", &request).await
        })
    }
}
