//! Financing creation: preview the schedule, then hand the request to the
//! financing API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AmortizationError, FinancingError};
use crate::schedule::AmortizationEngine;
use crate::types::{AmortizationRequest, AmortizationResult, AmortizationSystem};

/// What the financed amount pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinancingType {
    Vehicle,
    RealEstate,
    Personal,
    Other,
}

/// Payload of a "create financing" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingRequest {
    pub principal: Decimal,
    pub rate_percent: Decimal,
    pub term_months: u32,
    pub system: AmortizationSystem,
    pub start_date: NaiveDate,
    pub financing_type: FinancingType,
    /// Monetary correction index applied by the lender (e.g. "IPCA", "TR").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FinancingRequest {
    /// The schedule parameters carried by this payload.
    pub fn amortization_request(&self) -> AmortizationRequest {
        AmortizationRequest {
            principal: self.principal,
            rate_percent: self.rate_percent,
            term_months: self.term_months,
            system: self.system,
            start_date: self.start_date,
        }
    }
}

/// Resource returned by the financing API after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFinancing {
    /// Identifier assigned by the API.
    pub id: String,
}

/// The remote API that persists financings.
pub trait FinancingGateway {
    /// Creates the financing described by `request`.
    ///
    /// # Errors
    ///
    /// Any transport or API failure.
    fn create_financing(&self, request: &FinancingRequest) -> anyhow::Result<CreatedFinancing>;
}

impl<G: FinancingGateway + ?Sized> FinancingGateway for &G {
    fn create_financing(&self, request: &FinancingRequest) -> anyhow::Result<CreatedFinancing> {
        (**self).create_financing(request)
    }
}

/// A financing accepted by the API, with the schedule that was validated for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub financing: CreatedFinancing,
    /// The schedule computed before the API call.
    pub schedule: AmortizationResult,
}

/// Previews and submits financings through one engine, so the schedule shown to
/// the user and the one validated on submission cannot drift apart.
#[derive(Debug, Clone)]
pub struct FinancingService<G> {
    engine: AmortizationEngine,
    gateway: G,
}

impl<G: FinancingGateway> FinancingService<G> {
    /// Creates a service that computes schedules with `engine` and persists through `gateway`.
    pub fn new(engine: AmortizationEngine, gateway: G) -> Self {
        Self { engine, gateway }
    }

    /// Computes the schedule the request would produce.
    ///
    /// # Errors
    ///
    /// Returns the engine's validation error.
    pub fn preview(&self, request: &FinancingRequest) -> Result<AmortizationResult, AmortizationError> {
        self.engine.compute_schedule(&request.amortization_request())
    }

    /// Validates the request by recomputing its schedule, then creates it remotely.
    ///
    /// The gateway is never called for an invalid request.
    ///
    /// # Errors
    ///
    /// Returns [`FinancingError::Validation`] for invalid input and
    /// [`FinancingError::Gateway`] if the API call fails.
    pub fn submit(&self, request: &FinancingRequest) -> Result<Submission, FinancingError> {
        let schedule = self.preview(request)?;

        let financing = self.gateway.create_financing(request).map_err(|err| {
            warn!(error = %err, "financing API rejected the request");
            FinancingError::Gateway(err)
        })?;

        info!(
            financing_id = %financing.id,
            system = %request.system,
            principal = %request.principal,
            term_months = request.term_months,
            "financing created"
        );

        Ok(Submission { financing, schedule })
    }
}
