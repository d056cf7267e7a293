//! `financing_schedule` computes installment schedules for personal and household
//! financings.
//!
//! Two amortization systems are supported:
//! - **Price (Sistema Francês de Amortização)**: a fixed installment for the whole
//!   term; the principal portion grows as the interest portion shrinks.
//! - **SAC (Sistema de Amortização Constante)**: a fixed principal portion, leading
//!   to decreasing installments over time.
//!
//! All amounts are `rust_decimal::Decimal` rounded to the currency minor unit, and
//! the last installment always pays off the exact remaining balance.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use financing_schedule::{compute_schedule, AmortizationRequest, AmortizationSystem};
//! use rust_decimal_macros::dec;
//!
//! let request = AmortizationRequest {
//!     principal: dec!(10_000),
//!     rate_percent: dec!(1),
//!     term_months: 12,
//!     system: AmortizationSystem::Price,
//!     start_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
//! };
//!
//! match compute_schedule(&request) {
//!     Ok(result) => {
//!         println!("Installment:    {}", result.first_installment_amount);
//!         println!("Total interest: {}", result.total_interest);
//!         for line in &result.installments {
//!             println!("{:>3} {} {}", line.number, line.due_date, line.gross_value);
//!         }
//!     }
//!     Err(e) => {
//!         eprintln!("Error calculating schedule: {}", e);
//!     }
//! }
//! ```
//!
//! The rate is read as a monthly percentage by default. Deployments that take an
//! annual effective rate instead can select [`RateConvention::AnnualEffective`]
//! through [`EngineConfig`].

pub mod config;
pub mod error;
pub mod financing;
pub mod rate;
pub mod schedule;
pub mod types;

pub use config::EngineConfig;
pub use error::{AmortizationError, FinancingError};
pub use financing::{CreatedFinancing, FinancingGateway, FinancingRequest, FinancingService, FinancingType, Submission};
pub use rate::{RateConvention, normalize_annual_interest_rate};
pub use schedule::{AmortizationEngine, compare_systems, compute_schedule};
pub use types::{AmortizationRequest, AmortizationResult, AmortizationSystem, InstallmentLine, SystemComparison};
