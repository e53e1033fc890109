// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Drill Observation Assignment System.
//!
//! The surrounding application (administrative UI, bulk-import pipeline,
//! external API) talks to the allocator exclusively through the handler
//! functions in this crate. Handlers validate input, enforce the domain
//! rules that need store context, run the bounded retry loop around the
//! allocation units of work, and translate every lower-layer error into the
//! typed [`ApiError`] contract. Wire formats (HTTP routes, spreadsheets,
//! email payloads) belong to the excluded collaborators, not here.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod code_policy;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use code_policy::{ShortCodePolicyError, enforce_short_code_policy};
pub use error::{ApiError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    allocate_batch, allocate_one, create_scenario, create_victim_profile, delete_organization,
    delete_scenario, list_assignments, list_organizations, list_victim_profiles,
    promote_to_organization, queue_profile, register_organization, remove_assignment,
    scenario_statistics, update_organization,
};
pub use request_response::{
    AllocateBatchRequest, AllocateBatchResponse, AllocateOneRequest, AssignmentResponse,
    CategoryCount, CreateScenarioRequest, CreateVictimProfileRequest, ListAssignmentsResponse,
    OrganizationResponse, PromoteAssignmentRequest, QueueProfileRequest,
    RegisterOrganizationRequest, ScenarioResponse, ScenarioStatisticsResponse,
    UpdateOrganizationRequest, VictimProfileResponse,
};
