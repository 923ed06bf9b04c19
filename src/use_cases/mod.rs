// ABOUTME: Application operations executed through the request pipeline
// ABOUTME: Shared request envelopes for listing, targeting and deleting entities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! # Use Cases
//!
//! Generic CRUD operations work for every [`Repository`](crate::database::Repository);
//! the join and profile operations are written out per relationship.

/// Generic get/list/create/update/delete
pub mod crud;
/// Relationship queries and workout session completion
pub mod joins;
/// Current user profile
pub mod users;

pub use crud::{CreateEntity, DeleteEntity, GetEntity, ListEntities, UpdateEntity};
pub use joins::{
    CompleteWorkoutSession, EquipmentGroupEquipment, ExerciseTypeMuscleGroups,
    MuscleGroupExerciseTypes, UserExerciseHistoryEntries, WorkoutSessionHistoryEntries,
};
pub use users::{GetCurrentUser, UpdateCurrentUser};

use std::fmt;
use std::marker::PhantomData;

use uuid::Uuid;

use crate::database::QuerySpec;
use crate::errors::FieldError;
use crate::pagination::QueryRequest;
use crate::validation::Validate;

/// A collection query checked against the sort whitelist of `S`
pub struct Listing<S> {
    /// Search, sort and page position
    pub query: QueryRequest,
    spec: PhantomData<fn() -> S>,
}

impl<S> Listing<S> {
    /// Wrap a query for the collection described by `S`
    #[must_use]
    pub const fn new(query: QueryRequest) -> Self {
        Self {
            query,
            spec: PhantomData,
        }
    }
}

impl<S> fmt::Debug for Listing<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing").field("query", &self.query).finish()
    }
}

impl<S: QuerySpec> Validate for Listing<S> {
    fn validate(&self) -> Vec<FieldError> {
        self.query.validate_against(&S::sortable_fields())
    }
}

/// A payload addressed to one entity
#[derive(Debug)]
pub struct Targeted<T> {
    /// Entity the payload applies to
    pub id: Uuid,
    /// Payload
    pub body: T,
}

impl<T> Targeted<T> {
    /// Address `body` to entity `id`
    #[must_use]
    pub const fn new(id: Uuid, body: T) -> Self {
        Self { id, body }
    }
}

impl<T: Validate> Validate for Targeted<T> {
    fn validate(&self) -> Vec<FieldError> {
        self.body.validate()
    }
}

/// Delete an entity, optionally only if it still carries `concurrency_stamp`
#[derive(Debug, Clone, Copy)]
pub struct DeleteRequest {
    /// Entity to delete
    pub id: Uuid,
    /// Expected stamp
    pub concurrency_stamp: Option<Uuid>,
}

impl Validate for DeleteRequest {}
