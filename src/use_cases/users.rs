// ABOUTME: Use cases for the authenticated caller's own profile
// ABOUTME: Reads and updates display name and preferred weight unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use async_trait::async_trait;

use crate::constants::resources;
use crate::database::UserManager;
use crate::errors::{AppError, AppResult};
use crate::models::{UpdateProfileInput, User, Versioned};
use crate::pipeline::{RequestContext, UseCase};

/// Read the caller's profile
pub struct GetCurrentUser {
    users: UserManager,
}

impl GetCurrentUser {
    /// Use case over the user store
    #[must_use]
    pub const fn new(users: UserManager) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UseCase for GetCurrentUser {
    type Request = ();
    type Response = User;

    const NAME: &'static str = "get_current_user";

    fn resource(&self) -> &'static str {
        resources::USER
    }

    async fn handle(&self, ctx: &RequestContext, _request: ()) -> AppResult<User> {
        self.users
            .get(ctx.user.meta.id)
            .await?
            .ok_or_else(|| AppError::not_found(resources::USER))
    }
}

/// Replace the caller's profile preferences
pub struct UpdateCurrentUser {
    users: UserManager,
}

impl UpdateCurrentUser {
    /// Use case over the user store
    #[must_use]
    pub const fn new(users: UserManager) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UseCase for UpdateCurrentUser {
    type Request = Versioned<UpdateProfileInput>;
    type Response = User;

    const NAME: &'static str = "update_current_user";

    fn resource(&self) -> &'static str {
        resources::USER
    }

    async fn handle(
        &self,
        ctx: &RequestContext,
        request: Versioned<UpdateProfileInput>,
    ) -> AppResult<User> {
        self.users
            .update_profile(ctx.user.meta.id, request.concurrency_stamp, &request.input)
            .await
    }
}
