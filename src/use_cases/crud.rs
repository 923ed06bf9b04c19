// ABOUTME: Generic CRUD use cases shared by every repository-backed entity
// ABOUTME: Applies tenancy scope and the administrator requirement for shared reference data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use async_trait::async_trait;
use uuid::Uuid;

use super::{DeleteRequest, Listing, Targeted};
use crate::database::{Ownership, Repository};
use crate::errors::{AppError, AppResult};
use crate::models::Versioned;
use crate::pagination::PagedResult;
use crate::pipeline::{RequestContext, UseCase};

/// Shared reference data may only be changed by administrators
fn authorize_write<R: Repository>(ctx: &RequestContext) -> AppResult<()> {
    match R::OWNERSHIP {
        Ownership::Shared => ctx.require_admin(R::RESOURCE),
        Ownership::Owned => Ok(()),
    }
}

/// Fetch one entity by id
pub struct GetEntity<R> {
    repository: R,
}

impl<R: Repository> GetEntity<R> {
    /// Use case over `repository`
    #[must_use]
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: Repository> UseCase for GetEntity<R> {
    type Request = Uuid;
    type Response = R::Entity;

    const NAME: &'static str = "get_entity";

    fn resource(&self) -> &'static str {
        R::RESOURCE
    }

    async fn handle(&self, ctx: &RequestContext, id: Uuid) -> AppResult<R::Entity> {
        self.repository
            .get(&ctx.scope_for(R::OWNERSHIP), id)
            .await?
            .ok_or_else(|| AppError::not_found(R::RESOURCE))
    }
}

/// Fetch a filtered, sorted page of entities
pub struct ListEntities<R> {
    repository: R,
}

impl<R: Repository> ListEntities<R> {
    /// Use case over `repository`
    #[must_use]
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: Repository> UseCase for ListEntities<R> {
    type Request = Listing<R>;
    type Response = PagedResult<R::Entity>;

    const NAME: &'static str = "list_entities";

    fn resource(&self) -> &'static str {
        R::RESOURCE
    }

    async fn handle(
        &self,
        ctx: &RequestContext,
        listing: Listing<R>,
    ) -> AppResult<PagedResult<R::Entity>> {
        self.repository
            .list(&ctx.scope_for(R::OWNERSHIP), &listing.query)
            .await
    }
}

/// Insert a new entity
pub struct CreateEntity<R> {
    repository: R,
}

impl<R: Repository> CreateEntity<R> {
    /// Use case over `repository`
    #[must_use]
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: Repository> UseCase for CreateEntity<R> {
    type Request = R::Input;
    type Response = R::Entity;

    const NAME: &'static str = "create_entity";

    fn resource(&self) -> &'static str {
        R::RESOURCE
    }

    async fn handle(&self, ctx: &RequestContext, input: R::Input) -> AppResult<R::Entity> {
        authorize_write::<R>(ctx)?;
        self.repository
            .create(&ctx.scope_for(R::OWNERSHIP), &input)
            .await
    }
}

/// Replace an entity, conditional on the stamp the caller last read
pub struct UpdateEntity<R> {
    repository: R,
}

impl<R: Repository> UpdateEntity<R> {
    /// Use case over `repository`
    #[must_use]
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: Repository> UseCase for UpdateEntity<R> {
    type Request = Targeted<Versioned<R::Input>>;
    type Response = R::Entity;

    const NAME: &'static str = "update_entity";

    fn resource(&self) -> &'static str {
        R::RESOURCE
    }

    async fn handle(
        &self,
        ctx: &RequestContext,
        request: Targeted<Versioned<R::Input>>,
    ) -> AppResult<R::Entity> {
        authorize_write::<R>(ctx)?;
        let Targeted { id, body } = request;
        self.repository
            .update(
                &ctx.scope_for(R::OWNERSHIP),
                id,
                body.concurrency_stamp,
                &body.input,
            )
            .await
    }
}

/// Remove an entity
pub struct DeleteEntity<R> {
    repository: R,
}

impl<R: Repository> DeleteEntity<R> {
    /// Use case over `repository`
    #[must_use]
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: Repository> UseCase for DeleteEntity<R> {
    type Request = DeleteRequest;
    type Response = ();

    const NAME: &'static str = "delete_entity";

    fn resource(&self) -> &'static str {
        R::RESOURCE
    }

    async fn handle(&self, ctx: &RequestContext, request: DeleteRequest) -> AppResult<()> {
        authorize_write::<R>(ctx)?;
        self.repository
            .delete(
                &ctx.scope_for(R::OWNERSHIP),
                request.id,
                request.concurrency_stamp,
            )
            .await
    }
}
