//! Contracted CRUD services
//!
//! Every entity goes through the same write path: normalize the input,
//! validate it with the entity's contract, then persist it. Reads are passed
//! through with missing rows turned into `NotFound`.

use std::marker::PhantomData;

use ag_contracts::base::Contract;
use ag_core::error::AgError;
use ag_core::result::AgResult;
use ag_core::traits::{Entity, Id};
use ag_db::repository::Repository;
use ag_models::{FieldInput, OperationInput, ScheduleInput, WorkerInput};

/// Write models that are cleaned up before validation
pub trait WriteModel: Send + Sync + 'static {
    fn normalized(self) -> Self;
}

impl WriteModel for WorkerInput {
    fn normalized(self) -> Self {
        WorkerInput::normalized(self)
    }
}

impl WriteModel for FieldInput {
    fn normalized(self) -> Self {
        FieldInput::normalized(self)
    }
}

impl WriteModel for ScheduleInput {
    fn normalized(self) -> Self {
        self
    }
}

impl WriteModel for OperationInput {
    fn normalized(self) -> Self {
        OperationInput::normalized(self)
    }
}

/// Generic create/read/update/delete service over one repository
pub struct EntityService<T, I, R, C> {
    repo: R,
    contract: C,
    _marker: PhantomData<fn() -> (T, I)>,
}

impl<T, I, R, C> EntityService<T, I, R, C>
where
    T: Entity,
    I: WriteModel,
    R: Repository<T, I>,
    C: Contract<I>,
{
    pub fn new(repo: R, contract: C) -> Self {
        Self {
            repo,
            contract,
            _marker: PhantomData,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub async fn list(&self) -> AgResult<Vec<T>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get(&self, id: Id) -> AgResult<T> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AgError::not_found(T::TYPE_NAME, id))
    }

    pub async fn create(&self, input: I) -> AgResult<T> {
        let input = input.normalized();
        self.contract.validate(&input)?;

        let entity = self.repo.create(input).await?;
        tracing::info!(entity = T::TYPE_NAME, id = entity.id(), "Created");
        Ok(entity)
    }

    /// Replace every attribute of an existing record
    pub async fn update(&self, id: Id, input: I) -> AgResult<T> {
        let input = input.normalized();
        self.contract.validate(&input)?;

        let entity = self.repo.update(id, input).await?;
        tracing::info!(entity = T::TYPE_NAME, id, "Updated");
        Ok(entity)
    }

    pub async fn delete(&self, id: Id) -> AgResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(entity = T::TYPE_NAME, id, "Deleted");
        Ok(())
    }
}
