use std::collections::HashMap;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::feedback::{FeedbackDto, ProviderFeedbackDto, SubmitFeedbackDto},
    server::{
        data::{
            company::CompanyRepository, contract::ContractRepository,
            feedback::FeedbackRepository, provider::ProviderRepository,
            shipment::ShipmentRepository,
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            validation::ValidationError,
            Error,
        },
        model::db::FeedbackModel,
        service::tracking::is_delivered,
        util::validation::{
            self, MAX_COMMENT_LENGTH, MAX_RATING, MIN_COMMENT_LENGTH, MIN_RATING,
        },
    },
};

pub struct FeedbackService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FeedbackService<'a> {
    /// Creates a new instance of [`FeedbackService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Rates the provider of a delivered contract.
    ///
    /// The feedback is attached to the latest snapshot of the contract's tracking chain.
    /// A company rates each shipment once.
    ///
    /// # Returns
    /// - `Ok(FeedbackDto)` - The recorded feedback
    /// - `Err(Error::ValidationError)` - Rating outside 1 to 5 or comments outside 10 to 500 characters
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - Contract not the company's
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - Shipment not delivered
    /// - `Err(Error::MarketplaceError(MarketplaceError::Duplicate))` - Feedback already given
    pub async fn submit(
        &self,
        company_id: i32,
        payload: SubmitFeedbackDto,
    ) -> Result<FeedbackDto, Error> {
        let rating = validation::in_range("rating", payload.rating, MIN_RATING, MAX_RATING)?;
        let comments = validation::required("comments", &payload.comments, MAX_COMMENT_LENGTH)?;
        if comments.chars().count() < MIN_COMMENT_LENGTH {
            return Err(ValidationError::field(
                "comments",
                format!("Comments must be at least {} characters", MIN_COMMENT_LENGTH),
            )
            .into());
        }

        let txn = self.db.begin().await?;
        let shipment_repo = ShipmentRepository::new(&txn);
        let feedback_repo = FeedbackRepository::new(&txn);

        let contract = ContractRepository::new(&txn)
            .find_for_company(payload.contract_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(
                Resource::Contract,
                payload.contract_id,
            ))?;
        let latest = shipment_repo.latest_for_contract(contract.id).await?;
        let Some(latest) = latest.filter(|snapshot| is_delivered(Some(snapshot))) else {
            return Err(MarketplaceError::invalid_state(
                "Feedback can only be given once the shipment is delivered",
            )
            .into());
        };

        let snapshot_ids: Vec<i32> = shipment_repo
            .history(&latest.tracking_number)
            .await?
            .iter()
            .map(|snapshot| snapshot.id)
            .collect();
        if feedback_repo.exists_for(&snapshot_ids, company_id).await? {
            return Err(MarketplaceError::Duplicate(
                "Feedback has already been given for this shipment".to_string(),
            )
            .into());
        }

        let feedback = feedback_repo
            .create(latest.id, company_id, contract.provider_id, rating, comments)
            .await?;

        txn.commit().await?;

        tracing::info!(
            company_id,
            provider_id = feedback.provider_id,
            rating,
            "Recorded feedback"
        );

        Ok(FeedbackDto::from(feedback))
    }

    /// The provider's reviews with their average and count
    pub async fn provider_feedback(
        &self,
        provider_id: i32,
    ) -> Result<ProviderFeedbackDto, Error> {
        let repo = FeedbackRepository::new(self.db);

        let stats = repo
            .rating_stats(Some(&[provider_id][..]))
            .await?
            .remove(&provider_id)
            .unwrap_or_default();
        let feedback = repo.list_by_provider(provider_id).await?;

        Ok(ProviderFeedbackDto {
            feedback: self.with_names(feedback).await?,
            average_rating: stats.average(),
            total_count: stats.count,
        })
    }

    /// Every review on the platform, newest first
    pub async fn list_all(&self) -> Result<Vec<FeedbackDto>, Error> {
        let feedback = FeedbackRepository::new(self.db).list_all().await?;

        self.with_names(feedback).await
    }

    pub async fn delete(&self, feedback_id: i32) -> Result<(), Error> {
        let result = FeedbackRepository::new(self.db).delete(feedback_id).await?;
        if result.rows_affected == 0 {
            return Err(MarketplaceError::not_found(Resource::Feedback, feedback_id).into());
        }

        tracing::info!(feedback_id, "Deleted feedback");

        Ok(())
    }

    async fn with_names(&self, feedback: Vec<FeedbackModel>) -> Result<Vec<FeedbackDto>, Error> {
        let company_ids: Vec<i32> = feedback.iter().map(|f| f.company_id).collect();
        let provider_ids: Vec<i32> = feedback.iter().map(|f| f.provider_id).collect();

        let company_names: HashMap<i32, String> = CompanyRepository::new(self.db)
            .find_by_ids(&company_ids)
            .await?
            .into_iter()
            .map(|company| (company.id, company.name))
            .collect();
        let provider_names: HashMap<i32, String> = ProviderRepository::new(self.db)
            .find_by_ids(&provider_ids)
            .await?
            .into_iter()
            .map(|provider| (provider.id, provider.name))
            .collect();

        Ok(feedback
            .into_iter()
            .map(|feedback| FeedbackDto {
                company_name: company_names.get(&feedback.company_id).cloned(),
                provider_name: provider_names.get(&feedback.provider_id).cloned(),
                ..FeedbackDto::from(feedback)
            })
            .collect())
    }
}
