// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics aggregator for the public and admin dashboards.
//!
//! Nothing is cached: each call issues its counts concurrently against the
//! live store.

use std::sync::Arc;

use mongodb::bson::doc;

use crate::db::pipeline::as_f64;
use crate::db::{collections, DataStore, Stage, Sum};
use crate::error::Result;
use crate::models::{AdminStats, Gender, PremiumStatus, PublicStats};

const REVENUE_FIELD: &str = "totalRevenue";

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn DataStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    async fn gender_count(&self, gender: Gender) -> Result<u64> {
        self.store
            .count_documents(collections::BIODATA, doc! { "gender": gender.as_str() })
            .await
    }

    /// Landing-page counters.
    pub async fn public_stats(&self) -> Result<PublicStats> {
        let (total_biodata, male_biodata, female_biodata, total_marriages) = tokio::try_join!(
            self.store.estimated_count(collections::BIODATA),
            self.gender_count(Gender::Male),
            self.gender_count(Gender::Female),
            self.store.estimated_count(collections::SUCCESS_STORIES),
        )?;

        Ok(PublicStats {
            total_biodata,
            male_biodata,
            female_biodata,
            total_marriages,
        })
    }

    /// Admin dashboard counters, including revenue.
    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let (total_biodata, male_biodata, female_biodata, premium_biodata, total_revenue) = tokio::try_join!(
            self.store.estimated_count(collections::BIODATA),
            self.gender_count(Gender::Male),
            self.gender_count(Gender::Female),
            self.store.count_documents(
                collections::BIODATA,
                doc! { "premiumStatus": PremiumStatus::Premium.as_str() },
            ),
            self.total_revenue(),
        )?;

        tracing::debug!(
            total_biodata,
            premium_biodata,
            total_revenue,
            "Computed admin stats"
        );

        Ok(AdminStats {
            total_biodata,
            male_biodata,
            female_biodata,
            premium_biodata,
            total_revenue,
        })
    }

    /// Sum of `amount` over every unlock record; zero when there are none.
    pub async fn total_revenue(&self) -> Result<f64> {
        let stages = [Stage::Group {
            key: None,
            sums: vec![(REVENUE_FIELD.to_string(), Sum::Field("amount".to_string()))],
        }];

        let rows = self
            .store
            .aggregate(collections::PAYMENTS, &stages)
            .await?;

        Ok(rows
            .first()
            .and_then(|row| row.get(REVENUE_FIELD))
            .and_then(as_f64)
            .unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_revenue_zero_without_records() {
        let service = StatsService::new(Arc::new(MemoryStore::new()));
        assert_eq!(service.total_revenue().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_revenue_sums_amounts() {
        let store = Arc::new(MemoryStore::new());
        for amount in [20.0, 15.5] {
            store
                .insert_one(collections::PAYMENTS, doc! { "amount": amount })
                .await
                .unwrap();
        }
        store
            .insert_one(collections::PAYMENTS, doc! { "amount": 5 })
            .await
            .unwrap();

        let service = StatsService::new(store);
        assert_eq!(service.total_revenue().await.unwrap(), 40.5);
    }

    #[tokio::test]
    async fn test_untagged_profiles_count_only_in_total() {
        let store = Arc::new(MemoryStore::new());
        for gender in ["Male", "Female"] {
            store
                .insert_one(collections::BIODATA, doc! { "gender": gender })
                .await
                .unwrap();
        }
        store
            .insert_one(collections::BIODATA, doc! { "name": "untagged" })
            .await
            .unwrap();
        store
            .insert_one(collections::SUCCESS_STORIES, doc! { "review": "happy" })
            .await
            .unwrap();

        let stats = StatsService::new(store).public_stats().await.unwrap();

        assert_eq!(stats.total_biodata, 3);
        assert_eq!(stats.male_biodata, 1);
        assert_eq!(stats.female_biodata, 1);
        assert_eq!(stats.total_marriages, 1);
        assert!(stats.male_biodata + stats.female_biodata <= stats.total_biodata);
    }

    #[tokio::test]
    async fn test_admin_stats_counts_premium() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_one(
                collections::BIODATA,
                doc! { "gender": "Female", "premiumStatus": "premium" },
            )
            .await
            .unwrap();
        store
            .insert_one(
                collections::BIODATA,
                doc! { "gender": "Male", "premiumStatus": "requested" },
            )
            .await
            .unwrap();

        let stats = StatsService::new(store).admin_stats().await.unwrap();

        assert_eq!(stats.total_biodata, 2);
        assert_eq!(stats.premium_biodata, 1);
        assert_eq!(stats.total_revenue, 0.0);
    }
}
