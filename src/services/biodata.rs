// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Biodata registry: owner upserts, lookups and listing filters.

use std::sync::Arc;

use mongodb::bson::{self, doc, Bson, Document};
use serde::Deserialize;
use validator::Validate;

use crate::db::{collections, DataStore, FindOptions, SortOrder, UpdateOptions, UpdateResult};
use crate::error::Result;
use crate::models::{Biodata, BiodataDetails, Gender, PremiumStatus};

/// Premium profiles shown on the landing page.
const PREMIUM_SHOWCASE_LIMIT: i64 = 6;

/// Fields only the owner, admins, premium members and approved unlockers see.
const PRIVATE_CONTACT_FIELDS: [&str; 2] = ["mobileNumber", "email"];

/// Listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiodataQuery {
    pub gender: Option<Gender>,
    pub division: Option<String>,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
}

impl BiodataQuery {
    fn to_filter(&self) -> Document {
        let mut filter = Document::new();
        if let Some(gender) = self.gender {
            filter.insert("gender", gender.as_str());
        }
        if let Some(division) = &self.division {
            filter.insert("permanentDivision", division.as_str());
        }

        let mut age = Document::new();
        if let Some(min) = self.min_age {
            age.insert("$gte", i32::from(min));
        }
        if let Some(max) = self.max_age {
            age.insert("$lte", i32::from(max));
        }
        if !age.is_empty() {
            filter.insert("age", age);
        }
        filter
    }
}

/// Remove private contact fields from a profile shown to a stranger.
pub fn strip_contact_fields(mut doc: Document) -> Document {
    for field in PRIVATE_CONTACT_FIELDS {
        doc.remove(field);
    }
    doc
}

#[derive(Clone)]
pub struct BiodataService {
    store: Arc<dyn DataStore>,
}

impl BiodataService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Create or edit the owner's biodata.
    ///
    /// The first save assigns `biodataId` as the number of profiles that
    /// already hold one, plus one. Rows created by an early premium request
    /// carry no id and are not counted. Two owners saving concurrently can
    /// receive the same id; the store does not enforce uniqueness.
    pub async fn save(&self, owner_email: &str, details: BiodataDetails) -> Result<UpdateResult> {
        details.validate()?;

        let filter = doc! { "email": owner_email };
        let existing = self
            .store
            .find_one(collections::BIODATA, filter.clone())
            .await?;

        let has_id = existing
            .as_ref()
            .is_some_and(|d| matches!(d.get("biodataId"), Some(Bson::Int32(_) | Bson::Int64(_))));
        let has_status = existing
            .as_ref()
            .is_some_and(|d| d.contains_key("premiumStatus"));

        let mut set = if has_id {
            bson::to_document(&details)?
        } else {
            let biodata_id = self.next_biodata_id().await?;
            tracing::info!(owner = owner_email, biodata_id, "Assigned biodata id");
            bson::to_document(&Biodata::new(biodata_id, owner_email, details))?
        };

        if has_status {
            set.remove("premiumStatus");
            set.remove("premiumLabel");
        } else if !set.contains_key("premiumStatus") {
            set.insert("premiumStatus", PremiumStatus::Normal.as_str());
            set.insert("premiumLabel", PremiumStatus::Normal.label());
        }

        self.store
            .update_one(collections::BIODATA, filter, set, UpdateOptions::upsert())
            .await
    }

    async fn next_biodata_id(&self) -> Result<i64> {
        let assigned = self
            .store
            .count_documents(
                collections::BIODATA,
                doc! { "biodataId": { "$exists": true } },
            )
            .await?;
        Ok(assigned as i64 + 1)
    }

    pub async fn by_biodata_id(&self, biodata_id: i64) -> Result<Option<Document>> {
        self.store
            .find_one(collections::BIODATA, doc! { "biodataId": biodata_id })
            .await
    }

    pub async fn by_owner(&self, owner_email: &str) -> Result<Option<Document>> {
        self.store
            .find_one(collections::BIODATA, doc! { "email": owner_email })
            .await
    }

    /// Public listing, contact fields removed.
    pub async fn list(&self, query: &BiodataQuery) -> Result<Vec<Document>> {
        let docs = self
            .store
            .find(
                collections::BIODATA,
                query.to_filter(),
                FindOptions::sorted("biodataId", SortOrder::Ascending),
            )
            .await?;
        Ok(docs.into_iter().map(strip_contact_fields).collect())
    }

    /// Premium profiles ordered by age, contact fields removed.
    pub async fn premium_showcase(&self, order: SortOrder) -> Result<Vec<Document>> {
        let docs = self
            .store
            .find(
                collections::BIODATA,
                doc! { "premiumStatus": PremiumStatus::Premium.as_str() },
                FindOptions::sorted("age", order).with_limit(PREMIUM_SHOWCASE_LIMIT),
            )
            .await?;
        Ok(docs.into_iter().map(strip_contact_fields).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::error::AppError;
    use crate::services::PremiumService;

    fn details(name: &str, gender: Gender, age: u8) -> BiodataDetails {
        BiodataDetails {
            name: name.to_string(),
            gender: Some(gender),
            age: Some(age),
            permanent_division: Some("Dhaka".to_string()),
            mobile_number: "01700000000".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_first_save_assigns_sequential_ids() {
        let store = Arc::new(MemoryStore::new());
        let service = BiodataService::new(store);

        service
            .save("a@x.com", details("A", Gender::Male, 30))
            .await
            .unwrap();
        service
            .save("b@x.com", details("B", Gender::Female, 25))
            .await
            .unwrap();

        let a = service.by_owner("a@x.com").await.unwrap().unwrap();
        let b = service.by_owner("b@x.com").await.unwrap().unwrap();
        assert_eq!(a.get_i64("biodataId").unwrap(), 1);
        assert_eq!(b.get_i64("biodataId").unwrap(), 2);
        assert_eq!(a.get_str("premiumStatus").unwrap(), "normal");
    }

    #[tokio::test]
    async fn test_edit_keeps_id_and_premium_status() {
        let store = Arc::new(MemoryStore::new());
        let service = BiodataService::new(store.clone());

        service
            .save("a@x.com", details("A", Gender::Male, 30))
            .await
            .unwrap();
        store
            .update_one(
                collections::BIODATA,
                doc! { "email": "a@x.com" },
                doc! { "premiumStatus": "premium" },
                UpdateOptions::default(),
            )
            .await
            .unwrap();

        let result = service
            .save("a@x.com", details("A. Rahman", Gender::Male, 31))
            .await
            .unwrap();
        assert_eq!(result.matched_count, 1);

        let a = service.by_biodata_id(1).await.unwrap().unwrap();
        assert_eq!(a.get_str("name").unwrap(), "A. Rahman");
        assert_eq!(a.get_str("premiumStatus").unwrap(), "premium");
    }

    #[tokio::test]
    async fn test_early_premium_request_does_not_share_ids() {
        let store = Arc::new(MemoryStore::new());
        let premium = PremiumService::new(store.clone());
        let service = BiodataService::new(store);

        premium.request("a@x.com").await.unwrap();
        service
            .save("a@x.com", details("A", Gender::Male, 30))
            .await
            .unwrap();
        service
            .save("b@x.com", details("B", Gender::Female, 25))
            .await
            .unwrap();

        let a = service.by_owner("a@x.com").await.unwrap().unwrap();
        let b = service.by_owner("b@x.com").await.unwrap().unwrap();
        assert_eq!(a.get_i64("biodataId").unwrap(), 1);
        assert_eq!(b.get_i64("biodataId").unwrap(), 2);
        assert_eq!(a.get_str("premiumStatus").unwrap(), "requested");
        assert_eq!(a.get_str("email").unwrap(), "a@x.com");
    }

    #[tokio::test]
    async fn test_edit_without_gender_keeps_stored_gender() {
        let store = Arc::new(MemoryStore::new());
        let service = BiodataService::new(store);

        service
            .save("a@x.com", details("A", Gender::Female, 30))
            .await
            .unwrap();
        let edit = BiodataDetails {
            gender: None,
            ..details("A. Begum", Gender::Female, 31)
        };
        service.save("a@x.com", edit).await.unwrap();

        let a = service.by_owner("a@x.com").await.unwrap().unwrap();
        assert_eq!(a.get_str("name").unwrap(), "A. Begum");
        assert_eq!(a.get_str("gender").unwrap(), "Female");
    }

    #[tokio::test]
    async fn test_invalid_details_rejected_before_store() {
        let store = Arc::new(MemoryStore::new());
        let service = BiodataService::new(store.clone());

        let err = service
            .save("a@x.com", details("", Gender::Male, 30))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(store.estimated_count(collections::BIODATA).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_filters_and_strips_contacts() {
        let store = Arc::new(MemoryStore::new());
        let service = BiodataService::new(store);
        service
            .save("a@x.com", details("A", Gender::Male, 30))
            .await
            .unwrap();
        service
            .save("b@x.com", details("B", Gender::Female, 25))
            .await
            .unwrap();

        let query = BiodataQuery {
            gender: Some(Gender::Female),
            max_age: Some(26),
            ..Default::default()
        };
        let found = service.list(&query).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("name").unwrap(), "B");
        assert!(!found[0].contains_key("mobileNumber"));
        assert!(!found[0].contains_key("email"));
    }

    #[tokio::test]
    async fn test_premium_showcase_ordered_by_age() {
        let store = Arc::new(MemoryStore::new());
        for (email, age) in [("a@x.com", 33), ("b@x.com", 24), ("c@x.com", 28)] {
            store
                .insert_one(
                    collections::BIODATA,
                    doc! { "email": email, "age": age, "premiumStatus": "premium" },
                )
                .await
                .unwrap();
        }
        store
            .insert_one(
                collections::BIODATA,
                doc! { "email": "d@x.com", "age": 20, "premiumStatus": "normal" },
            )
            .await
            .unwrap();

        let service = BiodataService::new(store);
        let ages: Vec<i32> = service
            .premium_showcase(SortOrder::Ascending)
            .await
            .unwrap()
            .iter()
            .map(|d| d.get_i32("age").unwrap())
            .collect();

        assert_eq!(ages, vec![24, 28, 33]);
    }
}
