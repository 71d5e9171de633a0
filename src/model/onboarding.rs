//! Onboarding wizard records.
//!
//! Each of the five steps has a typed record whose required fields are declared once in
//! [`step_schema!`]. A required field is missing when it is absent, `null`, a blank
//! string or an empty list. A boolean is present once it has any value.

use crate::model::StoreId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// One of the five wizard steps, in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepKey {
    BrandBasics,
    BusinessDetails,
    StorefrontPreferences,
    MarketingIntent,
    Confirmation,
}

impl StepKey {
    pub const ALL: [StepKey; 5] = [
        StepKey::BrandBasics,
        StepKey::BusinessDetails,
        StepKey::StorefrontPreferences,
        StepKey::MarketingIntent,
        StepKey::Confirmation,
    ];

    /// 1-based position in the wizard.
    pub fn index(self) -> u8 {
        match self {
            StepKey::BrandBasics => 1,
            StepKey::BusinessDetails => 2,
            StepKey::StorefrontPreferences => 3,
            StepKey::MarketingIntent => 4,
            StepKey::Confirmation => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepKey::BrandBasics => "BRAND_BASICS",
            StepKey::BusinessDetails => "BUSINESS_DETAILS",
            StepKey::StorefrontPreferences => "STOREFRONT_PREFERENCES",
            StepKey::MarketingIntent => "MARKETING_INTENT",
            StepKey::Confirmation => "CONFIRMATION",
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            StepKey::BrandBasics => BrandBasics::REQUIRED,
            StepKey::BusinessDetails => BusinessDetails::REQUIRED,
            StepKey::StorefrontPreferences => StorefrontPreferences::REQUIRED,
            StepKey::MarketingIntent => MarketingIntent::REQUIRED,
            StepKey::Confirmation => Confirmation::REQUIRED,
        }
    }
}

impl Display for StepKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown onboarding step: {0}")]
pub struct UnknownStep(pub String);

impl FromStr for StepKey {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownStep(s.to_string()))
    }
}

/// Presence test for required step fields.
pub trait FieldValue {
    fn is_missing(&self) -> bool;
}

impl FieldValue for String {
    fn is_missing(&self) -> bool {
        self.trim().is_empty()
    }
}

impl<T> FieldValue for Vec<T> {
    fn is_missing(&self) -> bool {
        self.is_empty()
    }
}

impl FieldValue for bool {
    fn is_missing(&self) -> bool {
        false
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn is_missing(&self) -> bool {
        self.as_ref().map_or(true, FieldValue::is_missing)
    }
}

/// Declares a step record: required fields with their wire names, then optional ones.
macro_rules! step_schema {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            required { $($req:ident: $req_ty:ty => $wire:literal),+ $(,)? }
            optional { $($opt:ident: $opt_ty:ty),* $(,)? }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[serde(rename = $wire, default, skip_serializing_if = "Option::is_none")]
                pub $req: Option<$req_ty>,
            )+
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $opt: Option<$opt_ty>,
            )*
        }

        impl $name {
            pub const REQUIRED: &'static [&'static str] = &[$($wire),+];

            pub fn missing_fields(&self) -> Vec<&'static str> {
                let mut missing = Vec::new();
                $(
                    if self.$req.is_missing() {
                        missing.push($wire);
                    }
                )+
                missing
            }
        }
    };
}

step_schema! {
    pub struct BrandBasics {
        required {
            brand_name: String => "brandName",
            brand_category: String => "brandCategory",
        }
        optional {
            tagline: String,
            description: String,
        }
    }
}

step_schema! {
    pub struct BusinessDetails {
        required {
            legal_name: String => "legalName",
            contact_email: String => "contactEmail",
            contact_phone: String => "contactPhone",
        }
        optional {
            business_address: String,
            tax_id: String,
        }
    }
}

step_schema! {
    pub struct StorefrontPreferences {
        required {
            store_name: String => "storeName",
            theme_style: String => "themeStyle",
        }
        optional {
            custom_domain: String,
            logo_url: String,
            primary_color: String,
        }
    }
}

step_schema! {
    pub struct MarketingIntent {
        required {
            primary_goal: String => "primaryGoal",
            channels: Vec<String> => "channels",
        }
        optional {
            monthly_budget: f64,
            run_ads: bool,
        }
    }
}

step_schema! {
    pub struct Confirmation {
        required {
            terms_accepted: bool => "termsAccepted",
            signatory_name: String => "signatoryName",
        }
        optional {
            notes: String,
        }
    }
}

/// The data a merchant submitted for one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepSubmission {
    BrandBasics(BrandBasics),
    BusinessDetails(BusinessDetails),
    StorefrontPreferences(StorefrontPreferences),
    MarketingIntent(MarketingIntent),
    Confirmation(Confirmation),
}

impl StepSubmission {
    pub fn from_json(key: StepKey, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match key {
            StepKey::BrandBasics => StepSubmission::BrandBasics(serde_json::from_value(data)?),
            StepKey::BusinessDetails => StepSubmission::BusinessDetails(serde_json::from_value(data)?),
            StepKey::StorefrontPreferences => {
                StepSubmission::StorefrontPreferences(serde_json::from_value(data)?)
            }
            StepKey::MarketingIntent => StepSubmission::MarketingIntent(serde_json::from_value(data)?),
            StepKey::Confirmation => StepSubmission::Confirmation(serde_json::from_value(data)?),
        })
    }

    pub fn key(&self) -> StepKey {
        match self {
            StepSubmission::BrandBasics(_) => StepKey::BrandBasics,
            StepSubmission::BusinessDetails(_) => StepKey::BusinessDetails,
            StepSubmission::StorefrontPreferences(_) => StepKey::StorefrontPreferences,
            StepSubmission::MarketingIntent(_) => StepKey::MarketingIntent,
            StepSubmission::Confirmation(_) => StepKey::Confirmation,
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            StepSubmission::BrandBasics(step) => step.missing_fields(),
            StepSubmission::BusinessDetails(step) => step.missing_fields(),
            StepSubmission::StorefrontPreferences(step) => step.missing_fields(),
            StepSubmission::MarketingIntent(step) => step.missing_fields(),
            StepSubmission::Confirmation(step) => step.missing_fields(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Last saved data per step, serialized under the step keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StepData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_basics: Option<BrandBasics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_details: Option<BusinessDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storefront_preferences: Option<StorefrontPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_intent: Option<MarketingIntent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Confirmation>,
}

impl StepData {
    /// Replaces the stored data for the submission's step.
    pub fn store(&mut self, submission: StepSubmission) {
        match submission {
            StepSubmission::BrandBasics(step) => self.brand_basics = Some(step),
            StepSubmission::BusinessDetails(step) => self.business_details = Some(step),
            StepSubmission::StorefrontPreferences(step) => self.storefront_preferences = Some(step),
            StepSubmission::MarketingIntent(step) => self.marketing_intent = Some(step),
            StepSubmission::Confirmation(step) => self.confirmation = Some(step),
        }
    }

    /// Missing required fields of `key`; every required field when nothing was saved.
    pub fn missing_for(&self, key: StepKey) -> Vec<&'static str> {
        let missing = match key {
            StepKey::BrandBasics => self.brand_basics.as_ref().map(BrandBasics::missing_fields),
            StepKey::BusinessDetails => self
                .business_details
                .as_ref()
                .map(BusinessDetails::missing_fields),
            StepKey::StorefrontPreferences => self
                .storefront_preferences
                .as_ref()
                .map(StorefrontPreferences::missing_fields),
            StepKey::MarketingIntent => self
                .marketing_intent
                .as_ref()
                .map(MarketingIntent::missing_fields),
            StepKey::Confirmation => self.confirmation.as_ref().map(Confirmation::missing_fields),
        };
        missing.unwrap_or_else(|| key.required_fields().to_vec())
    }
}

/// Missing required fields per incomplete step.
pub type MissingFields = BTreeMap<StepKey, Vec<&'static str>>;

/// Onboarding progress of one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandOnboarding {
    pub store_id: StoreId,
    pub status: OnboardingStatus,
    /// Highest fully completed step index, 0 before any step completes.
    pub current_step: u8,
    pub completion_percent: u8,
    pub step_data: StepData,
    pub category: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BrandOnboarding {
    pub fn new(store_id: StoreId, category: Option<String>) -> Self {
        Self {
            store_id,
            status: OnboardingStatus::NotStarted,
            current_step: 0,
            completion_percent: 0,
            step_data: StepData::default(),
            category,
            started_at: None,
            last_saved_at: None,
            completed_at: None,
        }
    }

    /// Whether `key` may be submitted now: never past the step after `current_step`.
    pub fn allows(&self, key: StepKey) -> bool {
        key.index() <= self.current_step + 1
    }

    pub fn missing(&self) -> MissingFields {
        StepKey::ALL
            .into_iter()
            .map(|key| (key, self.step_data.missing_for(key)))
            .filter(|(_, fields)| !fields.is_empty())
            .collect()
    }

    pub fn completed_steps(&self) -> usize {
        StepKey::ALL.len() - self.missing().len()
    }

    /// Stores the submission and recomputes the derived progress fields.
    /// Returns whether the step is now fully complete.
    pub fn save_step(&mut self, submission: StepSubmission) -> bool {
        let key = submission.key();
        let complete = submission.is_complete();
        self.step_data.store(submission);

        let now = Utc::now();
        self.started_at.get_or_insert(now);
        self.last_saved_at = Some(now);
        if complete {
            self.current_step = self.current_step.max(key.index());
        }
        self.recompute(now);
        complete
    }

    fn recompute(&mut self, now: DateTime<Utc>) {
        let total = StepKey::ALL.len();
        let completed = self.completed_steps();
        self.completion_percent = ((completed * 100 + total / 2) / total) as u8;
        if self.completion_percent == 100 {
            self.status = OnboardingStatus::Completed;
            self.completed_at.get_or_insert(now);
        } else {
            self.status = OnboardingStatus::InProgress;
            self.completed_at = None;
        }
    }
}

/// Creates (or fills in) the onboarding skeleton of a store.
#[derive(Debug, Clone, Default)]
pub struct OnboardingSeed {
    pub category: Option<String>,
}

/// Analytics row key: one per (store, step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepRowId {
    pub store_id: StoreId,
    pub step: StepKey,
}

impl Display for StepRowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.store_id, self.step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepRowStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandOnboardingStep {
    pub id: StepRowId,
    pub status: StepRowStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
