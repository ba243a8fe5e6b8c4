//! # Artist profiles and the rules for editing them
//!
//! Three shapes of the same data travel through the directory:
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`ArtistInput`] | Raw form values exactly as typed. Crosses the client/server boundary. |
//! | [`ArtistDraft`] | Validated input: trimmed, blanks turned into `None`, numbers and dates parsed. Used as the creation payload. |
//! | [`ArtistPatch`] | Partial update derived from a draft. `None` fields are left untouched by the store. |
//! | [`ArtistProfile`] | A stored record. |
//!
//! Editing semantics: blank optional text fields are *omitted* from a patch
//! (the stored value survives), while commission and the employment dates
//! are always written, so clearing them stores `null`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtistStatus {
    #[default]
    Active,
    Inactive,
}

impl ArtistStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtistStatus::Active => "active",
            ArtistStatus::Inactive => "inactive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArtistStatus::Active => "Active",
            ArtistStatus::Inactive => "Inactive",
        }
    }
}

impl FromStr for ArtistStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ArtistStatus::Active),
            "inactive" => Ok(ArtistStatus::Inactive),
            other => Err(format!("Unknown artist status: {other}")),
        }
    }
}

/// Services an artist can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    Tattoo,
    Consultation,
    #[serde(rename = "Touch up")]
    TouchUp,
}

impl Service {
    pub const OPTIONS: [Service; 3] = [Service::Tattoo, Service::Consultation, Service::TouchUp];

    pub fn as_str(self) -> &'static str {
        match self {
            Service::Tattoo => "Tattoo",
            Service::Consultation => "Consultation",
            Service::TouchUp => "Touch up",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::OPTIONS
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| format!("Unknown service: {s}"))
    }
}

/// A stored artist record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub status: ArtistStatus,
    /// Australian Business Number, 11 digits.
    pub tax_id: Option<String>,
    pub gst_registered: bool,
    pub commission_percent: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub services: Vec<Service>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ArtistProfile {
    pub fn is_active(&self) -> bool {
        self.status == ArtistStatus::Active
    }

    /// Link for the Instagram field, which may hold a handle or a full URL.
    pub fn instagram_url(&self) -> Option<String> {
        let handle = self.instagram.as_deref()?;
        if handle.starts_with("http") {
            Some(handle.to_string())
        } else {
            Some(format!(
                "https://instagram.com/{}",
                handle.trim_start_matches('@')
            ))
        }
    }
}

/// Reasons a submitted form is rejected before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("ABN should be 11 digits.")]
    InvalidTaxId,
    #[error("Commission % must be a number (0 to 100).")]
    InvalidCommission,
    #[error("Commission % must be between 0 and 100.")]
    CommissionOutOfRange,
    #[error("{field} must be a valid date (YYYY-MM-DD).")]
    InvalidDate { field: &'static str },
}

/// Raw artist form values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub instagram: String,
    pub specialty: String,
    pub bio: String,
    pub status: ArtistStatus,
    pub tax_id: String,
    pub gst_registered: bool,
    pub commission: String,
    pub start_date: String,
    pub end_date: String,
    pub services: Vec<Service>,
}

impl ArtistInput {
    /// Pre-populate a form from a stored record.
    pub fn from_profile(profile: &ArtistProfile) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let date = |value: Option<NaiveDate>| value.map(|d| d.to_string()).unwrap_or_default();

        Self {
            name: profile.name.clone(),
            email: text(&profile.email),
            phone: text(&profile.phone),
            instagram: text(&profile.instagram),
            specialty: text(&profile.specialty),
            bio: text(&profile.bio),
            status: profile.status,
            tax_id: text(&profile.tax_id),
            gst_registered: profile.gst_registered,
            commission: profile
                .commission_percent
                .map(|c| c.to_string())
                .unwrap_or_default(),
            start_date: date(profile.start_date),
            end_date: date(profile.end_date),
            services: profile.services.clone(),
        }
    }

    pub fn toggle_service(&mut self, service: Service) {
        if let Some(pos) = self.services.iter().position(|s| *s == service) {
            self.services.remove(pos);
        } else {
            self.services.push(service);
        }
    }

    pub fn validate(&self) -> Result<ArtistDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }

        let tax_id = parse_tax_id(&self.tax_id)?;
        let commission_percent = parse_commission(&self.commission)?;
        let start_date = parse_date(&self.start_date, "Start date")?;
        let end_date = parse_date(&self.end_date, "End date")?;

        Ok(ArtistDraft {
            name: name.to_string(),
            status: self.status,
            email: non_blank(&self.email),
            phone: non_blank(&self.phone),
            instagram: non_blank(&self.instagram),
            specialty: non_blank(&self.specialty),
            bio: non_blank(&self.bio),
            tax_id,
            gst_registered: self.gst_registered,
            commission_percent,
            start_date,
            end_date,
            services: self.services.clone(),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Strip whitespace and require exactly 11 ASCII digits.
fn parse_tax_id(raw: &str) -> Result<Option<String>, ValidationError> {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return Ok(None);
    }
    if digits.len() == 11 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(Some(digits))
    } else {
        Err(ValidationError::InvalidTaxId)
    }
}

fn parse_commission(raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| ValidationError::InvalidCommission)?;
    if value.is_nan() {
        return Err(ValidationError::InvalidCommission);
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::CommissionOutOfRange);
    }
    Ok(Some(value))
}

fn parse_date(raw: &str, field: &'static str) -> Result<Option<NaiveDate>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate { field })
}

/// Validated artist fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistDraft {
    pub name: String,
    pub status: ArtistStatus,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub tax_id: Option<String>,
    pub gst_registered: bool,
    pub commission_percent: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub services: Vec<Service>,
}

impl ArtistDraft {
    /// Build the stored record for a newly created artist.
    pub fn into_profile(self, id: String, now: DateTime<Utc>) -> ArtistProfile {
        ArtistProfile {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            instagram: self.instagram,
            specialty: self.specialty,
            bio: self.bio,
            status: self.status,
            tax_id: self.tax_id,
            gst_registered: self.gst_registered,
            commission_percent: self.commission_percent,
            start_date: self.start_date,
            end_date: self.end_date,
            services: self.services,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Partial update for an edit submission.
    pub fn into_patch(self) -> ArtistPatch {
        ArtistPatch {
            name: Some(self.name),
            status: Some(self.status),
            email: self.email,
            phone: self.phone,
            instagram: self.instagram,
            specialty: self.specialty,
            bio: self.bio,
            tax_id: self.tax_id,
            gst_registered: Some(self.gst_registered),
            commission_percent: Some(self.commission_percent),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            services: Some(self.services),
        }
    }
}

/// Fields to overwrite on an existing record. `None` leaves a field alone;
/// `Some(None)` on a nullable field clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistPatch {
    pub name: Option<String>,
    pub status: Option<ArtistStatus>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub tax_id: Option<String>,
    pub gst_registered: Option<bool>,
    pub commission_percent: Option<Option<f64>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub services: Option<Vec<Service>>,
}

impl ArtistPatch {
    pub fn apply_to(&self, profile: &mut ArtistProfile) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        fn set_some<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        set(&mut profile.name, &self.name);
        set(&mut profile.status, &self.status);
        set_some(&mut profile.email, &self.email);
        set_some(&mut profile.phone, &self.phone);
        set_some(&mut profile.instagram, &self.instagram);
        set_some(&mut profile.specialty, &self.specialty);
        set_some(&mut profile.bio, &self.bio);
        set_some(&mut profile.tax_id, &self.tax_id);
        set(&mut profile.gst_registered, &self.gst_registered);
        set(&mut profile.commission_percent, &self.commission_percent);
        set(&mut profile.start_date, &self.start_date);
        set(&mut profile.end_date, &self.end_date);
        set(&mut profile.services, &self.services);
    }
}
