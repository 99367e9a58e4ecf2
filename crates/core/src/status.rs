//! Closed enumerations for lifecycle and roster fields.
//!
//! Every status-like column in the database is TEXT, but values outside the
//! sets defined here are rejected at the boundary. Registration lifecycle
//! transitions are encoded in an explicit table rather than scattered
//! through handlers.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Registration lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle status of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Active,
}

impl RegistrationStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            _ => Err(CoreError::Validation(format!(
                "Invalid registration status '{s}'. Must be one of: pending, active"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }

    /// Transition table. Activation is one-way: `active` never returns to
    /// `pending`. Re-applying `active` is legal because settlement events
    /// can be redelivered.
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::Active) => true,
            (Self::Active, Self::Active) => true,
            (Self::Pending, Self::Pending) => true,
            (Self::Active, Self::Pending) => false,
        }
    }
}

/// Payment state of a registration.
///
/// `paid` implies the registration is `active`: the settlement handler sets
/// both in the same single-row update (see [`check_settled_pair`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unset,
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "unset" => Ok(Self::Unset),
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(CoreError::Validation(format!(
                "Invalid payment status '{s}'. Must be one of: unset, pending, paid"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

/// Validate the cross-field invariant `payment_status = paid => status = active`.
pub fn check_settled_pair(
    status: RegistrationStatus,
    payment: PaymentStatus,
) -> Result<(), CoreError> {
    if payment == PaymentStatus::Paid && status != RegistrationStatus::Active {
        return Err(CoreError::Validation(
            "A paid registration must be active".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Roster fields
// ---------------------------------------------------------------------------

/// Player gender as collected by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            _ => Err(CoreError::Validation(format!(
                "Invalid gender '{s}'. Must be one of: Male, Female"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Preferred field position. `TBD` is the default for new registrations and
/// for players materialized by settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "TBD")]
    Tbd,
    Forward,
    Midfielder,
    Defender,
    Goalkeeper,
}

impl Position {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "TBD" => Ok(Self::Tbd),
            "Forward" => Ok(Self::Forward),
            "Midfielder" => Ok(Self::Midfielder),
            "Defender" => Ok(Self::Defender),
            "Goalkeeper" => Ok(Self::Goalkeeper),
            _ => Err(CoreError::Validation(format!(
                "Invalid position '{s}'. Must be one of: TBD, Forward, Midfielder, Defender, Goalkeeper"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tbd => "TBD",
            Self::Forward => "Forward",
            Self::Midfielder => "Midfielder",
            Self::Defender => "Defender",
            Self::Goalkeeper => "Goalkeeper",
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::Tbd
    }
}

/// Jersey sizes offered by the club shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JerseySize {
    #[serde(rename = "YS")]
    YouthSmall,
    #[serde(rename = "YM")]
    YouthMedium,
    #[serde(rename = "YL")]
    YouthLarge,
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
    #[serde(rename = "XL")]
    ExtraLarge,
}

impl JerseySize {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "YS" => Ok(Self::YouthSmall),
            "YM" => Ok(Self::YouthMedium),
            "YL" => Ok(Self::YouthLarge),
            "S" => Ok(Self::Small),
            "M" => Ok(Self::Medium),
            "L" => Ok(Self::Large),
            "XL" => Ok(Self::ExtraLarge),
            _ => Err(CoreError::Validation(format!(
                "Invalid jersey size '{s}'. Must be one of: YS, YM, YL, S, M, L, XL"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::YouthSmall => "YS",
            Self::YouthMedium => "YM",
            Self::YouthLarge => "YL",
            Self::Small => "S",
            Self::Medium => "M",
            Self::Large => "L",
            Self::ExtraLarge => "XL",
        }
    }
}

impl Default for JerseySize {
    fn default() -> Self {
        Self::YouthMedium
    }
}

/// Age bracket a player competes in for a given season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    U6,
    U8,
    U10,
    U12,
    U14,
    U16,
}

impl AgeGroup {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "U6" => Ok(Self::U6),
            "U8" => Ok(Self::U8),
            "U10" => Ok(Self::U10),
            "U12" => Ok(Self::U12),
            "U14" => Ok(Self::U14),
            "U16" => Ok(Self::U16),
            _ => Err(CoreError::Validation(format!(
                "Invalid age group '{s}'. Must be one of: U6, U8, U10, U12, U14, U16"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::U6 => "U6",
            Self::U8 => "U8",
            Self::U10 => "U10",
            Self::U12 => "U12",
            Self::U14 => "U14",
            Self::U16 => "U16",
        }
    }

    /// Default bracket for a date of birth, based on the player's age at the
    /// start of the season (Jan 1 of `season_year`). Players older than the
    /// top bracket land in `U16`; staff can reassign.
    pub fn for_dob(dob: chrono::NaiveDate, season_year: i32) -> Self {
        use chrono::Datelike;
        let age = season_year - dob.year();
        match age {
            i32::MIN..=5 => Self::U6,
            6..=7 => Self::U8,
            8..=9 => Self::U10,
            10..=11 => Self::U12,
            12..=13 => Self::U14,
            _ => Self::U16,
        }
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// User roles. Parents self-register; coaches and admins are provisioned by
/// staff (promotion from `parent` is a first-class operation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Parent,
    Coach,
    Admin,
}

impl Role {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "parent" => Ok(Self::Parent),
            "coach" => Ok(Self::Coach),
            "admin" => Ok(Self::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: parent, coach, admin"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Coach => "coach",
            Self::Admin => "admin",
        }
    }

    /// Coaches and admins count as staff for read access to rosters.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Coach | Self::Admin)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
