//! Member entity - a registered account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Id, Roles};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Withdrawn,
    Suspended,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Withdrawn => "WITHDRAWN",
            Self::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "WITHDRAWN" => Some(Self::Withdrawn),
            "SUSPENDED" => Some(Self::Suspended),
            _ => None,
        }
    }
}

/// Where the account's credentials live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OAuthProvider {
    Local,
    Google,
    Kakao,
    Naver,
    Github,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Google => "GOOGLE",
            Self::Kakao => "KAKAO",
            Self::Naver => "NAVER",
            Self::Github => "GITHUB",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LOCAL" => Some(Self::Local),
            "GOOGLE" => Some(Self::Google),
            "KAKAO" => Some(Self::Kakao),
            "NAVER" => Some(Self::Naver),
            "GITHUB" => Some(Self::Github),
            _ => None,
        }
    }

    #[inline]
    pub fn is_social(&self) -> bool {
        !matches!(self, Self::Local)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: Id,
    pub email: String,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub status: MemberStatus,
    pub roles: Roles,
    pub provider: OAuthProvider,
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Local (email + password) account
    pub fn new(id: Id, email: String, nickname: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            nickname,
            profile_image: None,
            status: MemberStatus::Active,
            roles: Roles::USER,
            provider: OAuthProvider::Local,
            provider_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn social(
        id: Id,
        email: String,
        nickname: String,
        provider: OAuthProvider,
        provider_id: String,
    ) -> Self {
        Self {
            provider,
            provider_id: Some(provider_id),
            ..Self::new(id, email, nickname)
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }

    /// Fails unless the account may authenticate
    pub fn ensure_can_login(&self) -> Result<(), DomainError> {
        match self.status {
            MemberStatus::Active => Ok(()),
            MemberStatus::Suspended => Err(DomainError::AccountSuspended),
            MemberStatus::Withdrawn => Err(DomainError::AccountWithdrawn),
        }
    }

    /// Admin-driven status change. Withdrawal is terminal.
    pub fn change_status(&mut self, status: MemberStatus) -> Result<(), DomainError> {
        if self.status == MemberStatus::Withdrawn {
            return Err(DomainError::MemberWithdrawn);
        }
        if status == MemberStatus::Withdrawn {
            return Err(DomainError::validation(
                "members withdraw themselves; use SUSPENDED instead",
            ));
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn withdraw(&mut self) {
        self.status = MemberStatus::Withdrawn;
        self.updated_at = Utc::now();
    }

    pub fn set_nickname(&mut self, nickname: String) {
        self.nickname = nickname;
        self.updated_at = Utc::now();
    }

    pub fn set_profile_image(&mut self, image: Option<String>) {
        self.profile_image = image;
        self.updated_at = Utc::now();
    }

    pub fn set_roles(&mut self, roles: Roles) {
        self.roles = roles.normalized();
        self.updated_at = Utc::now();
    }
}
