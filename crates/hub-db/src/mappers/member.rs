//! Member model -> entity

use hub_core::entities::{Member, MemberStatus, OAuthProvider};
use hub_core::error::DomainError;
use hub_core::value_objects::{Id, Roles};

use super::parse_column;
use crate::models::MemberModel;

impl TryFrom<MemberModel> for Member {
    type Error = DomainError;

    fn try_from(model: MemberModel) -> Result<Self, Self::Error> {
        Ok(Member {
            id: Id::new(model.id),
            email: model.email,
            nickname: model.nickname,
            profile_image: model.profile_image,
            status: parse_column("status", &model.status, MemberStatus::parse)?,
            roles: Roles::from_i32(model.roles).normalized(),
            provider: parse_column("provider", &model.provider, OAuthProvider::parse)?,
            provider_id: model.provider_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model() -> MemberModel {
        MemberModel {
            id: 7,
            email: "a@b.com".into(),
            nickname: "alice".into(),
            profile_image: None,
            status: "SUSPENDED".into(),
            roles: 2,
            provider: "GOOGLE".into(),
            provider_id: Some("g-1".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_member_from_model() {
        let member = Member::try_from(model()).unwrap();
        assert_eq!(member.id, Id::new(7));
        assert_eq!(member.status, MemberStatus::Suspended);
        assert_eq!(member.provider, OAuthProvider::Google);
        // USER is always present
        assert!(member.roles.contains(Roles::USER | Roles::ADMIN));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut bad = model();
        bad.status = "GONE".into();
        assert!(Member::try_from(bad).is_err());
    }
}
