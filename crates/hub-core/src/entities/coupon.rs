//! Coupon entity - a one-time grant of tokens or tickets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Currency;
use crate::error::DomainError;
use crate::value_objects::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponState {
    Available,
    Used,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    pub id: Id,
    pub code: String,
    pub currency: Currency,
    pub amount: i64,
    pub expires_at: DateTime<Utc>,
    /// Owner once assigned; never changes afterwards
    pub member_id: Option<Id>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    pub const CODE_LENGTH: usize = 12;

    pub fn new(
        id: Id,
        code: String,
        currency: Currency,
        amount: i64,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            currency,
            amount,
            expires_at,
            member_id: None,
            used_at: None,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn state(&self, now: DateTime<Utc>) -> CouponState {
        if self.is_used() {
            CouponState::Used
        } else if self.is_expired(now) {
            CouponState::Expired
        } else {
            CouponState::Available
        }
    }

    /// Binds the coupon to `member_id`. A coupon is assigned at most once.
    pub fn assign(&mut self, member_id: Id, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_used() {
            return Err(DomainError::CouponAlreadyUsed);
        }
        if self.member_id.is_some() {
            return Err(DomainError::CouponAlreadyAssigned);
        }
        if self.is_expired(now) {
            return Err(DomainError::CouponExpired);
        }
        self.member_id = Some(member_id);
        Ok(())
    }

    pub fn check_redeemable(&self, member_id: Id, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_used() {
            return Err(DomainError::CouponAlreadyUsed);
        }
        if self.is_expired(now) {
            return Err(DomainError::CouponExpired);
        }
        match self.member_id {
            Some(owner) if owner != member_id => Err(DomainError::CouponNotOwned),
            _ => Ok(()),
        }
    }

    /// Marks the coupon used by `member_id`, claiming it if unassigned.
    pub fn redeem(&mut self, member_id: Id, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.check_redeemable(member_id, now)?;
        self.member_id = Some(member_id);
        self.used_at = Some(now);
        Ok(())
    }
}

/// Random upper-case alphanumeric coupon code, without look-alike characters
pub fn generate_coupon_code() -> String {
    use rand::Rng;

    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

    let mut rng = rand::thread_rng();
    (0..Coupon::CODE_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(expires_in: Duration) -> Coupon {
        Coupon::new(
            Id::new(1),
            generate_coupon_code(),
            Currency::Token,
            100,
            Utc::now() + expires_in,
        )
    }

    #[test]
    fn test_code_shape() {
        let code = generate_coupon_code();
        assert_eq!(code.len(), Coupon::CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert!(!code.contains('O') && !code.contains('0'));
    }

    #[test]
    fn test_redeem_claims_unassigned_coupon() {
        let mut c = coupon(Duration::days(1));
        let now = Utc::now();
        c.redeem(Id::new(5), now).unwrap();
        assert_eq!(c.member_id, Some(Id::new(5)));
        assert_eq!(c.state(now), CouponState::Used);
    }

    #[test]
    fn test_used_coupon_cannot_be_redeemed_again() {
        let mut c = coupon(Duration::days(1));
        let now = Utc::now();
        c.redeem(Id::new(5), now).unwrap();
        assert!(matches!(c.redeem(Id::new(5), now), Err(DomainError::CouponAlreadyUsed)));
    }

    #[test]
    fn test_expired_coupon_rejected() {
        let mut c = coupon(Duration::seconds(-1));
        let now = Utc::now();
        assert_eq!(c.state(now), CouponState::Expired);
        assert!(matches!(c.redeem(Id::new(5), now), Err(DomainError::CouponExpired)));
        assert!(matches!(c.assign(Id::new(5), now), Err(DomainError::CouponExpired)));
    }

    #[test]
    fn test_assigned_coupon_belongs_to_owner() {
        let mut c = coupon(Duration::days(1));
        let now = Utc::now();
        c.assign(Id::new(5), now).unwrap();
        assert!(matches!(c.check_redeemable(Id::new(6), now), Err(DomainError::CouponNotOwned)));
        assert!(c.check_redeemable(Id::new(5), now).is_ok());
    }

    #[test]
    fn test_assign_only_once() {
        let mut c = coupon(Duration::days(1));
        let now = Utc::now();
        c.assign(Id::new(5), now).unwrap();
        assert!(matches!(c.assign(Id::new(6), now), Err(DomainError::CouponAlreadyAssigned)));
        assert!(matches!(c.assign(Id::new(5), now), Err(DomainError::CouponAlreadyAssigned)));
    }
}
